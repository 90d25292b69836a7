//! Display List - a sequence of drawing commands
//!
//! [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html)
//!
//! The display list is the output of the painting phase. It contains all the
//! drawing commands needed to render a page, back to front, in absolute
//! page coordinates.

use serde::Serialize;

use crate::layout::FontDescriptor;

/// A single drawing command.
///
/// [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum DisplayCommand {
    /// Fill a rectangle with a solid color.
    ///
    /// Used for element backgrounds.
    Rect {
        /// Left edge.
        left: f32,
        /// Top edge.
        top: f32,
        /// Right edge.
        right: f32,
        /// Bottom edge.
        bottom: f32,
        /// Fill color, as written in the stylesheet.
        color: String,
    },

    /// Draw one word.
    ///
    /// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
    /// Step 7: "the element's text"
    Text {
        /// Left edge of the word.
        x: f32,
        /// Top of the word's line space.
        y: f32,
        /// The word to draw.
        text: String,
        /// Font to draw it in.
        font: FontDescriptor,
        /// Text color.
        color: String,
        /// `y` plus the font's linespace.
        bottom: f32,
    },
}

impl DisplayCommand {
    /// Topmost page coordinate the command touches.
    #[must_use]
    pub const fn top(&self) -> f32 {
        match self {
            Self::Rect { top, .. } => *top,
            Self::Text { y, .. } => *y,
        }
    }

    /// Bottommost page coordinate the command touches.
    #[must_use]
    pub const fn bottom(&self) -> f32 {
        match self {
            Self::Rect { bottom, .. } | Self::Text { bottom, .. } => *bottom,
        }
    }
}

/// A list of drawing commands in painting order.
///
/// [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
///
/// Commands are stored in back-to-front order, so the renderer can simply
/// iterate and execute each command.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DisplayList {
    commands: Vec<DisplayCommand>,
}

impl DisplayList {
    /// Create an empty display list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Add a command to the display list.
    pub fn push(&mut self, command: DisplayCommand) {
        self.commands.push(command);
    }

    /// Get the commands in painting order.
    #[must_use]
    pub fn commands(&self) -> &[DisplayCommand] {
        &self.commands
    }

    /// Get the number of commands.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if the display list is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands that intersect the viewport `[scroll, scroll + viewport_height]`.
    ///
    /// A command is skipped only when it lies entirely below or entirely
    /// above the viewport. Order is preserved.
    pub fn visible(
        &self,
        scroll: f32,
        viewport_height: f32,
    ) -> impl Iterator<Item = &DisplayCommand> {
        self.commands.iter().filter(move |command| {
            command.top() <= scroll + viewport_height && command.bottom() >= scroll
        })
    }
}
