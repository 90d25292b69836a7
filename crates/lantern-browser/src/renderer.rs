//! Display list execution.
//!
//! The renderer is the final stage in the pipeline:
//!
//! ```text
//! Style → Layout → Paint → Render
//!                    ↓        ↓
//!              DisplayList → Canvas
//! ```
//!
//! The renderer knows nothing about CSS, layout, or the DOM. It culls
//! commands against the viewport and forwards the rest to a [`Canvas`],
//! translated from page coordinates to screen coordinates.

use lantern_css::{DisplayCommand, DisplayList, FontDescriptor};

/// A drawing surface in screen coordinates.
pub trait Canvas {
    /// Fill the rectangle `[left, right) × [top, bottom)` with `color`.
    fn fill_rect(&mut self, left: f32, top: f32, right: f32, bottom: f32, color: &str);

    /// Draw `text` with its top-left corner at (`x`, `y`).
    fn draw_text(&mut self, x: f32, y: f32, text: &str, font: &FontDescriptor, color: &str);
}

/// Executes display lists against a canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Renderer {
    /// Screen rows above the page area, reserved for browser chrome.
    top_offset: f32,
}

impl Renderer {
    /// Create a renderer whose page area starts `top_offset` pixels down
    /// the canvas.
    #[must_use]
    pub const fn new(top_offset: f32) -> Self {
        Self { top_offset }
    }

    /// Draw every command visible in `[scroll, scroll + viewport_height]`.
    ///
    /// Commands are executed in order (back to front), which is the
    /// painting order established by the painter.
    pub fn execute(
        &self,
        display_list: &DisplayList,
        scroll: f32,
        viewport_height: f32,
        canvas: &mut dyn Canvas,
    ) {
        let shift = self.top_offset - scroll;
        for command in display_list.visible(scroll, viewport_height) {
            match command {
                DisplayCommand::Rect {
                    left,
                    top,
                    right,
                    bottom,
                    color,
                } => canvas.fill_rect(*left, top + shift, *right, bottom + shift, color),
                DisplayCommand::Text {
                    x,
                    y,
                    text,
                    font,
                    color,
                    ..
                } => canvas.draw_text(*x, y + shift, text, font, color),
            }
        }
    }
}
