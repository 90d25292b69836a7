//! CSS Layout Engine
//!
//! This module implements a small subset of the CSS Visual Formatting Model:
//! normal-flow block boxes, anonymous blocks around inline runs, and
//! greedy line breaking of words.
//!
//! # Relevant Specifications
//!
//! - [CSS Display Module Level 3](https://www.w3.org/TR/css-display-3/)
//! - [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)
//! - [CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html)
//!
//! # Module Structure
//!
//! - [`box_model`] - Rectangles and edge sizes
//! - [`inline`] - Font descriptors and text measurement
//! - [`layout_box`] - Layout box types and layout algorithms
//! - [`values`] - Margin resolution

pub mod box_model;
pub mod inline;
pub mod layout_box;
pub mod values;

use lantern_dom::{DomTree, NodeId};

pub use box_model::{EdgeSizes, Rect};
pub use inline::{ApproximateFontMetrics, FontDescriptor, FontMetrics, FontSlant, FontWeight};
pub use layout_box::{BoxKind, LINE_HEIGHT_FACTOR, LayoutBox};

/// Horizontal page margin in pixels.
pub const H_STEP: f32 = 13.0;

/// Vertical page margin in pixels.
pub const V_STEP: f32 = 18.0;

/// [§ 2 Box Layout Modes](https://www.w3.org/TR/css-display-3/#the-display-properties)
///
/// How a node's box participates in its parent's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Stacks vertically in a block formatting context.
    Block,
    /// Flows into lines in an inline formatting context.
    Inline,
}

/// Text is always inline. An element is block-level only when its
/// computed `display` is exactly `block`.
#[must_use]
pub fn layout_mode(tree: &DomTree, node: NodeId) -> LayoutMode {
    if tree.as_element(node).is_some() && tree.style_value(node, "display") == Some("block") {
        LayoutMode::Block
    } else {
        LayoutMode::Inline
    }
}

/// [§ 2.5 Box Generation](https://www.w3.org/TR/css-display-3/#box-generation)
///
/// "none: The element and its descendants generate no boxes or text
/// runs."
#[must_use]
pub fn generates_box(tree: &DomTree, node: NodeId) -> bool {
    tree.style_value(node, "display") != Some("none")
}
