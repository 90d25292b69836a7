//! Painter - generates display list from layout tree
//!
//! [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
//!
//! Backgrounds are painted before the boxes they contain, so a pre-order
//! walk of the box tree is already back-to-front.

use lantern_dom::{DomTree, NodeId};

use super::{DisplayCommand, DisplayList};
use crate::layout::{BoxKind, LayoutBox, LayoutMode, Rect, layout_mode};

/// Walk a laid-out box tree and produce its drawing commands.
#[must_use]
pub fn collect_paint_commands(root: &LayoutBox, tree: &DomTree) -> DisplayList {
    let mut display_list = DisplayList::new();
    root.for_each_box(&mut |layout_box| paint_box(layout_box, tree, &mut display_list));
    display_list
}

fn paint_box(layout_box: &LayoutBox, tree: &DomTree, display_list: &mut DisplayList) {
    match &layout_box.kind {
        // [§ 14.2 The background](https://www.w3.org/TR/CSS2/colors.html#background)
        BoxKind::Block { node } => {
            if let Some(color) = background_color(tree, *node) {
                display_list.push(fill(layout_box.rect, color));
            }
        }
        // An inline box shows the background of the closest inline element
        // around it that has one, itself included.
        BoxKind::Inline { node } => {
            let background = std::iter::once(*node)
                .chain(tree.ancestors(*node))
                .take_while(|&id| layout_mode(tree, id) == LayoutMode::Inline)
                .find_map(|id| background_color(tree, id));
            if let Some(color) = background {
                display_list.push(fill(layout_box.rect, color));
            }
        }
        BoxKind::Word {
            text, font, color, ..
        } => display_list.push(DisplayCommand::Text {
            x: layout_box.rect.x,
            y: layout_box.rect.y,
            text: text.clone(),
            font: *font,
            color: color.clone(),
            bottom: layout_box.rect.bottom(),
        }),
        BoxKind::Document | BoxKind::AnonymousBlock { .. } | BoxKind::Line => {}
    }
}

/// The node's `background-color`, unless it is absent or `transparent`.
fn background_color(tree: &DomTree, node: NodeId) -> Option<&str> {
    tree.style_value(node, "background-color")
        .filter(|&color| color != "transparent")
}

fn fill(rect: Rect, color: &str) -> DisplayCommand {
    DisplayCommand::Rect {
        left: rect.x,
        top: rect.y,
        right: rect.right(),
        bottom: rect.bottom(),
        color: color.to_string(),
    }
}
