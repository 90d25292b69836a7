//! CSS Cascading and Inheritance
//!
//! [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/)
//!
//! Writes a computed style map onto every node of a DOM tree. Per node,
//! later steps override earlier ones for the same property:
//!
//! 1. inherited properties, copied from the parent's stored style
//! 2. matching rules, in cascade order
//! 3. the element's `style` attribute

use lantern_common::warning::warn_once;
use lantern_dom::{DomTree, NodeId, PropertyMap};

use crate::parser::{Rule, parse_declaration_block};

/// Default font size in pixels. Also the `rem` base.
pub const DEFAULT_FONT_SIZE_PX: f64 = 16.0;

/// [§ 7 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
///
/// Properties every node inherits, with their values at the root.
pub const INHERITED_PROPERTIES: [(&str, &str); 4] = [
    ("font-size", "16px"),
    ("font-style", "normal"),
    ("font-weight", "normal"),
    ("color", "black"),
];

/// [§ 6.1 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
///
/// Stable sort by origin, then selector priority. Rules with equal keys
/// keep their source order, so the later one wins when both apply.
pub fn sort_rules(rules: &mut [Rule]) {
    rules.sort_by_key(|rule| (rule.origin, rule.selector.priority()));
}

/// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
///
/// Compute and store the style of every node reachable from the root.
///
/// `rules` may be in any order. They are applied in cascade order. A
/// parent's style is stored before its children are visited, so
/// inheritance sees final parent values.
pub fn apply_styles(tree: &mut DomTree, rules: &[Rule]) {
    let mut ordered: Vec<&Rule> = rules.iter().collect();
    ordered.sort_by_key(|rule| (rule.origin, rule.selector.priority()));

    let mut stack = vec![tree.root()];
    while let Some(id) = stack.pop() {
        let style = style_for_node(tree, id, &ordered);
        tree.set_style(id, style);
        stack.extend(tree.children(id).iter().rev().copied());
    }
}

/// The full computed style of one node, given its parent's stored style.
fn style_for_node(tree: &DomTree, id: NodeId, rules: &[&Rule]) -> PropertyMap {
    let parent_style = tree.parent(id).and_then(|p| tree.style(p));

    // STEP 1: Inherited properties.
    let mut style = PropertyMap::new();
    for (property, default) in INHERITED_PROPERTIES {
        let value = parent_style
            .and_then(|s| s.get(property))
            .map_or(default, String::as_str);
        let _ = style.insert(property.to_string(), value.to_string());
    }

    // STEP 2: Matching rules, lowest priority first.
    for rule in rules.iter().filter(|rule| rule.selector.matches(tree, id)) {
        apply_declarations(tree, id, &rule.declarations, &mut style);
    }

    // STEP 3: The style attribute.
    if let Some(inline) = tree.as_element(id).and_then(|e| e.attr("style")) {
        apply_declarations(tree, id, &parse_declaration_block(inline), &mut style);
    }

    style
}

fn apply_declarations(
    tree: &DomTree,
    id: NodeId,
    declarations: &PropertyMap,
    style: &mut PropertyMap,
) {
    for (property, value) in declarations {
        // Values that cannot be computed leave the earlier value in place.
        if let Some(computed) = compute_style(tree, id, property, value) {
            let _ = style.insert(property.clone(), computed);
        }
    }
}

/// [§ 4.4 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)
///
/// Resolve a declared value into the value stored on the node.
///
/// Only `font-size` is resolved here, so that children inherit pixels
/// rather than a percentage that would compound:
///
/// - `px` is kept as written
/// - `%` and `em` scale the parent's font size
/// - `rem` scales the 16px default
///
/// Any other unit, or a number that does not parse, yields `None`. Every
/// other property is returned unchanged.
#[must_use]
pub fn compute_style(tree: &DomTree, node: NodeId, property: &str, value: &str) -> Option<String> {
    if property != "font-size" {
        return Some(value.to_string());
    }

    let resolved = if value.ends_with("px") {
        return Some(value.to_string());
    } else if let Some(pct) = value.strip_suffix('%') {
        parse_number(pct, value)? / 100.0 * parent_font_size(tree, node)
    } else if let Some(rem) = value.strip_suffix("rem") {
        parse_number(rem, value)? * DEFAULT_FONT_SIZE_PX
    } else if let Some(em) = value.strip_suffix("em") {
        parse_number(em, value)? * parent_font_size(tree, node)
    } else {
        warn_once("Cascade", &format!("unsupported font-size '{value}'"));
        return None;
    };

    Some(format!("{resolved:?}px"))
}

fn parse_number(number: &str, value: &str) -> Option<f64> {
    let parsed = number.trim().parse::<f64>().ok();
    if parsed.is_none() {
        warn_once("Cascade", &format!("invalid font-size '{value}'"));
    }
    parsed
}

/// The parent's stored font size in pixels, or the default at the root.
fn parent_font_size(tree: &DomTree, node: NodeId) -> f64 {
    tree.parent(node)
        .and_then(|p| tree.style_value(p, "font-size"))
        .and_then(|size| size.strip_suffix("px"))
        .and_then(|px| px.trim().parse().ok())
        .unwrap_or(DEFAULT_FONT_SIZE_PX)
}
