//! Integration tests for cascade, inheritance and computed values.

use lantern_css::{Rule, apply_styles, parse_stylesheet, ua_stylesheet};
use lantern_dom::{DomTree, NodeId};
use lantern_html::parse;

fn styled(html: &str, css: &str) -> DomTree {
    let mut tree = parse(html);
    apply_styles(&mut tree, &parse_stylesheet(css));
    tree
}

fn find(tree: &DomTree, tag: &str) -> NodeId {
    tree.descendants(tree.root())
        .find(|&id| tree.tag_name(id) == Some(tag))
        .unwrap_or_else(|| panic!("no <{tag}> in tree"))
}

fn first_text(tree: &DomTree, id: NodeId) -> NodeId {
    tree.descendants(id)
        .find(|&n| tree.as_text(n).is_some())
        .unwrap_or_else(|| panic!("no text below {id:?}"))
}

#[test]
fn test_inline_style_beats_rules() {
    let tree = styled(r#"<p id="x" style="color: red">hi</p>"#, "#x { color: green; } p { color: blue; }");
    assert_eq!(tree.style_value(tree.root(), "color"), Some("red"));
}

#[test]
fn test_priority_beats_source_order() {
    let tree = styled(
        r#"<div><p class="note">hi</p></div>"#,
        ".note { color: green; } p { color: blue; }",
    );
    assert_eq!(tree.style_value(find(&tree, "p"), "color"), Some("green"));
}

#[test]
fn test_equal_priority_last_wins() {
    let tree = styled("<p>hi</p>", "p { color: green; } p { color: blue; }");
    assert_eq!(tree.style_value(tree.root(), "color"), Some("blue"));
}

#[test]
fn test_descendant_beats_plain_tag() {
    let tree = styled(
        "<div><p>hi</p></div>",
        "div p { color: green; } p { color: blue; }",
    );
    assert_eq!(tree.style_value(find(&tree, "p"), "color"), Some("green"));
}

#[test]
fn test_author_rules_beat_user_agent_rules() {
    let mut tree = parse("<body><h1>Title</h1></body>");
    let mut rules: Vec<Rule> = parse_stylesheet("h1 { font-weight: normal; }");
    rules.extend(ua_stylesheet().iter().cloned());
    apply_styles(&mut tree, &rules);

    let h1 = find(&tree, "h1");
    assert_eq!(tree.style_value(h1, "font-weight"), Some("normal"));
    assert_eq!(tree.style_value(h1, "display"), Some("block"));
}

#[test]
fn test_text_inherits_from_element() {
    let tree = styled(
        "<div><span>hello</span></div>",
        "div { color: purple; font-size: 20px; font-weight: bold; font-style: italic; }",
    );
    let text = first_text(&tree, tree.root());
    assert_eq!(tree.style_value(text, "color"), Some("purple"));
    assert_eq!(tree.style_value(text, "font-size"), Some("20px"));
    assert_eq!(tree.style_value(text, "font-weight"), Some("bold"));
    assert_eq!(tree.style_value(text, "font-style"), Some("italic"));
}

#[test]
fn test_root_gets_defaults() {
    let tree = styled("<div>x</div>", "");
    let root = tree.root();
    assert_eq!(tree.style_value(root, "font-size"), Some("16px"));
    assert_eq!(tree.style_value(root, "font-style"), Some("normal"));
    assert_eq!(tree.style_value(root, "font-weight"), Some("normal"));
    assert_eq!(tree.style_value(root, "color"), Some("black"));
}

#[test]
fn test_non_inherited_properties_stay_put() {
    let tree = styled("<div><p>x</p></div>", "div { background-color: red; margin: 4px; }");
    let p = find(&tree, "p");
    assert_eq!(tree.style_value(p, "background-color"), None);
    assert_eq!(tree.style_value(p, "margin"), None);
}

#[test]
fn test_percentage_font_size() {
    let tree = styled("<div><p>x</p></div>", "div { font-size: 16px; } p { font-size: 150%; }");
    assert_eq!(tree.style_value(find(&tree, "p"), "font-size"), Some("24.0px"));
}

#[test]
fn test_percentages_compound_through_pixels() {
    let tree = styled(
        "<div><section><p>x</p></section></div>",
        "section { font-size: 50%; } p { font-size: 50%; }",
    );
    assert_eq!(tree.style_value(find(&tree, "section"), "font-size"), Some("8.0px"));
    assert_eq!(tree.style_value(find(&tree, "p"), "font-size"), Some("4.0px"));
}

#[test]
fn test_rem_ignores_nesting() {
    let tree = styled(
        "<div><section><p>x</p></section></div>",
        "div { font-size: 40px; } section { font-size: 3em; } p { font-size: 2rem; }",
    );
    assert_eq!(tree.style_value(find(&tree, "section"), "font-size"), Some("120.0px"));
    assert_eq!(tree.style_value(find(&tree, "p"), "font-size"), Some("32.0px"));
}

#[test]
fn test_unknown_unit_leaves_inherited_value() {
    let tree = styled(
        "<div><p>x</p></div>",
        "div { font-size: 20px; } p { font-size: 1vw; }",
    );
    assert_eq!(tree.style_value(find(&tree, "p"), "font-size"), Some("20px"));
}

#[test]
fn test_inline_style_font_size_resolves() {
    let tree = styled(r#"<div><p style="font-size: 200%">x</p></div>"#, "div { font-size: 10px; }");
    let p = find(&tree, "p");
    assert_eq!(tree.style_value(p, "font-size"), Some("20.0px"));
    assert_eq!(tree.style_value(first_text(&tree, p), "font-size"), Some("20.0px"));
}

#[test]
fn test_cascade_is_repeatable() {
    let html = r#"<div class="a"><p id="b">x <em>y</em></p></div>"#;
    let css = ".a { color: red; } #b { font-size: 2em; } em { font-style: italic; }";
    let first = styled(html, css);
    let second = styled(html, css);
    for id in first.descendants(first.root()) {
        assert_eq!(first.style(id), second.style(id));
    }
}
