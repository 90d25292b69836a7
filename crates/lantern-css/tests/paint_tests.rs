//! Integration tests for display list generation.

use lantern_css::{
    ApproximateFontMetrics, DisplayCommand, DisplayList, LayoutBox, apply_styles,
    collect_paint_commands, parse_stylesheet, ua_stylesheet,
};
use lantern_html::parse;

fn paint(html: &str, css: &str) -> (LayoutBox, DisplayList) {
    let mut tree = parse(html);
    let mut rules = ua_stylesheet().to_vec();
    rules.extend(parse_stylesheet(css));
    apply_styles(&mut tree, &rules);
    let root = LayoutBox::layout_document(&tree, 800.0, &ApproximateFontMetrics);
    let list = collect_paint_commands(&root, &tree);
    (root, list)
}

fn rect_colors(list: &DisplayList) -> Vec<&str> {
    list.commands()
        .iter()
        .filter_map(|c| match c {
            DisplayCommand::Rect { color, .. } => Some(color.as_str()),
            DisplayCommand::Text { .. } => None,
        })
        .collect()
}

fn texts(list: &DisplayList) -> Vec<&str> {
    list.commands()
        .iter()
        .filter_map(|c| match c {
            DisplayCommand::Text { text, .. } => Some(text.as_str()),
            DisplayCommand::Rect { .. } => None,
        })
        .collect()
}

#[test]
fn test_words_become_text_commands() {
    let (root, list) = paint("<p>Hello world</p>", "");
    assert_eq!(texts(&list), vec!["Hello", "world"]);

    let word = &root.children[0].children[0].children[0];
    let DisplayCommand::Text {
        x, y, bottom, color, ..
    } = &list.commands()[0]
    else {
        panic!("expected a text command");
    };
    assert!((x - word.rect.x).abs() < 1e-4);
    assert!((y - word.rect.y).abs() < 1e-4);
    assert!((bottom - word.rect.bottom()).abs() < 1e-4);
    assert_eq!(color, "black");
}

#[test]
fn test_block_background_precedes_its_text() {
    let (root, list) = paint(
        "<body><div>text</div></body>",
        "div { background-color: lightblue; }",
    );
    assert!(matches!(list.commands()[0], DisplayCommand::Rect { .. }));
    assert!(matches!(list.commands()[1], DisplayCommand::Text { .. }));

    let div = &root.children[0].children[0];
    assert_eq!(
        list.commands()[0],
        DisplayCommand::Rect {
            left: div.rect.x,
            top: div.rect.y,
            right: div.rect.right(),
            bottom: div.rect.bottom(),
            color: "lightblue".to_string(),
        }
    );
}

#[test]
fn test_transparent_backgrounds_are_skipped() {
    let (_, list) = paint(
        "<body><div>a</div><p>b</p></body>",
        "div { background-color: transparent; }",
    );
    assert!(rect_colors(&list).is_empty());
}

#[test]
fn test_nested_blocks_paint_parent_first() {
    let (_, list) = paint(
        "<body><div><p>x</p></div></body>",
        "body { background-color: white; } div { background-color: gray; } p { background-color: red; }",
    );
    assert_eq!(rect_colors(&list), vec!["white", "gray", "red"]);
}

#[test]
fn test_inline_background() {
    let (_, list) = paint("<p>a <mark>marked text</mark> b</p>", "");
    assert_eq!(rect_colors(&list), vec!["yellow"]);
    assert_eq!(texts(&list), vec!["a", "marked", "text", "b"]);
}

#[test]
fn test_inline_background_from_closest_inline_ancestor() {
    let (_, list) = paint(
        "<p>a <span>x <em>y</em></span></p>",
        "span { background-color: pink; } p { background-color: gray; }",
    );
    // One block rect, then one rect per inline box: <span> and the <em> inside it.
    assert_eq!(rect_colors(&list), vec!["gray", "pink", "pink"]);
}

#[test]
fn test_inline_background_stops_at_block() {
    let (_, list) = paint("<div><p>a <em>y</em></p></div>", "div { background-color: gray; }");
    // The <em> never borrows the block's background.
    assert_eq!(rect_colors(&list), vec!["gray"]);
}

#[test]
fn test_visible_commands() {
    let many = "<p>x</p>".repeat(40);
    let (_, list) = paint(&format!("<body>{many}</body>"), "");
    let visible: Vec<&DisplayCommand> = list.visible(200.0, 300.0).collect();
    assert!(!visible.is_empty());
    assert!(visible.len() < list.len());
    for command in visible {
        assert!(command.bottom() >= 200.0);
        assert!(command.top() <= 500.0);
    }
}

#[test]
fn test_display_list_serializes() {
    let (_, list) = paint("<p>Hi</p>", "");
    let json = serde_json::to_value(&list).unwrap_or_default();
    assert_eq!(json[0]["type"], "Text");
    assert_eq!(json[0]["text"], "Hi");
    assert_eq!(json[0]["font"]["weight"], "Normal");
}
