//! Integration tests for the browsing session.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use lantern_browser::{Canvas, LoadError, Tab, TabConfig};
use lantern_common::net::{FetchError, Fetcher, Response};
use lantern_css::{ApproximateFontMetrics, BoxKind, DisplayCommand, FontDescriptor, LayoutBox};

const PAGE: &str = "http://site.test/dir/page.html";

/// Serves pages from memory and records every requested URL.
#[derive(Clone, Default)]
struct MemoryFetcher {
    pages: Rc<RefCell<HashMap<String, String>>>,
    requests: Rc<RefCell<Vec<String>>>,
}

impl MemoryFetcher {
    fn with(self, url: &str, body: &str) -> Self {
        self.insert(url, body);
        self
    }

    fn insert(&self, url: &str, body: &str) {
        let _ = self
            .pages
            .borrow_mut()
            .insert(url.to_string(), body.to_string());
    }

    fn remove(&self, url: &str) {
        let _ = self.pages.borrow_mut().remove(url);
    }
}

impl Fetcher for MemoryFetcher {
    fn fetch(&self, url: &str) -> Result<Response, FetchError> {
        self.requests.borrow_mut().push(url.to_string());
        self.pages.borrow().get(url).map_or_else(
            || {
                Err(FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                })
            },
            |body| {
                Ok(Response {
                    headers: HashMap::new(),
                    body: body.clone(),
                })
            },
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Rect { top: f32, bottom: f32, color: String },
    Text { y: f32, text: String },
}

#[derive(Default)]
struct RecordingCanvas {
    calls: Vec<Call>,
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, _left: f32, top: f32, _right: f32, bottom: f32, color: &str) {
        self.calls.push(Call::Rect {
            top,
            bottom,
            color: color.to_string(),
        });
    }

    fn draw_text(&mut self, _x: f32, y: f32, text: &str, _font: &FontDescriptor, _color: &str) {
        self.calls.push(Call::Text {
            y,
            text: text.to_string(),
        });
    }
}

fn tab(fetcher: MemoryFetcher) -> Tab {
    Tab::with_parts(
        TabConfig::default(),
        Box::new(fetcher),
        Box::new(ApproximateFontMetrics),
    )
}

fn find_word<'a>(root: &'a LayoutBox, word: &str) -> Option<&'a LayoutBox> {
    let mut found = None;
    root.for_each_box(&mut |b| {
        if matches!(&b.kind, BoxKind::Word { text, .. } if text == word) {
            found = Some(b);
        }
    });
    found
}

fn long_page() -> String {
    format!("<body>{}</body>", "<p>line</p>".repeat(60))
}

#[test]
fn test_default_config() {
    let config = TabConfig::default();
    assert!((config.viewport_width - 800.0).abs() < f32::EPSILON);
    assert!((config.viewport_height - 600.0).abs() < f32::EPSILON);
    assert!((config.chrome_height - 100.0).abs() < f32::EPSILON);
    assert!((config.scroll_step - 100.0).abs() < f32::EPSILON);
    assert!((config.page_area_height() - 500.0).abs() < f32::EPSILON);
}

#[test]
fn test_load_url_records_history() {
    let fetcher = MemoryFetcher::default().with(PAGE, "<body><p>Hello</p></body>");
    let mut tab = tab(fetcher);

    assert!(tab.load_url(PAGE).is_ok());
    assert_eq!(tab.url(), Some(PAGE));
    assert_eq!(tab.history(), [PAGE.to_string()]);
    assert!(find_word(tab.layout(), "Hello").is_some());
}

#[test]
fn test_failed_fetch_leaves_page_untouched() {
    let fetcher = MemoryFetcher::default().with(PAGE, "<p>first</p>");
    let mut tab = tab(fetcher);
    assert!(tab.load_url(PAGE).is_ok());

    let result = tab.load_url("http://site.test/missing.html");
    assert!(matches!(
        result,
        Err(LoadError::Fetch(FetchError::Status { status: 404, .. }))
    ));
    assert_eq!(tab.url(), Some(PAGE));
    assert_eq!(tab.history().len(), 1);
    assert!(find_word(tab.layout(), "first").is_some());
}

#[test]
fn test_linked_stylesheet_is_resolved_and_applied() {
    let fetcher = MemoryFetcher::default()
        .with(
            PAGE,
            r#"<html><head><link rel="stylesheet" href="style.css"></head><body><p>x</p></body></html>"#,
        )
        .with("http://site.test/dir/style.css", "p { background-color: red; }");
    let requests = Rc::clone(&fetcher.requests);
    let mut tab = tab(fetcher);

    assert!(tab.load_url(PAGE).is_ok());
    assert_eq!(
        *requests.borrow(),
        vec![PAGE.to_string(), "http://site.test/dir/style.css".to_string()]
    );
    assert!(tab.display_list().commands().iter().any(|c| matches!(
        c,
        DisplayCommand::Rect { color, .. } if color == "red"
    )));
}

#[test]
fn test_missing_stylesheet_is_skipped() {
    let fetcher = MemoryFetcher::default().with(
        PAGE,
        r#"<head><link rel="stylesheet" href="/gone.css"></head><body><p>still here</p></body>"#,
    );
    let requests = Rc::clone(&fetcher.requests);
    let mut tab = tab(fetcher);

    assert!(tab.load_url(PAGE).is_ok());
    assert!(requests.borrow().contains(&"http://site.test/gone.css".to_string()));
    assert!(find_word(tab.layout(), "here").is_some());
}

#[test]
fn test_style_elements_follow_document_order() {
    let fetcher = MemoryFetcher::default()
        .with(
            PAGE,
            r#"<html><head><link rel="stylesheet" href="a.css"><style>p { color: green; }</style></head><body><p>x</p></body></html>"#,
        )
        .with("http://site.test/dir/a.css", "p { color: blue; }");
    let mut tab = tab(fetcher);
    assert!(tab.load_url(PAGE).is_ok());

    let word = find_word(tab.layout(), "x").map(|b| b.kind.clone());
    assert!(matches!(word, Some(BoxKind::Word { color, .. }) if color == "green"));
}

#[test]
fn test_head_content_is_not_drawn() {
    let mut tab = tab(MemoryFetcher::default());
    tab.load("<html><head><title>Secret</title></head><body><p>Visible</p></body></html>");

    let mut canvas = RecordingCanvas::default();
    tab.draw(&mut canvas);
    let texts: Vec<&str> = canvas
        .calls
        .iter()
        .filter_map(|c| match c {
            Call::Text { text, .. } => Some(text.as_str()),
            Call::Rect { .. } => None,
        })
        .collect();
    assert_eq!(texts, vec!["Visible"]);
}

#[test]
fn test_draw_offsets_by_chrome_and_scroll() {
    let mut tab = tab(MemoryFetcher::default());
    tab.load(&long_page());
    let first_y = match &tab.display_list().commands()[0] {
        DisplayCommand::Text { y, .. } => *y,
        DisplayCommand::Rect { top, .. } => *top,
    };

    let mut canvas = RecordingCanvas::default();
    tab.draw(&mut canvas);
    assert_eq!(
        canvas.calls.first(),
        Some(&Call::Text {
            y: first_y + 100.0,
            text: "line".to_string()
        })
    );
    assert!(canvas.calls.len() < tab.display_list().len());

    tab.scroll_down();
    let mut scrolled = RecordingCanvas::default();
    tab.draw(&mut scrolled);
    for call in &scrolled.calls {
        if let Call::Text { y, .. } = call {
            // Every drawn word overlaps the page area below the chrome.
            assert!(*y <= 600.0);
            assert!(*y + 20.0 >= 100.0);
        }
    }
}

#[test]
fn test_block_backgrounds_are_drawn() {
    let mut tab = tab(MemoryFetcher::default());
    tab.load(r#"<body><div style="background-color: navy">x</div></body>"#);

    let mut canvas = RecordingCanvas::default();
    tab.draw(&mut canvas);
    assert!(matches!(
        canvas.calls.first(),
        Some(Call::Rect { color, .. }) if color == "navy"
    ));
}

#[test]
fn test_scroll_is_clamped_to_page() {
    let mut tab = tab(MemoryFetcher::default());
    tab.load(&long_page());
    let max_scroll = tab.page_height() - 500.0;
    assert!(max_scroll > 100.0);

    tab.scroll_down();
    assert!((tab.scroll() - 100.0).abs() < f32::EPSILON);
    for _ in 0..100 {
        tab.scroll_down();
    }
    assert!((tab.scroll() - max_scroll).abs() < 1e-3);

    // Loading a new page starts at the top again.
    tab.load("<p>short</p>");
    assert!(tab.scroll().abs() < f32::EPSILON);
    tab.scroll_down();
    assert!(tab.scroll().abs() < f32::EPSILON);
}

#[test]
fn test_click_follows_links() {
    let next = "http://site.test/dir/next.html";
    let fetcher = MemoryFetcher::default()
        .with(PAGE, r#"<body><p>go <a href="next.html">onward</a></p></body>"#)
        .with(next, "<body><p>arrived</p></body>");
    let mut tab = tab(fetcher);
    assert!(tab.load_url(PAGE).is_ok());

    let rect = find_word(tab.layout(), "onward")
        .map(|b| b.rect)
        .unwrap_or_default();
    let clicked = tab.click(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0 - tab.scroll());
    assert!(matches!(clicked, Ok(true)));
    assert_eq!(tab.url(), Some(next));
    assert_eq!(tab.history().len(), 2);
    assert!(find_word(tab.layout(), "arrived").is_some());
}

#[test]
fn test_click_outside_links_does_nothing() {
    let fetcher = MemoryFetcher::default().with(PAGE, r#"<body><p>plain <a href="x.html">link</a></p></body>"#);
    let mut tab = tab(fetcher);
    assert!(tab.load_url(PAGE).is_ok());

    let rect = find_word(tab.layout(), "plain")
        .map(|b| b.rect)
        .unwrap_or_default();
    assert!(matches!(
        tab.click(rect.x + 1.0, rect.y + rect.height / 2.0),
        Ok(false)
    ));
    assert!(matches!(tab.click(-50.0, -50.0), Ok(false)));
    assert_eq!(tab.history().len(), 1);
}

#[test]
fn test_click_accounts_for_scroll() {
    let target = "http://site.test/dir/bottom.html";
    let html = format!(
        r#"<body>{}<p><a href="bottom.html">bottom</a></p></body>"#,
        "<p>line</p>".repeat(40)
    );
    let fetcher = MemoryFetcher::default()
        .with(PAGE, &html)
        .with(target, "<p>done</p>");
    let mut tab = tab(fetcher);
    assert!(tab.load_url(PAGE).is_ok());

    for _ in 0..100 {
        tab.scroll_down();
    }
    let rect = find_word(tab.layout(), "bottom")
        .map(|b| b.rect)
        .unwrap_or_default();
    let screen_y = rect.y + rect.height / 2.0 - tab.scroll();
    assert!(screen_y < 500.0);
    assert!(matches!(tab.click(rect.x + 1.0, screen_y), Ok(true)));
    assert_eq!(tab.url(), Some(target));
}

#[test]
fn test_go_back() {
    let second = "http://site.test/two.html";
    let fetcher = MemoryFetcher::default()
        .with(PAGE, "<p>one</p>")
        .with(second, "<p>two</p>");
    let mut tab = tab(fetcher);

    assert!(matches!(tab.go_back(), Ok(false)));
    assert!(tab.load_url(PAGE).is_ok());
    assert!(matches!(tab.go_back(), Ok(false)));
    assert!(tab.load_url(second).is_ok());

    assert!(matches!(tab.go_back(), Ok(true)));
    assert_eq!(tab.url(), Some(PAGE));
    assert_eq!(tab.history(), [PAGE.to_string()]);
    assert!(find_word(tab.layout(), "one").is_some());
}

#[test]
fn test_failed_go_back_keeps_history() {
    let second = "http://site.test/two.html";
    let fetcher = MemoryFetcher::default()
        .with(PAGE, "<p>one</p>")
        .with(second, "<p>two</p>");
    let pages = fetcher.clone();
    let mut tab = tab(fetcher);
    assert!(tab.load_url(PAGE).is_ok());
    assert!(tab.load_url(second).is_ok());

    pages.remove(PAGE);
    assert!(matches!(
        tab.go_back(),
        Err(LoadError::Fetch(FetchError::Status { status: 404, .. }))
    ));
    assert_eq!(tab.url(), Some(second));
    assert_eq!(tab.history(), [PAGE.to_string(), second.to_string()]);
    assert_eq!(tab.history().last().map(String::as_str), tab.url());
    assert!(find_word(tab.layout(), "two").is_some());

    // Once the page is reachable again, going back works.
    pages.insert(PAGE, "<p>one</p>");
    assert!(matches!(tab.go_back(), Ok(true)));
    assert_eq!(tab.url(), Some(PAGE));
    assert_eq!(tab.history(), [PAGE.to_string()]);
}

#[test]
fn test_click_between_words_of_a_block_link() {
    let next = "http://site.test/dir/next.html";
    let fetcher = MemoryFetcher::default()
        .with(
            PAGE,
            r#"<body><a href="next.html" style="display:block">Click here</a></body>"#,
        )
        .with(next, "<p>arrived</p>");
    let mut tab = tab(fetcher);
    assert!(tab.load_url(PAGE).is_ok());

    let first = find_word(tab.layout(), "Click")
        .map(|b| b.rect)
        .unwrap_or_default();
    let second = find_word(tab.layout(), "here")
        .map(|b| b.rect)
        .unwrap_or_default();
    let gap_x = (first.right() + second.x) / 2.0;
    let mid_y = first.y + first.height / 2.0;
    assert!(gap_x > first.right() && gap_x < second.x);

    assert!(matches!(tab.click(gap_x, mid_y), Ok(true)));
    assert_eq!(tab.url(), Some(next));
}

#[test]
fn test_click_right_of_last_word_in_block_link() {
    let next = "http://site.test/dir/next.html";
    let fetcher = MemoryFetcher::default()
        .with(
            PAGE,
            r#"<body><a href="next.html" style="display:block">Click here</a></body>"#,
        )
        .with(next, "<p>arrived</p>");
    let mut tab = tab(fetcher);
    assert!(tab.load_url(PAGE).is_ok());

    let word = find_word(tab.layout(), "here")
        .map(|b| b.rect)
        .unwrap_or_default();
    assert!(700.0 > word.right());
    assert!(matches!(tab.click(700.0, word.y + word.height / 2.0), Ok(true)));
    assert_eq!(tab.url(), Some(next));
}

#[test]
fn test_reload_is_deterministic() {
    let mut tab = tab(MemoryFetcher::default());
    let html = r#"<body><h1>Title</h1><p>Some <b>bold</b> and <i>italic</i> words.</p></body>"#;
    tab.load(html);
    let first = (tab.layout().clone(), tab.display_list().clone());
    tab.load(html);
    assert_eq!(first.0, *tab.layout());
    assert_eq!(first.1, *tab.display_list());
}
