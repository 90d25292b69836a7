//! High-level browser API for the Lantern engine.
//!
//! # Scope
//!
//! This crate provides:
//! - **Document Loading** - fetch a page and its linked stylesheets
//! - **Style Computation** - default, linked and embedded CSS onto the DOM
//! - **Layout Tree** - positioned boxes measured with system fonts
//! - **Painting** - a display list executed against any [`Canvas`]
//! - **Navigation** - history, scrolling and link clicks
//!
//! # Not Yet Implemented
//!
//! - Windowing and input events (callers drive [`Tab`] directly)
//! - Images, scripts and other subresources

pub mod font_metrics;
pub mod renderer;

pub use lantern_css as css;
pub use lantern_dom as dom;
pub use lantern_html as html;

pub use font_metrics::FontCache;
pub use renderer::{Canvas, Renderer};

use lantern_common::net::{FetchError, Fetcher, NetworkFetcher};
use lantern_common::url::resolve_url;
use lantern_common::warning::{clear_warnings, warn_once};
use lantern_css::{
    DisplayList, FontMetrics, LayoutBox, Rule, StylesheetSource, apply_styles,
    collect_paint_commands, collect_stylesheet_sources, parse_stylesheet, ua_stylesheet,
};
use lantern_dom::{DomTree, NodeId};
use thiserror::Error;

/// Window geometry and scrolling behaviour of a [`Tab`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabConfig {
    /// Width the page is laid out for.
    pub viewport_width: f32,
    /// Height of the whole window, chrome included.
    pub viewport_height: f32,
    /// Rows at the top of the window reserved for browser chrome.
    pub chrome_height: f32,
    /// Distance moved by one [`Tab::scroll_down`].
    pub scroll_step: f32,
}

impl Default for TabConfig {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
            chrome_height: 100.0,
            scroll_step: 100.0,
        }
    }
}

impl TabConfig {
    /// Height of the window area that shows the page.
    #[must_use]
    pub fn page_area_height(&self) -> f32 {
        self.viewport_height - self.chrome_height
    }
}

/// Why a page could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The page itself could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// One browsing session: the current page, its history and scroll state.
///
/// Every pipeline stage runs inside [`Tab::load`]. The DOM, box tree and
/// display list are replaced together, so accessors always describe the
/// same page.
pub struct Tab {
    config: TabConfig,
    fetcher: Box<dyn Fetcher>,
    font_metrics: Box<dyn FontMetrics>,
    url: Option<String>,
    history: Vec<String>,
    scroll: f32,
    dom: DomTree,
    layout: LayoutBox,
    display_list: DisplayList,
}

impl Tab {
    /// A tab that fetches over the network and measures with system fonts.
    #[must_use]
    pub fn new(config: TabConfig) -> Self {
        Self::with_parts(
            config,
            Box::new(NetworkFetcher::new()),
            Box::new(FontCache::load_system()),
        )
    }

    /// A tab with a custom fetcher and font metrics.
    #[must_use]
    pub fn with_parts(
        config: TabConfig,
        fetcher: Box<dyn Fetcher>,
        font_metrics: Box<dyn FontMetrics>,
    ) -> Self {
        let dom = DomTree::new();
        let layout = LayoutBox::layout_document(&dom, config.viewport_width, font_metrics.as_ref());
        Self {
            config,
            fetcher,
            font_metrics,
            url: None,
            history: Vec::new(),
            scroll: 0.0,
            dom,
            layout,
            display_list: DisplayList::new(),
        }
    }

    /// Fetch `url`, record it in the history and load its body.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Fetch`] if the page cannot be fetched. The
    /// current page, URL and history are left untouched in that case.
    pub fn load_url(&mut self, url: &str) -> Result<(), LoadError> {
        let response = self.fetcher.fetch(url)?;
        self.url = Some(url.to_string());
        self.history.push(url.to_string());
        self.load(&response.body);
        Ok(())
    }

    /// Run the whole pipeline on `html` and reset the scroll position.
    ///
    /// Relative stylesheet links resolve against the current URL. A
    /// stylesheet that cannot be fetched is reported and skipped.
    pub fn load(&mut self, html: &str) {
        clear_warnings();

        let mut dom = lantern_html::parse(html);

        // Default rules first. The cascade orders by origin, so this only
        // fixes the tie-break order among author rules.
        let mut rules: Vec<Rule> = ua_stylesheet().to_vec();
        for source in collect_stylesheet_sources(&dom) {
            match source {
                StylesheetSource::External { href } => {
                    let url = resolve_url(&href, self.url.as_deref());
                    match self.fetcher.fetch(&url) {
                        Ok(response) => rules.extend(parse_stylesheet(&response.body)),
                        Err(err) => warn_once("Net", &format!("skipping stylesheet: {err}")),
                    }
                }
                StylesheetSource::Inline { css } => rules.extend(parse_stylesheet(&css)),
            }
        }
        apply_styles(&mut dom, &rules);

        let layout = LayoutBox::layout_document(
            &dom,
            self.config.viewport_width,
            self.font_metrics.as_ref(),
        );
        self.display_list = collect_paint_commands(&layout, &dom);
        self.layout = layout;
        self.dom = dom;
        self.scroll = 0.0;
    }

    /// Return to the previous page in the history.
    ///
    /// Returns `Ok(false)` when there is nothing to go back to.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Fetch`] if the previous page cannot be fetched
    /// again. The current page and the history are left untouched.
    pub fn go_back(&mut self) -> Result<bool, LoadError> {
        let Some(previous) = self
            .history
            .len()
            .checked_sub(2)
            .and_then(|index| self.history.get(index))
            .cloned()
        else {
            return Ok(false);
        };
        let response = self.fetcher.fetch(&previous)?;
        let _ = self.history.pop();
        self.url = Some(previous);
        self.load(&response.body);
        Ok(true)
    }

    /// Scroll down one step, never past the end of the page.
    pub fn scroll_down(&mut self) {
        let max_scroll = (self.page_height() - self.config.page_area_height()).max(0.0);
        self.scroll = (self.scroll + self.config.scroll_step).min(max_scroll);
    }

    /// Handle a click at (`x`, `y`) relative to the top-left of the page
    /// area.
    ///
    /// If the clicked box lies inside an `<a href>`, the link is resolved
    /// against the current URL and loaded. Returns whether a navigation
    /// happened.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Fetch`] if the link target cannot be fetched.
    pub fn click(&mut self, x: f32, y: f32) -> Result<bool, LoadError> {
        let page_y = y + self.scroll;
        let Some(node) = self.layout.node_at(x, page_y) else {
            return Ok(false);
        };
        let Some(href) = self.link_target(node) else {
            return Ok(false);
        };
        let url = resolve_url(&href, self.url.as_deref());
        self.load_url(&url)?;
        Ok(true)
    }

    /// The `href` of the closest `<a>` at or above `node`.
    fn link_target(&self, node: NodeId) -> Option<String> {
        std::iter::once(node)
            .chain(self.dom.ancestors(node))
            .filter_map(|id| self.dom.as_element(id))
            .find(|element| element.tag_name == "a" && element.attr("href").is_some())
            .and_then(|element| element.attr("href"))
            .map(str::to_string)
    }

    /// Draw the visible part of the page onto `canvas`, below the chrome.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        Renderer::new(self.config.chrome_height).execute(
            &self.display_list,
            self.scroll,
            self.config.page_area_height(),
            canvas,
        );
    }

    /// Height of the document box, page margins included.
    #[must_use]
    pub const fn page_height(&self) -> f32 {
        self.layout.rect.height
    }

    /// Width of the document content area.
    #[must_use]
    pub const fn page_width(&self) -> f32 {
        self.layout.rect.width
    }

    /// The configuration the tab was created with.
    #[must_use]
    pub const fn config(&self) -> &TabConfig {
        &self.config
    }

    /// Current vertical scroll offset.
    #[must_use]
    pub const fn scroll(&self) -> f32 {
        self.scroll
    }

    /// URL of the current page, if it was loaded from one.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Visited URLs, oldest first. The last entry is the current page.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// The styled DOM of the current page.
    #[must_use]
    pub const fn dom(&self) -> &DomTree {
        &self.dom
    }

    /// The box tree of the current page.
    #[must_use]
    pub const fn layout(&self) -> &LayoutBox {
        &self.layout
    }

    /// The display list of the current page.
    #[must_use]
    pub const fn display_list(&self) -> &DisplayList {
        &self.display_list
    }
}
