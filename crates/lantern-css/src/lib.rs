//! CSS parsing, selector matching, cascade, layout and painting for the Lantern engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - A small dialect: rules, declarations, comments, error recovery
//!
//! - **CSS Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, class, id, type lists and the descendant combinator
//!   - Fixed per-form priorities
//!
//! - **CSS Cascade** ([CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/))
//!   - Origin, then priority, then source order
//!   - Inheritance of font and color properties
//!   - `font-size` resolution (`%`, `em`, `rem`, `px`)
//!
//! - **Layout Engine** ([CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html))
//!   - Block and anonymous block boxes, line boxes, inline and word boxes
//!   - Margins, greedy line breaking, baseline alignment
//!
//! - **Painting** ([CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html))
//!   - Background rectangles and text commands
//!
//! # Not Implemented
//!
//! - Pseudo-classes, attribute selectors, media queries
//! - Padding and borders
//! - Bidi, justification, hyphenation

/// CSS cascade and style computation per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).
pub mod cascade;
/// Box tree and layout per [CSS 2.1 § 9](https://www.w3.org/TR/CSS2/visuren.html).
pub mod layout;
/// Display list and painting per [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html).
pub mod paint;
/// CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// CSS selector matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// User-agent stylesheet per [WHATWG HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html).
pub mod ua_stylesheet;

use lantern_dom::{DomTree, ElementData};

// Re-exports for convenience
pub use cascade::{DEFAULT_FONT_SIZE_PX, apply_styles, compute_style, sort_rules};
pub use layout::{
    ApproximateFontMetrics, BoxKind, EdgeSizes, FontDescriptor, FontMetrics, FontSlant,
    FontWeight, H_STEP, LayoutBox, Rect, V_STEP,
};
pub use paint::{DisplayCommand, DisplayList, collect_paint_commands};
pub use parser::{
    CssParser, Origin, Rule, parse_declaration_block, parse_stylesheet,
    parse_stylesheet_with_origin,
};
pub use selector::Selector;
pub use ua_stylesheet::ua_stylesheet;

/// Where a page stylesheet comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StylesheetSource {
    /// [§ 4.2.4 The link element](https://html.spec.whatwg.org/multipage/semantics.html#the-link-element)
    ///
    /// `<link rel="stylesheet" href="...">`. The href is unresolved.
    External {
        /// The raw `href` attribute.
        href: String,
    },
    /// [§ 4.2.6 The style element](https://html.spec.whatwg.org/multipage/semantics.html#the-style-element)
    Inline {
        /// The text content of the `<style>` element.
        css: String,
    },
}

/// [§ 4.2.4 The link element](https://html.spec.whatwg.org/multipage/semantics.html#the-link-element)
/// [§ 4.2.6 The style element](https://html.spec.whatwg.org/multipage/semantics.html#the-style-element)
///
/// Extract all stylesheet sources from the DOM tree, in document order.
///
/// [§ 6.1 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
/// "The last declaration in document order wins."
#[must_use]
pub fn collect_stylesheet_sources(tree: &DomTree) -> Vec<StylesheetSource> {
    let root = tree.root();
    if tree.get(root).is_none() {
        return Vec::new();
    }

    tree.descendants(root)
        .filter_map(|id| {
            let data = tree.as_element(id)?;
            match data.tag_name.as_str() {
                "link" if is_stylesheet_link(data) => data
                    .attr("href")
                    .filter(|href| !href.trim().is_empty())
                    .map(|href| StylesheetSource::External {
                        href: href.trim().to_string(),
                    }),
                "style" => Some(StylesheetSource::Inline {
                    css: tree.text_content(id),
                }),
                _ => None,
            }
        })
        .collect()
}

/// [§ 2.4.7 Space-separated tokens](https://html.spec.whatwg.org/multipage/common-microsyntaxes.html#space-separated-tokens)
///
/// "If the rel attribute's value contains the token stylesheet, then the
/// link is a stylesheet link."
fn is_stylesheet_link(data: &ElementData) -> bool {
    data.attr("rel").is_some_and(|rel| {
        rel.split_ascii_whitespace()
            .any(|token| token.eq_ignore_ascii_case("stylesheet"))
    })
}
