//! User-Agent Stylesheet
//!
//! [WHATWG HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html)
//!
//! "User agents are expected to have a default style sheet that presents elements
//! of HTML documents in ways consistent with general user expectations."
//!
//! Its rules carry [`Origin::UserAgent`], so any page rule overrides a
//! default rule regardless of selector priority.

use std::sync::OnceLock;

use crate::parser::{Origin, Rule, parse_stylesheet_with_origin};

/// Default rules, written in the dialect the parser accepts: selector
/// lists hold type selectors only and every value is a run of words.
const UA_CSS: &str = r"
/* § 15.3.1 Hidden elements */
head, script, style, title, meta, link, base, template, noscript {
    display: none;
}

/* § 15.3.3 Flow content */
html, body, address, article, aside, blockquote, center, dd, details,
dialog, div, dl, dt, fieldset, figcaption, figure, footer, form,
header, hgroup, hr, legend, main, menu, nav, ol, p, pre, section,
summary, ul, li, table, tr {
    display: block;
}

h1, h2, h3, h4, h5, h6 {
    display: block;
    font-weight: bold;
}

/* § 15.3.6 Sections and headings */
h1 { font-size: 2em; margin: 0.67em 0; }
h2 { font-size: 1.5em; margin: 0.83em 0; }
h3 { font-size: 1.17em; margin: 1em 0; }
h4 { margin: 1.33em 0; }
h5 { font-size: 0.83em; margin: 1.67em 0; }
h6 { font-size: 0.67em; margin: 2.33em 0; }

/* § 15.3.3 Flow content */
p, blockquote, figure, dl, pre { margin: 1em 0; }
ul, ol { margin: 1em 0; }
blockquote { margin-left: 40px; margin-right: 40px; }
ul, ol, dd { margin-left: 40px; }

/* § 15.3.4 Phrasing content */
b, strong, th { font-weight: bold; }
i, em, cite, var, dfn { font-style: italic; }
small { font-size: 83%; }
big { font-size: 117%; }
a { color: blue; }
mark { background-color: yellow; color: black; }
";

/// Return the parsed default rules, parsing only once.
///
/// [CSS Cascading § 6.1](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
///
/// "Each style rule has a cascade origin... User-Agent origin rules have
/// the lowest priority."
pub fn ua_stylesheet() -> &'static [Rule] {
    static STYLESHEET: OnceLock<Vec<Rule>> = OnceLock::new();
    STYLESHEET.get_or_init(|| parse_stylesheet_with_origin(UA_CSS, Origin::UserAgent))
}
