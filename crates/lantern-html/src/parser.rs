//! Tag scanning and tree construction.

use std::fmt::Write as _;
use std::str::FromStr;

use lantern_common::warning::warn_once;
use lantern_dom::{AttributesMap, DomTree, NodeId, NodeType};
use strum_macros::{Display, EnumString};

use crate::entities::unescape;

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements: area, base, br, col, embed, hr, img, input, link, meta,
/// source, track, wbr"
///
/// `param` is obsolete but still treated as void.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum VoidElement {
    /// `<area>`
    Area,
    /// `<base>`
    Base,
    /// `<br>`
    Br,
    /// `<col>`
    Col,
    /// `<embed>`
    Embed,
    /// `<hr>`
    Hr,
    /// `<img>`
    Img,
    /// `<input>`
    Input,
    /// `<link>`
    Link,
    /// `<meta>`
    Meta,
    /// `<param>`
    Param,
    /// `<source>`
    Source,
    /// `<track>`
    Track,
    /// `<wbr>`
    Wbr,
}

/// Returns true if `tag` (lowercase) never has contents or an end tag.
#[must_use]
pub fn is_void_element(tag: &str) -> bool {
    VoidElement::from_str(tag).is_ok()
}

/// Tag name given to the root when the document opens no element itself.
const IMPLICIT_ROOT: &str = "html";

/// Single-pass HTML parser.
///
/// Keeps a stack of elements that have been opened but not closed. An
/// element is attached to its parent when it is popped, so the parent is
/// always whatever was below it on the stack at that moment.
pub struct HtmlParser<'a> {
    input: &'a str,
    tree: DomTree,
    /// Stack of open elements.
    unfinished: Vec<NodeId>,
}

impl<'a> HtmlParser<'a> {
    /// Create a parser over `input`.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            tree: DomTree::new(),
            unfinished: Vec::new(),
        }
    }

    /// Scan the whole input and return the finished tree.
    ///
    /// The tree always has a root element.
    #[must_use]
    pub fn run(mut self) -> DomTree {
        let mut text = String::new();
        let mut in_tag = false;

        for c in self.input.chars() {
            match c {
                '<' => {
                    in_tag = true;
                    if !text.is_empty() {
                        self.add_text(&unescape(&text));
                    }
                    text.clear();
                }
                '>' => {
                    in_tag = false;
                    self.add_tag(&text);
                    text.clear();
                }
                _ => text.push(c),
            }
        }

        if in_tag {
            // Unfinished tags, like the `<hr` in `Hi!<hr`, are thrown out.
            warn_once("HTML", &format!("discarding unterminated tag '<{text}'"));
        } else if !text.is_empty() {
            self.add_text(&unescape(&text));
        }

        self.finish()
    }

    /// Append a text node to the current open element.
    ///
    /// Only ASCII whitespace counts as blank, so text made of `&nbsp;` is
    /// kept.
    fn add_text(&mut self, text: &str) {
        if text.bytes().all(|b| b.is_ascii_whitespace()) {
            return;
        }
        let parent = self.current_or_implicit_root();
        let node = self.tree.alloc_text(text);
        self.tree.append_child(parent, node);
    }

    /// Handle everything between a `<` and its `>`.
    fn add_tag(&mut self, contents: &str) {
        let (tag, attrs) = split_tag(contents);

        if tag.is_empty() {
            warn_once("HTML", "discarding empty tag '<>'");
            return;
        }

        // Doctype and comments.
        if tag.starts_with('!') {
            return;
        }

        if tag.starts_with('/') {
            // The last open element stays open so the root survives stray end tags.
            if self.unfinished.len() <= 1 {
                return;
            }
            if let Some(node) = self.unfinished.pop() {
                self.attach_to_current(node);
            }
        } else if is_void_element(&tag) {
            let parent = self.current_or_implicit_root();
            let node = self.tree.alloc_element(&tag, attrs);
            self.tree.append_child(parent, node);
        } else {
            let node = self.tree.alloc_element(&tag, attrs);
            self.unfinished.push(node);
        }
    }

    /// The top of the stack, opening the implicit root if nothing is open.
    fn current_or_implicit_root(&mut self) -> NodeId {
        if let Some(&top) = self.unfinished.last() {
            return top;
        }
        let root = self.tree.alloc_element(IMPLICIT_ROOT, AttributesMap::new());
        self.unfinished.push(root);
        root
    }

    fn attach_to_current(&mut self, node: NodeId) {
        if let Some(&parent) = self.unfinished.last() {
            self.tree.append_child(parent, node);
        }
    }

    /// Close everything still open and return the tree.
    fn finish(mut self) -> DomTree {
        let _ = self.current_or_implicit_root();

        while self.unfinished.len() > 1 {
            if let Some(node) = self.unfinished.pop() {
                self.attach_to_current(node);
            }
        }

        if let Some(&root) = self.unfinished.first() {
            self.tree.set_root(root);
        }
        self.tree
    }
}

/// Parse `html` into a DOM tree.
#[must_use]
pub fn parse(html: &str) -> DomTree {
    HtmlParser::new(html).run()
}

/// Split tag contents into a lowercase name and its attributes.
///
/// Whitespace inside a quoted value does not separate attributes, so
/// `span style="color: red"` yields one `style` attribute.
fn split_tag(contents: &str) -> (String, AttributesMap) {
    let mut parts = split_outside_quotes(contents).into_iter();
    let tag = parts.next().unwrap_or_default().to_ascii_lowercase();

    let mut attrs = AttributesMap::new();
    for part in parts {
        let (key, value) = match part.split_once('=') {
            Some((key, value)) => (key, unquote(value)),
            // Attributes with omitted values, like `<input disabled>`.
            None => (part, ""),
        };
        let _ = attrs.insert(key.to_ascii_lowercase(), unescape(value));
    }
    (tag, attrs)
}

/// Split on runs of whitespace that are not inside a `"` or `'` pair.
fn split_outside_quotes(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c.is_whitespace() => {
                if let Some(s) = start.take() {
                    parts.push(&text[s..i]);
                }
                continue;
            }
            None if c == '"' || c == '\'' => quote = Some(c),
            None => {}
        }
        if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        parts.push(&text[s..]);
    }
    parts
}

/// Strip one pair of outer quotes from a value longer than two characters.
fn unquote(value: &str) -> &str {
    match value.chars().next() {
        Some(q @ ('"' | '\'')) if value.len() > 2 => {
            let inner = &value[1..];
            inner.strip_suffix(q).unwrap_or(inner)
        }
        _ => value,
    }
}

/// Render the subtree under `id` as an indented outline.
#[must_use]
pub fn stringify_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    write_tree(tree, id, 0, &mut out);
    out
}

fn write_tree(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    let prefix = "  ".repeat(indent);
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.node_type {
        NodeType::Element(data) => {
            let mut attrs: Vec<_> = data.attrs.iter().collect();
            attrs.sort();
            let _ = write!(out, "{prefix}<{}", data.tag_name);
            for (k, v) in attrs {
                if v.is_empty() {
                    let _ = write!(out, " {k}");
                } else {
                    let _ = write!(out, " {k}=\"{v}\"");
                }
            }
            out.push_str(">\n");
        }
        NodeType::Text(data) => {
            let _ = writeln!(out, "{prefix}{data:?}");
        }
    }
    for &child in tree.children(id) {
        write_tree(tree, child, indent + 1, out);
    }
}

/// Print the subtree under `id` to stdout, starting at `indent` levels.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let mut out = String::new();
    write_tree(tree, id, indent, &mut out);
    print!("{out}");
}
