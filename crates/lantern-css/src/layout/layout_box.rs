//! Layout box types and layout algorithms.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! Layout is a single top-down pass. Every box receives its containing
//! block's content rect and its previous sibling's rect as arguments, and
//! returns fully positioned. Heights are summed on the way back up.

use std::fmt::Write as _;

use lantern_common::warning::warn_once;
use lantern_dom::{DomTree, NodeId};

use super::box_model::{EdgeSizes, Rect};
use super::inline::{FontDescriptor, FontMetrics};
use super::values::resolve_margins;
use super::{H_STEP, LayoutMode, V_STEP, generates_box, layout_mode};

/// Line height as a multiple of the tallest font on the line.
///
/// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
pub const LINE_HEIGHT_FACTOR: f32 = 1.25;

/// What a layout box represents.
#[derive(Debug, Clone, PartialEq)]
pub enum BoxKind {
    /// The page itself. Always the root of a box tree.
    Document,

    /// [§ 9.2.1 Block-level elements](https://www.w3.org/TR/CSS2/visuren.html#block-boxes)
    Block {
        /// The element that generated the box.
        node: NodeId,
    },

    /// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    ///
    /// "if a block container box has a block-level box inside it, then we
    /// force it to have only block-level boxes inside it."
    ///
    /// Wraps a maximal run of inline-level children of `parent`.
    AnonymousBlock {
        /// The block whose children form the run.
        parent: NodeId,
        /// The children in the run, in document order.
        run: Vec<NodeId>,
    },

    /// [§ 9.4.2 Line box](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
    Line,

    /// [§ 9.2.2 Inline-level elements](https://www.w3.org/TR/CSS2/visuren.html#inline-boxes)
    ///
    /// The part of an inline element that falls on one line.
    Inline {
        /// The inline element.
        node: NodeId,
    },

    /// One word of text.
    Word {
        /// The text node the word came from.
        node: NodeId,
        /// The word, never empty and never containing ASCII whitespace.
        text: String,
        /// Font used to measure and draw the word.
        font: FontDescriptor,
        /// Computed `color` of the text.
        color: String,
    },
}

impl BoxKind {
    /// Short lowercase name, used in box tree dumps.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Block { .. } => "block",
            Self::AnonymousBlock { .. } => "anonymous",
            Self::Line => "line",
            Self::Inline { .. } => "inline",
            Self::Word { .. } => "word",
        }
    }
}

/// A positioned box.
///
/// `rect` is the border box in absolute page coordinates. `margin` is
/// kept alongside for the parent's height sum and is not part of `rect`.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBox {
    /// What the box represents.
    pub kind: BoxKind,
    /// Position and size.
    pub rect: Rect,
    /// Resolved margins. Zero for everything except element blocks.
    pub margin: EdgeSizes,
    /// Child boxes in painting order.
    pub children: Vec<LayoutBox>,
}

impl LayoutBox {
    fn new(kind: BoxKind, rect: Rect) -> Self {
        Self {
            kind,
            rect,
            margin: EdgeSizes::default(),
            children: Vec::new(),
        }
    }

    /// Lay out a styled DOM tree for a viewport of the given width.
    ///
    /// The `body` element (or the root, if there is no body) becomes the
    /// single block child of the document box. The document content area
    /// is inset by [`H_STEP`] and [`V_STEP`].
    #[must_use]
    pub fn layout_document(tree: &DomTree, viewport_width: f32, metrics: &dyn FontMetrics) -> Self {
        let content = Rect::new(H_STEP, V_STEP, viewport_width - 2.0 * H_STEP, 0.0);
        let mut document = Self::new(BoxKind::Document, content);

        let root = tree.body().unwrap_or_else(|| tree.root());
        if tree.get(root).is_some() && generates_box(tree, root) {
            let child = layout_block(tree, root, content, None, metrics);
            document.rect.height = child.margin.top + child.rect.height;
            document.children.push(child);
        }
        document.rect.height += 2.0 * V_STEP;

        #[cfg(feature = "layout-trace")]
        eprintln!(
            "[LAYOUT] document {}x{} for viewport width {viewport_width}",
            document.rect.width, document.rect.height
        );

        document
    }

    /// The DOM node this box belongs to, if any.
    ///
    /// Anonymous blocks report the block whose children they wrap. The
    /// document and line boxes have no node.
    #[must_use]
    pub const fn node(&self) -> Option<NodeId> {
        match &self.kind {
            BoxKind::Block { node } | BoxKind::Inline { node } | BoxKind::Word { node, .. } => {
                Some(*node)
            }
            BoxKind::AnonymousBlock { parent, .. } => Some(*parent),
            BoxKind::Document | BoxKind::Line => None,
        }
    }

    /// Visit this box and every descendant in pre-order.
    pub fn for_each_box<'a, F: FnMut(&'a Self)>(&'a self, f: &mut F) {
        f(self);
        for child in &self.children {
            child.for_each_box(f);
        }
    }

    /// The deepest box whose rect contains the point, using
    /// [`Rect::contains`].
    ///
    /// When boxes overlap the one visited last in pre-order wins.
    #[must_use]
    pub fn hit_test(&self, x: f32, y: f32) -> Option<&Self> {
        let mut hit = None;
        self.for_each_box(&mut |b| {
            if b.rect.contains(x, y) {
                hit = Some(b);
            }
        });
        hit
    }

    /// The DOM node under the point.
    ///
    /// Like [`LayoutBox::hit_test`], but boxes without a node are skipped,
    /// so a point between words or beside the last word of a line falls
    /// through to the block that owns the line.
    #[must_use]
    pub fn node_at(&self, x: f32, y: f32) -> Option<NodeId> {
        let mut found = None;
        self.for_each_box(&mut |b| {
            if b.rect.contains(x, y) {
                found = b.node().or(found);
            }
        });
        found
    }

    /// Indented text dump of the box tree, one box per line.
    #[must_use]
    pub fn stringify(&self, tree: &DomTree) -> String {
        let mut out = String::new();
        self.write_tree(tree, 0, &mut out);
        out
    }

    fn write_tree(&self, tree: &DomTree, depth: usize, out: &mut String) {
        let r = &self.rect;
        let _ = write!(
            out,
            "{:indent$}{} ({}, {}) {}x{}",
            "",
            self.kind.name(),
            r.x,
            r.y,
            r.width,
            r.height,
            indent = depth * 2
        );
        match &self.kind {
            BoxKind::Block { node } | BoxKind::Inline { node } => {
                let _ = write!(out, " <{}>", tree.tag_name(*node).unwrap_or("?"));
            }
            BoxKind::Word {
                text, font, color, ..
            } => {
                let _ = write!(out, " {text:?} {font} {color}");
            }
            BoxKind::Document | BoxKind::AnonymousBlock { .. } | BoxKind::Line => {}
        }
        out.push('\n');
        for child in &self.children {
            child.write_tree(tree, depth + 1, out);
        }
    }
}

/// [§ 10.3.3 Block-level, non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
///
/// The margin box is exactly as wide as the containing block, and the
/// box sits below its previous sibling's border box plus its own top
/// margin. Bottom margins are recorded but never move a sibling.
fn layout_block(
    tree: &DomTree,
    node: NodeId,
    container: Rect,
    previous: Option<Rect>,
    metrics: &dyn FontMetrics,
) -> LayoutBox {
    let font = FontDescriptor::from_style(tree.style(node));
    let margin = resolve_margins(tree.style(node), font.size);

    let top = previous.map_or(container.y, |p| p.bottom());
    let content = Rect::new(
        container.x + margin.left,
        top + margin.top,
        container.width - margin.horizontal(),
        0.0,
    );

    #[cfg(feature = "layout-trace")]
    eprintln!(
        "[LAYOUT] block <{}> at ({}, {}) width {}",
        tree.tag_name(node).unwrap_or("?"),
        content.x,
        content.y,
        content.width
    );

    let mut block = LayoutBox::new(BoxKind::Block { node }, content);
    block.margin = margin;

    let children: Vec<NodeId> = tree
        .children(node)
        .iter()
        .copied()
        .filter(|&child| generates_box(tree, child))
        .collect();

    if children
        .iter()
        .any(|&child| layout_mode(tree, child) == LayoutMode::Block)
    {
        block.children = layout_block_children(tree, node, &children, content, metrics);
    } else {
        block.children = layout_inline(tree, node, &children, content, metrics);
    }

    block.rect.height = stacked_height(&block.children);
    block
}

/// Lay out children in a block formatting context, wrapping every maximal
/// run of inline-level children in an anonymous block.
fn layout_block_children(
    tree: &DomTree,
    parent: NodeId,
    children: &[NodeId],
    content: Rect,
    metrics: &dyn FontMetrics,
) -> Vec<LayoutBox> {
    let mut boxes: Vec<LayoutBox> = Vec::new();
    let mut run: Vec<NodeId> = Vec::new();

    for &child in children {
        if layout_mode(tree, child) == LayoutMode::Inline {
            run.push(child);
            continue;
        }
        if !run.is_empty() {
            let previous = boxes.last().map(|b| b.rect);
            let run = std::mem::take(&mut run);
            boxes.push(layout_anonymous(tree, parent, run, content, previous, metrics));
        }
        let previous = boxes.last().map(|b| b.rect);
        boxes.push(layout_block(tree, child, content, previous, metrics));
    }
    if !run.is_empty() {
        let previous = boxes.last().map(|b| b.rect);
        boxes.push(layout_anonymous(tree, parent, run, content, previous, metrics));
    }
    boxes
}

fn layout_anonymous(
    tree: &DomTree,
    parent: NodeId,
    run: Vec<NodeId>,
    container: Rect,
    previous: Option<Rect>,
    metrics: &dyn FontMetrics,
) -> LayoutBox {
    let top = previous.map_or(container.y, |p| p.bottom());
    let content = Rect::new(container.x, top, container.width, 0.0);
    let lines = layout_inline(tree, parent, &run, content, metrics);

    let mut anonymous = LayoutBox::new(BoxKind::AnonymousBlock { parent, run }, content);
    anonymous.children = lines;
    anonymous.rect.height = stacked_height(&anonymous.children);
    anonymous
}

/// Height of a block: its children's top margins plus their heights.
fn stacked_height(children: &[LayoutBox]) -> f32 {
    children
        .iter()
        .map(|child| child.margin.top + child.rect.height)
        .sum()
}

/// [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
///
/// Break the text below `nodes` into lines filling `content`.
fn layout_inline(
    tree: &DomTree,
    container: NodeId,
    nodes: &[NodeId],
    content: Rect,
    metrics: &dyn FontMetrics,
) -> Vec<LayoutBox> {
    let mut formatter = InlineFormatter::new(tree, container, content.width, metrics);
    for &node in nodes {
        formatter.collect(node);
    }
    formatter.finish(content)
}

/// A measured word waiting for its line to be positioned.
struct PendingWord {
    node: NodeId,
    /// Innermost inline element around the text, if it is not the
    /// containing block itself.
    owner: Option<NodeId>,
    text: String,
    font: FontDescriptor,
    color: String,
    width: f32,
}

/// Greedy line breaker.
///
/// Words are placed left to right. A word that would overflow starts a
/// new line unless the current line is still empty, so a single long
/// word overflows rather than producing an empty line.
struct InlineFormatter<'a> {
    tree: &'a DomTree,
    metrics: &'a dyn FontMetrics,
    container: NodeId,
    available_width: f32,
    cursor: f32,
    lines: Vec<Vec<PendingWord>>,
}

impl<'a> InlineFormatter<'a> {
    fn new(
        tree: &'a DomTree,
        container: NodeId,
        available_width: f32,
        metrics: &'a dyn FontMetrics,
    ) -> Self {
        Self {
            tree,
            metrics,
            container,
            available_width,
            cursor: 0.0,
            lines: vec![Vec::new()],
        }
    }

    fn new_line(&mut self) {
        self.cursor = 0.0;
        self.lines.push(Vec::new());
    }

    fn collect(&mut self, node: NodeId) {
        let tree = self.tree;
        if let Some(text) = tree.as_text(node) {
            self.text(node, text);
            return;
        }
        if !generates_box(tree, node) {
            return;
        }
        // [§ 4.5.27 The br element](https://html.spec.whatwg.org/multipage/text-level-semantics.html#the-br-element)
        if tree.tag_name(node) == Some("br") {
            self.new_line();
        }
        for &child in tree.children(node) {
            self.collect(child);
        }
    }

    fn text(&mut self, node: NodeId, text: &str) {
        let font = FontDescriptor::from_style(self.tree.style(node));
        let color = self.tree.style_value(node, "color").map_or_else(
            || {
                warn_once("Layout", "text has no computed 'color', using black");
                "black".to_string()
            },
            str::to_string,
        );
        let owner = self.tree.parent(node).filter(|&p| p != self.container);

        // [§ 4.1.3 Phase II: Trimming and Positioning](https://www.w3.org/TR/css-text-3/#white-space-phase-2)
        // U+00A0 is not a document white space character, so `a&nbsp;b`
        // stays one word.
        for word in text.split_ascii_whitespace() {
            let width = self.metrics.text_width(word, &font);
            self.push_word(PendingWord {
                node,
                owner,
                text: word.to_string(),
                font,
                color: color.clone(),
                width,
            });
        }
    }

    fn push_word(&mut self, word: PendingWord) {
        let line_is_empty = self.lines.last().is_none_or(Vec::is_empty);
        if self.cursor + word.width > self.available_width && !line_is_empty {
            self.new_line();
        }
        self.cursor += word.width + self.metrics.space_width(&word.font);
        if let Some(line) = self.lines.last_mut() {
            line.push(word);
        }
    }

    /// Position every line, stacking them from the top of `content`.
    fn finish(self, content: Rect) -> Vec<LayoutBox> {
        let metrics = self.metrics;
        let mut y = content.y;
        self.lines
            .into_iter()
            .map(|words| {
                let line = layout_line(words, content.x, y, content.width, metrics);
                y = line.rect.bottom();
                line
            })
            .collect()
    }
}

/// [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
///
/// All words share one baseline, `1.25 × max ascent` below the top of
/// the line. Each word is then shifted up by its own ascent.
fn layout_line(
    words: Vec<PendingWord>,
    x: f32,
    y: f32,
    width: f32,
    metrics: &dyn FontMetrics,
) -> LayoutBox {
    let max_ascent = words
        .iter()
        .map(|w| metrics.ascent(&w.font))
        .fold(0.0, f32::max);
    let max_descent = words
        .iter()
        .map(|w| metrics.descent(&w.font))
        .fold(0.0, f32::max);
    let height = LINE_HEIGHT_FACTOR * (max_ascent + max_descent);
    let baseline = y + LINE_HEIGHT_FACTOR * max_ascent;

    let mut line = LayoutBox::new(BoxKind::Line, Rect::new(x, y, width, height));
    let mut next_x = x;

    for word in words {
        let rect = Rect::new(
            next_x,
            baseline - metrics.ascent(&word.font),
            word.width,
            metrics.linespace(&word.font),
        );
        next_x = rect.right() + metrics.space_width(&word.font);

        let word_box = LayoutBox::new(
            BoxKind::Word {
                node: word.node,
                text: word.text,
                font: word.font,
                color: word.color,
            },
            rect,
        );

        let Some(owner) = word.owner else {
            line.children.push(word_box);
            continue;
        };
        match line.children.last_mut() {
            Some(last) if matches!(last.kind, BoxKind::Inline { node } if node == owner) => {
                last.rect.width = rect.right() - last.rect.x;
                last.children.push(word_box);
            }
            _ => {
                let mut inline = LayoutBox::new(
                    BoxKind::Inline { node: owner },
                    Rect::new(rect.x, y, rect.width, height),
                );
                inline.children.push(word_box);
                line.children.push(inline);
            }
        }
    }

    line
}
