//! CSS selectors and matching.
//!
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/)
//!
//! Only five forms are supported: type, class, id, a comma-separated list
//! of type selectors, and the descendant combinator. Each carries a fixed
//! cascade priority.

use std::fmt;

use lantern_dom::{DomTree, NodeId};

/// Priority of a type selector.
pub const TAG_PRIORITY: u32 = 10;
/// Priority of a class selector.
pub const CLASS_PRIORITY: u32 = 20;
/// Priority of an id selector.
pub const ID_PRIORITY: u32 = 30;
/// Priority of a selector list.
pub const LIST_PRIORITY: u32 = 5;

/// A parsed selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    ///
    /// Matches elements whose tag name equals the (lowercase) name.
    Tag(String),

    /// [§ 6.6 Class selectors](https://www.w3.org/TR/selectors-4/#class-html)
    ///
    /// NOTE: Matches when the whole `class` attribute equals the name. An
    /// element with `class="a b"` is not matched by `.a`.
    Class(String),

    /// [§ 6.7 ID selectors](https://www.w3.org/TR/selectors-4/#id-selectors)
    Id(String),

    /// [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
    ///
    /// A group of type selectors (`h1, h2, h3`).
    List(Vec<String>),

    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    ///
    /// Matches a node matched by `descendant` that has a strict ancestor
    /// matched by `ancestor`.
    Descendant {
        /// Selector for some ancestor.
        ancestor: Box<Selector>,
        /// Selector for the node itself.
        descendant: Box<Selector>,
        /// Sum of both parts' priorities.
        priority: u32,
    },
}

impl Selector {
    /// Build a descendant selector, fixing its priority.
    #[must_use]
    pub fn descendant(ancestor: Self, descendant: Self) -> Self {
        let priority = ancestor.priority() + descendant.priority();
        Self::Descendant {
            ancestor: Box::new(ancestor),
            descendant: Box::new(descendant),
            priority,
        }
    }

    /// Cascade priority. Higher priorities are applied later and win.
    #[must_use]
    pub const fn priority(&self) -> u32 {
        match self {
            Self::Tag(_) => TAG_PRIORITY,
            Self::Class(_) => CLASS_PRIORITY,
            Self::Id(_) => ID_PRIORITY,
            Self::List(_) => LIST_PRIORITY,
            Self::Descendant { priority, .. } => *priority,
        }
    }

    /// Returns true if the selector matches `node`. Text nodes never match.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        let Some(element) = tree.as_element(node) else {
            return false;
        };

        match self {
            Self::Tag(tag) => element.tag_name == *tag,
            Self::Class(name) => element.class() == Some(name.as_str()),
            Self::Id(id) => element.id() == Some(id.as_str()),
            Self::List(tags) => tags.iter().any(|t| *t == element.tag_name),
            Self::Descendant {
                ancestor,
                descendant,
                ..
            } => {
                descendant.matches(tree, node)
                    && tree.ancestors(node).any(|a| ancestor.matches(tree, a))
            }
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => write!(f, "{tag}"),
            Self::Class(name) => write!(f, ".{name}"),
            Self::Id(id) => write!(f, "#{id}"),
            Self::List(tags) => write!(f, "{}", tags.join(", ")),
            Self::Descendant {
                ancestor,
                descendant,
                ..
            } => write!(f, "{ancestor} {descendant}"),
        }
    }
}
