//! CSS parser for the Lantern dialect.
//!
//! A character-level recursive descent parser over a deliberately small
//! grammar:
//!
//! ```text
//! stylesheet   := (ws selector ws '{' ws declarations '}')*
//! declarations := (word ws ':' ws value ws ';' ws)*
//! value        := word (ws word)*
//! word         := [alphanumeric # - . %]+
//! ```
//!
//! Every parse step returns a [`Result`]. A failed declaration skips to the
//! next `;` or `}`, a failed rule skips past the next `}`, and parsing then
//! resumes. Nothing the input contains can abort a whole stylesheet.

use lantern_common::warning::warn_once;
use lantern_dom::PropertyMap;
use serde::Serialize;
use thiserror::Error;

use crate::selector::Selector;

/// [§ 6.2 Cascade Origins](https://www.w3.org/TR/css-cascade-4/#cascading-origins)
///
/// "Each style rule has a cascade origin, which determines where it enters
/// the cascade."
///
/// Ordered so that every author rule sorts after every user-agent rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Origin {
    /// The bundled default stylesheet.
    UserAgent,
    /// Stylesheets supplied by the page.
    Author,
}

/// A style rule: one selector and its declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Which elements the rule applies to.
    pub selector: Selector,
    /// Lowercase property name to raw value.
    pub declarations: PropertyMap,
    /// Where the rule came from.
    pub origin: Origin,
}

/// Why a parse step failed. Always recovered from inside the parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ParseError {
    /// A word was required but the next character cannot start one.
    #[error("expected a word at offset {0}")]
    ExpectedWord(usize),
    /// A specific character was required.
    #[error("expected '{expected}' at offset {offset}")]
    ExpectedLiteral {
        /// The character that was required.
        expected: char,
        /// Where it was required.
        offset: usize,
    },
    /// The selector uses a form the dialect does not support.
    #[error("unsupported selector '{0}'")]
    UnsupportedSelector(String),
}

/// Characters allowed inside a word, besides alphanumerics.
const WORD_PUNCTUATION: [char; 4] = ['#', '-', '.', '%'];

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || WORD_PUNCTUATION.contains(&c)
}

/// Recursive descent parser over one stylesheet or declaration block.
pub struct CssParser {
    chars: Vec<char>,
    index: usize,
    origin: Origin,
}

impl CssParser {
    /// Create a parser whose rules will carry `origin`.
    #[must_use]
    pub fn new(text: &str, origin: Origin) -> Self {
        Self {
            chars: text.chars().collect(),
            index: 0,
            origin,
        }
    }

    fn is_end(&self) -> bool {
        self.index >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.index + offset).copied()
    }

    /// Skip whitespace and `/* ... */` comments.
    ///
    /// An unterminated comment runs to the end of the input.
    fn whitespace(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => self.index += 1,
                Some('/') if self.peek_at(1) == Some('*') => {
                    self.index += 2;
                    while !self.is_end() && !(self.peek() == Some('*') && self.peek_at(1) == Some('/'))
                    {
                        self.index += 1;
                    }
                    self.index = (self.index + 2).min(self.chars.len());
                }
                _ => return,
            }
        }
    }

    /// Consume a maximal run of word characters. At least one is required.
    fn word(&mut self) -> Result<String, ParseError> {
        let start = self.index;
        while self.peek().is_some_and(is_word_char) {
            self.index += 1;
        }
        if self.index == start {
            return Err(ParseError::ExpectedWord(start));
        }
        Ok(self.chars[start..self.index].iter().collect())
    }

    /// Consume exactly `expected`.
    fn literal(&mut self, expected: char) -> Result<(), ParseError> {
        if self.peek() == Some(expected) {
            self.index += 1;
            Ok(())
        } else {
            Err(ParseError::ExpectedLiteral {
                expected,
                offset: self.index,
            })
        }
    }

    /// Advance to the next character in `stops` without consuming it.
    fn ignore_until(&mut self, stops: &[char]) -> Option<char> {
        while let Some(c) = self.peek() {
            if stops.contains(&c) {
                return Some(c);
            }
            self.index += 1;
        }
        None
    }

    /// A run of words separated by whitespace, joined by single spaces.
    fn value(&mut self) -> Result<String, ParseError> {
        let mut value = self.word()?;
        loop {
            self.whitespace();
            if !self.peek().is_some_and(is_word_char) {
                return Ok(value);
            }
            value.push(' ');
            value.push_str(&self.word()?);
        }
    }

    /// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
    ///
    /// `property ws ':' ws value`, with the property lowercased.
    fn declaration(&mut self) -> Result<(String, String), ParseError> {
        let property = self.word()?;
        self.whitespace();
        self.literal(':')?;
        self.whitespace();
        let value = self.value()?;
        Ok((property.to_lowercase(), value))
    }

    /// Skip a broken declaration: past the next `;`, or up to (not past) `}`.
    fn skip_declaration(&mut self) {
        if self.ignore_until(&[';', '}']) == Some(';') {
            self.index += 1;
            self.whitespace();
        }
    }

    /// [§ 5.4.5 Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/#consume-list-of-declarations)
    ///
    /// Stops at `}` (left unconsumed) or the end of input.
    pub fn declarations(&mut self) -> PropertyMap {
        let mut pairs = PropertyMap::new();
        self.whitespace();

        while let Some(c) = self.peek() {
            if c == '}' {
                break;
            }
            match self.declaration() {
                Ok((property, value)) => {
                    // The pair is kept even if its terminator turns out to be wrong.
                    let _ = pairs.insert(property, value);
                    self.whitespace();
                    match self.peek() {
                        Some(';') => {
                            self.index += 1;
                            self.whitespace();
                        }
                        None | Some('}') => {}
                        Some(other) => {
                            warn_once(
                                "CSS",
                                &format!(
                                    "unexpected '{other}' after declaration at offset {}",
                                    self.index
                                ),
                            );
                            self.skip_declaration();
                        }
                    }
                }
                Err(err) => {
                    warn_once("CSS", &format!("skipping malformed declaration: {err}"));
                    self.skip_declaration();
                }
            }
        }
        pairs
    }

    /// Classify one word as a class, id or type selector.
    fn simple_selector(word: &str) -> Result<Selector, ParseError> {
        let (selector, name) = if let Some(name) = word.strip_prefix('.') {
            (Selector::Class(name.to_string()), name)
        } else if let Some(name) = word.strip_prefix('#') {
            (Selector::Id(name.to_string()), name)
        } else {
            (Selector::Tag(word.to_lowercase()), word)
        };
        if name.is_empty() {
            return Err(ParseError::UnsupportedSelector(word.to_string()));
        }
        Ok(selector)
    }

    /// [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
    ///
    /// Reads words up to `{`. A `,` grows a list of type selectors; any
    /// other word nests the selector so far as an ancestor.
    fn selector(&mut self) -> Result<Selector, ParseError> {
        let first = self.word()?;
        let mut out = Self::simple_selector(&first)?;
        self.whitespace();

        while let Some(c) = self.peek() {
            if c == '{' {
                break;
            }
            if c == ',' {
                self.index += 1;
                self.whitespace();
                let word = self.word()?;
                let tag = match Self::simple_selector(&word)? {
                    Selector::Tag(tag) => tag,
                    _ => return Err(ParseError::UnsupportedSelector(word)),
                };
                out = match out {
                    Selector::Tag(first) => Selector::List(vec![first, tag]),
                    Selector::List(mut tags) => {
                        tags.push(tag);
                        Selector::List(tags)
                    }
                    other => {
                        return Err(ParseError::UnsupportedSelector(format!("{other}, {word}")));
                    }
                };
            } else {
                let word = self.word()?;
                out = Selector::descendant(out, Self::simple_selector(&word)?);
            }
            self.whitespace();
        }
        Ok(out)
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    fn rule(&mut self) -> Result<Rule, ParseError> {
        let selector = self.selector()?;
        self.literal('{')?;
        let declarations = self.declarations();
        self.literal('}')?;
        Ok(Rule {
            selector,
            declarations,
            origin: self.origin,
        })
    }

    /// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    ///
    /// Rules come back in source order.
    pub fn stylesheet(&mut self) -> Vec<Rule> {
        let mut rules = Vec::new();
        loop {
            self.whitespace();
            if self.is_end() {
                return rules;
            }
            match self.rule() {
                Ok(rule) => rules.push(rule),
                Err(err) => {
                    warn_once("CSS", &format!("skipping malformed rule: {err}"));
                    if self.ignore_until(&['}']).is_none() {
                        return rules;
                    }
                    self.index += 1;
                }
            }
        }
    }
}

/// Parse an author stylesheet.
#[must_use]
pub fn parse_stylesheet(css: &str) -> Vec<Rule> {
    CssParser::new(css, Origin::Author).stylesheet()
}

/// Parse a stylesheet whose rules carry `origin`.
#[must_use]
pub fn parse_stylesheet_with_origin(css: &str, origin: Origin) -> Vec<Rule> {
    CssParser::new(css, origin).stylesheet()
}

/// Parse the body of a rule or an inline `style` attribute.
#[must_use]
pub fn parse_declaration_block(css: &str) -> PropertyMap {
    CssParser::new(css, Origin::Author).declarations()
}
