//! HTML parser for the Lantern engine.
//!
//! # Scope
//!
//! This crate implements a forgiving single-pass parser:
//! - **Tag scanning** - one left-to-right walk with a stack of open elements
//! - **Void elements** - attached immediately, never left open
//! - **Attributes** - quoted values may contain whitespace; boolean attributes
//! - **Character references** - numeric and the common named references
//!
//! It never fails. Malformed markup degrades into a best-effort tree.
//!
//! # Not Implemented
//!
//! - The WHATWG tokenizer state machine and insertion modes
//! - Implicit `head`/`body` creation
//! - Raw text elements (`<script>`/`<style>` content containing `<`)

/// Character reference (entity) decoding.
pub mod entities;
/// Tag scanning and tree construction.
pub mod parser;

pub use entities::unescape;
pub use parser::{HtmlParser, VoidElement, is_void_element, parse, print_tree, stringify_tree};
