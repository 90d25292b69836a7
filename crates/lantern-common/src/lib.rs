//! Common utilities for the Lantern engine.
//!
//! This crate provides shared infrastructure used by all engine components:
//! - **Warning System** - deduplicated, colored terminal output for recoverable problems
//! - **URL Resolution** - turning `href`s into absolute URLs against a page URL
//! - **Resource Fetching** - the [`net::Fetcher`] seam and its network implementation

pub mod net;
pub mod url;
pub mod warning;
