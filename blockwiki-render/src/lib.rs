//! # blockwiki-render
//!
//! Template rendering library for blockwiki.
//!
//! This crate renders page documents and redirect stubs using Askama.

pub mod templates;

pub use templates::{BacklinkEntry, PageTemplate, RedirectTemplate};
