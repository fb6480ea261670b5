//! # blockwiki-core
//!
//! Core library for the blockwiki static site generator.
//!
//! This crate loads page trees from a remote block-based content source,
//! reconstructs list structure, renders blocks and rich text to HTML, and
//! tracks cross-page backlinks. Images, emoji and embeds are cached in the
//! output directory.

pub mod backlinks;
pub mod builder;
pub mod config;
pub mod grouping;
pub mod html;
pub mod identity;
pub mod media;
pub mod models;
pub mod output;
pub mod render;
pub mod source;

pub use backlinks::BacklinkRegistry;
pub use builder::{BuildError, SiteBuilder};
pub use config::Config;
pub use identity::IdGenerator;
pub use media::{Fetch, HttpFetcher, MediaResolver};
pub use models::{PageIndex, PageRecord, PageSummary, SiteIndex};
pub use output::{BuildReport, OutputError, OutputWriter};
pub use source::{ContentSource, NotionSource};
