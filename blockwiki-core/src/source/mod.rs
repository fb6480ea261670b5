//! Remote content source: page listing and paginated block children.

mod loader;
mod notion;

pub use loader::{load_pages, load_tree};
pub use notion::{block_from_json, page_from_json, rich_text_from_json, NotionSource};

use async_trait::async_trait;
use blockwiki_types::{BlockId, PageMeta, SourceBlock};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// One page of a page listing
#[derive(Debug, Clone, Default)]
pub struct PageListing {
    pub pages: Vec<PageMeta>,
    /// Cursor for the next page; `None` once exhausted
    pub next_cursor: Option<String>,
}

/// One page of a block's children
#[derive(Debug, Clone, Default)]
pub struct ChildListing {
    pub blocks: Vec<SourceBlock>,
    pub next_cursor: Option<String>,
}

/// Cursor-paginated access to pages and their block trees
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn list_pages(&self, cursor: Option<&str>) -> Result<PageListing, SourceError>;

    async fn list_children(
        &self,
        block_id: &BlockId,
        cursor: Option<&str>,
    ) -> Result<ChildListing, SourceError>;
}
