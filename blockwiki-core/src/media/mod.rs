//! Cache-transparent resolution of external resources.
//!
//! Images, emoji images and social embeds are materialised in (or read from)
//! the output directory. Emitted markup never depends on whether a file was
//! already present, and failures degrade locally instead of failing a page.

mod emoji;
mod images;
mod locks;
mod tweets;

pub use emoji::{emoji_alt, emoji_filename, is_emoji, EmojiAsset};
pub use images::image_filename;
pub use locks::{persist_new, temp_path, KeyedLocks};
pub use tweets::{strip_scripts, tweet_id};

use crate::config::Config;
use async_trait::async_trait;
use dashmap::DashMap;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("Invalid URL {0}")]
    Url(String),

    #[error("No embed HTML returned for {0}")]
    NoEmbed(String),
}

/// Network seam for the resolver
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Stream the body at `url` into a new file at `dest`.
    async fn fetch_to_file(&self, url: &str, dest: &Path) -> Result<(), MediaError>;

    /// GET `url` and parse the body as JSON.
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, MediaError>;
}

/// `Fetch` over HTTP(S)
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, MediaError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch_to_file(&self, url: &str, dest: &Path) -> Result<(), MediaError> {
        let response = self.get(url).await?;
        let mut file = tokio::fs::File::create(dest).await?;
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            file.write_all(&chunk?).await?;
        }
        file.flush().await?;
        Ok(())
    }

    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, MediaError> {
        Ok(self.get(url).await?.json().await?)
    }
}

/// Social embed behaviour
#[derive(Debug, Clone, Default)]
pub struct EmbedOptions {
    /// JSON file caching fetched embed HTML by key; `None` disables caching
    pub cache_path: Option<PathBuf>,
    /// Keep `<script>` elements from fetched embed HTML
    pub include_script: bool,
}

/// Resolves images, emoji and embeds into files under the output directory.
pub struct MediaResolver {
    output_dir: PathBuf,
    emoji_dir: PathBuf,
    fetcher: Arc<dyn Fetch>,
    locks: KeyedLocks,
    embeds: EmbedOptions,
    /// Embed HTML fetched during this build, by key
    fetched_embeds: DashMap<String, String>,
    embed_cache: tokio::sync::Mutex<()>,
}

impl MediaResolver {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        emoji_dir: impl Into<PathBuf>,
        fetcher: Arc<dyn Fetch>,
        embeds: EmbedOptions,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            emoji_dir: emoji_dir.into(),
            fetcher,
            locks: KeyedLocks::default(),
            embeds,
            fetched_embeds: DashMap::new(),
            embed_cache: tokio::sync::Mutex::new(()),
        }
    }

    pub fn from_config(config: &Config, fetcher: Arc<dyn Fetch>) -> Self {
        Self::new(
            config.output_dir(),
            config.emoji_dir(),
            fetcher,
            EmbedOptions {
                cache_path: config.tweet_cache_path(),
                include_script: config.embeds.twitter.include_script,
            },
        )
    }
}
