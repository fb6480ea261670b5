//! Site building logic: load every page, group lists, render concurrently.

use crate::{
    backlinks::BacklinkRegistry,
    config::Config,
    grouping::group_all,
    identity::IdGenerator,
    media::{EmojiAsset, Fetch, HttpFetcher, MediaResolver},
    models::*,
    render::{render_blocks, Highlighter, RenderContext},
    source::{load_pages, load_tree, ContentSource, NotionSource, SourceError},
};
use blockwiki_types::{Block, Icon, PageMeta};
use chrono::NaiveDate;
use futures::future::join_all;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Content source error: {0}")]
    Source(#[from] SourceError),
}

/// Main site builder
pub struct SiteBuilder {
    config: Config,
    source: Arc<dyn ContentSource>,
    media: MediaResolver,
    highlighter: Highlighter,
    today: NaiveDate,
}

impl SiteBuilder {
    pub fn new(config: Config, source: Arc<dyn ContentSource>, fetcher: Arc<dyn Fetch>) -> Self {
        let media = MediaResolver::from_config(&config, fetcher);
        let highlighter = Highlighter::new(&config.highlight.languages);
        Self {
            config,
            source,
            media,
            highlighter,
            today: chrono::Local::now().date_naive(),
        }
    }

    /// Builder wired to the Notion API over HTTP
    pub fn from_config(config: Config) -> Self {
        let client = reqwest::Client::new();
        let source = Arc::new(NotionSource::new(client.clone(), &config.notion));
        let fetcher = Arc::new(HttpFetcher::new(client));
        Self::new(config, source, fetcher)
    }

    /// Reference day for relative date mentions
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Build every page's content and backlinks.
    ///
    /// Rendering starts only once every page has been loaded, since any page
    /// may link to any other.
    pub async fn build(&self) -> Result<SiteIndex, BuildError> {
        tokio::fs::create_dir_all(self.config.output_dir()).await?;

        let mut pages = self.load().await?;
        let index = PageIndex::from_records(&pages);
        if index.is_empty() {
            tracing::warn!("No pages to render");
        }
        tracing::debug!("Indexed {} pages", index.len());

        let backlinks = BacklinkRegistry::new();
        let contents = join_all(pages.iter().map(|page| {
            let ctx = RenderContext {
                page_id: &page.id,
                pages: &index,
                backlinks: &backlinks,
                media: &self.media,
                highlighter: &self.highlighter,
                today: self.today,
            };
            async move { render_blocks(&page.blocks, &ctx).await }
        }))
        .await;

        for (page, content) in pages.iter_mut().zip(contents) {
            page.content = content;
        }
        for page in &mut pages {
            page.backlinks = backlinks.sources(&page.id);
        }

        tracing::info!(
            "Rendered {} pages ({} with backlinks)",
            pages.len(),
            backlinks.len()
        );

        Ok(SiteIndex { pages, index })
    }

    /// List pages, load their trees and favicons, then group lists.
    async fn load(&self) -> Result<Vec<PageRecord>, BuildError> {
        let metas = load_pages(self.source.as_ref()).await?;
        tracing::info!("Found {} pages", metas.len());

        let trees = join_all(
            metas
                .iter()
                .map(|meta| load_tree(self.source.as_ref(), &meta.id)),
        )
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

        let favicons = join_all(metas.iter().map(|meta| self.favicon(meta))).await;

        // Sequential in listing order so synthetic ids do not depend on I/O timing.
        let ids = IdGenerator::new(self.config.build_seed());
        let records = metas
            .into_iter()
            .zip(trees)
            .zip(favicons)
            .map(|((meta, tree), favicon)| record(meta, group_all(tree, &ids), favicon))
            .collect();

        Ok(records)
    }

    /// The page's icon emoji, else the default icon
    async fn favicon(&self, meta: &PageMeta) -> Option<EmojiAsset> {
        if let Some(emoji) = meta.icon.as_ref().and_then(Icon::emoji) {
            if let Some(asset) = self.media.emoji(emoji).await {
                return Some(asset);
            }
        }
        self.media.emoji(&self.config.default_icon).await
    }
}

fn record(meta: PageMeta, blocks: Vec<Block>, favicon: Option<EmojiAsset>) -> PageRecord {
    let filename = resolve_filename(&meta.id, meta.filename.as_deref());
    let emoji = meta.icon.as_ref().and_then(Icon::emoji).map(str::to_string);
    let (favicon, favicon_alt) = match favicon {
        Some(asset) => (Some(asset.filename), Some(asset.alt)),
        None => (None, None),
    };

    PageRecord {
        id: meta.id,
        emoji,
        favicon,
        title: meta.title,
        content: String::new(),
        filename,
        favicon_alt,
        blocks,
        backlinks: Vec::new(),
    }
}
