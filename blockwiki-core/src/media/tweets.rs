//! Twitter/X status embeds via oEmbed, with an optional JSON file cache.

use super::{temp_path, MediaError, MediaResolver};
use crate::html::escape;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

const OEMBED_ENDPOINT: &str = "https://publish.twitter.com/oembed";

static TWEET_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(?:www\.|mobile\.)?(?:twitter|x)\.com/[A-Za-z0-9_]+/status(?:es)?/(\d+)")
        .unwrap()
});

static SCRIPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\s*<script\b[^>]*>.*?</script>").unwrap());

/// Status id of a tweet URL, or `None` for any other URL
pub fn tweet_id(url: &str) -> Option<&str> {
    TWEET_URL
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Remove `<script>` elements (the widget loader oEmbed appends)
pub fn strip_scripts(html: &str) -> String {
    SCRIPT.replace_all(html, "").into_owned()
}

type EmbedCache = BTreeMap<String, String>;

impl MediaResolver {
    /// Embed HTML for a recognised social URL; `None` when the URL is not one.
    ///
    /// Lookups for one key are serialised, so a tweet embedded twice is fetched
    /// once. Fetch failures degrade to a plain link, which is not cached.
    pub async fn embed(&self, url: &str) -> Option<String> {
        let key = tweet_id(url)?;
        let _guard = self.locks.lock(&format!("tweet:{key}")).await;

        let html = match self.cached_embed(key).await {
            Some(html) => html,
            None => match self.fetch_tweet(url).await {
                Ok(html) => {
                    self.store_embed(key, &html).await;
                    html
                }
                Err(e) => {
                    warn!("Tweet {} unavailable: {}", url, e);
                    return Some(format!(r#"<a href="{}">Tweet</a>"#, escape(url)));
                }
            },
        };

        Some(if self.embeds.include_script {
            html
        } else {
            strip_scripts(&html)
        })
    }

    async fn fetch_tweet(&self, url: &str) -> Result<String, MediaError> {
        let endpoint = reqwest::Url::parse_with_params(OEMBED_ENDPOINT, &[("url", url)])
            .map_err(|_| MediaError::Url(url.to_string()))?;
        let response = self.fetcher.fetch_json(endpoint.as_str()).await?;
        response
            .get("html")
            .and_then(|html| html.as_str())
            .map(str::to_string)
            .ok_or_else(|| MediaError::NoEmbed(url.to_string()))
    }

    async fn cached_embed(&self, key: &str) -> Option<String> {
        if let Some(html) = self.fetched_embeds.get(key) {
            return Some(html.clone());
        }
        let path = self.embeds.cache_path.as_deref()?;
        let _guard = self.embed_cache.lock().await;
        let hit = read_cache(path).await.remove(key);
        if hit.is_some() {
            debug!("Tweet {} served from cache", key);
        }
        hit
    }

    async fn store_embed(&self, key: &str, html: &str) {
        self.fetched_embeds.insert(key.to_string(), html.to_string());
        let Some(path) = self.embeds.cache_path.as_deref() else {
            return;
        };
        let _guard = self.embed_cache.lock().await;
        let mut cache = read_cache(path).await;
        cache.insert(key.to_string(), html.to_string());
        if let Err(e) = write_cache(path, &cache).await {
            warn!("Failed to update tweet cache {:?}: {}", path, e);
        }
    }
}

async fn read_cache(path: &Path) -> EmbedCache {
    match tokio::fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            warn!("Ignoring unreadable tweet cache {:?}: {}", path, e);
            EmbedCache::new()
        }),
        Err(_) => EmbedCache::new(),
    }
}

async fn write_cache(path: &Path, cache: &EmbedCache) -> Result<(), MediaError> {
    let tmp = temp_path(path);
    tokio::fs::write(&tmp, serde_json::to_vec_pretty(cache)?).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_status_urls() {
        assert_eq!(
            tweet_id("https://twitter.com/jack/status/20"),
            Some("20")
        );
        assert_eq!(
            tweet_id("https://mobile.twitter.com/a_b/statuses/123?s=20"),
            Some("123")
        );
        assert_eq!(tweet_id("https://x.com/someone/status/987654321"), Some("987654321"));
        assert_eq!(tweet_id("https://www.youtube.com/watch?v=abc"), None);
        assert_eq!(tweet_id("https://twitter.com/jack"), None);
    }

    #[test]
    fn strips_widget_script() {
        let html = r#"<blockquote class="twitter-tweet"><p>hi</p></blockquote>
<script async src="https://platform.twitter.com/widgets.js" charset="utf-8"></script>
"#;
        assert_eq!(
            strip_scripts(html),
            "<blockquote class=\"twitter-tweet\"><p>hi</p></blockquote>\n"
        );
    }
}
