//! Page records and the lookup index built after loading.

use blockwiki_types::{Block, BlockId};
use serde::Serialize;
use std::collections::HashMap;

/// Default output filename: first 8 hex characters of the compact id.
pub fn default_filename(id: &BlockId) -> String {
    format!("{}.html", id.prefix(8))
}

/// Permanent redirect filename: the full compact id.
pub fn canonical_filename(id: &BlockId) -> String {
    format!("{}.html", id.compact())
}

/// The override when it is non-blank, otherwise the default name.
pub fn resolve_filename(id: &BlockId, override_name: Option<&str>) -> String {
    override_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| default_filename(id))
}

/// A page through every build phase.
///
/// Serializes to the manifest shape: id, emoji, favicon, title, content, filename.
#[derive(Debug, Clone, Serialize)]
pub struct PageRecord {
    pub id: BlockId,
    pub emoji: Option<String>,
    pub favicon: Option<String>,
    pub title: String,
    /// Rendered body, filled during rendering
    pub content: String,
    pub filename: String,

    /// Alt text for the favicon image
    #[serde(skip)]
    pub favicon_alt: Option<String>,

    /// Top-level blocks after list grouping
    #[serde(skip)]
    pub blocks: Vec<Block>,

    /// Pages referencing this one, sorted. Filled after every page rendered.
    #[serde(skip)]
    pub backlinks: Vec<BlockId>,
}

impl PageRecord {
    pub fn default_filename(&self) -> String {
        default_filename(&self.id)
    }

    pub fn canonical_filename(&self) -> String {
        canonical_filename(&self.id)
    }

    /// Site-relative URL of the page document
    pub fn url(&self) -> String {
        format!("/{}", self.filename)
    }

    /// CSS class of the page's main element
    pub fn main_class(&self) -> String {
        format!("p{}", self.id.prefix(8))
    }
}

/// What a link to a page needs to know about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    pub title: String,
    pub filename: String,
    pub emoji: Option<String>,
    pub favicon: Option<String>,
    pub favicon_alt: Option<String>,
}

impl PageSummary {
    /// Icon image (alt, filename) shown next to links, for pages with their own emoji
    pub fn link_icon(&self) -> Option<(&str, &str)> {
        self.emoji.as_ref()?;
        let favicon = self.favicon.as_deref()?;
        Some((self.favicon_alt.as_deref().unwrap_or(""), favicon))
    }
}

/// Immutable id -> summary lookup, complete before any page renders.
#[derive(Debug, Clone, Default)]
pub struct PageIndex {
    pages: HashMap<BlockId, PageSummary>,
}

impl PageIndex {
    pub fn from_records(records: &[PageRecord]) -> Self {
        let pages = records
            .iter()
            .map(|record| {
                (
                    record.id.clone(),
                    PageSummary {
                        title: record.title.clone(),
                        filename: record.filename.clone(),
                        emoji: record.emoji.clone(),
                        favicon: record.favicon.clone(),
                        favicon_alt: record.favicon_alt.clone(),
                    },
                )
            })
            .collect();
        Self { pages }
    }

    pub fn get(&self, id: &BlockId) -> Option<&PageSummary> {
        self.pages.get(id)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Result of a completed build
#[derive(Debug, Clone, Default)]
pub struct SiteIndex {
    /// Pages in listing order
    pub pages: Vec<PageRecord>,
    pub index: PageIndex,
}

impl SiteIndex {
    pub fn find(&self, id: &BlockId) -> Option<&PageRecord> {
        self.pages.iter().find(|page| &page.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> BlockId {
        BlockId::new("abc12345-0000-1111-2222-333344445555")
    }

    #[test]
    fn filenames() {
        assert_eq!(default_filename(&id()), "abc12345.html");
        assert_eq!(
            canonical_filename(&id()),
            "abc12345000011112222333344445555.html"
        );
        assert_eq!(resolve_filename(&id(), Some("about.html")), "about.html");
        assert_eq!(resolve_filename(&id(), Some("  ")), "abc12345.html");
        assert_eq!(resolve_filename(&id(), None), "abc12345.html");
    }

    #[test]
    fn index_lookup() {
        assert!(PageIndex::default().is_empty());

        let record = PageRecord {
            id: id(),
            emoji: Some("💡".into()),
            favicon: None,
            title: "Home".into(),
            content: String::new(),
            filename: "index.html".into(),
            favicon_alt: None,
            blocks: Vec::new(),
            backlinks: Vec::new(),
        };
        let index = PageIndex::from_records(&[record]);
        assert_eq!(index.len(), 1);
        let summary = index.get(&id()).unwrap();
        assert_eq!(summary.title, "Home");
        assert_eq!(summary.filename, "index.html");
        assert!(index
            .get(&BlockId::new("def12345-0000-1111-2222-333344445555"))
            .is_none());
    }

    #[test]
    fn link_icon_requires_own_emoji() {
        let mut summary = PageSummary {
            title: "T".into(),
            filename: "t.html".into(),
            emoji: None,
            favicon: Some("1f4a1.png".into()),
            favicon_alt: Some("light bulb emoji".into()),
        };
        assert_eq!(summary.link_icon(), None);
        summary.emoji = Some("💡".into());
        assert_eq!(summary.link_icon(), Some(("light bulb emoji", "1f4a1.png")));
    }

    #[test]
    fn manifest_shape() {
        let record = PageRecord {
            id: id(),
            emoji: None,
            favicon: Some("1f4a1.png".into()),
            title: "Home".into(),
            content: "<p>hi</p>".into(),
            filename: "index.html".into(),
            favicon_alt: Some("light bulb emoji".into()),
            blocks: Vec::new(),
            backlinks: Vec::new(),
        };
        let value = serde_json::to_value(&record).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        let mut expected = vec!["content", "emoji", "favicon", "filename", "id", "title"];
        expected.sort();
        let mut keys = keys;
        keys.sort();
        assert_eq!(keys, expected);
        assert_eq!(record.main_class(), "pabc12345");
    }
}
