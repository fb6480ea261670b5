//! Askama template definitions.

use askama::Template;
use blockwiki_core::{PageRecord, SiteIndex};

/// A backlink entry
#[derive(Debug, Clone)]
pub struct BacklinkEntry {
    pub url: String,
    pub title: String,
    pub favicon: Option<String>,
}

impl BacklinkEntry {
    pub fn from_record(page: &PageRecord) -> Self {
        Self {
            url: page.url(),
            title: page.title.clone(),
            favicon: page.favicon.clone(),
        }
    }
}

/// Page document template
#[derive(Template)]
#[template(path = "page.html")]
pub struct PageTemplate {
    pub title: String,
    pub favicon: Option<String>,
    pub emoji: Option<String>,

    /// Rendered block markup, inserted unescaped
    pub content: String,

    /// Pages referencing this one, sorted by source id
    pub backlinks: Vec<BacklinkEntry>,

    /// Inline script appended to the body
    pub script: Option<String>,

    pub main_class: String,
    pub site_name: String,
}

impl PageTemplate {
    pub fn for_page(page: &PageRecord, site: &SiteIndex, site_name: &str, script: Option<&str>) -> Self {
        let backlinks = page
            .backlinks
            .iter()
            .filter_map(|id| site.find(id))
            .map(BacklinkEntry::from_record)
            .collect();

        Self {
            title: page.title.clone(),
            favicon: page.favicon.clone(),
            emoji: page.emoji.clone(),
            content: page.content.clone(),
            backlinks,
            script: script.map(str::to_string),
            main_class: page.main_class(),
            site_name: site_name.to_string(),
        }
    }
}

/// Stub document forwarding to a page's real filename
#[derive(Template)]
#[template(path = "redirect.html")]
pub struct RedirectTemplate {
    pub target: String,
}

impl RedirectTemplate {
    pub fn to(page: &PageRecord) -> Self {
        Self {
            target: page.filename.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockwiki_types::BlockId;

    fn record(id: &str, title: &str, filename: &str) -> PageRecord {
        PageRecord {
            id: BlockId::new(id),
            emoji: None,
            favicon: Some("1f4a1.png".into()),
            title: title.into(),
            content: "<div class=\"text\" id=\"b1\">Hello</div>".into(),
            filename: filename.into(),
            favicon_alt: None,
            blocks: Vec::new(),
            backlinks: Vec::new(),
        }
    }

    fn site() -> SiteIndex {
        let mut about = record("abc12345-0000-1111-2222-333344445555", "About <me>", "about.html");
        about.backlinks = vec![
            BlockId::new("00000000-0000-0000-0000-00000000000a"),
            BlockId::new("00000000-0000-0000-0000-00000000000b"),
        ];
        SiteIndex {
            pages: vec![
                about,
                record("00000000-0000-0000-0000-00000000000a", "First", "first.html"),
                record("00000000-0000-0000-0000-00000000000b", "Second", "second.html"),
            ],
            index: Default::default(),
        }
    }

    #[test]
    fn page_binds_content_and_backlinks() {
        let site = site();
        let page = &site.pages[0];
        let html = PageTemplate::for_page(page, &site, "My Wiki", Some("console.log(1)"))
            .render()
            .unwrap();

        assert!(html.contains(r#"<div class="text" id="b1">Hello</div>"#));
        assert!(html.contains("About &#60;me&#62;"));
        assert!(!html.contains("About <me>"));
        assert!(html.contains(r#"<main class="pabc12345">"#));
        assert!(html.contains(r#"<link rel="icon" href="/1f4a1.png">"#));
        assert!(html.contains("<script>console.log(1)</script>"));

        let first = html.find(r#"href="/first.html""#).unwrap();
        let second = html.find(r#"href="/second.html""#).unwrap();
        assert!(first < second);
    }

    #[test]
    fn page_without_backlinks_has_no_footer() {
        let site = site();
        let html = PageTemplate::for_page(&site.pages[1], &site, "My Wiki", None)
            .render()
            .unwrap();
        assert!(!html.contains("<footer"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn redirect_points_at_filename() {
        let site = site();
        let html = RedirectTemplate::to(&site.pages[0]).render().unwrap();
        assert!(html.contains(r#"<meta http-equiv="refresh" content="0; url=/about.html">"#));
        assert!(html.contains(r#"<link rel="canonical" href="/about.html">"#));
    }
}
