use super::RenderContext;
use crate::html::{escape, escape_angles};
use blockwiki_types::BlockId;

/// Anchor to another page of the site.
///
/// `label` replaces the target's title and must already be markup. Unknown
/// targets render as a bracketed id so broken references stay visible.
pub fn page_link(ctx: &RenderContext<'_>, target: &BlockId, label: Option<&str>) -> String {
    let Some(page) = ctx.pages.get(target) else {
        tracing::warn!("Page {} references unknown page {}", ctx.page_id, target);
        return format!("[{}]", target);
    };

    let label = match label {
        Some(label) => label.to_string(),
        None => escape_angles(&page.title),
    };

    match page.link_icon() {
        Some((alt, favicon)) => format!(
            r#"<a href="/{}" class="with-emoji"><img class="emoji" alt="{}" src="/{}">{}</a>"#,
            page.filename,
            escape(alt),
            favicon,
            label
        ),
        None => format!(r#"<a href="/{}">{}</a>"#, page.filename, label),
    }
}

/// Page id referenced by a site-relative link such as `/c3d85220...#b12`.
///
/// Accepts dashed or compact ids in either case, slugged paths ending in the
/// id, and a trailing slash.
pub(crate) fn internal_target(url: &str) -> Option<BlockId> {
    let path = url.strip_prefix('/')?;
    let path = path
        .split(['#', '?'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');
    let compact: String = path
        .chars()
        .filter(|c| *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    let start = compact.len().checked_sub(32)?;
    BlockId::from_compact(compact.get(start..)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_target_forms() {
        let expected = BlockId::new("c3d85220-62aa-457a-b414-90c5e9929790");
        assert_eq!(
            internal_target("/c3d8522062aa457ab41490c5e9929790"),
            Some(expected.clone())
        );
        assert_eq!(
            internal_target("/c3d85220-62aa-457a-b414-90c5e9929790#b1234"),
            Some(expected.clone())
        );
        assert_eq!(
            internal_target("/My-Page-c3d8522062aa457ab41490c5e9929790?pvs=4"),
            Some(expected.clone())
        );
        assert_eq!(
            internal_target("/c3d8522062aa457ab41490c5e9929790/"),
            Some(expected.clone())
        );
        assert_eq!(
            internal_target("/C3D8522062AA457AB41490C5E9929790#top"),
            Some(expected)
        );
        assert_eq!(internal_target("/about"), None);
        assert_eq!(internal_target("https://example.com"), None);
    }
}
