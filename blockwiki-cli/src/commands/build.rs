//! Build command implementation.

use anyhow::{Context, Result};
use askama::Template;
use blockwiki_core::output::plan_redirects;
use blockwiki_core::{BuildReport, Config, OutputWriter, PageRecord, SiteBuilder, SiteIndex};
use blockwiki_render::{PageTemplate, RedirectTemplate};
use futures::future::join_all;

/// Build the static site and write every artifact
pub async fn build_site(config: Config) -> Result<()> {
    tracing::info!("Building site: {}", config.template.site_name);

    let builder = SiteBuilder::from_config(config.clone());
    let site = builder.build().await.context("Failed to build site")?;

    let report = write_site(&config, &site).await;

    tracing::info!("✓ Built {} pages", report.pages_written);
    tracing::info!("✓ Wrote {} redirects", report.redirects_written);
    tracing::info!("✓ Output written to {:?}", config.output_dir());

    if !report.is_success() {
        anyhow::bail!("{} output file(s) could not be written", report.failures.len());
    }
    Ok(())
}

/// Write page documents, redirects, the manifest and static assets.
///
/// A failed write is recorded and the remaining files are still written.
pub async fn write_site(config: &Config, site: &SiteIndex) -> BuildReport {
    let writer = OutputWriter::new(config.output_dir());
    let mut report = BuildReport::default();

    let script = match config.script_path() {
        Some(path) => match tokio::fs::read_to_string(&path).await {
            Ok(script) => Some(script),
            Err(e) => {
                report.record_failure(format!("Failed to read script {:?}: {}", path, e));
                None
            }
        },
        None => None,
    };

    let plans = plan_redirects(&site.pages);
    let results = join_all(site.pages.iter().zip(&plans).map(|(page, redirects)| {
        write_page(
            &writer,
            page,
            redirects,
            site,
            &config.template.site_name,
            script.as_deref(),
        )
    }))
    .await;
    for result in results {
        report.pages_written += usize::from(result.page);
        report.redirects_written += result.redirects;
        for failure in result.failures {
            report.record_failure(failure);
        }
    }

    match writer.write_manifest(&site.pages).await {
        Ok(path) => tracing::debug!("Wrote manifest {:?}", path),
        Err(e) => report.record_failure(e.to_string()),
    }

    for asset in config.asset_paths() {
        match writer.copy_asset(&asset).await {
            Ok(_) => report.assets_copied += 1,
            Err(e) => report.record_failure(e.to_string()),
        }
    }

    report
}

#[derive(Default)]
struct PageResult {
    page: bool,
    redirects: usize,
    failures: Vec<String>,
}

async fn write_page(
    writer: &OutputWriter,
    page: &PageRecord,
    redirects: &[String],
    site: &SiteIndex,
    site_name: &str,
    script: Option<&str>,
) -> PageResult {
    let mut result = PageResult::default();

    match PageTemplate::for_page(page, site, site_name, script).render() {
        Ok(html) => match writer.write_atomic(&page.filename, html.as_bytes()).await {
            Ok(_) => {
                result.page = true;
                tracing::debug!("Rendered: {}", page.filename);
            }
            Err(e) => result.failures.push(e.to_string()),
        },
        Err(e) => result
            .failures
            .push(format!("Failed to render {}: {}", page.filename, e)),
    }

    let redirect = match RedirectTemplate::to(page).render() {
        Ok(html) => html,
        Err(e) => {
            result
                .failures
                .push(format!("Failed to render redirect to {}: {}", page.filename, e));
            return result;
        }
    };
    for name in redirects {
        match writer.write_atomic(name, redirect.as_bytes()).await {
            Ok(_) => result.redirects += 1,
            Err(e) => result.failures.push(e.to_string()),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockwiki_types::BlockId;
    use tempfile::tempdir;

    fn record(id: &str, filename: &str) -> PageRecord {
        PageRecord {
            id: BlockId::new(id),
            emoji: None,
            favicon: None,
            title: "About".into(),
            content: "<p>hello</p>".into(),
            filename: filename.into(),
            favicon_alt: None,
            blocks: Vec::new(),
            backlinks: Vec::new(),
        }
    }

    fn config(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.output_dir = dir.to_path_buf();
        config
    }

    #[tokio::test]
    async fn override_filename_writes_page_and_two_redirects() {
        let dir = tempdir().unwrap();
        let site = SiteIndex {
            pages: vec![record("abc12345-0000-1111-2222-333344445555", "about.html")],
            index: Default::default(),
        };

        let report = write_site(&config(dir.path()), &site).await;
        assert!(report.is_success(), "{:?}", report.failures);
        assert_eq!(report.pages_written, 1);
        assert_eq!(report.redirects_written, 2);

        let about = std::fs::read_to_string(dir.path().join("about.html")).unwrap();
        assert!(about.contains("<p>hello</p>"));
        for redirect in ["abc12345.html", "abc12345000011112222333344445555.html"] {
            let html = std::fs::read_to_string(dir.path().join(redirect)).unwrap();
            assert!(html.contains("url=/about.html"));
        }
        assert!(dir.path().join("pages.json").exists());
    }

    #[tokio::test]
    async fn default_filename_writes_canonical_redirect_only() {
        let dir = tempdir().unwrap();
        let site = SiteIndex {
            pages: vec![record("abc12345-0000-1111-2222-333344445555", "abc12345.html")],
            index: Default::default(),
        };

        let report = write_site(&config(dir.path()), &site).await;
        assert_eq!(report.redirects_written, 1);
        let page = std::fs::read_to_string(dir.path().join("abc12345.html")).unwrap();
        assert!(page.contains("<p>hello</p>"));
    }

    #[tokio::test]
    async fn redirect_never_replaces_another_page() {
        let dir = tempdir().unwrap();
        let mut other = record("def12345-0000-1111-2222-333344445555", "abc12345.html");
        other.content = "<p>other page</p>".into();
        let site = SiteIndex {
            pages: vec![
                record("abc12345-0000-1111-2222-333344445555", "about.html"),
                other,
            ],
            index: Default::default(),
        };

        let report = write_site(&config(dir.path()), &site).await;
        assert!(report.is_success(), "{:?}", report.failures);
        assert_eq!(report.pages_written, 2);
        // about: canonical only; other: canonical and default
        assert_eq!(report.redirects_written, 3);

        let other = std::fs::read_to_string(dir.path().join("abc12345.html")).unwrap();
        assert!(other.contains("<p>other page</p>"));
        assert!(!other.contains("url=/about.html"));
    }

    #[tokio::test]
    async fn failed_writes_are_collected() {
        let dir = tempdir().unwrap();
        let site = SiteIndex {
            pages: vec![
                record("abc12345-0000-1111-2222-333344445555", "../outside.html"),
                record("def12345-0000-1111-2222-333344445555", "fine.html"),
            ],
            index: Default::default(),
        };

        let report = write_site(&config(dir.path()), &site).await;
        assert_eq!(report.pages_written, 1);
        assert_eq!(report.failures.len(), 1);
        assert!(dir.path().join("fine.html").exists());
    }
}
