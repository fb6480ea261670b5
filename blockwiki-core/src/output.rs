//! Writing build artifacts into the output directory.

use crate::models::PageRecord;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Manifest of every page record
pub const MANIFEST_FILE: &str = "pages.json";

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Refusing to write outside the output directory: {0:?}")]
    InvalidFilename(String),
}

/// Writes files into one output directory
#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn target(&self, filename: &str) -> Result<PathBuf, OutputError> {
        let plain = !filename.is_empty()
            && !filename.contains(['/', '\\'])
            && filename != "."
            && filename != "..";
        if !plain {
            return Err(OutputError::InvalidFilename(filename.to_string()));
        }
        Ok(self.dir.join(filename))
    }

    /// Write `contents` to `filename` in one step: a reader sees either the
    /// previous file or the complete new one.
    pub async fn write_atomic(&self, filename: &str, contents: &[u8]) -> Result<PathBuf, OutputError> {
        let path = self.target(filename)?;
        let tmp = crate::media::temp_path(&path);
        let io = |source| OutputError::Io {
            path: path.clone(),
            source,
        };

        if let Err(e) = tokio::fs::write(&tmp, contents).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(io(e));
        }
        tokio::fs::rename(&tmp, &path).await.map_err(io)?;
        Ok(path)
    }

    /// `pages.json`: every record in listing order
    pub async fn write_manifest(&self, pages: &[PageRecord]) -> Result<PathBuf, OutputError> {
        let json = serde_json::to_vec(pages)?;
        self.write_atomic(MANIFEST_FILE, &json).await
    }

    /// Copy one static asset into the output directory under its basename
    pub async fn copy_asset(&self, asset: &Path) -> Result<PathBuf, OutputError> {
        let name = asset
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dest = self.target(&name)?;
        tokio::fs::copy(asset, &dest)
            .await
            .map_err(|source| OutputError::Io {
                path: asset.to_path_buf(),
                source,
            })?;
        Ok(dest)
    }
}

/// Filenames that should redirect to the page's document.
///
/// The full-id name is always included; the default short name only when an
/// override moved the page away from it.
pub fn redirect_names(page: &PageRecord) -> Vec<String> {
    let mut names = vec![page.canonical_filename()];
    let default = page.default_filename();
    if default != page.filename {
        names.push(default);
    }
    names.retain(|name| name != &page.filename);
    names
}

/// Redirect names for every page, in page order.
///
/// A name that is some page's document filename, or that an earlier page
/// already claimed, is skipped so no redirect overwrites another file.
pub fn plan_redirects(pages: &[PageRecord]) -> Vec<Vec<String>> {
    let documents: HashSet<&str> = pages.iter().map(|p| p.filename.as_str()).collect();
    let mut claimed = HashSet::new();
    pages
        .iter()
        .map(|page| {
            let mut names = redirect_names(page);
            names.retain(|name| {
                if documents.contains(name.as_str()) {
                    tracing::warn!(
                        "Skipping redirect {} to {}: a page is written there",
                        name,
                        page.filename
                    );
                    false
                } else if !claimed.insert(name.clone()) {
                    tracing::warn!("Skipping redirect {} to {}: already taken", name, page.filename);
                    false
                } else {
                    true
                }
            });
            names
        })
        .collect()
}

/// Outcome of writing a site
#[derive(Debug, Default)]
pub struct BuildReport {
    pub pages_written: usize,
    pub redirects_written: usize,
    pub assets_copied: usize,
    /// Human-readable description of every failed write
    pub failures: Vec<String>,
}

impl BuildReport {
    pub fn record_failure(&mut self, what: impl Into<String>) {
        let what = what.into();
        tracing::error!("{}", what);
        self.failures.push(what);
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockwiki_types::BlockId;
    use tempfile::tempdir;

    fn page(filename: &str) -> PageRecord {
        PageRecord {
            id: BlockId::new("abc12345-0000-1111-2222-333344445555"),
            emoji: None,
            favicon: None,
            title: "About".into(),
            content: String::new(),
            filename: filename.into(),
            favicon_alt: None,
            blocks: Vec::new(),
            backlinks: Vec::new(),
        }
    }

    #[test]
    fn override_gets_both_redirects() {
        assert_eq!(
            redirect_names(&page("about.html")),
            vec![
                "abc12345000011112222333344445555.html".to_string(),
                "abc12345.html".to_string()
            ]
        );
    }

    #[test]
    fn default_name_gets_canonical_only() {
        assert_eq!(
            redirect_names(&page("abc12345.html")),
            vec!["abc12345000011112222333344445555.html".to_string()]
        );
    }

    #[test]
    fn redirects_never_shadow_documents() {
        let about = page("about.html");
        let mut other = page("abc12345.html");
        other.id = BlockId::new("def12345-0000-1111-2222-333344445555");

        let plans = plan_redirects(&[about, other]);
        assert_eq!(
            plans[0],
            vec!["abc12345000011112222333344445555.html".to_string()]
        );
        assert_eq!(
            plans[1],
            vec![
                "def12345000011112222333344445555.html".to_string(),
                "def12345.html".to_string()
            ]
        );
    }

    #[test]
    fn shared_prefix_redirect_goes_to_first_page() {
        let mut first = page("first.html");
        first.id = BlockId::new("abc12345-0000-1111-2222-000000000001");
        let mut second = page("second.html");
        second.id = BlockId::new("abc12345-0000-1111-2222-000000000002");

        let plans = plan_redirects(&[first, second]);
        assert!(plans[0].contains(&"abc12345.html".to_string()));
        assert_eq!(
            plans[1],
            vec!["abc12345000011112222000000000002.html".to_string()]
        );
    }

    #[tokio::test]
    async fn atomic_write_replaces_content() {
        let dir = tempdir().unwrap();
        let writer = OutputWriter::new(dir.path());
        writer.write_atomic("a.html", b"one").await.unwrap();
        let path = writer.write_atomic("a.html", b"two").await.unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "two");
        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[tokio::test]
    async fn rejects_paths() {
        let dir = tempdir().unwrap();
        let writer = OutputWriter::new(dir.path());
        assert!(matches!(
            writer.write_atomic("../escape.html", b"x").await,
            Err(OutputError::InvalidFilename(_))
        ));
    }

    #[tokio::test]
    async fn manifest_lists_pages() {
        let dir = tempdir().unwrap();
        let writer = OutputWriter::new(dir.path());
        writer.write_manifest(&[page("about.html")]).await.unwrap();
        let json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(dir.path().join(MANIFEST_FILE)).unwrap()).unwrap();
        assert_eq!(json[0]["filename"], "about.html");
        assert_eq!(json[0]["id"], "abc12345-0000-1111-2222-333344445555");
    }

    #[tokio::test]
    async fn copies_asset_by_basename() {
        let src = tempdir().unwrap();
        let out = tempdir().unwrap();
        let asset = src.path().join("style.css");
        std::fs::write(&asset, "body{}").unwrap();
        let dest = OutputWriter::new(out.path()).copy_asset(&asset).await.unwrap();
        assert_eq!(dest, out.path().join("style.css"));
    }
}
