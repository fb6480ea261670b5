//! Hosted image download with a filename keyed by block id.

use super::{persist_new, temp_path, MediaError, MediaResolver};
use crate::html::escape;
use blockwiki_types::BlockId;
use tracing::{debug, warn};

/// Output file for a hosted image
pub fn image_filename(block_id: &BlockId) -> String {
    format!("{}.png", block_id)
}

impl MediaResolver {
    /// Figure markup for a hosted image, downloading it on first use.
    ///
    /// The markup is the same whether the file was already cached or just
    /// fetched. On failure only the caption is rendered.
    pub async fn image(&self, block_id: &BlockId, url: &str, caption: &str, anchor: &str) -> String {
        let filename = image_filename(block_id);
        let caption = escape(caption);

        match self.ensure_image(&filename, url).await {
            Ok(()) => format!(
                r#"<figure id="{anchor}"><img alt="{caption}" src="/{filename}"><figcaption>{caption}</figcaption></figure>"#
            ),
            Err(e) => {
                warn!("Image {} failed to download: {}", block_id, e);
                format!(r#"<figure id="{anchor}"><figcaption>{caption}</figcaption></figure>"#)
            }
        }
    }

    async fn ensure_image(&self, filename: &str, url: &str) -> Result<(), MediaError> {
        let _guard = self.locks.lock(filename).await;
        let dest = self.output_dir.join(filename);
        if tokio::fs::try_exists(&dest).await? {
            debug!("Image {} already present", filename);
            return Ok(());
        }

        let tmp = temp_path(&dest);
        if let Err(e) = self.fetcher.fetch_to_file(url, &tmp).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e);
        }
        persist_new(&tmp, &dest).await?;
        debug!("Downloaded image {}", filename);
        Ok(())
    }
}
