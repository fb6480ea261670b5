//! Drain pagination and expand nested children.

use super::{ContentSource, SourceError};
use blockwiki_types::{Block, BlockId, PageMeta};
use futures::future::{join_all, BoxFuture, FutureExt};

/// Every page the source lists, in listing order.
pub async fn load_pages(source: &dyn ContentSource) -> Result<Vec<PageMeta>, SourceError> {
    let mut pages = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let listing = source.list_pages(cursor.as_deref()).await?;
        pages.extend(listing.pages);
        match listing.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    Ok(pages)
}

/// Full block tree under `parent`.
///
/// Each level is drained of cursors first; blocks that declare children are
/// then expanded concurrently, with results kept in source order.
pub fn load_tree<'a>(
    source: &'a dyn ContentSource,
    parent: &'a BlockId,
) -> BoxFuture<'a, Result<Vec<Block>, SourceError>> {
    async move {
        let mut listed = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let listing = source.list_children(parent, cursor.as_deref()).await?;
            listed.extend(listing.blocks);
            match listing.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        let expanded = join_all(listed.iter().map(|block| async move {
            if block.has_children {
                load_tree(source, &block.id).await
            } else {
                Ok(Vec::new())
            }
        }))
        .await;

        listed
            .into_iter()
            .zip(expanded)
            .map(|(block, children)| {
                children.map(|children| Block {
                    id: block.id,
                    kind: block.kind,
                    children,
                })
            })
            .collect()
    }
    .boxed()
}
