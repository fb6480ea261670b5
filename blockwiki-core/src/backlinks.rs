//! Cross-page reference graph collected during rendering.

use blockwiki_types::BlockId;
use dashmap::DashMap;
use std::collections::BTreeSet;

/// Destination page id -> set of source page ids.
///
/// Writes lock only the destination's shard, so pages rendering concurrently
/// can register references without losing or duplicating entries.
#[derive(Debug, Default)]
pub struct BacklinkRegistry {
    incoming: DashMap<BlockId, BTreeSet<BlockId>>,
}

impl BacklinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `source` references `destination`. Repeats are no-ops.
    pub fn register(&self, source: &BlockId, destination: &BlockId) {
        self.incoming
            .entry(destination.clone())
            .or_default()
            .insert(source.clone());
    }

    /// Sources referencing `destination`, sorted by identifier
    pub fn sources(&self, destination: &BlockId) -> Vec<BlockId> {
        self.incoming
            .get(destination)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of pages with at least one inbound reference
    pub fn len(&self) -> usize {
        self.incoming.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incoming.is_empty()
    }
}
