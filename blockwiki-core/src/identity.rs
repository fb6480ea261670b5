//! Deterministic identifiers for synthetic blocks.

use blake3::Hasher;
use blockwiki_types::{add_dashes, BlockId};
use std::sync::atomic::{AtomicU64, Ordering};

/// Generates dashed identifiers from a build-scoped seed and a call counter.
///
/// The same seed and the same call order always yield the same sequence, so
/// callers must invoke it in a fixed traversal order.
#[derive(Debug)]
pub struct IdGenerator {
    seed: String,
    counter: AtomicU64,
}

impl IdGenerator {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            counter: AtomicU64::new(1),
        }
    }

    /// Next identifier in the sequence
    pub fn next_id(&self) -> BlockId {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let mut hasher = Hasher::new();
        hasher.update(self.seed.as_bytes());
        hasher.update(n.to_string().as_bytes());
        let hex = hasher.finalize().to_hex();
        BlockId::new(add_dashes(&hex.as_str()[..32]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let a = IdGenerator::new("rev-1");
        let b = IdGenerator::new("rev-1");
        let first: Vec<_> = (0..5).map(|_| a.next_id()).collect();
        let second: Vec<_> = (0..5).map(|_| b.next_id()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn different_seeds_diverge() {
        let a = IdGenerator::new("rev-1");
        let b = IdGenerator::new("rev-2");
        for _ in 0..5 {
            assert_ne!(a.next_id(), b.next_id());
        }
    }

    #[test]
    fn ids_are_unique_within_a_build() {
        let ids = IdGenerator::new("seed");
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            assert!(seen.insert(ids.next_id()));
        }
    }

    #[test]
    fn ids_use_canonical_layout() {
        let id = IdGenerator::new("seed").next_id();
        let groups: Vec<_> = id.as_str().split('-').map(str::len).collect();
        assert_eq!(groups, vec![8, 4, 4, 4, 12]);
        assert!(id.compact().chars().all(|c| c.is_ascii_hexdigit()));
    }
}
