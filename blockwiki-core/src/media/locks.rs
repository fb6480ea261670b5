//! Per-key async locks and atomic create-if-absent.

use dashmap::DashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per cache key, created on first use.
#[derive(Debug, Default)]
pub struct KeyedLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl KeyedLocks {
    pub async fn lock(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = self.locks.entry(key.to_string()).or_default().clone();
        lock.lock_owned().await
    }
}

/// Scratch file next to `dest`, unique per process.
pub fn temp_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dest.with_file_name(format!(".{}.{}.part", name, std::process::id()))
}

/// Move a finished `tmp` file to `dest` unless `dest` already exists.
///
/// Returns `false` when another writer got there first. `tmp` is always removed.
pub async fn persist_new(tmp: &Path, dest: &Path) -> std::io::Result<bool> {
    let linked = tokio::fs::hard_link(tmp, dest).await;
    let cleanup = tokio::fs::remove_file(tmp).await;
    match linked {
        Ok(()) => {
            cleanup?;
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e),
    }
}
