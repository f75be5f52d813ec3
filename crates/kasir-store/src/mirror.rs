//! # Backup Mirror
//!
//! A synchronous, best-effort secondary copy of the snapshot.
//!
//! The mirror is written fire-and-forget right after every durable
//! store write attempt, whether or not that attempt succeeded. It is a
//! safety net, not the primary store: every failure in here is logged
//! and swallowed so it can never block the write path. It is read in
//! exactly one situation, when the durable store is unavailable or
//! corrupt at startup.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, warn};

use kasir_core::AppState;

// =============================================================================
// Capability Trait
// =============================================================================

/// Best-effort secondary persistence. All methods are infallible at
/// the signature level; implementations swallow their own failures.
pub trait Mirror: Send + Sync {
    /// Writes a backup copy of `state`. Never blocks the caller's
    /// success path; failures are logged and dropped.
    fn save_backup(&self, state: &AppState);

    /// Reads the backup copy, if one exists and parses.
    fn load_backup(&self) -> Option<AppState>;

    /// Removes the backup copy.
    fn clear(&self);
}

/// Sessions on one device share one mirror, so the capability passes
/// through `Arc`.
impl<T: Mirror + ?Sized> Mirror for std::sync::Arc<T> {
    fn save_backup(&self, state: &AppState) {
        (**self).save_backup(state)
    }

    fn load_backup(&self) -> Option<AppState> {
        (**self).load_backup()
    }

    fn clear(&self) {
        (**self).clear()
    }
}

// =============================================================================
// File Mirror
// =============================================================================

/// A mirror backed by a single JSON file next to the database.
#[derive(Debug, Clone)]
pub struct FileMirror {
    path: PathBuf,
}

impl FileMirror {
    /// Creates a mirror writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileMirror { path: path.into() }
    }
}

impl Mirror for FileMirror {
    fn save_backup(&self, state: &AppState) {
        let payload = match serde_json::to_string(state) {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "Backup mirror serialization failed");
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, payload) {
            warn!(path = %self.path.display(), error = %e, "Backup mirror write failed");
        }
    }

    fn load_backup(&self) -> Option<AppState> {
        let payload = match fs::read_to_string(&self.path) {
            Ok(p) => p,
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    warn!(path = %self.path.display(), error = %e, "Backup mirror read failed");
                }
                return None;
            }
        };
        match serde_json::from_str(&payload) {
            Ok(state) => {
                debug!(path = %self.path.display(), "Recovered state from backup mirror");
                Some(state)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Backup mirror payload corrupt");
                None
            }
        }
    }

    fn clear(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "Backup mirror clear failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = FileMirror::new(dir.path().join("backup.json"));

        let state = AppState::seed();
        mirror.save_backup(&state);
        assert_eq!(mirror.load_backup().unwrap(), state);
    }

    #[test]
    fn test_missing_backup_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = FileMirror::new(dir.path().join("nothing.json"));
        assert!(mirror.load_backup().is_none());
    }

    #[test]
    fn test_corrupt_backup_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");
        fs::write(&path, "{definitely not json").unwrap();

        let mirror = FileMirror::new(path);
        assert!(mirror.load_backup().is_none());
    }

    #[test]
    fn test_unwritable_path_is_swallowed() {
        // A directory that does not exist: the write fails, the caller
        // must not notice.
        let mirror = FileMirror::new("/nonexistent-dir/backup.json");
        mirror.save_backup(&AppState::seed());
        mirror.clear();
    }

    #[test]
    fn test_clear_removes_backup() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = FileMirror::new(dir.path().join("backup.json"));

        mirror.save_backup(&AppState::seed());
        mirror.clear();
        assert!(mirror.load_backup().is_none());
    }
}
