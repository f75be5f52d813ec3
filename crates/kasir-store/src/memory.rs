//! # In-Memory Fakes
//!
//! `Store` and `Mirror` implementations with no real persistence, for
//! exercising the session container and the failure paths without a
//! filesystem. The engine itself needs no fakes (it is pure); these
//! exist for everything wired around it.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::error::{StoreError, StoreResult};
use crate::mirror::Mirror;
use crate::store::Store;
use kasir_core::AppState;

/// An in-memory `Store`, optionally failing every write to exercise
/// the persistence-failure path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<Option<AppState>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store (first-run condition).
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Makes every subsequent `save` fail, like a full disk or an
    /// unavailable engine would.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent `load` fail, like a corrupt snapshot at
    /// startup would.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn load(&self) -> StoreResult<Option<AppState>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::QueryFailed("simulated read failure".into()));
        }
        Ok(self.snapshot.lock().expect("store mutex poisoned").clone())
    }

    async fn save(&self, state: &AppState) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::QueryFailed("simulated write failure".into()));
        }
        *self.snapshot.lock().expect("store mutex poisoned") = Some(state.clone());
        Ok(())
    }

    async fn clear(&self) -> StoreResult<()> {
        *self.snapshot.lock().expect("store mutex poisoned") = None;
        Ok(())
    }
}

/// An in-memory `Mirror`.
#[derive(Debug, Default)]
pub struct MemoryMirror {
    backup: Mutex<Option<AppState>>,
}

impl MemoryMirror {
    /// Creates an empty mirror.
    pub fn new() -> Self {
        MemoryMirror::default()
    }
}

impl Mirror for MemoryMirror {
    fn save_backup(&self, state: &AppState) {
        *self.backup.lock().expect("mirror mutex poisoned") = Some(state.clone());
    }

    fn load_backup(&self) -> Option<AppState> {
        self.backup.lock().expect("mirror mutex poisoned").clone()
    }

    fn clear(&self) {
        *self.backup.lock().expect("mirror mutex poisoned") = None;
    }
}
