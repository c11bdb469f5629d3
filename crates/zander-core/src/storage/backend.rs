//! Persistence backend contract
//!
//! The coordinator treats durable storage as an injected capability with a
//! narrow load/save/export/import surface. The snapshot is always the full
//! `State`; there are no partial writes.

use std::sync::Mutex;

use crate::models::{ExportBundle, State, BUNDLE_VERSION};
use crate::storage::error::{StorageError, StorageResult};

/// Durable storage for a full state snapshot
pub trait PersistenceBackend: Send {
    /// Load the persisted snapshot, `None` when nothing has been saved yet
    ///
    /// Fails with `storage-unavailable` when the medium cannot be used and
    /// `invalid-json` when the stored payload cannot be parsed.
    fn load_state(&self) -> StorageResult<Option<State>>;

    /// Durably save a snapshot, replacing any previous one
    ///
    /// Fails with `storage-unavailable` or `write-failed`.
    fn save_state(&self, state: &State) -> StorageResult<()>;

    /// Wrap the persisted snapshot (or defaults) in a versioned bundle
    fn export_data(&self) -> StorageResult<ExportBundle>;

    /// Replace the persisted snapshot with a bundle's contents
    ///
    /// Fails with `version-unsupported` when the bundle's version tag does
    /// not match, leaving the persisted snapshot untouched.
    fn import_data(&self, bundle: &ExportBundle) -> StorageResult<()>;
}

/// In-memory backend
///
/// Keeps the snapshot as a JSON string behind a mutex. Useful for tests
/// and for running without any durable medium.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    payload: Mutex<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.payload.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PersistenceBackend for MemoryBackend {
    fn load_state(&self) -> StorageResult<Option<State>> {
        let payload = self.lock();
        match payload.as_deref() {
            None => Ok(None),
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|source| StorageError::InvalidJson { source }),
        }
    }

    fn save_state(&self, state: &State) -> StorageResult<()> {
        let raw = serde_json::to_string(state)
            .map_err(|e| StorageError::write_failed(e.to_string()))?;
        *self.lock() = Some(raw);
        Ok(())
    }

    fn export_data(&self) -> StorageResult<ExportBundle> {
        let state = self.load_state()?.unwrap_or_default();
        Ok(ExportBundle::new(state, "memory"))
    }

    fn import_data(&self, bundle: &ExportBundle) -> StorageResult<()> {
        if bundle.version != BUNDLE_VERSION {
            return Err(StorageError::VersionUnsupported {
                version: bundle.version.clone(),
            });
        }
        self.save_state(&bundle.state)
    }
}
