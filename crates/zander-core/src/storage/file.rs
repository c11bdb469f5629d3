//! File-backed persistence
//!
//! Stores the state snapshot as a single JSON file under the configured
//! data directory. Saves are atomic (write to temp file, then rename) so
//! the snapshot is never left half-written. Availability is checked with a
//! probe write before every load/save, mirroring how browser storage is
//! probed before use.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Config;
use crate::models::{ExportBundle, State, BUNDLE_VERSION};
use crate::storage::backend::PersistenceBackend;
use crate::storage::error::{StorageError, StorageResult};

/// File name of the probe write used to check availability
const PROBE_FILE: &str = ".zander-probe";

/// Persistence backend backed by a JSON file
pub struct FileBackend {
    config: Config,
}

impl FileBackend {
    /// Create a backend storing under the given configuration's data dir
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Path of the snapshot file
    pub fn state_path(&self) -> PathBuf {
        self.config.state_path()
    }

    /// Verify the medium is usable by performing a throwaway write
    fn probe(&self) -> StorageResult<()> {
        let dir = self.config.data_dir.clone();
        fs::create_dir_all(&dir)
            .map_err(|e| StorageError::unavailable(format!("cannot create {:?}: {}", dir, e)))?;

        let probe_path = dir.join(PROBE_FILE);
        fs::write(&probe_path, b"ok")
            .map_err(|e| StorageError::unavailable(format!("probe write failed: {}", e)))?;
        fs::remove_file(&probe_path).ok();
        Ok(())
    }
}

impl PersistenceBackend for FileBackend {
    fn load_state(&self) -> StorageResult<Option<State>> {
        self.probe()?;

        let path = self.state_path();
        if !path.exists() {
            debug!("no persisted state at {:?}", path);
            return Ok(None);
        }

        let raw = fs::read_to_string(&path)
            .map_err(|e| StorageError::unavailable(format!("cannot read {:?}: {}", path, e)))?;

        let state = serde_json::from_str(&raw)
            .map_err(|source| StorageError::InvalidJson { source })?;

        Ok(Some(state))
    }

    fn save_state(&self, state: &State) -> StorageResult<()> {
        self.probe()?;

        let path = self.state_path();
        let payload = serde_json::to_vec_pretty(state)
            .map_err(|e| StorageError::write_failed(e.to_string()))?;

        atomic_write(&path, &payload)
            .map_err(|e| StorageError::write_failed(format!("cannot write {:?}: {}", path, e)))?;

        debug!("saved state snapshot to {:?}", path);
        Ok(())
    }

    fn export_data(&self) -> StorageResult<ExportBundle> {
        let state = self.load_state()?.unwrap_or_default();
        Ok(ExportBundle::new(state, "file"))
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

/// Write data to a file atomically
///
/// Writes to a temp file in the same directory, syncs it, then renames it
/// over the target path.
fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path)?;
    file.write_all(data)?;
    file.sync_all()?;

    fs::rename(&temp_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::create_bookmark;
    use crate::models::Category;
    use tempfile::TempDir;

    fn test_backend(temp_dir: &TempDir) -> FileBackend {
        FileBackend::new(Config {
            data_dir: temp_dir.path().to_path_buf(),
        })
    }

    #[test]
    fn test_load_before_any_save_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let backend = test_backend(&temp_dir);
        assert!(backend.load_state().unwrap().is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let backend = test_backend(&temp_dir);

        let mut state = State::default();
        state.categories.push(Category::new(Some("Reading".to_string())));
        let category_id = state.categories[0].id.clone();
        state
            .bookmarks
            .push(create_bookmark("Example", "example.com", None, &category_id));
        state.current_category_id = Some(category_id);

        backend.save_state(&state).unwrap();
        let loaded = backend.load_state().unwrap().unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_corrupt_payload_is_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let backend = test_backend(&temp_dir);

        fs::write(backend.state_path(), "{not json").unwrap();
        let err = backend.load_state().unwrap_err();
        assert_eq!(err.code(), "invalid-json");
    }

    #[test]
    fn test_export_wraps_persisted_state() {
        let temp_dir = TempDir::new().unwrap();
        let backend = test_backend(&temp_dir);

        let mut state = State::default();
        state.categories.push(Category::new(Some("Work".to_string())));
        backend.save_state(&state).unwrap();

        let bundle = backend.export_data().unwrap();
        assert_eq!(bundle.version, BUNDLE_VERSION);
        assert_eq!(bundle.state, state);
        assert_eq!(bundle.meta.source_backend, "file");
    }

    #[test]
    fn test_export_without_persisted_state_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let backend = test_backend(&temp_dir);
        let bundle = backend.export_data().unwrap();
        assert_eq!(bundle.state, State::default());
    }

    #[test]
    fn test_import_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let backend = test_backend(&temp_dir);

        let mut state = State::default();
        state.categories.push(Category::new(Some("Work".to_string())));
        let bundle = ExportBundle::new(state.clone(), "file");

        backend.import_data(&bundle).unwrap();
        assert_eq!(backend.load_state().unwrap().unwrap(), state);
    }

    #[test]
    fn test_import_version_mismatch_leaves_state_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let backend = test_backend(&temp_dir);

        let prior = State::default();
        backend.save_state(&prior).unwrap();

        let mut bundle = ExportBundle::new(State::default(), "file");
        bundle.version = "other-v2".to_string();
        bundle.state.categories.push(Category::new(None));

        let err = backend.import_data(&bundle).unwrap_err();
        assert_eq!(err.code(), "version-unsupported");
        assert_eq!(backend.load_state().unwrap().unwrap(), prior);
    }

    #[test]
    fn test_unwritable_data_dir_is_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        // a file where the data dir should be makes the medium unusable
        let blocked = temp_dir.path().join("blocked");
        fs::write(&blocked, b"file, not a directory").unwrap();

        let backend = FileBackend::new(Config { data_dir: blocked });
        let err = backend.load_state().unwrap_err();
        assert_eq!(err.code(), "storage-unavailable");
    }
}
