//! Durable persistence of state snapshots
//!
//! The `PersistenceBackend` trait is the narrow contract the coordinator
//! consumes; `FileBackend` is the default implementation and
//! `MemoryBackend` backs tests and ephemeral runs.

mod backend;
mod error;
mod file;

pub use backend::{MemoryBackend, PersistenceBackend};
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
