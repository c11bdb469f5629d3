//! Zander Core Library
//!
//! This crate provides the core functionality for Zander, a client-side
//! bookmark organizer: bookmarks grouped into a user-editable tree of
//! categories, with a single active selection, persisted across sessions.
//!
//! # Architecture
//!
//! - **Pure core**: the domain model, category tree operations, and
//!   selectors are side-effect-free functions over immutable snapshots.
//! - **Coordinator**: `StateStore` owns the canonical in-memory `State`
//!   and serializes every mutation through one FIFO write queue; new
//!   snapshots are published optimistically before their durable save.
//! - **Backend**: durable storage is an injected `PersistenceBackend`
//!   with a narrow load/save/export/import contract.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let store = StateStore::spawn(FileBackend::new(config));
//! store.load_initial_state().await?;
//!
//! store.add_category(None, Some("Reading".into())).await?;
//! store.add_bookmark(NewBookmark {
//!     title: "Example".into(),
//!     url: "example.com".into(),
//!     ..Default::default()
//! }).await?;
//! ```
//!
//! # Modules
//!
//! - `store`: persistence coordinator (main entry point)
//! - `actions`: the public mutation API on `StateStore`
//! - `models`: data structures for bookmarks, categories, and state
//! - `domain`: pure bookmark functions (URL normalization, patching)
//! - `tree`: pure category forest operations
//! - `selectors`: read-side projections
//! - `storage`: persistence backends and typed errors
//! - `config`: application configuration

pub mod actions;
pub mod config;
pub mod domain;
pub mod models;
pub mod selectors;
pub mod storage;
pub mod store;
pub mod tree;

pub use actions::NewBookmark;
pub use config::Config;
pub use domain::BookmarkPatch;
pub use models::{
    Bookmark, BundleMeta, Category, Direction, ExportBundle, SettingsPage, State, View,
    BUNDLE_VERSION,
};
pub use storage::{FileBackend, MemoryBackend, PersistenceBackend, StorageError, StorageResult};
pub use store::{StateStore, StoreStatus};
