//! Data models for Zander
//!
//! Defines the core data structures: Bookmark, Category, State, and
//! ExportBundle. All of them serialize with camelCase field names so the
//! persisted JSON snapshot matches the documented layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Version tag carried by export bundles. Import requires an exact match.
pub const BUNDLE_VERSION: &str = "zander-v1";

/// Generate a new globally unique id
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// A saved bookmark
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    /// Unique identifier, immutable after creation
    pub id: String,
    /// Display title
    pub title: String,
    /// The URL, always normalized (see `domain::normalize_url`)
    pub url: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Id of the category this bookmark belongs to ("" when none exists)
    pub category_id: String,
    /// When this bookmark was created
    pub created_at: DateTime<Utc>,
}

/// A category node in the forest
///
/// `children` ordering is significant: sibling order is display order and
/// the order `move` operations act on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier across the whole forest
    pub id: String,
    /// Display name
    pub name: String,
    /// Display color
    pub color: String,
    /// When this category was created
    pub created_at: DateTime<Utc>,
    /// Nested subcategories
    pub children: Vec<Category>,
}

impl Category {
    /// Create a new empty category with a generated id
    ///
    /// `None` for the name falls back to "New category".
    pub fn new(name: Option<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.unwrap_or_else(|| "New category".to_string()),
            color: "#ffffff".to_string(),
            created_at: Utc::now(),
            children: Vec::new(),
        }
    }
}

/// The active top-level view
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Bookmarks,
    Settings,
    About,
}

/// The active settings sub-page
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SettingsPage {
    Categories,
    Home,
    Themes,
    Data,
    Reset,
}

/// Direction for sibling reordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// The aggregate application state, the root of persistence
///
/// Always a single coherent snapshot: every mutation produces a wholly new
/// `State` from the previous one, never a partial in-place update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct State {
    /// All bookmarks
    pub bookmarks: Vec<Bookmark>,
    /// Category forest (multiple roots allowed)
    pub categories: Vec<Category>,
    /// Currently selected category, if any
    pub current_category_id: Option<String>,
    /// Active view
    pub current_view: View,
    /// Active settings page, if the settings view is showing one
    pub current_settings_page: Option<SettingsPage>,
    /// Category to select on startup, if configured
    pub landing_category_id: Option<String>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            bookmarks: Vec::new(),
            categories: Vec::new(),
            current_category_id: None,
            current_view: View::Bookmarks,
            current_settings_page: None,
            landing_category_id: None,
        }
    }
}

/// Metadata attached to an export bundle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BundleMeta {
    /// When the bundle was exported
    pub exported_at_stardate: DateTime<Utc>,
    /// Identifier of the backend that produced the bundle
    pub source_backend: String,
}

/// A versioned, self-describing snapshot used for backup/restore
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    /// Format version tag, must equal [`BUNDLE_VERSION`] to import
    pub version: String,
    /// The contained state snapshot
    pub state: State,
    /// Export metadata
    pub meta: BundleMeta,
}

impl ExportBundle {
    /// Wrap a state snapshot in a bundle with the current version tag
    pub fn new(state: State, source_backend: impl Into<String>) -> Self {
        Self {
            version: BUNDLE_VERSION.to_string(),
            state,
            meta: BundleMeta {
                exported_at_stardate: Utc::now(),
                source_backend: source_backend.into(),
            },
        }
    }
}
