//! The public mutation API
//!
//! Each action builds a pure updater from the domain/tree functions and
//! submits it to the coordinator's write queue. Missing ids degrade to
//! no-ops or fallbacks; only the persistence boundary can fail.

use crate::domain::{
    apply_bookmark_patch, category_exists, collect_category_ids, create_bookmark,
    effective_category_id, first_root_id, BookmarkPatch,
};
use crate::models::{
    Category, Direction, ExportBundle, SettingsPage, State, View, BUNDLE_VERSION,
};
use crate::selectors;
use crate::storage::{StorageError, StorageResult};
use crate::store::StateStore;
use crate::tree;

/// Parameters for creating a bookmark
#[derive(Debug, Clone, Default)]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    /// Explicit target category; resolved through the effective-category
    /// rule (explicit > current selection > first root)
    pub category_id: Option<String>,
    pub description: Option<String>,
}

impl StateStore {
    /// Select a category, or clear the selection with `None`
    ///
    /// A non-existent id falls back to the first root (or no selection
    /// when the forest is empty).
    pub async fn set_current_category(
        &self,
        category_id: Option<String>,
    ) -> StorageResult<State> {
        self.persist_and_set(move |mut current| {
            current.current_category_id = match category_id {
                None => None,
                Some(id) if category_exists(&current.categories, &id) => Some(id),
                Some(_) => first_root_id(&current.categories),
            };
            current
        })
        .await
    }

    /// Switch the active top-level view
    pub async fn set_current_view(&self, view: View) -> StorageResult<State> {
        self.persist_and_set(move |mut current| {
            current.current_view = view;
            current
        })
        .await
    }

    /// Switch the active settings page, or leave settings with `None`
    pub async fn set_current_settings_page(
        &self,
        page: Option<SettingsPage>,
    ) -> StorageResult<State> {
        self.persist_and_set(move |mut current| {
            current.current_settings_page = page;
            current
        })
        .await
    }

    /// Choose the category selected on startup
    ///
    /// An id that does not exist in the forest clears the landing
    /// category instead of persisting a dangling reference.
    pub async fn set_landing_category(
        &self,
        category_id: Option<String>,
    ) -> StorageResult<State> {
        self.persist_and_set(move |mut current| {
            current.landing_category_id = category_id
                .filter(|id| category_exists(&current.categories, id));
            current
        })
        .await
    }

    /// Create a category under a parent, or as a new root with `None`
    ///
    /// A parent id that no longer exists falls back to appending the new
    /// category as a root rather than dropping it.
    pub async fn add_category(
        &self,
        parent_id: Option<String>,
        name: Option<String>,
    ) -> StorageResult<State> {
        self.persist_and_set(move |mut current| {
            let node = Category::new(name);
            current.categories =
                tree::insert_category(&current.categories, parent_id.as_deref(), node);
            current
        })
        .await
    }

    /// Swap a category with its immediate sibling
    ///
    /// No-op when the id is unknown or the swap would cross the sibling
    /// list boundary.
    pub async fn move_category(
        &self,
        category_id: String,
        direction: Direction,
    ) -> StorageResult<State> {
        self.persist_and_set(move |mut current| {
            if let Some(next) = tree::move_category(&current.categories, &category_id, direction) {
                current.categories = next;
            }
            current
        })
        .await
    }

    /// Delete a category and its entire subtree
    ///
    /// Cascades to bookmarks in the removed subtree and renormalizes the
    /// selection. No-op when the id is unknown.
    pub async fn delete_category(&self, category_id: String) -> StorageResult<State> {
        self.persist_and_set(move |current| {
            tree::delete_category_from_state(&current, &category_id).unwrap_or(current)
        })
        .await
    }

    /// Create a bookmark
    pub async fn add_bookmark(&self, params: NewBookmark) -> StorageResult<State> {
        self.persist_and_set(move |mut current| {
            let category_id = effective_category_id(
                params.category_id.as_deref(),
                current.current_category_id.as_deref(),
                &current.categories,
            )
            .unwrap_or_default();

            let bookmark = create_bookmark(
                params.title,
                &params.url,
                params.description,
                category_id,
            );
            current.bookmarks.push(bookmark);
            current
        })
        .await
    }

    /// Apply a partial update to a bookmark
    ///
    /// A requested category change is resolved through the same
    /// effective-category rule as creation; when it cannot be resolved the
    /// category is left unchanged. Unknown bookmark ids are a no-op.
    pub async fn update_bookmark(
        &self,
        id: String,
        mut patch: BookmarkPatch,
    ) -> StorageResult<State> {
        self.persist_and_set(move |mut current| {
            let Some(index) = current.bookmarks.iter().position(|b| b.id == id) else {
                return current;
            };

            if let Some(requested) = patch.category_id.take() {
                patch.category_id = effective_category_id(
                    Some(&requested),
                    current.current_category_id.as_deref(),
                    &current.categories,
                );
            }

            current.bookmarks[index] = apply_bookmark_patch(&current.bookmarks[index], &patch);
            current
        })
        .await
    }

    /// Delete a bookmark; no-op when the id is unknown
    pub async fn delete_bookmark(&self, id: String) -> StorageResult<State> {
        self.persist_and_set(move |mut current| {
            current.bookmarks.retain(|b| b.id != id);
            current
        })
        .await
    }

    /// Restore state from an export bundle
    ///
    /// The version tag is validated before anything is queued, so a
    /// mismatched bundle never touches canonical state. Incoming bookmarks
    /// whose category id is not among the bundle's own categories are
    /// dropped, and the current selection is renormalized against the new
    /// forest.
    pub async fn apply_export_bundle(&self, bundle: ExportBundle) -> StorageResult<State> {
        if bundle.version != BUNDLE_VERSION {
            return Err(StorageError::VersionUnsupported {
                version: bundle.version,
            });
        }

        self.persist_and_set(move |current| {
            let incoming = bundle.state;
            let allowed = collect_category_ids(&incoming.categories);

            let bookmarks = incoming
                .bookmarks
                .into_iter()
                .filter(|b| allowed.contains(&b.category_id))
                .collect();

            let current_category_id = match &current.current_category_id {
                Some(id) if !allowed.contains(id) => first_root_id(&incoming.categories),
                other => other.clone(),
            };

            State {
                bookmarks,
                categories: incoming.categories,
                current_category_id,
                current_view: incoming.current_view,
                current_settings_page: incoming.current_settings_page,
                landing_category_id: incoming.landing_category_id,
            }
        })
        .await
    }

    /// Bookmarks visible under the current selection
    pub fn visible_bookmarks(&self) -> Vec<crate::models::Bookmark> {
        match self.state() {
            Some(state) => selectors::visible_bookmarks(&state)
                .into_iter()
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }
}
