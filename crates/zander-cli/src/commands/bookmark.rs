//! Bookmark command handlers

use anyhow::{Context, Result};

use zander_core::{BookmarkPatch, NewBookmark, StateStore};

use crate::output::Output;

/// Create a new bookmark
pub async fn add(
    store: &StateStore,
    title: String,
    url: String,
    category: Option<String>,
    description: Option<String>,
    output: &Output,
) -> Result<()> {
    let state = store
        .add_bookmark(NewBookmark {
            title,
            url,
            category_id: category,
            description,
        })
        .await
        .context("Failed to create bookmark")?;

    if let Some(bookmark) = state.bookmarks.last() {
        output.success(&format!("Created bookmark: {}", bookmark.id));
        output.print_bookmark(bookmark);
    }
    Ok(())
}

/// List bookmarks, either all of them or only those visible under the
/// current category selection
pub fn list(store: &StateStore, all: bool, output: &Output) -> Result<()> {
    if all {
        let state = store.state().unwrap_or_default();
        output.print_bookmarks(&state.bookmarks);
    } else {
        output.print_bookmarks(&store.visible_bookmarks());
    }
    Ok(())
}

/// Apply a partial update to a bookmark
#[allow(clippy::too_many_arguments)]
pub async fn update(
    store: &StateStore,
    id: String,
    title: Option<String>,
    url: Option<String>,
    description: Option<String>,
    clear_description: bool,
    category: Option<String>,
    output: &Output,
) -> Result<()> {
    let patch = BookmarkPatch {
        title,
        url,
        description: if clear_description {
            Some(None)
        } else {
            description.map(Some)
        },
        category_id: category,
    };

    let state = store
        .update_bookmark(id.clone(), patch)
        .await
        .context("Failed to update bookmark")?;

    match state.bookmarks.iter().find(|b| b.id == id) {
        Some(bookmark) => {
            output.success("Updated bookmark");
            output.print_bookmark(bookmark);
        }
        None => anyhow::bail!("Bookmark not found: {}", id),
    }
    Ok(())
}

/// Delete a bookmark
pub async fn delete(store: &StateStore, id: String, output: &Output) -> Result<()> {
    store
        .delete_bookmark(id.clone())
        .await
        .context("Failed to delete bookmark")?;
    output.success(&format!("Deleted bookmark: {}", id));
    Ok(())
}
