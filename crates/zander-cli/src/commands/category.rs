//! Category command handlers

use anyhow::{Context, Result};

use zander_core::{Direction, StateStore};

use crate::output::Output;

/// Create a new category, as a root or under a parent
pub async fn add(
    store: &StateStore,
    name: Option<String>,
    parent: Option<String>,
    output: &Output,
) -> Result<()> {
    let state = store
        .add_category(parent, name)
        .await
        .context("Failed to create category")?;

    output.success("Created category");
    output.print_category_tree(&state.categories);
    Ok(())
}

/// Move a category up or down among its siblings
pub async fn move_(
    store: &StateStore,
    id: String,
    direction: Direction,
    output: &Output,
) -> Result<()> {
    let state = store
        .move_category(id, direction)
        .await
        .context("Failed to move category")?;

    output.print_category_tree(&state.categories);
    Ok(())
}

/// Delete a category and its subtree, cascading to its bookmarks
pub async fn delete(store: &StateStore, id: String, output: &Output) -> Result<()> {
    let state = store
        .delete_category(id.clone())
        .await
        .context("Failed to delete category")?;

    output.success(&format!("Deleted category: {}", id));
    output.print_category_tree(&state.categories);
    Ok(())
}

/// Print the category forest
pub fn tree(store: &StateStore, output: &Output) -> Result<()> {
    let state = store.state().unwrap_or_default();
    output.print_category_tree(&state.categories);
    Ok(())
}

/// Select a category, or clear the selection
pub async fn select(store: &StateStore, id: Option<String>, output: &Output) -> Result<()> {
    let state = store
        .set_current_category(id)
        .await
        .context("Failed to set current category")?;

    match &state.current_category_id {
        Some(id) => output.success(&format!("Selected category: {}", id)),
        None => output.success("Cleared category selection"),
    }
    Ok(())
}
