//! Read-side projections over the state
//!
//! Pure selectors; nothing here mutates.

use std::collections::HashSet;

use crate::domain::{collect_subtree_ids, find_category};
use crate::models::{Bookmark, State};

/// Bookmarks visible under the current category selection
///
/// With no selection, every bookmark is visible. With a selection, only
/// bookmarks in that category's subtree (itself plus all descendants) are
/// returned. A selection that does not resolve to any node falls back to
/// all bookmarks rather than an empty list.
pub fn visible_bookmarks(state: &State) -> Vec<&Bookmark> {
    let Some(current_id) = &state.current_category_id else {
        return state.bookmarks.iter().collect();
    };

    let Some(root) = find_category(&state.categories, current_id) else {
        return state.bookmarks.iter().collect();
    };

    let mut ids = HashSet::new();
    collect_subtree_ids(root, &mut ids);

    state
        .bookmarks
        .iter()
        .filter(|b| ids.contains(&b.category_id))
        .collect()
}
