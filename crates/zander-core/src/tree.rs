//! Category tree operations
//!
//! Pure functions over the category forest. Each returns a new forest
//! (plus metadata about what happened) and leaves the input untouched.
//! Search is depth-first; ids are unique so first-match-in-document-order
//! is unambiguous.

use std::collections::HashSet;

use crate::domain::{collect_subtree_ids, first_root_id};
use crate::models::{Category, Direction, State};

/// Insert a category into the forest
///
/// With no parent id the node is appended as a new root. With a parent id
/// the forest is searched at any depth; on a match the node is appended to
/// that parent's children. A missing parent falls back to appending as a
/// new root, never silently dropping the category.
pub fn insert_category(
    categories: &[Category],
    parent_id: Option<&str>,
    node: Category,
) -> Vec<Category> {
    let Some(parent_id) = parent_id else {
        let mut next = categories.to_vec();
        next.push(node);
        return next;
    };

    fn insert_into(
        categories: &[Category],
        parent_id: &str,
        node: &Category,
        inserted: &mut bool,
    ) -> Vec<Category> {
        categories
            .iter()
            .map(|category| {
                if category.id == parent_id {
                    *inserted = true;
                    let mut next = category.clone();
                    next.children.push(node.clone());
                    next
                } else {
                    let mut next = category.clone();
                    next.children = insert_into(&category.children, parent_id, node, inserted);
                    next
                }
            })
            .collect()
    }

    let mut inserted = false;
    let next = insert_into(categories, parent_id, &node, &mut inserted);

    if inserted {
        next
    } else {
        let mut fallback = categories.to_vec();
        fallback.push(node);
        fallback
    }
}

/// Swap a category with its immediate sibling
///
/// Finds the category in its sibling list at any depth and swaps it with
/// the preceding (`Up`) or following (`Down`) sibling. Returns `None` when
/// the id is not found or the swap would cross the list boundary; subtrees
/// are carried along intact.
pub fn move_category(
    categories: &[Category],
    category_id: &str,
    direction: Direction,
) -> Option<Vec<Category>> {
    // Position lookup is index-driven, so repeated moves track the
    // category's current slot rather than its original one.
    if let Some(index) = categories.iter().position(|c| c.id == category_id) {
        let target = match direction {
            Direction::Up => index.checked_sub(1)?,
            Direction::Down => {
                let t = index + 1;
                if t >= categories.len() {
                    return None;
                }
                t
            }
        };
        let mut next = categories.to_vec();
        next.swap(index, target);
        return Some(next);
    }

    for (index, category) in categories.iter().enumerate() {
        if let Some(children) = move_category(&category.children, category_id, direction) {
            let mut next = categories.to_vec();
            next[index].children = children;
            return Some(next);
        }
    }

    None
}

/// Result of removing a category subtree from the forest
#[derive(Debug)]
pub struct DeleteResult {
    /// The forest with the subtree removed
    pub categories: Vec<Category>,
    /// The removed category id plus every descendant id
    pub removed_ids: HashSet<String>,
}

/// Remove a category and its entire subtree from the forest
///
/// Returns `None` when the id is not found anywhere.
pub fn delete_category(categories: &[Category], category_id: &str) -> Option<DeleteResult> {
    let mut removed_ids = HashSet::new();
    let mut found = false;
    let next = delete_from_list(categories, category_id, &mut removed_ids, &mut found);

    if found {
        Some(DeleteResult {
            categories: next,
            removed_ids,
        })
    } else {
        None
    }
}

fn delete_from_list(
    categories: &[Category],
    category_id: &str,
    removed_ids: &mut HashSet<String>,
    found: &mut bool,
) -> Vec<Category> {
    let mut next = Vec::with_capacity(categories.len());

    for category in categories {
        if category.id == category_id {
            collect_subtree_ids(category, removed_ids);
            *found = true;
            continue;
        }

        let mut child_found = false;
        let children = delete_from_list(&category.children, category_id, removed_ids, &mut child_found);
        if child_found {
            *found = true;
            let mut updated = category.clone();
            updated.children = children;
            next.push(updated);
        } else {
            next.push(category.clone());
        }
    }

    next
}

/// Delete a category subtree and cascade through the whole state
///
/// Drops every bookmark whose category id was removed and renormalizes
/// `current_category_id` to the new forest's first root (or `None`) when
/// the selection was removed. Returns `None` when the id is not found,
/// leaving the state untouched.
pub fn delete_category_from_state(state: &State, category_id: &str) -> Option<State> {
    let DeleteResult {
        categories,
        removed_ids,
    } = delete_category(&state.categories, category_id)?;

    let bookmarks = state
        .bookmarks
        .iter()
        .filter(|b| !removed_ids.contains(&b.category_id))
        .cloned()
        .collect();

    let current_category_id = match &state.current_category_id {
        Some(current) if removed_ids.contains(current) => first_root_id(&categories),
        other => other.clone(),
    };

    Some(State {
        bookmarks,
        categories,
        current_category_id,
        ..state.clone()
    })
}
