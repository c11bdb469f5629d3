//! Pure bookmark domain functions
//!
//! No side effects and no hidden state: URL normalization, category id
//! lookups over the forest, and bookmark construction/patching. Missing ids
//! degrade to fallbacks rather than errors.

use std::collections::HashSet;

use chrono::Utc;

use crate::models::{generate_id, Bookmark, Category};

/// Normalize a raw URL entry
///
/// Trims whitespace. An empty string stays empty. A value that already
/// carries a URI scheme (`letter (letter|digit|+|.|-)* :`) passes through
/// untouched; anything else gets `https://` prepended, so bare domains
/// become HTTPS URLs.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    if has_uri_scheme(trimmed) {
        return trimmed.to_string();
    }

    format!("https://{}", trimmed)
}

fn has_uri_scheme(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    for c in chars {
        if c == ':' {
            return true;
        }
        if !(c.is_ascii_alphanumeric() || c == '+' || c == '.' || c == '-') {
            return false;
        }
    }
    false
}

/// Collect every category id in the forest, at any depth
pub fn collect_category_ids(categories: &[Category]) -> HashSet<String> {
    let mut ids = HashSet::new();
    fn walk(nodes: &[Category], ids: &mut HashSet<String>) {
        for node in nodes {
            ids.insert(node.id.clone());
            walk(&node.children, ids);
        }
    }
    walk(categories, &mut ids);
    ids
}

/// Collect the id of a category and all of its descendants
pub fn collect_subtree_ids(root: &Category, acc: &mut HashSet<String>) {
    acc.insert(root.id.clone());
    for child in &root.children {
        collect_subtree_ids(child, acc);
    }
}

/// Whether a category id exists anywhere in the forest
pub fn category_exists(categories: &[Category], id: &str) -> bool {
    categories
        .iter()
        .any(|c| c.id == id || category_exists(&c.children, id))
}

/// Find a category by id anywhere in the forest (first match in
/// document order)
pub fn find_category<'a>(categories: &'a [Category], id: &str) -> Option<&'a Category> {
    for category in categories {
        if category.id == id {
            return Some(category);
        }
        if let Some(found) = find_category(&category.children, id) {
            return Some(found);
        }
    }
    None
}

/// Id of the first root category, if any
pub fn first_root_id(categories: &[Category]) -> Option<String> {
    categories.first().map(|c| c.id.clone())
}

/// Resolve the category a new or re-pointed bookmark should land in
///
/// Resolution order: explicit id if it exists in the forest, then the
/// current selection if it exists, then the first root, then `None` when
/// the forest is empty.
pub fn effective_category_id(
    explicit_category_id: Option<&str>,
    current_category_id: Option<&str>,
    categories: &[Category],
) -> Option<String> {
    let all_ids = collect_category_ids(categories);

    if let Some(explicit) = explicit_category_id {
        if all_ids.contains(explicit) {
            return Some(explicit.to_string());
        }
    }

    if let Some(current) = current_category_id {
        if all_ids.contains(current) {
            return Some(current.to_string());
        }
    }

    first_root_id(categories)
}

/// Build a new bookmark with a generated id and creation timestamp
///
/// The URL is normalized; the category id is taken as already resolved by
/// the caller.
pub fn create_bookmark(
    title: impl Into<String>,
    url: &str,
    description: Option<String>,
    category_id: impl Into<String>,
) -> Bookmark {
    Bookmark {
        id: generate_id(),
        title: title.into(),
        url: normalize_url(url),
        description,
        category_id: category_id.into(),
        created_at: Utc::now(),
    }
}

/// A partial update to a bookmark
///
/// `None` leaves a field unchanged. For `description`, `Some(None)`
/// clears the value while `Some(Some(_))` replaces it.
#[derive(Debug, Clone, Default)]
pub struct BookmarkPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<Option<String>>,
    pub category_id: Option<String>,
}

/// Apply a partial update, producing a new bookmark
///
/// `url` is renormalized when provided. `id` and `created_at` are
/// immutable across updates.
pub fn apply_bookmark_patch(bookmark: &Bookmark, patch: &BookmarkPatch) -> Bookmark {
    let mut next = bookmark.clone();

    if let Some(title) = &patch.title {
        next.title = title.clone();
    }
    if let Some(url) = &patch.url {
        next.url = normalize_url(url);
    }
    if let Some(description) = &patch.description {
        next.description = description.clone();
    }
    if let Some(category_id) = &patch.category_id {
        next.category_id = category_id.clone();
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str, children: Vec<Category>) -> Category {
        Category {
            id: id.to_string(),
            name: id.to_string(),
            color: "#ffffff".to_string(),
            created_at: Utc::now(),
            children,
        }
    }

    #[test]
    fn test_normalize_url_bare_domain() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(normalize_url("  example.com  "), "https://example.com");
    }

    #[test]
    fn test_normalize_url_keeps_schemes() {
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
        assert_eq!(normalize_url("mailto:x@y.com"), "mailto:x@y.com");
        assert_eq!(normalize_url("x-odd+scheme.1:thing"), "x-odd+scheme.1:thing");
    }

    #[test]
    fn test_normalize_url_empty() {
        assert_eq!(normalize_url(""), "");
        assert_eq!(normalize_url("   "), "");
    }

    #[test]
    fn test_normalize_url_scheme_must_start_with_letter() {
        // "1:30" is not a scheme, so it gets the https prefix
        assert_eq!(normalize_url("1:30pm"), "https://1:30pm");
        // a path with slashes before the colon is not a scheme either
        assert_eq!(normalize_url("example.com/a:b"), "https://example.com/a:b");
    }

    #[test]
    fn test_collect_category_ids_nested() {
        let forest = vec![
            category("a", vec![category("a1", vec![category("a1x", vec![])])]),
            category("b", vec![]),
        ];
        let ids = collect_category_ids(&forest);
        assert_eq!(ids.len(), 4);
        assert!(ids.contains("a1x"));
        assert!(ids.contains("b"));
    }

    #[test]
    fn test_category_exists_and_find() {
        let forest = vec![category("root", vec![category("child", vec![])])];
        assert!(category_exists(&forest, "child"));
        assert!(!category_exists(&forest, "missing"));
        assert_eq!(find_category(&forest, "child").unwrap().id, "child");
        assert!(find_category(&forest, "missing").is_none());
    }

    #[test]
    fn test_effective_category_id_resolution_order() {
        let forest = vec![category("first", vec![]), category("second", vec![])];

        // explicit valid id wins
        assert_eq!(
            effective_category_id(Some("second"), Some("first"), &forest),
            Some("second".to_string())
        );
        // invalid explicit falls through to current selection
        assert_eq!(
            effective_category_id(Some("missing"), Some("second"), &forest),
            Some("second".to_string())
        );
        // both invalid falls through to first root
        assert_eq!(
            effective_category_id(Some("missing"), Some("also-missing"), &forest),
            Some("first".to_string())
        );
        // empty forest yields None
        assert_eq!(effective_category_id(Some("missing"), None, &[]), None);
    }

    #[test]
    fn test_create_bookmark_normalizes_url() {
        let bookmark = create_bookmark("Example", "example.com", None, "c1");
        assert_eq!(bookmark.url, "https://example.com");
        assert_eq!(bookmark.category_id, "c1");
        assert!(bookmark.description.is_none());
        assert!(!bookmark.id.is_empty());
    }

    #[test]
    fn test_patch_clears_description() {
        let bookmark = create_bookmark("T", "example.com", Some("old".to_string()), "c1");
        let patched = apply_bookmark_patch(
            &bookmark,
            &BookmarkPatch {
                description: Some(None),
                ..Default::default()
            },
        );
        assert!(patched.description.is_none());
        assert_eq!(patched.title, "T");
    }

    #[test]
    fn test_empty_patch_changes_nothing() {
        let bookmark = create_bookmark("T", "example.com", Some("d".to_string()), "c1");
        let patched = apply_bookmark_patch(&bookmark, &BookmarkPatch::default());
        assert_eq!(patched, bookmark);
    }

    #[test]
    fn test_patch_preserves_id_and_created_at() {
        let bookmark = create_bookmark("T", "example.com", None, "c1");
        let patched = apply_bookmark_patch(
            &bookmark,
            &BookmarkPatch {
                title: Some("New title".to_string()),
                url: Some("other.org".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(patched.id, bookmark.id);
        assert_eq!(patched.created_at, bookmark.created_at);
        assert_eq!(patched.url, "https://other.org");
        assert_eq!(patched.title, "New title");
    }
}
