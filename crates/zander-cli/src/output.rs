//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)

use zander_core::{Bookmark, Category};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn success(&self, message: &str) {
        if self.format == OutputFormat::Human {
            println!("{}", message);
        }
    }

    pub fn print_bookmark(&self, bookmark: &Bookmark) {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(bookmark).unwrap_or_default());
            }
            OutputFormat::Human => {
                println!("{}  {}", bookmark.id, bookmark.title);
                println!("    {}", bookmark.url);
                if let Some(description) = &bookmark.description {
                    println!("    {}", description);
                }
            }
        }
    }

    pub fn print_bookmarks(&self, bookmarks: &[Bookmark]) {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(bookmarks).unwrap_or_default());
            }
            OutputFormat::Human => {
                if bookmarks.is_empty() {
                    println!("No bookmarks");
                    return;
                }
                for bookmark in bookmarks {
                    self.print_bookmark(bookmark);
                }
            }
        }
    }

    pub fn print_category_tree(&self, categories: &[Category]) {
        match self.format {
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(categories).unwrap_or_default()
                );
            }
            OutputFormat::Human => {
                if categories.is_empty() {
                    println!("No categories");
                    return;
                }
                print_tree_level(categories, 0);
            }
        }
    }
}

fn print_tree_level(categories: &[Category], depth: usize) {
    for category in categories {
        println!("{}{}  ({})", "  ".repeat(depth), category.name, category.id);
        print_tree_level(&category.children, depth + 1);
    }
}
