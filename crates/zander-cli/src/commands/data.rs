//! Data command handlers: export, import, reset, status

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use zander_core::{ExportBundle, StateStore};

use crate::output::Output;

/// Export the persisted state as a versioned bundle
pub async fn export(store: &StateStore, file: Option<PathBuf>, output: &Output) -> Result<()> {
    let bundle = store
        .export_data()
        .await
        .context("Failed to export data")?;

    let payload =
        serde_json::to_string_pretty(&bundle).context("Failed to serialize export bundle")?;

    match file {
        Some(path) => {
            fs::write(&path, payload)
                .with_context(|| format!("Failed to write export to {:?}", path))?;
            output.success(&format!("Exported to {:?}", path));
        }
        None => println!("{}", payload),
    }
    Ok(())
}

/// Restore state from an export bundle file
pub async fn import(store: &StateStore, file: PathBuf, output: &Output) -> Result<()> {
    let raw =
        fs::read_to_string(&file).with_context(|| format!("Failed to read bundle {:?}", file))?;
    let bundle: ExportBundle =
        serde_json::from_str(&raw).with_context(|| format!("Invalid bundle file {:?}", file))?;

    let state = store
        .apply_export_bundle(bundle)
        .await
        .context("Failed to import bundle")?;

    output.success(&format!(
        "Imported {} bookmarks across {} root categories",
        state.bookmarks.len(),
        state.categories.len()
    ));
    Ok(())
}

/// Wipe everything back to defaults
pub async fn reset(store: &StateStore, yes: bool, output: &Output) -> Result<()> {
    if !yes {
        anyhow::bail!("Refusing to reset without --yes");
    }

    store.reset_system().await.context("Failed to reset")?;
    output.success("Reset to default state");
    Ok(())
}

/// Show readiness, selection, and data counts
pub fn status(store: &StateStore, output: &Output) -> Result<()> {
    let status = store.status();

    if output.format == crate::output::OutputFormat::Json {
        let state = status.state.clone().unwrap_or_default();
        let value = serde_json::json!({
            "ready": status.is_ready,
            "initError": status.init_error,
            "bookmarks": state.bookmarks.len(),
            "rootCategories": state.categories.len(),
            "currentCategoryId": state.current_category_id,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match &status.init_error {
        Some(error) => println!("Not ready: {}", error),
        None if !status.is_ready => println!("Not ready"),
        None => {
            let state = status.state.unwrap_or_default();
            println!("Ready");
            println!("  bookmarks:       {}", state.bookmarks.len());
            println!("  root categories: {}", state.categories.len());
            match &state.current_category_id {
                Some(id) => println!("  selection:       {}", id),
                None => println!("  selection:       (none)"),
            }
        }
    }
    Ok(())
}
