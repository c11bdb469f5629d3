//! Zander CLI
//!
//! Command-line interface for Zander - bookmark organization.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use zander_core::{Config, Direction, FileBackend, SettingsPage, StateStore, View};

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "zander")]
#[command(about = "Zander - bookmark organization")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage bookmarks
    Bookmark {
        #[command(subcommand)]
        command: BookmarkCommands,
    },
    /// Manage the category tree
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Select a category (omit the id to clear the selection)
    Select {
        category_id: Option<String>,
    },
    /// Switch the active view
    View {
        view: ViewArg,
        /// Settings page to open (settings view only)
        #[arg(long)]
        page: Option<SettingsPageArg>,
    },
    /// Export all data as a versioned bundle
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Import a previously exported bundle
    Import {
        file: PathBuf,
    },
    /// Wipe everything back to defaults
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
    /// Show readiness and data counts
    Status,
}

#[derive(Subcommand)]
enum BookmarkCommands {
    /// Create a new bookmark
    #[command(alias = "create")]
    Add {
        title: String,
        /// URL (bare domains get https:// prepended)
        url: String,
        /// Target category id (defaults to the current selection)
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List bookmarks under the current selection
    #[command(alias = "ls")]
    List {
        /// Ignore the selection and list everything
        #[arg(long)]
        all: bool,
    },
    /// Update fields of a bookmark
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        /// Remove the description
        #[arg(long)]
        clear_description: bool,
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete a bookmark
    #[command(alias = "rm")]
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// Create a category
    #[command(alias = "create")]
    Add {
        /// Name (defaults to "New category")
        name: Option<String>,
        /// Parent category id (omit for a new root)
        #[arg(short, long)]
        parent: Option<String>,
    },
    /// Move a category up or down among its siblings
    Move {
        id: String,
        direction: DirectionArg,
    },
    /// Delete a category, its subtree, and their bookmarks
    #[command(alias = "rm")]
    Delete {
        id: String,
    },
    /// Print the category forest
    Tree,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DirectionArg {
    Up,
    Down,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Up => Direction::Up,
            DirectionArg::Down => Direction::Down,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ViewArg {
    Bookmarks,
    Settings,
    About,
}

impl From<ViewArg> for View {
    fn from(arg: ViewArg) -> Self {
        match arg {
            ViewArg::Bookmarks => View::Bookmarks,
            ViewArg::Settings => View::Settings,
            ViewArg::About => View::About,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SettingsPageArg {
    Categories,
    Home,
    Themes,
    Data,
    Reset,
}

impl From<SettingsPageArg> for SettingsPage {
    fn from(arg: SettingsPageArg) -> Self {
        match arg {
            SettingsPageArg::Categories => SettingsPage::Categories,
            SettingsPageArg::Home => SettingsPage::Home,
            SettingsPageArg::Themes => SettingsPage::Themes,
            SettingsPageArg::Data => SettingsPage::Data,
            SettingsPageArg::Reset => SettingsPage::Reset,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json));

    let config = Config::load()?;
    tracing::debug!("using data dir {:?}", config.data_dir);
    let store = StateStore::spawn(FileBackend::new(config));

    // Status must be reachable even when initialization fails; every other
    // command needs a ready store.
    if let Commands::Status = cli.command {
        let _ = store.load_initial_state().await;
        return commands::data::status(&store, &output);
    }

    if let Err(e) = store.load_initial_state().await {
        anyhow::bail!("Initialization failed ({}): {}", e.code(), e);
    }

    match cli.command {
        Commands::Bookmark { command } => match command {
            BookmarkCommands::Add {
                title,
                url,
                category,
                description,
            } => commands::bookmark::add(&store, title, url, category, description, &output).await,
            BookmarkCommands::List { all } => commands::bookmark::list(&store, all, &output),
            BookmarkCommands::Update {
                id,
                title,
                url,
                description,
                clear_description,
                category,
            } => {
                commands::bookmark::update(
                    &store,
                    id,
                    title,
                    url,
                    description,
                    clear_description,
                    category,
                    &output,
                )
                .await
            }
            BookmarkCommands::Delete { id } => {
                commands::bookmark::delete(&store, id, &output).await
            }
        },
        Commands::Category { command } => match command {
            CategoryCommands::Add { name, parent } => {
                commands::category::add(&store, name, parent, &output).await
            }
            CategoryCommands::Move { id, direction } => {
                commands::category::move_(&store, id, direction.into(), &output).await
            }
            CategoryCommands::Delete { id } => {
                commands::category::delete(&store, id, &output).await
            }
            CategoryCommands::Tree => commands::category::tree(&store, &output),
        },
        Commands::Select { category_id } => {
            commands::category::select(&store, category_id, &output).await
        }
        Commands::View { view, page } => {
            let state = store.set_current_view(view.into()).await?;
            if matches!(state.current_view, View::Settings) || page.is_some() {
                store
                    .set_current_settings_page(page.map(Into::into))
                    .await?;
            }
            output.success("View updated");
            Ok(())
        }
        Commands::Export { file } => commands::data::export(&store, file, &output).await,
        Commands::Import { file } => commands::data::import(&store, file, &output).await,
        Commands::Reset { yes } => commands::data::reset(&store, yes, &output).await,
        Commands::Status => unreachable!("handled above"),
    }
}
