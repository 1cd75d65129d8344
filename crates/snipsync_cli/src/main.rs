//! Snipsync CLI
//!
//! Command-line surface over the snippet store and sync engine.
//!
//! # Commands
//!
//! - `add` / `list` - capture and browse snippets
//! - `rm` / `restore` / `purge` / `empty-trash` / `sweep` - lifecycle
//! - `backend` - select and configure the sync backend
//! - `sync` - run one sync cycle against the configured backend
//! - `status` - show backend, last sync time, and record counts

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Snipsync command-line snippet manager.
#[derive(Parser)]
#[command(name = "snipsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the store directory
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture a new snippet
    Add {
        /// Snippet text (clamped to 144 characters)
        text: String,

        /// Source URL for the snippet
        #[arg(long)]
        url: Option<String>,

        /// Record it as a web clip instead of a note
        #[arg(long)]
        web: bool,
    },

    /// List snippets
    List {
        /// List the trash instead of active snippets
        #[arg(long)]
        trash: bool,

        /// Filter by a case-insensitive search term
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Move a snippet to the trash
    Rm {
        /// Snippet id
        id: String,
    },

    /// Restore a snippet from the trash
    Restore {
        /// Snippet id
        id: String,
    },

    /// Schedule a snippet for permanent removal
    Purge {
        /// Snippet id
        id: String,
    },

    /// Purge everything currently in the trash
    EmptyTrash,

    /// Hard-delete purged snippets past the retention window
    Sweep,

    /// Select the sync backend
    Backend {
        #[command(subcommand)]
        backend: commands::backend::BackendCommand,
    },

    /// Run one sync cycle against the configured backend
    Sync,

    /// Show backend, last sync time, and record counts
    Status,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let path = cli.path.ok_or("Store path required (--path)")?;
    let store = commands::open_store(&path)?;

    match cli.command {
        Commands::Add { text, url, web } => commands::add::run(&store, &text, url, web)?,
        Commands::List { trash, search } => commands::list::run(&store, trash, search)?,
        Commands::Rm { id } => commands::trash::rm(&store, &id)?,
        Commands::Restore { id } => commands::trash::restore(&store, &id)?,
        Commands::Purge { id } => commands::trash::purge(&store, &id)?,
        Commands::EmptyTrash => commands::trash::empty(&store)?,
        Commands::Sweep => commands::trash::sweep(&store)?,
        Commands::Backend { backend } => commands::backend::run(&store, backend)?,
        Commands::Sync => commands::sync::run(&store)?,
        Commands::Status => commands::status::run(&store)?,
    }

    Ok(())
}
