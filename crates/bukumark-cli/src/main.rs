//! bukumark CLI
//!
//! Command-line front end over a buku bookmark database.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::error;

use bukumark_core::{Config, Store, StoreError};

mod browser;
mod commands;
mod logging;
mod output;
mod prompt;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "bukumark")]
#[command(about = "bukumark - Manage buku bookmarks from the command line")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file to use instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Bookmark database to use instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all bookmarks (default)
    #[command(alias = "ls")]
    List {
        /// Filter by tag
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// Show bookmark details
    Show {
        /// Bookmark id
        id: u16,
    },
    /// Add a new bookmark
    Add {
        /// URL to save
        url: String,
        /// Title
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// Comment
        #[arg(short, long)]
        comment: Option<String>,
        /// Tags to add
        #[arg(short, long)]
        tag: Vec<String>,
    },
    /// Edit a bookmark (prompts when no field is given)
    Edit {
        /// Bookmark id
        id: u16,
        /// New title
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// New URL
        #[arg(short, long)]
        url: Option<String>,
        /// New comment
        #[arg(short, long)]
        comment: Option<String>,
    },
    /// Delete a bookmark (later ids shift down by one)
    #[command(alias = "rm")]
    Delete {
        /// Bookmark id
        id: u16,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Manage tags on a bookmark
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },
    /// List all tags with usage counts
    Tags,
    /// Open a bookmark in the browser
    Open {
        /// Bookmark id
        id: u16,
    },
    /// Print the number of bookmarks
    Count,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum TagCommands {
    /// Add tags to a bookmark
    Add {
        /// Bookmark id
        id: u16,
        /// Tags to add
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// Remove tags from a bookmark
    #[command(alias = "rm")]
    Remove {
        /// Bookmark id
        id: u16,
        /// Tags to remove (exact match)
        #[arg(required = true)]
        tags: Vec<String>,
    },
    /// Remove every tag from a bookmark
    Clear {
        /// Bookmark id
        id: u16,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (db_path, browser, workers, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the store (or a valid config to start from)
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let mut config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    logging::init(&config, cli.verbose);

    let result = run(cli.command, &config, &output);
    if let Err(ref e) = result {
        error!(error = %format!("{:#}", e), "Command failed");
        if let Some(hint) = e
            .downcast_ref::<StoreError>()
            .and_then(StoreError::recovery_suggestion)
        {
            eprintln!("hint: {}", hint);
        }
    }
    result
}

fn run(command: Option<Commands>, config: &Config, output: &Output) -> Result<()> {
    let store = open_store(config)?;

    match command.unwrap_or(Commands::List { tag: None }) {
        Commands::List { tag } => commands::bookmark::list(&store, tag, output),
        Commands::Show { id } => commands::bookmark::show(&store, id, output),
        Commands::Add {
            url,
            title,
            comment,
            tag,
        } => commands::bookmark::add(&store, url, title, comment, tag, output),
        Commands::Edit {
            id,
            title,
            url,
            comment,
        } => commands::bookmark::edit(&store, id, title, url, comment, output),
        Commands::Delete { id, yes } => commands::bookmark::remove(&store, id, yes, output),
        Commands::Tag { command } => handle_tag_command(command, &store, output),
        Commands::Tags => commands::tag::list(&store, output),
        Commands::Open { id } => {
            commands::bookmark::open(&store, id, config.browser.as_deref(), output)
        }
        Commands::Count => commands::bookmark::count(&store, output),
        Commands::Config { .. } => unreachable!(), // Handled in main
    }?;

    store.close().context("Failed to close bookmark database")
}

fn handle_tag_command(command: TagCommands, store: &Store, output: &Output) -> Result<()> {
    match command {
        TagCommands::Add { id, tags } => commands::tag::add(store, id, tags, output),
        TagCommands::Remove { id, tags } => commands::tag::remove(store, id, tags, output),
        TagCommands::Clear { id } => commands::tag::clear(store, id, output),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Open the configured bookmark database
fn open_store(config: &Config) -> Result<Store> {
    config.ensure_db_dir()?;
    Store::open_with_options(&config.db_path, config.store_options())
        .with_context(|| format!("Failed to open bookmark database {:?}", config.db_path))
}
