//! SweetSpin command line
//!
//! Usage:
//!   sweet-spin register NAME -p PASS     - Create an account and log in
//!   sweet-spin play [--trace FILE]       - Spin both wheels once
//!   sweet-spin history list              - Past results, newest first
//!   sweet-spin category list             - Categories and their items
//!
//! Global flags `--data-dir`, `--timing` and `--seed` override `config.json`.

mod app;
mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sw_journal::{FileStore, SharedStore};
use sw_wheel::TimingProfile;

use crate::app::App;
use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "sweet-spin", about = "Two-wheel task picker", version)]
struct Cli {
    /// Where accounts, catalogs and history are kept
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Spin pacing: normal, turbo or studio
    #[arg(long, global = true, value_parser = parse_timing)]
    timing: Option<TimingProfile>,

    /// Fixed RNG seed for reproducible rounds
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and log in
    Register {
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Log in to an existing account
    Login {
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Log out
    Logout,
    /// Show the logged-in player
    Whoami,
    /// Spin the category wheel, then the item wheel
    Play {
        /// Write the round's stage events to this file as JSON
        #[arg(long)]
        trace: Option<PathBuf>,
    },
    /// Past results
    History {
        #[command(subcommand)]
        action: HistoryCommand,
    },
    /// Edit categories
    Category {
        #[command(subcommand)]
        action: CategoryCommand,
    },
    /// Edit items of a category
    Item {
        #[command(subcommand)]
        action: ItemCommand,
    },
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// List results, newest first
    List,
    /// Show one result
    Show {
        id: String,
        /// Write the result card to this file
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Delete one result
    Delete { id: String },
}

#[derive(Subcommand)]
enum CategoryCommand {
    /// List categories with numbered items
    List,
    /// Add an empty category
    Add { name: String },
    /// Remove a category and its items
    Remove { name: String },
}

#[derive(Subcommand)]
enum ItemCommand {
    /// Append an item to a category
    Add { category: String, item: String },
    /// Remove an item by its number in `category list`
    Remove { category: String, index: usize },
}

fn parse_timing(name: &str) -> Result<TimingProfile, String> {
    TimingProfile::from_name(name).ok_or_else(|| format!("unknown timing profile: {}", name))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let data_dir = cli.data_dir.unwrap_or_else(FileStore::default_root);
    let mut config = AppConfig::load_from(AppConfig::path_in(&data_dir));
    if let Some(profile) = cli.timing {
        config.wheel = config.wheel.with_timing(profile);
    }
    if let Some(seed) = cli.seed {
        config.wheel = config.wheel.with_seed(seed);
    }

    let store: SharedStore = Arc::new(
        FileStore::open(&data_dir)
            .with_context(|| format!("opening data directory {}", data_dir.display()))?,
    );
    log::debug!("[Cli] Data directory: {}", data_dir.display());
    let app = App::new(store, config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("starting runtime")?;
    let mut stdout = std::io::stdout().lock();
    let out = &mut stdout;

    match cli.command {
        Commands::Register { username, password } => app.register(&username, &password, out),
        Commands::Login { username, password } => app.login(&username, &password, out),
        Commands::Logout => app.logout(out),
        Commands::Whoami => app.whoami(out),
        Commands::Play { trace } => runtime
            .block_on(app.play(trace.as_deref(), out))
            .map(|_| ()),
        Commands::History { action } => match action {
            HistoryCommand::List => app.history_list(out),
            HistoryCommand::Show { id, out: card } => app.history_show(&id, card.as_deref(), out),
            HistoryCommand::Delete { id } => app.history_delete(&id, out),
        },
        Commands::Category { action } => match action {
            CategoryCommand::List => app.category_list(out),
            CategoryCommand::Add { name } => app.category_add(&name, out),
            CategoryCommand::Remove { name } => app.category_remove(&name, out),
        },
        Commands::Item { action } => match action {
            ItemCommand::Add { category, item } => app.item_add(&category, &item, out),
            ItemCommand::Remove { category, index } => app.item_remove(&category, index, out),
        },
    }
}
