//! # CLI Layer
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr, prompts)
//! - Installs the logging subscriber
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: shell arguments into typed commands via clap
//! 2. **Context Setup**: paths, configuration, and the stored token
//! 3. **Dispatch**: route commands to `handlers`
//! 4. **Error Handling**: attach hints (such as "log in again") to errors

use super::handlers;
use super::setup::{Cli, Commands};
use anyhow::{anyhow, Result};
use clap::Parser;
use scribeapp::auth::load_token;
use scribeapp::config::{ScribeConfig, ScribePaths};
use scribeapp::editor::BufferEditor;
use scribeapp::error::ScribeError;
use scribeapp::store::http::HttpNoteStore;
use scribeapp::workspace::Workspace;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_ENV: &str = "SCRIBE_LOG";

pub type HttpWorkspace = Workspace<HttpNoteStore, BufferEditor>;

/// Paths and configuration shared by every handler.
pub struct AppContext {
    pub paths: ScribePaths,
    pub config: ScribeConfig,
}

impl AppContext {
    /// A workspace connected to the notes service with the stored token,
    /// with both lists loaded.
    pub fn workspace(&self) -> Result<HttpWorkspace> {
        let token = load_token(&self.paths.token_file())?
            .ok_or_else(|| anyhow!("Not logged in. Run `scribe login <username>` first."))?;
        let store = HttpNoteStore::new(
            &self.config.notes_url,
            token,
            self.config.request_timeout(),
        )?;
        let mut workspace = Workspace::new(store, BufferEditor::new(), self.config.autosave());
        workspace.refresh().map_err(with_hint)?;
        Ok(workspace)
    }
}

/// Adds a remedy to errors the user can act on.
pub fn with_hint(err: ScribeError) -> anyhow::Error {
    if err.is_auth() {
        anyhow!("{}. Run `scribe login <username>` to sign in again.", err)
    } else {
        err.into()
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let paths = ScribePaths::resolve()?;
    let config = ScribeConfig::load(&paths.config_file())?;
    debug!(config_file = %paths.config_file().display(), "configuration loaded");
    let ctx = AppContext { paths, config };

    match cli.command.unwrap_or(Commands::List {
        search: None,
        peek: false,
    }) {
        Commands::Register { username } => handlers::register(&ctx, &username),
        Commands::Login { username } => handlers::login(&ctx, &username),
        Commands::Logout => handlers::logout(&ctx),
        Commands::List { search, peek } => handlers::list(&ctx, search, peek),
        Commands::View { index } => handlers::view(&ctx, index),
        Commands::Edit { index } => handlers::edit(&ctx, index),
        Commands::Delete { indexes } => handlers::delete(&ctx, &indexes),
        Commands::Trash => handlers::trash(&ctx),
        Commands::Restore { indexes } => handlers::restore(&ctx, &indexes),
        Commands::Purge { indexes, yes } => handlers::purge(&ctx, &indexes, yes),
        Commands::Config { action } => handlers::config(&ctx, action),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
