//! # CLI Behavior
//!
//! This is **one possible UI client** for scribe. It is the only place that
//! knows about terminal I/O, exit codes, and output formatting.
//!
//! ## Session
//!
//! `scribe login <username>` prompts for a password and stores the returned
//! token. Every note command reads that token; without it they fail with
//! "Not logged in". An expired token fails the same way, with a hint to log in
//! again.
//!
//! ## Indexes
//!
//! Notes are addressed by their position in `scribe list` (1 is the most
//! recently updated). Trashed notes are addressed by their position in
//! `scribe trash`.
//!
//! ## Editing
//!
//! `scribe edit [index]` opens an interactive session. Each plain line typed
//! is appended as a paragraph; lines starting with `:` are commands (`:help`
//! lists them). Changes are saved after the configured quiet period, and on
//! exit.
//!
//! ## Module Structure
//!
//! - `commands`: Entry point, logging and context setup, dispatch
//! - `handlers`: One function per subcommand
//! - `edit`: The interactive editing loop
//! - `render`: Output formatting
//! - `setup`: Argument parsing via clap
//! - `styles`: Terminal styling constants

mod commands;
mod edit;
mod handlers;
mod render;
pub mod setup;
mod styles;

pub use commands::run;
