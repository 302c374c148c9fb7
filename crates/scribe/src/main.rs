//! # Scribe CLI
//!
//! The binary is thin: the CLI lives in `src/cli/`, and this file only invokes
//! `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/scribeapp/`: UI-agnostic library (session machine, stores, auth)
//! - `crates/scribe/`: This terminal client
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/scribe/src/cli/)                         │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring + dispatch (commands.rs, handlers.rs)     │
//! │  - Interactive editing loop (edit.rs)                       │
//! │  - Terminal rendering (render.rs, styles.rs)                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Workspace facade (crates/scribeapp/src/workspace.rs)       │
//! │  - Navigation, autosave, trash lifecycle, notices           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The CLI is responsible for every user-facing concern: argument parsing,
//! logging setup, prompting, the event loop clock, and rendering. Everything
//! it shows comes from plain values returned by the library.
//!
//! ## Testing Approach
//!
//! - Rendering functions are pure and tested with canned notes.
//! - The edit loop's command handling is tested against `InMemoryStore`.
//! - `tests/cli_e2e.rs` runs the binary end to end for the paths that need no
//!   server (help, config, auth guards).

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
