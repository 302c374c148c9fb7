//! # Scribe Architecture
//!
//! Scribe is a **UI-agnostic note editing library** for a pair of small REST
//! services (users and notes). The terminal client in the `scribe` crate is
//! one host of it; a GUI or web host would drive the same types.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Host (the `scribe` binary, or any other UI)                │
//! │  - Owns the terminal / widget, the clock and the event loop │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Workspace facade (workspace.rs)                            │
//! │  - Navigation, autosave ticks, trash lifecycle, notices     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Session state machine (session/)                           │
//! │  - Draft, auto titles, empty-content rule, commit ordering  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage layer (store/)                                     │
//! │  - NoteStore trait                                          │
//! │  - HttpNoteStore (production), InMemoryStore (testing)      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! Nothing below the host writes to stdout. Session transitions never read
//! the clock; they take an `Instant` argument. The editor is reached only through
//! [`editor::EditorAdapter`]. Network I/O is confined to `store::http` and
//! `auth`.
//!
//! ## Module Overview
//!
//! - [`workspace`]: The facade hosts drive
//! - [`session`]: Editing session and its transitions
//! - [`store`]: Notes service client trait and implementations
//! - [`auth`]: Users service client and token file
//! - [`collection`]: Local copy of the active and trashed lists
//! - [`filter`]: Search and list ordering
//! - [`markup`]: Plain text, titles and previews from editor markup
//! - [`editor`]: Editor adapter trait and an in-memory editor
//! - [`debounce`]: Autosave quiet period
//! - [`model`]: Wire types
//! - [`config`]: Configuration and paths
//! - [`error`]: Error types

pub mod auth;
pub mod collection;
pub mod config;
pub mod debounce;
pub mod editor;
pub mod error;
pub mod filter;
pub mod markup;
pub mod model;
pub mod session;
pub mod store;
pub mod workspace;
