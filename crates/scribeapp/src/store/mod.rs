//! # Storage Layer
//!
//! This module defines the client's view of the notes service. The
//! [`NoteStore`] trait is the only way the session and the workspace reach
//! persisted state, which lets the same logic run against the real service or
//! an in-memory stand-in.
//!
//! ## Operations
//!
//! | Method | Service route | Failure kinds |
//! |--------|---------------|---------------|
//! | `create` | `POST /notes` | Validation, Auth, Transport |
//! | `update` | `PUT /notes/{id}` | Validation, Auth, NotFound, Transport |
//! | `soft_delete` | `DELETE /notes/{id}` | Auth, NotFound, Transport |
//! | `list_active` | `GET /notes` | Auth, Transport |
//! | `list_trashed` | `GET /trashed-notes` | Auth, Transport |
//! | `restore` | `POST /trashed-notes/{id}/restore` | Auth, NotFound, Transport |
//! | `hard_delete` | `DELETE /trashed-notes/{id}` | Auth, NotFound, Transport |
//!
//! The service trims and validates titles and content: both must be
//! non-empty after trimming. Every successful write moves `updated_at`
//! forward.
//!
//! ## Implementations
//!
//! - [`http::HttpNoteStore`]: Blocking JSON client for the notes service.
//! - [`memory::InMemoryStore`]: Same semantics in memory, with a call log and
//!   failure injection for tests.

use crate::error::Result;
use crate::model::{Note, NoteId, TrashedId, TrashedNote};

pub mod http;
pub mod memory;

/// Abstract interface to the notes service.
///
/// Implementations own transport concerns such as timeouts; callers treat
/// every transport failure the same way.
pub trait NoteStore {
    fn create(&mut self, title: &str, content: &str) -> Result<Note>;

    fn update(&mut self, id: NoteId, title: &str, content: &str) -> Result<Note>;

    /// Move an active note into the trash bucket.
    fn soft_delete(&mut self, id: NoteId) -> Result<()>;

    fn list_active(&self) -> Result<Vec<Note>>;

    fn list_trashed(&self) -> Result<Vec<TrashedNote>>;

    /// Re-create a trashed note as an active one. The returned note has a new id.
    fn restore(&mut self, id: TrashedId) -> Result<Note>;

    /// Remove a trashed note for good.
    fn hard_delete(&mut self, id: TrashedId) -> Result<()>;
}
