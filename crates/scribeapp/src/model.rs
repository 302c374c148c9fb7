//! # Domain Model: Notes and the Trash Bucket
//!
//! This module defines the server-side entities the client works with:
//! [`Note`] and [`TrashedNote`], plus the [`NoteDraft`] request body.
//!
//! ## Two Buckets
//!
//! The notes service keeps active notes and trashed notes in separate tables.
//! A logical note lives in exactly one of them at a time:
//!
//! ```text
//!   active ──soft_delete──▶ trashed ──hard_delete──▶ gone
//!     ▲                        │
//!     └───────restore──────────┘   (new id, original updated_at kept)
//! ```
//!
//! Restoring re-creates the note, so it comes back with a fresh [`NoteId`].
//! Its `updated_at` is the timestamp it had before deletion when the server
//! still knows it, which keeps it in its old position in the list.
//!
//! ## Wire Format
//!
//! Field names follow the service's row layout (`user_id`, `updated_at`,
//! `trashed_at`, `original_updated_at`). Timestamps are RFC 3339. Request
//! bodies only ever carry `title` and `content`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned identifier of an active note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub i64);

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a row in the trash bucket. Distinct from [`NoteId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrashedId(pub i64);

impl fmt::Display for TrashedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    #[serde(rename = "user_id")]
    pub owner_id: i64,
    pub title: String,
    /// Rich-text markup as produced by the editor.
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrashedNote {
    pub id: TrashedId,
    /// The id the note had while it was active.
    #[serde(default)]
    pub note_id: Option<NoteId>,
    #[serde(rename = "user_id")]
    pub owner_id: i64,
    pub title: String,
    pub content: String,
    pub trashed_at: DateTime<Utc>,
    #[serde(default)]
    pub original_updated_at: Option<DateTime<Utc>>,
}

/// Body of create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}
