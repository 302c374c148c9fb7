//! # Editing Session
//!
//! The editing session reconciles what the editor shows with what the notes
//! service has stored. It is split into three parts:
//!
//! - [`EditingSession`]: the draft itself (selected note, draft content and
//!   title, the last persisted values, and a note held for the trash).
//! - [`machine::SessionMachine`]: the transitions. Every editor change,
//!   selection, debounce firing and store response goes through it.
//! - [`commit`]: the request/response types that let a host run the network
//!   call itself.
//!
//! ## States
//!
//! The state is derived from the session fields rather than stored:
//!
//! | State | Condition |
//! |-------|-----------|
//! | `Idle` | nothing selected, draft blank |
//! | `Composing` | nothing selected, draft has text |
//! | `Editing` | a note is selected and the draft differs from it |
//! | `Clean` | a note is selected and the draft matches it |
//! | `PendingTrash` | the draft was emptied and its note is held for the trash |
//!
//! ## Empty Content
//!
//! Emptying a selected note's content does not delete anything on the server.
//! The note leaves the active list and is held in `pending_trash`. Typing
//! again releases it (the typed text becomes a new note); the next commit
//! discards it; navigating away hands it to the host to move to the trash.

pub mod commit;
pub mod machine;

pub use commit::{CommitOutcome, CommitPlan, CommitTarget, CommitTicket};
pub use machine::SessionMachine;

use crate::markup::{derive_title, is_blank};
use crate::model::{Note, NoteId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Composing,
    Editing,
    Clean,
    PendingTrash,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditingSession {
    pub selected_note_id: Option<NoteId>,
    pub draft_content: String,
    pub draft_title: String,
    /// Content last persisted for the selected note.
    pub original_content: String,
    pub original_title: String,
    /// Set once the user types a title; stops auto titles until the next
    /// selection or new draft.
    pub title_is_manual: bool,
    pub pending_trash: Option<Note>,
}

impl EditingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_note(note: &Note) -> Self {
        Self {
            selected_note_id: Some(note.id),
            draft_content: note.content.clone(),
            draft_title: note.title.clone(),
            original_content: note.content.clone(),
            original_title: note.title.clone(),
            title_is_manual: false,
            pending_trash: None,
        }
    }

    pub fn is_blank(&self) -> bool {
        is_blank(&self.draft_content)
    }

    pub fn is_dirty(&self) -> bool {
        self.draft_content != self.original_content || self.title_for_save() != self.original_title
    }

    /// The title a save would send: the draft title, or one derived from the
    /// content when the draft title is blank.
    pub fn title_for_save(&self) -> String {
        let title = self.draft_title.trim();
        if title.is_empty() {
            derive_title(&self.draft_content)
        } else {
            title.to_string()
        }
    }

    pub fn state(&self) -> SessionState {
        if self.pending_trash.is_some() {
            return SessionState::PendingTrash;
        }
        match self.selected_note_id {
            Some(_) if self.is_dirty() => SessionState::Editing,
            Some(_) => SessionState::Clean,
            None if self.is_blank() => SessionState::Idle,
            None => SessionState::Composing,
        }
    }
}
