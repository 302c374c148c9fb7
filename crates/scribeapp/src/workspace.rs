//! # Workspace Facade
//!
//! [`Workspace`] is the single entry point a UI drives. It owns the store,
//! the editor adapter, the note collection and the session machine, and wires
//! them together:
//!
//! - **Navigation**: `open_note` and `new_note` first flush a dirty draft, then
//!   move an abandoned emptied note to the trash, then switch context.
//! - **Autosave**: `editor_changed` / `rename` restart the quiet period,
//!   `tick` saves once it has elapsed.
//! - **Trash lifecycle**: `delete`, `restore`, `purge`.
//!
//! ## Failure Policy
//!
//! Store failures are sorted by kind:
//!
//! - `Auth` is returned to the caller, which must log in again.
//! - `NotFound` means the local lists are out of date: both are reloaded and a
//!   warning notice is queued.
//! - Anything else becomes an error notice. The draft is never touched, so
//!   the next save retries it.
//!
//! Notices are drained by the UI with [`Workspace::drain_notices`].
//!
//! ## Generic Over NoteStore
//!
//! `Workspace<S: NoteStore, E: EditorAdapter>` runs the same way against
//! `HttpNoteStore` in production and `InMemoryStore` in tests.

use crate::collection::NoteCollection;
use crate::editor::EditorAdapter;
use crate::error::{Result, ScribeError};
use crate::filter::{filter_notes, trash_view, NoteFilter};
use crate::model::{Note, NoteId, TrashedId, TrashedNote};
use crate::session::{CommitOutcome, EditingSession, SessionMachine, SessionState};
use crate::store::NoteStore;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub content: String,
}

impl Notice {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            content: content.into(),
        }
    }
}

pub struct Workspace<S: NoteStore, E: EditorAdapter> {
    store: S,
    editor: E,
    notes: NoteCollection,
    machine: SessionMachine,
    /// Notes emptied and discarded; moved to the trash on navigation.
    abandoned: Vec<Note>,
    notices: Vec<Notice>,
}

impl<S: NoteStore, E: EditorAdapter> Workspace<S, E> {
    pub fn new(store: S, editor: E, autosave: Duration) -> Self {
        Self {
            store,
            editor,
            notes: NoteCollection::new(),
            machine: SessionMachine::new(autosave),
            abandoned: Vec::new(),
            notices: Vec::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    /// Mutable editor access; call [`Self::editor_changed`] after editing.
    pub fn editor_mut(&mut self) -> &mut E {
        &mut self.editor
    }

    pub fn notes(&self) -> &NoteCollection {
        &self.notes
    }

    pub fn session(&self) -> &EditingSession {
        self.machine.session()
    }

    pub fn selected(&self) -> Option<NoteId> {
        self.machine.selected()
    }

    pub fn state(&self) -> SessionState {
        self.machine.state()
    }

    pub fn autosave_deadline(&self) -> Option<Instant> {
        self.machine.autosave_deadline()
    }

    pub fn refresh(&mut self) -> Result<()> {
        self.machine.resync(&self.store, &mut self.notes)
    }

    pub fn list(&self, filter: &NoteFilter) -> Vec<&Note> {
        filter_notes(self.notes.active(), filter)
    }

    pub fn trash(&self) -> Vec<&TrashedNote> {
        trash_view(self.notes.trashed())
    }

    /// Switch to note `id`. Returns false when the current draft could not
    /// be saved; it stays in the editor and a notice says why.
    pub fn open_note(&mut self, id: NoteId) -> Result<bool> {
        if self.machine.selected() == Some(id) {
            return Ok(true);
        }
        let missing = || ScribeError::NotFound(format!("Note {} is not in the list", id));
        if !self.notes.contains(id) {
            return Err(missing());
        }
        if !self.leave()? {
            return Ok(false);
        }
        let note = self.notes.get(id).cloned().ok_or_else(missing)?;
        self.machine.select_note(&note, &mut self.editor);
        Ok(true)
    }

    /// Start a blank draft. Returns false, keeping the current draft, when it
    /// could not be saved.
    pub fn new_note(&mut self) -> Result<bool> {
        if !self.leave()? {
            return Ok(false);
        }
        self.machine.start_new(&mut self.editor);
        Ok(true)
    }

    /// Report that the editor content changed.
    pub fn editor_changed(&mut self, now: Instant) {
        let content = self.editor.get_content();
        self.machine
            .on_editor_change(&content, &mut self.notes, now);
    }

    pub fn rename(&mut self, title: &str, now: Instant) {
        self.machine.on_title_edited(title, now);
    }

    /// Save if the autosave deadline has passed.
    pub fn tick(&mut self, now: Instant) -> Result<Option<CommitOutcome>> {
        match self.machine.poll(now, &mut self.store, &mut self.notes) {
            Some(result) => {
                let outcome = self.absorb(result)?;
                Ok(outcome.map(|o| self.note_outcome(o)))
            }
            None => Ok(None),
        }
    }

    /// Save now, regardless of the autosave deadline.
    pub fn save(&mut self) -> Result<Option<CommitOutcome>> {
        let result = self.machine.commit(&mut self.store, &mut self.notes);
        let outcome = self.absorb(result)?;
        Ok(outcome.map(|o| self.note_outcome(o)))
    }

    pub fn delete(&mut self, id: NoteId) -> Result<bool> {
        // A failed delete has already reloaded both lists.
        match self
            .machine
            .delete_note(id, &mut self.store, &mut self.notes, &mut self.editor)
        {
            Ok(()) => {
                self.notices.push(Notice::success("Note moved to trash"));
                Ok(true)
            }
            Err(err) if err.is_auth() => Err(err),
            Err(err) => {
                self.push_failure(&err);
                Ok(false)
            }
        }
    }

    pub fn restore(&mut self, id: TrashedId) -> Result<Option<Note>> {
        let result = self.store.restore(id);
        let Some(note) = self.absorb(result)? else {
            return Ok(None);
        };
        self.notes.remove_trashed(id);
        self.notes.upsert(note.clone());
        self.notices
            .push(Notice::success(format!("Restored \"{}\"", note.title)));
        Ok(Some(note))
    }

    pub fn purge(&mut self, id: TrashedId) -> Result<bool> {
        let result = self.store.hard_delete(id);
        let done = self.absorb(result)?.is_some();
        if done {
            self.notes.remove_trashed(id);
            self.notices.push(Notice::success("Note permanently deleted"));
        }
        Ok(done)
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Flush the draft and move abandoned notes to the trash. Returns false,
    /// leaving everything in place, when the draft is still unsaved.
    fn leave(&mut self) -> Result<bool> {
        let saved = self.save()?.is_some();
        if !saved || matches!(self.state(), SessionState::Composing | SessionState::Editing) {
            warn!("draft could not be saved, staying on it");
            self.notices
                .push(Notice::warning("Your draft is not saved yet, so it was kept open."));
            return Ok(false);
        }

        let mut abandoned = std::mem::take(&mut self.abandoned);
        abandoned.extend(self.machine.take_pending_trash());
        let mut trashed_any = false;
        for note in abandoned {
            debug!(id = %note.id, "moving abandoned note to trash");
            match self.store.soft_delete(note.id) {
                Ok(()) => trashed_any = true,
                Err(err) => {
                    // Gone already on NotFound; anything else is retried on
                    // the next navigation.
                    if !err.requires_resync() {
                        self.abandoned.push(note);
                    }
                    self.absorb::<()>(Err(err))?;
                }
            }
        }
        if trashed_any {
            let trashed = self.store.list_trashed();
            if let Some(trashed) = self.absorb(trashed)? {
                self.notes.replace_trashed(trashed);
            }
        }
        Ok(true)
    }

    fn note_outcome(&mut self, outcome: CommitOutcome) -> CommitOutcome {
        if let CommitOutcome::Discarded(note) = &outcome {
            self.abandoned.push(note.clone());
        }
        outcome
    }

    fn push_failure(&mut self, err: &ScribeError) {
        if err.requires_resync() {
            self.notices
                .push(Notice::warning(format!("{}. The list was reloaded.", err)));
        } else {
            self.notices.push(Notice::error(err.to_string()));
        }
    }

    /// Apply the failure policy. `Ok(None)` means the failure was reported
    /// as a notice.
    fn absorb<T>(&mut self, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_auth() => Err(err),
            Err(err) if err.requires_resync() => {
                warn!(error = %err, "store out of sync, reloading");
                if let Err(sync_err) = self.machine.resync(&self.store, &mut self.notes) {
                    if sync_err.is_auth() {
                        return Err(sync_err);
                    }
                    warn!(error = %sync_err, "reload failed");
                }
                self.push_failure(&err);
                Ok(None)
            }
            Err(err) => {
                self.push_failure(&err);
                Ok(None)
            }
        }
    }
}
