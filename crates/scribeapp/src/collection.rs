//! The client's copy of the user's notes: one owned collection holding the
//! active list and the trash list. Every mutation goes through the session
//! transitions or the workspace facade, which borrow it mutably.
//!
//! The active list is kept sorted by `updated_at`, newest first. The trash
//! list is kept sorted by `trashed_at`, newest first.

use crate::model::{Note, NoteId, TrashedId, TrashedNote};

#[derive(Debug, Clone, Default)]
pub struct NoteCollection {
    active: Vec<Note>,
    trashed: Vec<TrashedNote>,
}

impl NoteCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notes(notes: Vec<Note>, trashed: Vec<TrashedNote>) -> Self {
        let mut collection = Self::new();
        collection.replace_active(notes);
        collection.replace_trashed(trashed);
        collection
    }

    pub fn active(&self) -> &[Note] {
        &self.active
    }

    pub fn trashed(&self) -> &[TrashedNote] {
        &self.trashed
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.active.iter().find(|n| n.id == id)
    }

    pub fn contains(&self, id: NoteId) -> bool {
        self.get(id).is_some()
    }

    pub fn get_trashed(&self, id: TrashedId) -> Option<&TrashedNote> {
        self.trashed.iter().find(|n| n.id == id)
    }

    pub fn replace_active(&mut self, notes: Vec<Note>) {
        self.active = notes;
        self.sort_active();
    }

    pub fn replace_trashed(&mut self, trashed: Vec<TrashedNote>) {
        self.trashed = trashed;
        self.trashed.sort_by(|a, b| b.trashed_at.cmp(&a.trashed_at));
    }

    /// Inserts the note, or replaces the entry with the same id, then re-sorts.
    pub fn upsert(&mut self, note: Note) {
        match self.active.iter_mut().find(|n| n.id == note.id) {
            Some(existing) => *existing = note,
            None => self.active.push(note),
        }
        self.sort_active();
    }

    pub fn remove(&mut self, id: NoteId) -> Option<Note> {
        let pos = self.active.iter().position(|n| n.id == id)?;
        Some(self.active.remove(pos))
    }

    pub fn remove_trashed(&mut self, id: TrashedId) -> Option<TrashedNote> {
        let pos = self.trashed.iter().position(|n| n.id == id)?;
        Some(self.trashed.remove(pos))
    }

    fn sort_active(&mut self) {
        self.active.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    }
}
