use super::NoteStore;
use crate::error::{Result, ScribeError};
use crate::model::{Note, NoteId, TrashedId, TrashedNote};
use chrono::{DateTime, Duration, Utc};
use std::cell::RefCell;

/// One request as the service would have received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Create {
        title: String,
        content: String,
    },
    Update {
        id: NoteId,
        title: String,
        content: String,
    },
    SoftDelete(NoteId),
    ListActive,
    ListTrashed,
    Restore(TrashedId),
    HardDelete(TrashedId),
}

impl StoreCall {
    pub fn is_write(&self) -> bool {
        !matches!(self, StoreCall::ListActive | StoreCall::ListTrashed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatedFailure {
    Transport,
    Auth,
}

/// In-memory notes service for tests and offline use.
///
/// Follows the service's rules: titles and content are trimmed and must not
/// be empty, rows are scoped to one owner, trashing keeps the original
/// `updated_at`, and restoring assigns a new id.
///
/// Uses `RefCell` for the call log so read methods can stay `&self`, the same
/// as the trait.
pub struct InMemoryStore {
    owner_id: i64,
    notes: Vec<Note>,
    trashed: Vec<TrashedNote>,
    next_note_id: i64,
    next_trashed_id: i64,
    last_write: Option<DateTime<Utc>>,
    calls: RefCell<Vec<StoreCall>>,
    simulate_failure: RefCell<Option<SimulatedFailure>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_owner(1)
    }

    pub fn with_owner(owner_id: i64) -> Self {
        Self {
            owner_id,
            notes: Vec::new(),
            trashed: Vec::new(),
            next_note_id: 1,
            next_trashed_id: 1,
            last_write: None,
            calls: RefCell::new(Vec::new()),
            simulate_failure: RefCell::new(None),
        }
    }

    /// Make every following call fail with the given kind until cleared.
    /// Failed calls are still recorded in the call log.
    pub fn set_simulate_failure(&self, failure: Option<SimulatedFailure>) {
        *self.simulate_failure.borrow_mut() = failure;
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.borrow().clone()
    }

    /// Calls that would have changed server state.
    pub fn write_calls(&self) -> Vec<StoreCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.is_write())
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Server-side active notes, bypassing the call log.
    pub fn stored_notes(&self) -> &[Note] {
        &self.notes
    }

    /// Server-side trash, bypassing the call log.
    pub fn stored_trash(&self) -> &[TrashedNote] {
        &self.trashed
    }

    fn record(&self, call: StoreCall) -> Result<()> {
        self.calls.borrow_mut().push(call);
        match *self.simulate_failure.borrow() {
            Some(SimulatedFailure::Transport) => Err(ScribeError::Transport(
                "Simulated transport failure".to_string(),
            )),
            Some(SimulatedFailure::Auth) => {
                Err(ScribeError::Auth("Simulated expired token".to_string()))
            }
            None => Ok(()),
        }
    }

    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_write {
            Some(last) if now <= last => last + Duration::milliseconds(1),
            _ => now,
        };
        self.last_write = Some(ts);
        ts
    }

    fn note_position(&self, id: NoteId) -> Result<usize> {
        self.notes
            .iter()
            .position(|n| n.id == id && n.owner_id == self.owner_id)
            .ok_or_else(|| ScribeError::NotFound(format!("Note {} not found or not owned by user", id)))
    }

    fn trashed_position(&self, id: TrashedId) -> Result<usize> {
        self.trashed
            .iter()
            .position(|n| n.id == id && n.owner_id == self.owner_id)
            .ok_or_else(|| {
                ScribeError::NotFound(format!(
                    "Trashed note {} not found or not owned by user",
                    id
                ))
            })
    }
}

fn validate(title: &str, content: &str) -> Result<(String, String)> {
    let title = title.trim();
    let content = content.trim();
    if title.is_empty() {
        return Err(ScribeError::Validation("Title must not be empty".to_string()));
    }
    if content.is_empty() {
        return Err(ScribeError::Validation(
            "Content must not be empty".to_string(),
        ));
    }
    Ok((title.to_string(), content.to_string()))
}

impl NoteStore for InMemoryStore {
    fn create(&mut self, title: &str, content: &str) -> Result<Note> {
        self.record(StoreCall::Create {
            title: title.to_string(),
            content: content.to_string(),
        })?;
        let (title, content) = validate(title, content)?;
        let note = Note {
            id: NoteId(self.next_note_id),
            owner_id: self.owner_id,
            title,
            content,
            updated_at: self.next_timestamp(),
        };
        self.next_note_id += 1;
        self.notes.push(note.clone());
        Ok(note)
    }

    fn update(&mut self, id: NoteId, title: &str, content: &str) -> Result<Note> {
        self.record(StoreCall::Update {
            id,
            title: title.to_string(),
            content: content.to_string(),
        })?;
        let (title, content) = validate(title, content)?;
        let pos = self.note_position(id)?;
        let updated_at = self.next_timestamp();
        let note = &mut self.notes[pos];
        note.title = title;
        note.content = content;
        note.updated_at = updated_at;
        Ok(note.clone())
    }

    fn soft_delete(&mut self, id: NoteId) -> Result<()> {
        self.record(StoreCall::SoftDelete(id))?;
        let pos = self.note_position(id)?;
        let trashed_at = self.next_timestamp();
        let note = self.notes.remove(pos);
        self.trashed.push(TrashedNote {
            id: TrashedId(self.next_trashed_id),
            note_id: Some(note.id),
            owner_id: note.owner_id,
            title: note.title,
            content: note.content,
            trashed_at,
            original_updated_at: Some(note.updated_at),
        });
        self.next_trashed_id += 1;
        Ok(())
    }

    fn list_active(&self) -> Result<Vec<Note>> {
        self.record(StoreCall::ListActive)?;
        let mut notes: Vec<Note> = self
            .notes
            .iter()
            .filter(|n| n.owner_id == self.owner_id)
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(notes)
    }

    fn list_trashed(&self) -> Result<Vec<TrashedNote>> {
        self.record(StoreCall::ListTrashed)?;
        let mut trashed: Vec<TrashedNote> = self
            .trashed
            .iter()
            .filter(|n| n.owner_id == self.owner_id)
            .cloned()
            .collect();
        trashed.sort_by(|a, b| b.trashed_at.cmp(&a.trashed_at));
        Ok(trashed)
    }

    fn restore(&mut self, id: TrashedId) -> Result<Note> {
        self.record(StoreCall::Restore(id))?;
        let pos = self.trashed_position(id)?;
        let trashed = self.trashed.remove(pos);
        let updated_at = match trashed.original_updated_at {
            Some(ts) => ts,
            None => self.next_timestamp(),
        };
        let note = Note {
            id: NoteId(self.next_note_id),
            owner_id: trashed.owner_id,
            title: trashed.title,
            content: trashed.content,
            updated_at,
        };
        self.next_note_id += 1;
        self.notes.push(note.clone());
        Ok(note)
    }

    fn hard_delete(&mut self, id: TrashedId) -> Result<()> {
        self.record(StoreCall::HardDelete(id))?;
        let pos = self.trashed_position(id)?;
        self.trashed.remove(pos);
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_notes(mut self, count: usize) -> Self {
            for i in 0..count {
                let title = format!("Test Note {}", i + 1);
                let content = format!("<p>Content for note {}</p>", i + 1);
                self.store.create(&title, &content).unwrap();
            }
            self
        }

        pub fn with_note(mut self, title: &str, content: &str) -> Self {
            self.store.create(title, content).unwrap();
            self
        }

        pub fn with_trashed_note(mut self, title: &str, content: &str) -> Self {
            let note = self.store.create(title, content).unwrap();
            self.store.soft_delete(note.id).unwrap();
            self
        }

        /// Finish seeding; the call log starts empty.
        pub fn build(self) -> InMemoryStore {
            self.store.clear_calls();
            self.store
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StoreFixture;
    use super::*;

    #[test]
    fn create_trims_and_validates() {
        let mut store = InMemoryStore::new();
        let note = store.create("  Title ", " <p>Body</p> ").unwrap();
        assert_eq!(note.title, "Title");
        assert_eq!(note.content, "<p>Body</p>");

        match store.create("   ", "<p>x</p>") {
            Err(ScribeError::Validation(msg)) => assert!(msg.contains("Title")),
            other => panic!("Expected Validation, got {other:?}"),
        }
        match store.create("t", "") {
            Err(ScribeError::Validation(msg)) => assert!(msg.contains("Content")),
            other => panic!("Expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn update_moves_updated_at_forward() {
        let mut store = InMemoryStore::new();
        let first = store.create("A", "<p>a</p>").unwrap();
        let second = store.update(first.id, "A", "<p>b</p>").unwrap();
        let third = store.update(first.id, "A", "<p>c</p>").unwrap();
        assert!(second.updated_at > first.updated_at);
        assert!(third.updated_at > second.updated_at);
        assert_eq!(store.stored_notes().len(), 1);
    }

    #[test]
    fn update_unknown_note_is_not_found() {
        let mut store = InMemoryStore::new();
        assert!(matches!(
            store.update(NoteId(42), "t", "c"),
            Err(ScribeError::NotFound(_))
        ));
    }

    #[test]
    fn soft_delete_moves_note_to_trash() {
        let mut store = StoreFixture::new().with_note("Keep", "<p>k</p>").build();
        let note = store.list_active().unwrap().remove(0);

        store.soft_delete(note.id).unwrap();

        assert!(store.list_active().unwrap().is_empty());
        let trash = store.list_trashed().unwrap();
        assert_eq!(trash.len(), 1);
        assert_eq!(trash[0].note_id, Some(note.id));
        assert_eq!(trash[0].original_updated_at, Some(note.updated_at));
        assert!(matches!(
            store.soft_delete(note.id),
            Err(ScribeError::NotFound(_))
        ));
    }

    #[test]
    fn restore_assigns_new_id_and_keeps_timestamp() {
        let mut store = StoreFixture::new().with_trashed_note("Old", "<p>o</p>").build();
        let trashed = store.list_trashed().unwrap().remove(0);

        let restored = store.restore(trashed.id).unwrap();

        assert_ne!(Some(restored.id), trashed.note_id);
        assert_eq!(Some(restored.updated_at), trashed.original_updated_at);
        assert!(store.list_trashed().unwrap().is_empty());
        assert_eq!(store.list_active().unwrap().len(), 1);
    }

    #[test]
    fn hard_delete_removes_for_good() {
        let mut store = StoreFixture::new().with_trashed_note("Gone", "<p>g</p>").build();
        let trashed = store.list_trashed().unwrap().remove(0);
        store.hard_delete(trashed.id).unwrap();
        assert!(store.stored_trash().is_empty());
        assert!(matches!(
            store.hard_delete(trashed.id),
            Err(ScribeError::NotFound(_))
        ));
    }

    #[test]
    fn other_owners_rows_are_invisible() {
        let mut theirs = InMemoryStore::with_owner(2);
        let note = theirs.create("Private", "<p>p</p>").unwrap();
        theirs.owner_id = 1;
        assert!(theirs.list_active().unwrap().is_empty());
        assert!(matches!(
            theirs.update(note.id, "x", "y"),
            Err(ScribeError::NotFound(_))
        ));
    }

    #[test]
    fn simulated_failure_is_logged_and_returned() {
        let mut store = InMemoryStore::new();
        store.set_simulate_failure(Some(SimulatedFailure::Transport));
        assert!(matches!(
            store.create("t", "c"),
            Err(ScribeError::Transport(_))
        ));
        assert_eq!(store.write_calls().len(), 1);
        assert!(store.stored_notes().is_empty());

        store.set_simulate_failure(Some(SimulatedFailure::Auth));
        assert!(matches!(store.list_active(), Err(ScribeError::Auth(_))));

        store.set_simulate_failure(None);
        assert!(store.create("t", "c").is_ok());
    }

    #[test]
    fn fixture_build_starts_with_empty_log() {
        let store = StoreFixture::default().with_notes(3).build();
        assert!(store.calls().is_empty());
        assert_eq!(store.stored_notes().len(), 3);
    }
}
