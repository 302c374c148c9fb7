use super::commit::{CommitOutcome, CommitPlan, CommitTarget, CommitTicket};
use super::{EditingSession, SessionState};
use crate::collection::NoteCollection;
use crate::debounce::Debouncer;
use crate::editor::EditorAdapter;
use crate::error::Result;
use crate::markup::{derive_title, is_blank};
use crate::model::{Note, NoteDraft, NoteId};
use crate::store::NoteStore;
use std::collections::BTreeSet;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Drives an [`EditingSession`].
///
/// The collection is not owned here: transitions that change the note list
/// borrow it. Time is passed in by the caller so the debounce is testable
/// without sleeping.
#[derive(Debug, Clone)]
pub struct SessionMachine {
    session: EditingSession,
    generation: u64,
    next_seq: u64,
    in_flight: Option<u64>,
    rerun_requested: bool,
    debounce: Debouncer,
    /// Notes this session removed from the list for good. Late responses
    /// for them are not put back.
    retired: BTreeSet<NoteId>,
}

impl Default for SessionMachine {
    fn default() -> Self {
        Self::new(Debouncer::default().quiet_period())
    }
}

impl SessionMachine {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            session: EditingSession::new(),
            generation: 0,
            next_seq: 0,
            in_flight: None,
            rerun_requested: false,
            debounce: Debouncer::new(quiet_period),
            retired: BTreeSet::new(),
        }
    }

    pub fn session(&self) -> &EditingSession {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn selected(&self) -> Option<NoteId> {
        self.session.selected_note_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn rerun_requested(&self) -> bool {
        self.rerun_requested
    }

    pub fn autosave_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    /// Load `note` into the editor. Returns false when it is already selected.
    pub fn select_note<E: EditorAdapter>(&mut self, note: &Note, editor: &mut E) -> bool {
        if self.session.selected_note_id == Some(note.id) {
            return false;
        }
        debug!(id = %note.id, "selecting note");
        self.session = EditingSession::from_note(note);
        self.new_generation();
        editor.set_content(&note.content, false);
        editor.focus();
        true
    }

    pub fn start_new<E: EditorAdapter>(&mut self, editor: &mut E) {
        debug!("starting new draft");
        self.session = EditingSession::new();
        self.new_generation();
        editor.set_content("", false);
        editor.focus();
    }

    fn new_generation(&mut self) {
        self.generation += 1;
        // The old context's request may still complete; it is stale now and
        // must not hold back saves for the new one.
        self.in_flight = None;
        self.rerun_requested = false;
        self.debounce.cancel();
    }

    pub fn on_editor_change(&mut self, markup: &str, notes: &mut NoteCollection, now: Instant) {
        self.session.draft_content = markup.to_string();

        if is_blank(markup) {
            let holding = self.session.pending_trash.is_some();
            if let (Some(id), false) = (self.session.selected_note_id, holding) {
                match notes.remove(id) {
                    Some(note) => {
                        debug!(%id, "content emptied, holding note for trash");
                        self.session.pending_trash = Some(note);
                    }
                    None => warn!(%id, "emptied note was not in the list"),
                }
                self.session.selected_note_id = None;
                self.session.original_content.clear();
                self.session.original_title.clear();
            }
        } else if let Some(note) = self.session.pending_trash.take() {
            debug!(id = %note.id, "text typed again, releasing held note");
        }

        if !self.session.title_is_manual {
            self.session.draft_title = derive_title(markup);
        }
        self.debounce.touch(now);
    }

    pub fn on_title_edited(&mut self, title: &str, now: Instant) {
        self.session.draft_title = title.to_string();
        self.session.title_is_manual = true;
        self.debounce.touch(now);
    }

    /// Decide what the next save should do. Sending marks a request in
    /// flight; the host must pass the result to [`Self::complete_commit`].
    pub fn begin_commit(&mut self) -> CommitPlan {
        if self.in_flight.is_some() {
            debug!("save requested while one is in flight, queueing");
            self.rerun_requested = true;
            return CommitPlan::Queued;
        }
        self.rerun_requested = false;
        self.debounce.cancel();

        if self.session.is_blank() {
            if let Some(note) = self.session.pending_trash.take() {
                debug!(id = %note.id, "discarding emptied note");
                self.retired.insert(note.id);
                self.session = EditingSession::new();
                return CommitPlan::Discard(note);
            }
            return CommitPlan::Nothing;
        }

        let target = match self.session.selected_note_id {
            None => CommitTarget::Create,
            Some(id) if self.session.is_dirty() => CommitTarget::Update(id),
            Some(_) => return CommitPlan::Nothing,
        };

        let seq = self.next_seq;
        self.next_seq += 1;
        self.in_flight = Some(seq);
        CommitPlan::Send(CommitTicket {
            seq,
            generation: self.generation,
            target,
            payload: NoteDraft::new(
                self.session.title_for_save(),
                self.session.draft_content.clone(),
            ),
        })
    }

    /// Apply a store response to the session and the collection.
    pub fn complete_commit(
        &mut self,
        ticket: CommitTicket,
        result: Result<Note>,
        notes: &mut NoteCollection,
    ) -> Result<CommitOutcome> {
        if self.in_flight == Some(ticket.seq) {
            self.in_flight = None;
        }

        if ticket.generation != self.generation {
            let note = match result {
                Ok(note) => note,
                Err(err) => {
                    warn!(error = %err, "stale save failed");
                    return Err(err);
                }
            };
            warn!(id = %note.id, "stale save response, leaving draft alone");
            if !self.is_held(note.id) {
                notes.upsert(note.clone());
            }
            return Ok(CommitOutcome::Stale(note));
        }

        let note = match result {
            Ok(note) => note,
            Err(err) => {
                warn!(error = %err, "save failed, draft kept");
                return Err(err);
            }
        };

        match ticket.target {
            CommitTarget::Create => {
                if self.session.is_blank() {
                    debug!(id = %note.id, "created note was emptied meanwhile");
                    self.session.pending_trash = Some(note.clone());
                } else {
                    debug!(id = %note.id, "note created");
                    self.session.selected_note_id = Some(note.id);
                    self.session.original_content = ticket.payload.content;
                    self.session.original_title = ticket.payload.title;
                    notes.upsert(note.clone());
                }
                Ok(CommitOutcome::Created(note))
            }
            CommitTarget::Update(id) => {
                if self.session.selected_note_id == Some(id) {
                    debug!(%id, "note updated");
                    self.session.original_content = ticket.payload.content;
                    self.session.original_title = ticket.payload.title;
                    notes.upsert(note.clone());
                } else if self.session.pending_trash.as_ref().map(|n| n.id) == Some(id) {
                    self.session.pending_trash = Some(note.clone());
                } else if !self.retired.contains(&id) {
                    notes.upsert(note.clone());
                }
                Ok(CommitOutcome::Updated(note))
            }
        }
    }

    fn is_held(&self, id: NoteId) -> bool {
        self.retired.contains(&id) || self.session.pending_trash.as_ref().map(|n| n.id) == Some(id)
    }

    /// Run a save to completion against `store`.
    pub fn commit<S: NoteStore>(
        &mut self,
        store: &mut S,
        notes: &mut NoteCollection,
    ) -> Result<CommitOutcome> {
        let ticket = match self.begin_commit() {
            CommitPlan::Nothing => return Ok(CommitOutcome::Unchanged),
            CommitPlan::Queued => return Ok(CommitOutcome::Queued),
            CommitPlan::Discard(note) => return Ok(CommitOutcome::Discarded(note)),
            CommitPlan::Send(ticket) => ticket,
        };
        let result = match ticket.target {
            CommitTarget::Create => store.create(&ticket.payload.title, &ticket.payload.content),
            CommitTarget::Update(id) => {
                store.update(id, &ticket.payload.title, &ticket.payload.content)
            }
        };
        self.complete_commit(ticket, result, notes)
    }

    /// Commit if the autosave deadline passed or a queued save is due.
    pub fn poll<S: NoteStore>(
        &mut self,
        now: Instant,
        store: &mut S,
        notes: &mut NoteCollection,
    ) -> Option<Result<CommitOutcome>> {
        let due = self.debounce.fire(now) || (self.rerun_requested && self.in_flight.is_none());
        if due {
            Some(self.commit(store, notes))
        } else {
            None
        }
    }

    /// Explicit delete of the selected note or any listed one.
    pub fn delete_note<S: NoteStore, E: EditorAdapter>(
        &mut self,
        id: NoteId,
        store: &mut S,
        notes: &mut NoteCollection,
        editor: &mut E,
    ) -> Result<()> {
        if let Err(err) = store.soft_delete(id) {
            warn!(%id, error = %err, "delete failed, resynchronizing");
            if let Err(sync_err) = self.resync(store, notes) {
                if sync_err.is_auth() {
                    return Err(sync_err);
                }
                warn!(error = %sync_err, "resync failed");
            }
            return Err(err);
        }
        notes.remove(id);
        self.retired.insert(id);
        if self.session.selected_note_id == Some(id) {
            self.start_new(editor);
        }
        if self.session.pending_trash.as_ref().map(|n| n.id) == Some(id) {
            self.session.pending_trash = None;
        }
        notes.replace_trashed(store.list_trashed()?);
        Ok(())
    }

    /// Reload both lists from the store. Held and retired notes stay out of
    /// the active list; retired ids the store no longer lists are forgotten.
    pub fn resync<S: NoteStore>(&mut self, store: &S, notes: &mut NoteCollection) -> Result<()> {
        let listed = store.list_active()?;
        let trashed = store.list_trashed()?;
        self.retired
            .retain(|id| listed.iter().any(|note| note.id == *id));
        let active = listed
            .into_iter()
            .filter(|note| !self.is_held(note.id))
            .collect();
        notes.replace_active(active);
        notes.replace_trashed(trashed);
        Ok(())
    }

    pub fn retired_count(&self) -> usize {
        self.retired.len()
    }

    /// Hand the held note to the caller, which will move it to the trash.
    pub fn take_pending_trash(&mut self) -> Option<Note> {
        let note = self.session.pending_trash.take()?;
        self.retired.insert(note.id);
        Some(note)
    }
}
