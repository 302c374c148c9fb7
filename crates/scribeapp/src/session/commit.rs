use crate::model::{Note, NoteDraft, NoteId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitTarget {
    Create,
    Update(NoteId),
}

/// One outstanding save request.
///
/// `generation` is the session generation the request was issued for. A
/// response whose generation no longer matches is stale and never touches
/// the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitTicket {
    pub seq: u64,
    pub generation: u64,
    pub target: CommitTarget,
    pub payload: NoteDraft,
}

/// What `begin_commit` decided.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitPlan {
    /// Nothing to persist.
    Nothing,
    /// A request is in flight; the commit runs again when it completes.
    Queued,
    /// The emptied note was dropped from the session. No request needed.
    Discard(Note),
    /// Run this request and hand the result to `complete_commit`.
    Send(CommitTicket),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    Unchanged,
    Queued,
    Discarded(Note),
    Created(Note),
    Updated(Note),
    /// The response arrived after the session moved on.
    Stale(Note),
}

impl CommitOutcome {
    /// Whether a store request was made.
    pub fn hit_network(&self) -> bool {
        matches!(
            self,
            CommitOutcome::Created(_) | CommitOutcome::Updated(_) | CommitOutcome::Stale(_)
        )
    }
}
