//! List/filter view: derives what the note list shows from the collection.
//!
//! Matching is a case-insensitive substring test against the plain text of
//! the title and of the content, so searching never trips over tags.

use crate::markup::plain_text;
use crate::model::{Note, TrashedNote};

#[derive(Debug, Clone, Default)]
pub struct NoteFilter {
    pub search: Option<String>,
}

impl NoteFilter {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
        }
    }

    pub fn matches(&self, note: &Note) -> bool {
        let term = match self.search.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_lowercase(),
            _ => return true,
        };
        plain_text(&note.title).to_lowercase().contains(&term)
            || plain_text(&note.content).to_lowercase().contains(&term)
    }
}

/// Matching notes, most recently updated first.
pub fn filter_notes<'a>(notes: &'a [Note], filter: &NoteFilter) -> Vec<&'a Note> {
    let mut listed: Vec<&Note> = notes.iter().filter(|n| filter.matches(n)).collect();
    listed.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    listed
}

/// Trashed notes, most recently trashed first.
pub fn trash_view(trashed: &[TrashedNote]) -> Vec<&TrashedNote> {
    let mut listed: Vec<&TrashedNote> = trashed.iter().collect();
    listed.sort_by(|a, b| b.trashed_at.cmp(&a.trashed_at));
    listed
}
