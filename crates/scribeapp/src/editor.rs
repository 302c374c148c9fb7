//! Editor adapter seam.
//!
//! The session never owns an editor widget. It pushes content into one through
//! [`EditorAdapter`] when a note is selected, and the host forwards every edit
//! back through `SessionMachine::on_editor_change`.

use crate::markup;

pub trait EditorAdapter {
    fn get_content(&self) -> String;

    /// Replace the editor's content. With `preserve_cursor` the caret stays
    /// where it was (clamped to the new length); otherwise it moves to the end.
    fn set_content(&mut self, markup: &str, preserve_cursor: bool);

    fn focus(&mut self);
}

/// Plain in-memory editor used by terminal hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct BufferEditor {
    content: String,
    cursor: usize,
    focused: bool,
    loads: usize,
}

impl BufferEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// How many times the session pushed content in.
    pub fn load_count(&self) -> usize {
        self.loads
    }

    // The following edit the buffer as a user would and return the new
    // markup, which the host then reports to the session.

    pub fn replace_all(&mut self, markup: &str) -> String {
        self.content = markup.to_string();
        self.cursor = self.content.len();
        self.content.clone()
    }

    pub fn append_paragraph(&mut self, text: &str) -> String {
        if markup::is_blank(&self.content) {
            self.content.clear();
        }
        self.content.push_str(&markup::paragraph(text));
        self.cursor = self.content.len();
        self.content.clone()
    }

    pub fn clear(&mut self) -> String {
        self.replace_all("")
    }
}

impl EditorAdapter for BufferEditor {
    fn get_content(&self) -> String {
        self.content.clone()
    }

    fn set_content(&mut self, markup: &str, preserve_cursor: bool) {
        self.content = markup.to_string();
        self.cursor = if preserve_cursor {
            let mut pos = self.cursor.min(self.content.len());
            while !self.content.is_char_boundary(pos) {
                pos -= 1;
            }
            pos
        } else {
            self.content.len()
        };
        self.loads += 1;
    }

    fn focus(&mut self) {
        self.focused = true;
    }
}
