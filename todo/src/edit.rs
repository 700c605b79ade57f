//! In-place title editing.
//!
//! An [`EditSession`] exists from the moment a todo enters edit mode until
//! the edit field loses focus. Escape raises the abort flag; ending the
//! session consumes it, so the flag can never leak into the next edit.

use crate::types::{Todo, TodoId};

/// One in-progress title edit
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditSession {
    id: TodoId,
    original_title: String,
    aborted: bool,
}

/// How an edit session ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    /// Apply the typed value as the new title (blank removes the todo)
    Commit {
        /// Todo being edited
        id: TodoId,
        /// Value typed into the edit field, untrimmed
        title: String,
    },
    /// Discard the typed value
    Abort {
        /// Todo being edited
        id: TodoId,
    },
}

impl EditSession {
    /// Starts editing a todo
    #[must_use]
    pub fn begin(todo: &Todo) -> Self {
        Self {
            id: todo.id.clone(),
            original_title: todo.title.clone(),
            aborted: false,
        }
    }

    /// The todo under edit
    #[must_use]
    pub const fn id(&self) -> &TodoId {
        &self.id
    }

    /// Title when editing started; the edit field's initial value
    #[must_use]
    pub fn original_title(&self) -> &str {
        &self.original_title
    }

    /// Whether Escape has been pressed
    #[must_use]
    pub const fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Marks the session as aborted; the typed value will be discarded
    pub const fn abort(&mut self) {
        self.aborted = true;
    }

    /// Ends the session with the edit field's final value
    #[must_use]
    pub fn finish(self, typed: impl Into<String>) -> EditOutcome {
        if self.aborted {
            EditOutcome::Abort { id: self.id }
        } else {
            EditOutcome::Commit {
                id: self.id,
                title: typed.into(),
            }
        }
    }
}
