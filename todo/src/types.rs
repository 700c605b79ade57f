//! Domain types for the todo list.
//!
//! A todo list is an ordered collection of short text items, each either
//! active or completed, viewed through one of three filters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier for a todo item
///
/// Opaque text. Freshly created items get a UUID, but any string loaded from
/// storage is accepted as-is.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Wraps an existing identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single todo item
///
/// This is exactly the persisted shape: `{ "id", "title", "completed" }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier, immutable for the lifetime of the item
    pub id: TodoId,
    /// Non-empty, trimmed title
    pub title: String,
    /// Whether the todo is completed
    pub completed: bool,
}

impl Todo {
    /// Creates a new active todo
    #[must_use]
    pub const fn new(id: TodoId, title: String) -> Self {
        Self {
            id,
            title,
            completed: false,
        }
    }
}

/// Which todos the list shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every todo
    #[default]
    All,
    /// Todos not yet completed
    Active,
    /// Completed todos
    Completed,
}

impl Filter {
    /// Every filter, in footer order
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Maps a route segment to a filter
    ///
    /// Unrecognized segments select [`Filter::All`].
    #[must_use]
    pub fn from_route_segment(segment: &str) -> Self {
        match segment {
            "active" => Self::Active,
            "completed" => Self::Completed,
            _ => Self::All,
        }
    }

    /// Lowercase name, also the route segment
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Link target for this filter, e.g. `#/active`
    #[must_use]
    pub fn href(self) -> String {
        format!("#/{}", self.as_str())
    }

    /// Whether a todo with the given completion flag passes this filter
    #[must_use]
    pub const fn admits(self, completed: bool) -> bool {
        match self {
            Self::All => true,
            Self::Active => !completed,
            Self::Completed => completed,
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts shown in the footer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FooterStats {
    /// Number of active todos
    pub active_count: usize,
    /// Number of completed todos
    pub completed_count: usize,
    /// The current filter
    pub filter: Filter,
}

/// Why a model operation did nothing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TodoError {
    /// The title was empty after trimming
    #[error("Todo title cannot be empty")]
    EmptyTitle,

    /// No todo has this id
    #[error("Todo with ID {0} not found")]
    NotFound(TodoId),

    /// A todo with this id already exists
    #[error("Todo with ID {0} already exists")]
    DuplicateId(TodoId),
}
