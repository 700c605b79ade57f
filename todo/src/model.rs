//! The todo list state-transition model.
//!
//! [`TodoListModel`] owns the ordered collection and the current filter and
//! is the single source of truth. Every operation is a plain in-memory
//! transformation; rendering and storage happen elsewhere.

use crate::types::{Filter, FooterStats, Todo, TodoError, TodoId};
use composable_todo_core::environment::IdGenerator;

/// What `update_title` did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TitleUpdate {
    /// The title was replaced in place
    Renamed,
    /// The new title was blank, so the todo was removed
    Destroyed(Todo),
}

/// Ordered todos plus the current filter
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoListModel {
    todos: Vec<Todo>,
    filter: Filter,
}

impl TodoListModel {
    /// Creates an empty list showing every todo
    #[must_use]
    pub const fn new() -> Self {
        Self {
            todos: Vec::new(),
            filter: Filter::All,
        }
    }

    /// Builds a model from a loaded snapshot
    ///
    /// Duplicate ids keep their first occurrence. Returns the model and the
    /// ids that were dropped.
    #[must_use]
    pub fn from_todos(todos: Vec<Todo>) -> (Self, Vec<TodoId>) {
        let mut model = Self::new();
        let mut dropped = Vec::new();
        for todo in todos {
            if model.contains(&todo.id) {
                dropped.push(todo.id);
            } else {
                model.todos.push(todo);
            }
        }
        (model, dropped)
    }

    /// Replaces the collection with a loaded snapshot, keeping the filter
    ///
    /// Returns the duplicate ids that were dropped.
    pub fn replace_todos(&mut self, todos: Vec<Todo>) -> Vec<TodoId> {
        let (loaded, dropped) = Self::from_todos(todos);
        self.todos = loaded.todos;
        dropped
    }

    // ========== Mutations ==========

    /// Appends a new active todo with a fresh id
    ///
    /// # Errors
    ///
    /// - [`TodoError::EmptyTitle`] if `title` is blank after trimming
    /// - [`TodoError::DuplicateId`] if the generator returns an id already in use
    pub fn create(&mut self, title: &str, ids: &dyn IdGenerator) -> Result<Todo, TodoError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TodoError::EmptyTitle);
        }

        let id = TodoId::new(ids.next_id());
        if self.contains(&id) {
            return Err(TodoError::DuplicateId(id));
        }

        let todo = Todo::new(id, title.to_string());
        self.todos.push(todo.clone());
        Ok(todo)
    }

    /// Flips the completion flag of one todo
    ///
    /// # Errors
    ///
    /// [`TodoError::NotFound`] if no todo has this id.
    pub fn toggle(&mut self, id: &TodoId) -> Result<(), TodoError> {
        let todo = self.get_mut(id)?;
        todo.completed = !todo.completed;
        Ok(())
    }

    /// Sets the completion flag of every todo
    pub fn toggle_all(&mut self, completed: bool) {
        for todo in &mut self.todos {
            todo.completed = completed;
        }
    }

    /// Replaces a todo's title in place, or removes it if the title is blank
    ///
    /// # Errors
    ///
    /// [`TodoError::NotFound`] if no todo has this id.
    pub fn update_title(&mut self, id: &TodoId, title: &str) -> Result<TitleUpdate, TodoError> {
        let title = title.trim();
        if title.is_empty() {
            return self
                .destroy(id)
                .map(TitleUpdate::Destroyed)
                .ok_or_else(|| TodoError::NotFound(id.clone()));
        }

        let todo = self.get_mut(id)?;
        title.clone_into(&mut todo.title);
        Ok(TitleUpdate::Renamed)
    }

    /// Removes one todo, returning it if it existed
    pub fn destroy(&mut self, id: &TodoId) -> Option<Todo> {
        let index = self.todos.iter().position(|todo| &todo.id == id)?;
        Some(self.todos.remove(index))
    }

    /// Removes every completed todo and switches back to the `all` filter
    ///
    /// Returns how many todos were removed.
    pub fn destroy_completed(&mut self) -> usize {
        let before = self.todos.len();
        self.todos.retain(|todo| !todo.completed);
        self.filter = Filter::All;
        before - self.todos.len()
    }

    /// Sets the current filter
    pub const fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    // ========== Queries ==========

    /// Every todo, in insertion order
    #[must_use]
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    /// The current filter
    #[must_use]
    pub const fn filter(&self) -> Filter {
        self.filter
    }

    /// Looks up a todo by id
    #[must_use]
    pub fn get(&self, id: &TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| &todo.id == id)
    }

    /// Checks if a todo exists
    #[must_use]
    pub fn contains(&self, id: &TodoId) -> bool {
        self.get(id).is_some()
    }

    /// Total number of todos
    #[must_use]
    pub fn len(&self) -> usize {
        self.todos.len()
    }

    /// Whether the list has no todos at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Todos not yet completed, in order
    #[must_use]
    pub fn active_todos(&self) -> Vec<&Todo> {
        self.filtered(Filter::Active)
    }

    /// Completed todos, in order
    #[must_use]
    pub fn completed_todos(&self) -> Vec<&Todo> {
        self.filtered(Filter::Completed)
    }

    /// Todos selected by the current filter, in order
    #[must_use]
    pub fn visible_todos(&self) -> Vec<&Todo> {
        self.filtered(self.filter)
    }

    /// True when there are no active todos; drives the toggle-all checkbox
    #[must_use]
    pub fn all_completed(&self) -> bool {
        self.todos.iter().all(|todo| todo.completed)
    }

    /// Footer counts for the current state
    #[must_use]
    pub fn footer_stats(&self) -> FooterStats {
        let active_count = self.todos.iter().filter(|todo| !todo.completed).count();
        FooterStats {
            active_count,
            completed_count: self.todos.len() - active_count,
            filter: self.filter,
        }
    }

    fn filtered(&self, filter: Filter) -> Vec<&Todo> {
        self.todos
            .iter()
            .filter(|todo| filter.admits(todo.completed))
            .collect()
    }

    fn get_mut(&mut self, id: &TodoId) -> Result<&mut Todo, TodoError> {
        self.todos
            .iter_mut()
            .find(|todo| &todo.id == id)
            .ok_or_else(|| TodoError::NotFound(id.clone()))
    }
}
