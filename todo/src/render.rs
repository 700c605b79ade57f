//! Rendering collaborator.
//!
//! The reducer builds a [`TodoView`] after every change and hands it to a
//! [`Renderer`]. The view is a plain snapshot: renderers never see the model.

use crate::model::TodoListModel;
use crate::types::{Filter, Todo, TodoId};
use serde::Serialize;
use std::fmt::Write as _;
use std::io::Write;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Returns `word` for a count of one, `word` + "s" otherwise
#[must_use]
pub fn pluralize(count: usize, word: &str) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

/// Footer view-model
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FooterView {
    /// Number of active todos
    pub active_count: usize,
    /// "item" or "items", agreeing with `active_count`
    pub active_word: String,
    /// Number of completed todos
    pub completed_count: usize,
    /// The selected filter
    pub filter: Filter,
}

/// Everything a renderer needs for one frame
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TodoView {
    /// Todos selected by the current filter, in order
    pub items: Vec<Todo>,
    /// Todo currently in edit mode, if any
    pub editing: Option<TodoId>,
    /// Toggle-all checkbox state: no active todos remain
    pub all_completed: bool,
    /// The list section is shown only when it has items
    pub show_main: bool,
    /// The footer is shown whenever any todo exists
    pub show_footer: bool,
    /// Footer counts and filter
    pub footer: FooterView,
}

impl TodoView {
    /// Snapshot of the model as it should appear on screen
    #[must_use]
    pub fn new(model: &TodoListModel, editing: Option<&TodoId>) -> Self {
        let items: Vec<Todo> = model.visible_todos().into_iter().cloned().collect();
        let stats = model.footer_stats();

        Self {
            show_main: !items.is_empty(),
            show_footer: !model.is_empty(),
            all_completed: model.all_completed(),
            editing: editing.cloned(),
            items,
            footer: FooterView {
                active_count: stats.active_count,
                active_word: pluralize(stats.active_count, "item"),
                completed_count: stats.completed_count,
                filter: stats.filter,
            },
        }
    }
}

/// Errors raised while presenting a view
#[derive(Error, Debug)]
pub enum RenderError {
    /// Writing the markup failed
    #[error("failed to write rendered view: {0}")]
    Io(#[from] std::io::Error),
}

/// Renderer trait - presents a view
pub trait Renderer: Send + Sync {
    /// Present one frame
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the output cannot be written.
    fn render(&self, view: &TodoView) -> Result<(), RenderError>;
}

/// Plain-text markup for terminals
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl TextRenderer {
    /// Builds the markup for one frame
    ///
    /// Items are numbered from 1 in visible order; those numbers are what
    /// shell commands refer to.
    #[must_use]
    pub fn markup(view: &TodoView) -> String {
        let mut out = String::from("todos\n");

        if view.show_main {
            let check = if view.all_completed { "x" } else { " " };
            let _ = writeln!(out, "  [{check}] toggle all");
            for (index, todo) in view.items.iter().enumerate() {
                let n = index + 1;
                if view.editing.as_ref() == Some(&todo.id) {
                    let _ = writeln!(out, "  {n:>3}. > {}", todo.title);
                } else {
                    let check = if todo.completed { "x" } else { " " };
                    let _ = writeln!(out, "  {n:>3}. [{check}] {}", todo.title);
                }
            }
        }

        if view.show_footer {
            let footer = &view.footer;
            let _ = write!(out, "  {} {} left |", footer.active_count, footer.active_word);
            for filter in Filter::ALL {
                if filter == footer.filter {
                    let _ = write!(out, " [{filter}]");
                } else {
                    let _ = write!(out, " {}", filter.href());
                }
            }
            if footer.completed_count > 0 {
                let _ = write!(out, " | clear completed ({})", footer.completed_count);
            }
            out.push('\n');
        }

        out
    }
}

/// Writes [`TextRenderer`] markup to any writer (stdout in the binary)
#[derive(Debug)]
pub struct TerminalRenderer<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> TerminalRenderer<W> {
    /// Renders into `out`
    pub const fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Consumes the renderer, returning the writer
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> Renderer for TerminalRenderer<W> {
    fn render(&self, view: &TodoView) -> Result<(), RenderError> {
        let markup = TextRenderer::markup(view);
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        out.write_all(markup.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}
