//! Reducer logic for the todo list.
//!
//! Commands come from the UI and are applied to the [`TodoListModel`].
//! Every accepted change returns a render effect and, when the collection
//! itself changed, a persist effect. Failures reported by those effects come
//! back as events.

use crate::edit::{EditOutcome, EditSession};
use crate::model::{TitleUpdate, TodoListModel};
use crate::render::{Renderer, TodoView};
use crate::router::Router;
use crate::storage::TodoRepository;
use crate::types::{Filter, Todo, TodoError, TodoId};
use composable_todo_core::{
    effect::Effect, environment::IdGenerator, reducer::Reducer, smallvec, SmallVec,
};
use composable_todo_macros::Action;
use std::sync::Arc;

/// Effects returned by one reduction
type Effects = SmallVec<[Effect<TodoAction>; 4]>;

/// Actions representing commands and events for the todo list
#[derive(Action, Clone, Debug, PartialEq, Eq)]
pub enum TodoAction {
    // ========== Commands ==========
    /// Command: Read the stored collection
    #[command]
    Load,

    /// Command: Add a todo (the new-todo field was submitted)
    #[command]
    Create {
        /// Raw field value; trimmed by the model
        title: String,
    },

    /// Command: Flip one todo's completion flag
    #[command]
    Toggle {
        /// Todo to toggle
        id: TodoId,
    },

    /// Command: Set every todo's completion flag
    #[command]
    ToggleAll {
        /// The new flag for all todos
        completed: bool,
    },

    /// Command: Replace a todo's title; blank removes it
    #[command]
    UpdateTitle {
        /// Todo to rename
        id: TodoId,
        /// Raw new title
        title: String,
    },

    /// Command: Remove a todo
    #[command]
    Destroy {
        /// Todo to remove
        id: TodoId,
    },

    /// Command: Remove every completed todo
    #[command]
    DestroyCompleted,

    /// Command: Select a filter
    #[command]
    SetFilter {
        /// The filter to show
        filter: Filter,
    },

    /// Command: Follow a URL fragment such as `#/active`
    #[command]
    Navigate {
        /// The fragment, e.g. `#/completed`
        fragment: String,
    },

    /// Command: Put a todo into edit mode
    #[command]
    BeginEdit {
        /// Todo to edit
        id: TodoId,
    },

    /// Command: Escape was pressed in the edit field
    #[command]
    AbortEdit,

    /// Command: The edit field lost focus
    #[command]
    EndEdit {
        /// Final value of the edit field
        value: String,
    },

    // ========== Events ==========
    /// Event: The stored collection was read
    #[event]
    TodosLoaded {
        /// Stored todos, in order
        todos: Vec<Todo>,
    },

    /// Event: The stored collection could not be read
    #[event]
    LoadFailed {
        /// Error message
        error: String,
    },

    /// Event: Writing the collection failed
    #[event]
    PersistFailed {
        /// Error message
        error: String,
    },

    /// Event: Presenting the view failed
    #[event]
    RenderFailed {
        /// Error message
        error: String,
    },
}

/// State of the todo application
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoState {
    /// The list and its filter
    pub model: TodoListModel,
    /// Edit in progress, if any
    pub editing: Option<EditSession>,
    /// Rejection or failure caused by the most recent command (if any)
    pub last_error: Option<String>,
    /// Effect failure caused by the most recent command; the only error
    /// shown to the user
    pub failure: Option<String>,
}

impl TodoState {
    /// Creates a new empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// View of the current state for the renderer
    #[must_use]
    pub fn view(&self) -> TodoView {
        TodoView::new(&self.model, self.editing.as_ref().map(EditSession::id))
    }
}

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Source of ids for new todos
    pub ids: Arc<dyn IdGenerator>,
    /// Where the collection is persisted
    pub repository: TodoRepository,
    /// Where views are presented
    pub renderer: Arc<dyn Renderer>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(
        ids: Arc<dyn IdGenerator>,
        repository: TodoRepository,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            ids,
            repository,
            renderer,
        }
    }
}

/// Reducer for the todo list
#[derive(Clone, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render effect for the current state
    fn render(state: &TodoState, env: &TodoEnvironment) -> Effect<TodoAction> {
        let view = state.view();
        let renderer = Arc::clone(&env.renderer);
        Effect::run("render", move || {
            renderer.render(&view).err().map(|e| TodoAction::RenderFailed {
                error: e.to_string(),
            })
        })
    }

    /// Persist effect writing a snapshot of the current collection
    fn persist(state: &TodoState, env: &TodoEnvironment) -> Effect<TodoAction> {
        let snapshot = state.model.todos().to_vec();
        let repository = env.repository.clone();
        Effect::run("persist", move || {
            repository.save(&snapshot).err().map(|e| TodoAction::PersistFailed {
                error: e.to_string(),
            })
        })
    }

    /// Render then persist, the response to every change of the collection
    fn changed(state: &TodoState, env: &TodoEnvironment) -> Effects {
        smallvec![Self::render(state, env), Self::persist(state, env)]
    }

    /// Render only, for changes that do not touch the collection
    fn redrawn(state: &TodoState, env: &TodoEnvironment) -> Effects {
        smallvec![Self::render(state, env)]
    }

    /// Records a rejected command; nothing else changes
    fn rejected(state: &mut TodoState, action: &'static str, error: &TodoError) -> Effects {
        tracing::warn!(action, %error, "Command rejected");
        state.last_error = Some(error.to_string());
        SmallVec::new()
    }

    /// Records a failure reported by an effect
    fn failed(state: &mut TodoState, action: &'static str, error: String) -> Effects {
        tracing::warn!(action, %error, "Effect failed");
        state.failure = Some(error.clone());
        state.last_error = Some(error);
        SmallVec::new()
    }

    /// Ends the edit session if its todo no longer exists
    fn drop_stale_edit(state: &mut TodoState) {
        if state
            .editing
            .as_ref()
            .is_some_and(|session| !state.model.contains(session.id()))
        {
            state.editing = None;
        }
    }

    fn apply_title(
        state: &mut TodoState,
        env: &TodoEnvironment,
        id: &TodoId,
        title: &str,
    ) -> Effects {
        match state.model.update_title(id, title) {
            Ok(TitleUpdate::Renamed) => Self::changed(state, env),
            Ok(TitleUpdate::Destroyed(todo)) => {
                tracing::debug!(id = %todo.id, "Blank title, todo removed");
                Self::drop_stale_edit(state);
                Self::changed(state, env)
            },
            Err(error) => Self::rejected(state, "UpdateTitle", &error),
        }
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects {
        tracing::debug!(action = action.name(), command = action.is_command(), "Reducing");

        // Errors are reported per command, together with its feedback
        if action.is_command() {
            state.last_error = None;
            state.failure = None;
        }

        match action {
            // ========== Commands ==========
            TodoAction::Load => {
                let repository = env.repository.clone();
                smallvec![Effect::run("load", move || {
                    Some(match repository.load() {
                        Ok(todos) => TodoAction::TodosLoaded { todos },
                        Err(e) => TodoAction::LoadFailed {
                            error: e.to_string(),
                        },
                    })
                })]
            },

            TodoAction::Create { title } => match state.model.create(&title, env.ids.as_ref()) {
                Ok(todo) => {
                    tracing::debug!(id = %todo.id, "Todo created");
                    Self::changed(state, env)
                },
                Err(error) => Self::rejected(state, "Create", &error),
            },

            TodoAction::Toggle { id } => match state.model.toggle(&id) {
                Ok(()) => Self::changed(state, env),
                Err(error) => Self::rejected(state, "Toggle", &error),
            },

            TodoAction::ToggleAll { completed } => {
                state.model.toggle_all(completed);
                Self::changed(state, env)
            },

            TodoAction::UpdateTitle { id, title } => Self::apply_title(state, env, &id, &title),

            TodoAction::Destroy { id } => match state.model.destroy(&id) {
                Some(_) => {
                    Self::drop_stale_edit(state);
                    Self::changed(state, env)
                },
                None => Self::rejected(state, "Destroy", &TodoError::NotFound(id)),
            },

            TodoAction::DestroyCompleted => {
                let removed = state.model.destroy_completed();
                Self::drop_stale_edit(state);
                tracing::debug!(removed, "Cleared completed todos");
                Self::changed(state, env)
            },

            TodoAction::SetFilter { filter } => {
                state.model.set_filter(filter);
                Self::redrawn(state, env)
            },

            TodoAction::Navigate { fragment } => match Router::resolve(&fragment) {
                Some(filter) => {
                    state.model.set_filter(filter);
                    Self::redrawn(state, env)
                },
                None => {
                    tracing::debug!(%fragment, "Fragment matches no route");
                    SmallVec::new()
                },
            },

            TodoAction::BeginEdit { id } => match state.model.get(&id) {
                Some(todo) => {
                    state.editing = Some(EditSession::begin(todo));
                    Self::redrawn(state, env)
                },
                None => Self::rejected(state, "BeginEdit", &TodoError::NotFound(id)),
            },

            TodoAction::AbortEdit => {
                if let Some(session) = state.editing.as_mut() {
                    session.abort();
                }
                SmallVec::new()
            },

            TodoAction::EndEdit { value } => {
                let Some(session) = state.editing.take() else {
                    tracing::debug!("EndEdit without an edit in progress");
                    return SmallVec::new();
                };
                match session.finish(value) {
                    EditOutcome::Commit { id, title } => Self::apply_title(state, env, &id, &title),
                    EditOutcome::Abort { id } => {
                        tracing::debug!(%id, "Edit aborted");
                        Self::redrawn(state, env)
                    },
                }
            },

            // ========== Events ==========
            TodoAction::TodosLoaded { todos } => {
                let dropped = state.model.replace_todos(todos);
                for id in &dropped {
                    tracing::warn!(%id, "Dropped stored todo with duplicate id");
                }
                Self::drop_stale_edit(state);
                tracing::info!(count = state.model.len(), "Todos loaded");
                Self::redrawn(state, env)
            },

            TodoAction::LoadFailed { error } => {
                let mut effects = Self::failed(state, "Load", error);
                // Still show the (empty) list
                effects.push(Self::render(state, env));
                effects
            },

            TodoAction::PersistFailed { error } => Self::failed(state, "Persist", error),

            TodoAction::RenderFailed { error } => Self::failed(state, "Render", error),
        }
    }
}
