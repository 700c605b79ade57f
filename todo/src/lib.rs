//! `TodoMVC` on the composable architecture.
//!
//! A todo list with filtering, in-place editing and persistence, built as a
//! reducer driven by a [`Store`](composable_todo_runtime::Store):
//!
//! - [`model`]: the list itself, with every mutation and query
//! - [`reducer`]: actions, state and the effects each action produces
//! - [`storage`]: the collection as a JSON blob in a key/value store
//! - [`render`]: view snapshots and the terminal renderer
//! - [`router`]: `#/:filter` fragments
//! - [`shell`]: the line-oriented commands used by the binary
//!
//! # Quick Start
//!
//! ```no_run
//! use composable_todo_core::environment::UuidIdGenerator;
//! use composable_todo_runtime::Store;
//! use std::sync::Arc;
//! use todomvc::{
//!     FileKeyValueStore, TerminalRenderer, TodoAction, TodoEnvironment, TodoReducer,
//!     TodoRepository, TodoState,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let env = TodoEnvironment::new(
//!     Arc::new(UuidIdGenerator),
//!     TodoRepository::new(Arc::new(FileKeyValueStore::new(".todomvc")), "todos-jquery"),
//!     Arc::new(TerminalRenderer::new(std::io::stdout())),
//! );
//! let store = Store::new(TodoState::new(), TodoReducer::new(), env);
//!
//! store.send(TodoAction::Load).await?;
//! store.send(TodoAction::Create { title: "Buy milk".to_string() }).await?;
//!
//! let stats = store.state(|s| s.model.footer_stats()).await;
//! println!("{} left", stats.active_count);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod edit;
pub mod model;
pub mod reducer;
pub mod render;
pub mod router;
pub mod shell;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use edit::{EditOutcome, EditSession};
pub use model::{TitleUpdate, TodoListModel};
pub use reducer::{TodoAction, TodoEnvironment, TodoReducer, TodoState};
pub use render::{Renderer, TerminalRenderer, TextRenderer, TodoView};
pub use router::Router;
pub use storage::{FileKeyValueStore, TodoRepository};
pub use types::{Filter, FooterStats, Todo, TodoError, TodoId};
