//! Line-oriented front end.
//!
//! Each input line parses to a [`Command`]. Commands refer to todos by the
//! 1-based numbers the [`TextRenderer`](crate::render::TextRenderer) prints,
//! so resolving them into [`TodoAction`]s needs the current state.

use crate::reducer::{TodoAction, TodoState};
use crate::types::TodoId;
use thiserror::Error;

/// Typed into the edit prompt to press Escape
pub const ABORT_EDIT: &str = ":esc";

/// Usage text printed by `help`
pub const HELP: &str = "\
commands:
  add <title>     add a todo
  toggle <n>      toggle todo n
  toggle-all      complete all (or reopen all when all are done)
  edit <n>        edit todo n; type the new title on the next line ('' removes, :esc cancels)
  rm <n>          remove todo n
  clear           remove completed todos
  #/<filter>      show all, active or completed
  show            redraw
  help            this text
  quit            exit";

/// One parsed input line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Add a todo with this title
    Add(String),
    /// Toggle the n-th visible todo
    Toggle(usize),
    /// Flip the toggle-all checkbox
    ToggleAll,
    /// Start editing the n-th visible todo
    Edit(usize),
    /// Remove the n-th visible todo
    Remove(usize),
    /// Remove completed todos
    ClearCompleted,
    /// Follow a route fragment
    Navigate(String),
    /// Redraw
    Show,
    /// Print usage
    Help,
    /// Exit
    Quit,
}

/// Errors for input that cannot be turned into actions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Blank line
    #[error("nothing to do")]
    Empty,

    /// First word is not a command
    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),

    /// Command needs an argument that is missing
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    /// Argument is not a positive number
    #[error("'{0}' is not a todo number")]
    InvalidNumber(String),

    /// Number does not match a visible todo
    #[error("no todo numbered {0}")]
    NoSuchTodo(usize),
}

impl Command {
    /// Parses one input line
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] for blank lines, unknown commands and bad
    /// arguments.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseError::Empty);
        }
        if line.starts_with('#') || line.starts_with('/') {
            return Ok(Self::Navigate(line.to_string()));
        }

        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        match word {
            "add" | "a" => {
                if rest.is_empty() {
                    Err(ParseError::MissingArgument("add"))
                } else {
                    Ok(Self::Add(rest.to_string()))
                }
            },
            "toggle" | "t" => Ok(Self::Toggle(number("toggle", rest)?)),
            "toggle-all" => Ok(Self::ToggleAll),
            "edit" | "e" => Ok(Self::Edit(number("edit", rest)?)),
            "rm" | "destroy" => Ok(Self::Remove(number("rm", rest)?)),
            "clear" => Ok(Self::ClearCompleted),
            "show" | "ls" => Ok(Self::Show),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(ParseError::UnknownCommand(other.to_string())),
        }
    }

    /// Resolves the command into actions against the current state
    ///
    /// `Edit` only begins the session; see [`edit_actions`] for the rest.
    /// `Show` re-selects the current filter, which redraws. `Help` and
    /// `Quit` are handled by the caller and yield nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::NoSuchTodo`] when a number is out of range.
    pub fn into_actions(self, state: &TodoState) -> Result<Vec<TodoAction>, ParseError> {
        let actions = match self {
            Self::Add(title) => vec![TodoAction::Create { title }],
            Self::Toggle(n) => vec![TodoAction::Toggle {
                id: visible_id(state, n)?,
            }],
            Self::ToggleAll => vec![TodoAction::ToggleAll {
                completed: !state.model.all_completed(),
            }],
            Self::Edit(n) => vec![TodoAction::BeginEdit {
                id: visible_id(state, n)?,
            }],
            Self::Remove(n) => vec![TodoAction::Destroy {
                id: visible_id(state, n)?,
            }],
            Self::ClearCompleted => vec![TodoAction::DestroyCompleted],
            Self::Navigate(fragment) => vec![TodoAction::Navigate { fragment }],
            Self::Show => vec![TodoAction::SetFilter {
                filter: state.model.filter(),
            }],
            Self::Help | Self::Quit => Vec::new(),
        };
        Ok(actions)
    }
}

/// Actions for the line typed at the edit prompt
///
/// [`ABORT_EDIT`] presses Escape before the field loses focus; anything else
/// is the new title.
#[must_use]
pub fn edit_actions(line: &str) -> Vec<TodoAction> {
    if line.trim() == ABORT_EDIT {
        vec![
            TodoAction::AbortEdit,
            TodoAction::EndEdit {
                value: String::new(),
            },
        ]
    } else {
        vec![TodoAction::EndEdit {
            value: line.to_string(),
        }]
    }
}

fn number(command: &'static str, arg: &str) -> Result<usize, ParseError> {
    if arg.is_empty() {
        return Err(ParseError::MissingArgument(command));
    }
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ParseError::InvalidNumber(arg.to_string())),
    }
}

fn visible_id(state: &TodoState, n: usize) -> Result<TodoId, ParseError> {
    let visible = state.model.visible_todos();
    n.checked_sub(1)
        .and_then(|index| visible.get(index))
        .map(|todo| todo.id.clone())
        .ok_or(ParseError::NoSuchTodo(n))
}
