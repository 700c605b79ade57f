//! # Composable Todo Core
//!
//! Core traits and types for the composable todo architecture.
//!
//! This crate provides the abstractions every feature is built from:
//!
//! - **State**: Domain state for a feature
//! - **Action**: All possible inputs to a reducer (commands and events)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Explicit Effects (no hidden I/O)
//! - Dependency Injection via Environment
//!
//! ## Example
//!
//! ```ignore
//! use composable_todo_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = CounterEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         env: &CounterEnvironment,
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         state.count += 1;
//!         SmallVec::new()
//!     }
//! }
//! ```

pub use smallvec::{smallvec, SmallVec};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::{effect::Effect, SmallVec};

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values, built by reducers and executed by the Store.
pub mod effect {
    /// Boxed synchronous side effect, optionally producing a feedback action
    pub type Work<Action> = Box<dyn FnOnce() -> Option<Action> + Send>;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed by the reducer. They are descriptions of what
    /// should happen, returned from reducers and executed by the Store, in
    /// order, before `send` returns.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub struct Effect<Action> {
        label: &'static str,
        work: Work<Action>,
    }

    // Manual Debug implementation since closures don't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "Effect({})", self.label)
        }
    }

    impl<Action> Effect<Action> {
        /// Wrap a closure as an effect
        ///
        /// The closure returns `Some(action)` to feed an action back into
        /// the reducer.
        #[must_use]
        pub fn run<F>(label: &'static str, work: F) -> Self
        where
            F: FnOnce() -> Option<Action> + Send + 'static,
        {
            Self {
                label,
                work: Box::new(work),
            }
        }

        /// Label used in logs and metrics
        #[must_use]
        pub const fn label(&self) -> &'static str {
            self.label
        }

        /// Perform the work, returning the feedback action (if any)
        pub fn execute(self) -> Option<Action> {
            (self.work)()
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter. Production implementations live next to
/// the traits; test doubles live in `composable-todo-testing`.
pub mod environment {
    use thiserror::Error;
    use uuid::Uuid;

    /// IdGenerator trait - abstracts identifier creation for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use composable_todo_core::environment::{IdGenerator, UuidIdGenerator};
    ///
    /// let ids = UuidIdGenerator;
    /// assert_ne!(ids.next_id(), ids.next_id());
    /// ```
    pub trait IdGenerator: Send + Sync {
        /// Produce a fresh identifier
        fn next_id(&self) -> String;
    }

    /// Random v4 UUIDs rendered as hyphenated lowercase text
    #[derive(Debug, Clone, Copy, Default)]
    pub struct UuidIdGenerator;

    impl IdGenerator for UuidIdGenerator {
        fn next_id(&self) -> String {
            Uuid::new_v4().to_string()
        }
    }

    /// Errors raised by a [`KeyValueStore`]
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StorageError {
        /// The underlying medium failed
        #[error("storage I/O failed for key `{key}`: {message}")]
        Io {
            /// Key being read or written
            key: String,
            /// Error reported by the medium
            message: String,
        },

        /// A stored blob could not be decoded
        #[error("stored value for key `{key}` is corrupt: {message}")]
        Corrupt {
            /// Key holding the blob
            key: String,
            /// Decoder error
            message: String,
        },

        /// A value could not be encoded for storage
        #[error("value could not be serialized: {0}")]
        Serialize(String),
    }

    /// KeyValueStore trait - opaque blob storage keyed by a namespace string
    ///
    /// Absence of a key is not an error: `get` returns `Ok(None)`.
    pub trait KeyValueStore: Send + Sync {
        /// Read the blob stored under `key`
        ///
        /// # Errors
        ///
        /// Returns [`StorageError::Io`] when the medium cannot be read.
        fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

        /// Replace the blob stored under `key`
        ///
        /// # Errors
        ///
        /// Returns [`StorageError::Io`] when the medium cannot be written.
        fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    }
}
