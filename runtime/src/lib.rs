//! # Composable Todo Runtime
//!
//! Runtime implementation for the composable todo architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Runs effect descriptions and feeds actions back to the reducer
//!
//! ## Example
//!
//! ```ignore
//! use composable_todo_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action; its effects have run when this returns
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use composable_todo_core::{effect::Effect, reducer::Reducer};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Metric names and registration
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Effects kept producing actions past the configured limit
        ///
        /// Actions reduced before the limit was hit stay applied.
        #[error("Effects fed back more than {limit} actions for a single send")]
        FeedbackLimitExceeded {
            /// The configured `max_feedback_actions`
            limit: usize,
        },
    }
}

pub use error::StoreError;

/// Configuration for Store behavior
///
/// # Example
///
/// ```
/// use composable_todo_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_max_feedback_actions(4);
/// assert_eq!(config.max_feedback_actions, 4);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Maximum number of actions effects may feed back during one `send`
    pub max_feedback_actions: usize,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(max_feedback_actions: usize) -> Self {
        Self {
            max_feedback_actions,
        }
    }

    /// Set the feedback limit
    #[must_use]
    pub const fn with_max_feedback_actions(mut self, limit: usize) -> Self {
        self.max_feedback_actions = limit;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_feedback_actions: 16,
        }
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{
        metrics, Arc, Effect, Mutex, Reducer, RwLock, StoreConfig, StoreError, VecDeque,
    };

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` so readers never observe a half-applied action)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    ///
    /// Sends are serialized: one action and every effect and feedback action
    /// it causes complete before the next `send` starts reducing.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        config: StoreConfig,
        dispatch: Arc<Mutex<()>>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                config,
                dispatch: Arc::new(Mutex::new(())),
            }
        }

        /// Send an action to the store
        ///
        /// Reduces the action, then executes the returned effects in order.
        /// Actions produced by effects are reduced in turn, breadth-first,
        /// before this method returns.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::FeedbackLimitExceeded`] if effects feed back
        /// more than `max_feedback_actions` actions.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            let _dispatch = self.dispatch.lock().await;

            let mut queue = VecDeque::from([action]);
            let mut fed_back = 0usize;

            while let Some(action) = queue.pop_front() {
                metrics::counter!(metrics::ACTIONS_TOTAL).increment(1);

                let effects = {
                    let mut state = self.state.write().await;
                    tracing::trace!("Acquired write lock on state");

                    let start = std::time::Instant::now();
                    let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                    metrics::histogram!(metrics::REDUCER_DURATION)
                        .record(start.elapsed().as_secs_f64());

                    effects
                };

                tracing::trace!("Reducer completed, returned {} effects", effects.len());

                let before = queue.len();
                for effect in effects {
                    Self::execute_effect(effect, &mut queue);
                }

                let produced = queue.len() - before;
                if produced > 0 {
                    fed_back += produced;
                    metrics::counter!(metrics::FEEDBACK_TOTAL).increment(produced as u64);
                    if fed_back > self.config.max_feedback_actions {
                        tracing::error!(
                            limit = self.config.max_feedback_actions,
                            "Feedback limit exceeded, dropping remaining actions"
                        );
                        return Err(StoreError::FeedbackLimitExceeded {
                            limit: self.config.max_feedback_actions,
                        });
                    }
                }
            }

            tracing::debug!("Action processing completed");
            Ok(())
        }

        /// Read current state via a closure
        ///
        /// Access state through a closure to ensure the lock is released promptly:
        ///
        /// ```ignore
        /// let count = store.state(|s| s.todos.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Execute one effect, queueing any action it produces
        fn execute_effect(effect: Effect<A>, queue: &mut VecDeque<A>) {
            let label = effect.label();
            tracing::trace!(label, "Executing effect");
            metrics::counter!(metrics::EFFECTS_EXECUTED, "label" => label).increment(1);
            if let Some(action) = effect.execute() {
                tracing::trace!(label, "Effect produced an action, feeding back");
                queue.push_back(action);
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                config: self.config.clone(),
                dispatch: Arc::clone(&self.dispatch),
            }
        }
    }
}

pub use store::Store;
