//! # Composable Todo Testing
//!
//! Testing utilities and helpers for the composable todo architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A Given-When-Then harness for reducers
//! - Helpers to run effect descriptions outside a Store
//! - Property-based testing strategies
//!
//! ## Example
//!
//! ```ignore
//! use composable_todo_testing::{test_ids, InMemoryKeyValueStore, ReducerTest};
//!
//! ReducerTest::new(TodoReducer::new())
//!     .with_env(TodoEnvironment::new(Arc::new(test_ids()), storage, renderer))
//!     .given_state(TodoState::default())
//!     .when_action(TodoAction::Create { title: "milk".into() })
//!     .then_state(|state| assert_eq!(state.model.len(), 1))
//!     .run();
//! ```

use composable_todo_core::environment::{IdGenerator, KeyValueStore, StorageError};


pub use reducer_test::{assertions, ReducerTest};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{IdGenerator, KeyValueStore, StorageError};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Mutex, PoisonError};

    /// Predictable identifiers: `{prefix}-1`, `{prefix}-2`, ...
    ///
    /// # Example
    ///
    /// ```
    /// use composable_todo_testing::mocks::SequentialIdGenerator;
    /// use composable_todo_core::environment::IdGenerator;
    ///
    /// let ids = SequentialIdGenerator::new("todo");
    /// assert_eq!(ids.next_id(), "todo-1");
    /// assert_eq!(ids.next_id(), "todo-2");
    /// ```
    #[derive(Debug)]
    pub struct SequentialIdGenerator {
        prefix: String,
        next: AtomicUsize,
    }

    impl SequentialIdGenerator {
        /// Create a generator whose first id is `{prefix}-1`
        #[must_use]
        pub fn new(prefix: impl Into<String>) -> Self {
            Self {
                prefix: prefix.into(),
                next: AtomicUsize::new(1),
            }
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> String {
            let n = self.next.fetch_add(1, Ordering::SeqCst);
            format!("{}-{n}", self.prefix)
        }
    }

    /// Generator that always returns the same id, for collision tests
    #[derive(Debug, Clone)]
    pub struct ConstantIdGenerator(pub String);

    impl IdGenerator for ConstantIdGenerator {
        fn next_id(&self) -> String {
            self.0.clone()
        }
    }

    /// Create the default id generator for tests (`todo-1`, `todo-2`, ...)
    #[must_use]
    pub fn test_ids() -> SequentialIdGenerator {
        SequentialIdGenerator::new("todo")
    }

    /// In-memory key/value store
    ///
    /// Records every write and can be switched into a failing mode to
    /// exercise persistence error paths.
    #[derive(Debug, Default)]
    pub struct InMemoryKeyValueStore {
        entries: Mutex<HashMap<String, String>>,
        writes: AtomicUsize,
        fail_writes: AtomicBool,
    }

    impl InMemoryKeyValueStore {
        /// Create an empty store
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a store pre-populated with one entry
        #[must_use]
        pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
            let store = Self::new();
            store
                .entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key.into(), value.into());
            store
        }

        /// Make every subsequent `set` fail (or succeed again)
        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        /// Number of successful writes so far
        #[must_use]
        pub fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        /// Current raw value under `key`
        #[must_use]
        pub fn raw(&self, key: &str) -> Option<String> {
            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(key)
                .cloned()
        }
    }

    impl KeyValueStore for InMemoryKeyValueStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.raw(key))
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StorageError::Io {
                    key: key.to_string(),
                    message: "simulated write failure".to_string(),
                });
            }

            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key.to_string(), value.to_string());
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}

/// Property-based testing strategies using proptest
pub mod properties {
    use proptest::prelude::*;

    /// Titles that survive trimming: printable text with at least one
    /// non-whitespace character, optionally padded with spaces
    pub fn title() -> impl Strategy<Value = String> {
        ("[a-zA-Z0-9][a-zA-Z0-9 ,.!?-]{0,30}", " {0,3}", " {0,3}")
            .prop_map(|(body, lead, trail)| format!("{lead}{body}{trail}"))
    }

    /// Titles that are empty after trimming
    pub fn blank_title() -> impl Strategy<Value = String> {
        "[ \t]{0,8}"
    }
}

// Re-export commonly used items
pub use mocks::{test_ids, ConstantIdGenerator, InMemoryKeyValueStore, SequentialIdGenerator};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn sequential_ids_count_up() {
        let ids = test_ids();
        assert_eq!(ids.next_id(), "todo-1");
        assert_eq!(ids.next_id(), "todo-2");
    }

    #[test]
    fn in_memory_store_round_trips() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(store.get("todos").ok(), Some(None));

        assert!(store.set("todos", "[]").is_ok());
        assert_eq!(store.get("todos").ok(), Some(Some("[]".to_string())));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn in_memory_store_can_fail_writes() {
        let store = InMemoryKeyValueStore::with_entry("todos", "[]");
        store.fail_writes(true);

        assert!(matches!(
            store.set("todos", "[1]"),
            Err(StorageError::Io { .. })
        ));
        assert_eq!(store.raw("todos").as_deref(), Some("[]"));
        assert_eq!(store.write_count(), 0);
    }

    proptest! {
        #[test]
        fn titles_are_never_blank(title in properties::title()) {
            prop_assert!(!title.trim().is_empty());
        }

        #[test]
        fn blank_titles_trim_to_empty(title in properties::blank_title()) {
            prop_assert!(title.trim().is_empty());
        }
    }
}
