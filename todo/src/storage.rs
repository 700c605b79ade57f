//! Persistence for the todo collection.
//!
//! The whole collection is stored as one JSON array under a namespace key in
//! a [`KeyValueStore`]. There is no version field and no migration path: the
//! blob is exactly `[{"id", "title", "completed"}, ...]`.

use crate::types::Todo;
use composable_todo_core::environment::{KeyValueStore, StorageError};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Namespace key used when none is configured
pub const DEFAULT_NAMESPACE: &str = "todos-jquery";

/// Loads and saves the todo collection under one namespace key
#[derive(Clone)]
pub struct TodoRepository {
    store: Arc<dyn KeyValueStore>,
    namespace: String,
}

impl TodoRepository {
    /// Creates a repository over `store` using `namespace` as the key
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    /// The key this repository reads and writes
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Reads the stored collection; a missing key yields an empty list
    ///
    /// # Errors
    ///
    /// - [`StorageError::Io`] if the store cannot be read
    /// - [`StorageError::Corrupt`] if the blob is not a todo array
    pub fn load(&self) -> Result<Vec<Todo>, StorageError> {
        let Some(blob) = self.store.get(&self.namespace)? else {
            return Ok(Vec::new());
        };

        serde_json::from_str(&blob).map_err(|e| StorageError::Corrupt {
            key: self.namespace.clone(),
            message: e.to_string(),
        })
    }

    /// Replaces the stored collection
    ///
    /// # Errors
    ///
    /// - [`StorageError::Serialize`] if encoding fails
    /// - [`StorageError::Io`] if the store cannot be written
    pub fn save(&self, todos: &[Todo]) -> Result<(), StorageError> {
        let blob =
            serde_json::to_string(todos).map_err(|e| StorageError::Serialize(e.to_string()))?;
        self.store.set(&self.namespace, &blob)
    }
}

impl std::fmt::Debug for TodoRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoRepository")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

/// Key/value store keeping each key in `<dir>/<escaped key>.json`
///
/// Writes go to a temporary sibling file that is then renamed over the
/// target, so a crash never leaves a half-written blob.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Stores files under `dir`, creating it on first write
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the blobs
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", escape_key(key)))
    }

    fn io_error(key: &str, err: &std::io::Error) -> StorageError {
        StorageError::Io {
            key: key.to_string(),
            message: err.to_string(),
        }
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(key, &e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| Self::io_error(key, &e))?;

        let target = self.path_for(key);
        let temp = target.with_extension("json.tmp");
        std::fs::write(&temp, value).map_err(|e| Self::io_error(key, &e))?;
        std::fs::rename(&temp, &target).map_err(|e| Self::io_error(key, &e))?;

        tracing::trace!(path = %target.display(), bytes = value.len(), "Wrote blob");
        Ok(())
    }
}

/// Maps a key to a single path component, one file per distinct key
///
/// ASCII letters, digits and `-` pass through. Every other byte, `_`
/// included, becomes `_` plus two uppercase hex digits.
fn escape_key(key: &str) -> String {
    let mut file = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            file.push(char::from(byte));
        } else {
            let _ = write!(file, "_{byte:02X}");
        }
    }
    file
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TodoId;
    use composable_todo_testing::InMemoryKeyValueStore;

    fn todos() -> Vec<Todo> {
        let mut done = Todo::new(TodoId::new("b"), "Walk dog".to_string());
        done.completed = true;
        vec![Todo::new(TodoId::new("a"), "Buy milk".to_string()), done]
    }

    #[test]
    fn missing_key_loads_empty() {
        let repo = TodoRepository::new(Arc::new(InMemoryKeyValueStore::new()), "todos");
        assert_eq!(repo.load(), Ok(Vec::new()));
    }

    #[test]
    fn save_then_load_round_trips() {
        let repo = TodoRepository::new(Arc::new(InMemoryKeyValueStore::new()), "todos");

        assert!(repo.save(&todos()).is_ok());
        assert_eq!(repo.load(), Ok(todos()));
    }

    #[test]
    fn loads_blob_written_by_hand() {
        let store = InMemoryKeyValueStore::with_entry(
            DEFAULT_NAMESPACE,
            r#"[{"id":"x1","title":"hand written","completed":true}]"#,
        );
        let repo = TodoRepository::new(Arc::new(store), DEFAULT_NAMESPACE);

        let loaded = repo.load();
        assert_eq!(
            loaded.map(|todos| todos.into_iter().map(|t| (t.title, t.completed)).collect::<Vec<_>>()),
            Ok(vec![("hand written".to_string(), true)])
        );
    }

    #[test]
    fn corrupt_blob_is_reported() {
        let store = InMemoryKeyValueStore::with_entry("todos", "{not json");
        let repo = TodoRepository::new(Arc::new(store), "todos");

        assert!(matches!(
            repo.load(),
            Err(StorageError::Corrupt { ref key, .. }) if key == "todos"
        ));
    }

    #[test]
    fn file_store_round_trips_and_reports_missing() {
        let dir = tempfile::tempdir();
        assert!(dir.is_ok());
        let Ok(dir) = dir else { return };
        let store = FileKeyValueStore::new(dir.path().join("data"));

        assert_eq!(store.get("todos-jquery"), Ok(None));
        assert_eq!(store.set("todos-jquery", "[]"), Ok(()));
        assert_eq!(store.get("todos-jquery"), Ok(Some("[]".to_string())));
        assert!(dir.path().join("data").join("todos-jquery.json").exists());
    }

    #[test]
    fn file_store_keeps_keys_inside_dir() {
        let store = FileKeyValueStore::new("/tmp/todomvc");
        assert_eq!(
            store.path_for("../escape"),
            PathBuf::from("/tmp/todomvc/_2E_2E_2Fescape.json")
        );
    }

    #[test]
    fn distinct_keys_get_distinct_files() {
        let store = FileKeyValueStore::new("/tmp/todomvc");
        assert_eq!(store.path_for("todos.jquery"), PathBuf::from("/tmp/todomvc/todos_2Ejquery.json"));
        assert_eq!(store.path_for("todos_jquery"), PathBuf::from("/tmp/todomvc/todos_5Fjquery.json"));
        assert_eq!(store.path_for("todos-jquery"), PathBuf::from("/tmp/todomvc/todos-jquery.json"));
        assert_ne!(store.path_for("a_2E"), store.path_for("a."));
    }

    #[test]
    fn file_store_keeps_similar_keys_apart() {
        let dir = tempfile::tempdir();
        assert!(dir.is_ok());
        let Ok(dir) = dir else { return };
        let store = FileKeyValueStore::new(dir.path());

        assert_eq!(store.set("todos.jquery", "[1]"), Ok(()));
        assert_eq!(store.set("todos_jquery", "[2]"), Ok(()));
        assert_eq!(store.get("todos.jquery"), Ok(Some("[1]".to_string())));
        assert_eq!(store.get("todos_jquery"), Ok(Some("[2]".to_string())));
        assert_eq!(store.get("todos jquery"), Ok(None));
    }
}
