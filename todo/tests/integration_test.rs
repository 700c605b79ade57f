//! Integration tests for the todo list with Store
//!
//! These drive the reducer through a real `Store`, so render and persist
//! effects run exactly as they do in the binary.

use composable_todo_runtime::Store;
use composable_todo_testing::{test_ids, InMemoryKeyValueStore};
use std::sync::{Arc, Mutex};
use todomvc::render::RenderError;
use todomvc::{
    FileKeyValueStore, Filter, Renderer, Todo, TodoAction, TodoEnvironment, TodoId,
    TodoReducer, TodoRepository, TodoState, TodoView,
};

type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

const NAMESPACE: &str = "todos-jquery";

/// Keeps every frame it is asked to render
#[derive(Default)]
struct CapturingRenderer {
    frames: Mutex<Vec<TodoView>>,
}

impl CapturingRenderer {
    fn last(&self) -> Option<TodoView> {
        self.frames.lock().ok().and_then(|frames| frames.last().cloned())
    }

    fn count(&self) -> usize {
        self.frames.lock().map(|frames| frames.len()).unwrap_or_default()
    }
}

impl Renderer for CapturingRenderer {
    fn render(&self, view: &TodoView) -> Result<(), RenderError> {
        if let Ok(mut frames) = self.frames.lock() {
            frames.push(view.clone());
        }
        Ok(())
    }
}

struct Harness {
    store: TodoStore,
    storage: Arc<InMemoryKeyValueStore>,
    renderer: Arc<CapturingRenderer>,
}

fn harness_with(storage: InMemoryKeyValueStore) -> Harness {
    let storage = Arc::new(storage);
    let renderer = Arc::new(CapturingRenderer::default());
    let env = TodoEnvironment::new(
        Arc::new(test_ids()),
        TodoRepository::new(storage.clone(), NAMESPACE),
        renderer.clone(),
    );
    Harness {
        store: Store::new(TodoState::new(), TodoReducer::new(), env),
        storage,
        renderer,
    }
}

fn harness() -> Harness {
    harness_with(InMemoryKeyValueStore::new())
}

fn create(title: &str) -> TodoAction {
    TodoAction::Create {
        title: title.to_string(),
    }
}

fn id(n: usize) -> TodoId {
    TodoId::new(format!("todo-{n}"))
}

/// Decodes what the store currently holds under the namespace
fn stored(storage: &InMemoryKeyValueStore) -> Vec<Todo> {
    storage
        .raw(NAMESPACE)
        .and_then(|blob| serde_json::from_str(&blob).ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_create_create_toggle_scenario() {
    let h = harness();

    let _ = h.store.send(create("a")).await;
    let _ = h.store.send(create("b")).await;
    let _ = h.store.send(TodoAction::Toggle { id: id(1) }).await;

    let state = h.store.state(Clone::clone).await;
    let active: Vec<_> = state.model.active_todos().iter().map(|t| t.title.clone()).collect();
    let completed: Vec<_> = state.model.completed_todos().iter().map(|t| t.title.clone()).collect();
    assert_eq!(active, ["b"]);
    assert_eq!(completed, ["a"]);

    let stats = state.model.footer_stats();
    assert_eq!(stats.active_count, 1);
    assert_eq!(stats.completed_count, 1);
    assert_eq!(stats.filter, Filter::All);

    // One frame per accepted command
    assert_eq!(h.renderer.count(), 3);
    let frame = h.renderer.last();
    assert_eq!(frame.as_ref().map(|v| v.footer.active_word.as_str()), Some("item"));
}

#[tokio::test]
async fn test_storage_matches_memory_after_every_mutation() {
    let h = harness();

    let script = vec![
        create("milk"),
        create("eggs"),
        create("bread"),
        TodoAction::Toggle { id: id(2) },
        TodoAction::UpdateTitle {
            id: id(1),
            title: "oat milk".to_string(),
        },
        TodoAction::ToggleAll { completed: true },
        TodoAction::ToggleAll { completed: false },
        TodoAction::Toggle { id: id(3) },
        TodoAction::Destroy { id: id(1) },
        TodoAction::DestroyCompleted,
    ];

    for action in script {
        let _ = h.store.send(action).await;
        let todos = h.store.state(|s| s.model.todos().to_vec()).await;
        assert_eq!(stored(&h.storage), todos);
    }

    let titles: Vec<_> = stored(&h.storage).into_iter().map(|t| t.title).collect();
    assert_eq!(titles, ["eggs"]);
}

#[tokio::test]
async fn test_blank_title_update_removes_only_record() {
    let h = harness();

    let _ = h.store.send(create("x")).await;
    let _ = h
        .store
        .send(TodoAction::UpdateTitle {
            id: id(1),
            title: "   ".to_string(),
        })
        .await;

    assert!(h.store.state(|s| s.model.is_empty()).await);
    assert_eq!(h.storage.raw(NAMESPACE).as_deref(), Some("[]"));

    let frame = h.renderer.last();
    assert_eq!(frame.map(|v| (v.show_main, v.show_footer)), Some((false, false)));
}

#[tokio::test]
async fn test_rejected_commands_do_not_persist() {
    let h = harness();

    let _ = h.store.send(create("   ")).await;
    let _ = h.store.send(TodoAction::Toggle { id: id(9) }).await;

    assert_eq!(h.storage.write_count(), 0);
    assert_eq!(h.renderer.count(), 0);
    let error = h.store.state(|s| s.last_error.clone()).await;
    assert!(error.is_some_and(|e| e.contains("todo-9")));
    // Rejections are logged, never shown
    assert!(h.store.state(|s| s.failure.is_none()).await);
}

#[tokio::test]
async fn test_load_restores_stored_todos() {
    let storage = InMemoryKeyValueStore::with_entry(
        NAMESPACE,
        r#"[{"id":"7f3c","title":"stored","completed":true},{"id":"a1","title":"open","completed":false}]"#,
    );
    let h = harness_with(storage);

    let _ = h.store.send(TodoAction::Load).await;

    let state = h.store.state(Clone::clone).await;
    assert_eq!(state.model.len(), 2);
    assert!(state.last_error.is_none());
    assert_eq!(state.model.footer_stats().completed_count, 1);
    assert_eq!(h.renderer.count(), 1);

    // Stored ids keep working
    let _ = h
        .store
        .send(TodoAction::Destroy {
            id: TodoId::new("7f3c"),
        })
        .await;
    let titles: Vec<_> = stored(&h.storage).into_iter().map(|t| t.title).collect();
    assert_eq!(titles, ["open"]);
}

#[tokio::test]
async fn test_corrupt_storage_starts_empty_and_is_overwritten() {
    let h = harness_with(InMemoryKeyValueStore::with_entry(NAMESPACE, "{oops"));

    let _ = h.store.send(TodoAction::Load).await;

    let state = h.store.state(Clone::clone).await;
    assert!(state.model.is_empty());
    assert!(state.last_error.is_some());
    assert!(state.failure.is_some());
    assert_eq!(h.renderer.count(), 1);

    let _ = h.store.send(create("fresh")).await;
    let titles: Vec<_> = stored(&h.storage).into_iter().map(|t| t.title).collect();
    assert_eq!(titles, ["fresh"]);
    assert!(h.store.state(|s| s.last_error.is_none()).await);
}

#[tokio::test]
async fn test_persist_failure_is_reported_but_memory_changes() {
    let h = harness();
    h.storage.fail_writes(true);

    let _ = h.store.send(create("milk")).await;

    let state = h.store.state(Clone::clone).await;
    assert_eq!(state.model.len(), 1);
    assert!(state
        .failure
        .is_some_and(|e| e.contains("simulated write failure")));
}

#[tokio::test]
async fn test_navigation_filters_rendered_items() {
    let h = harness();

    let _ = h.store.send(create("a")).await;
    let _ = h.store.send(create("b")).await;
    let _ = h.store.send(TodoAction::Toggle { id: id(2) }).await;
    let writes = h.storage.write_count();

    let _ = h
        .store
        .send(TodoAction::Navigate {
            fragment: "#/completed".to_string(),
        })
        .await;

    let frame = h.renderer.last();
    let titles: Vec<_> = frame
        .iter()
        .flat_map(|v| v.items.iter().map(|t| t.title.clone()))
        .collect();
    assert_eq!(titles, ["b"]);
    assert_eq!(h.storage.write_count(), writes);

    let _ = h
        .store
        .send(TodoAction::Navigate {
            fragment: "#/nonsense".to_string(),
        })
        .await;
    assert_eq!(h.store.state(|s| s.model.filter()).await, Filter::All);
}

#[tokio::test]
async fn test_edit_flow() {
    let h = harness();

    let _ = h.store.send(create("draft")).await;
    let _ = h.store.send(TodoAction::BeginEdit { id: id(1) }).await;
    assert_eq!(h.renderer.last().and_then(|v| v.editing), Some(id(1)));

    // Escape, then blur with a cleared field: title survives
    let _ = h.store.send(TodoAction::AbortEdit).await;
    let _ = h
        .store
        .send(TodoAction::EndEdit {
            value: String::new(),
        })
        .await;
    assert_eq!(stored(&h.storage).first().map(|t| t.title.clone()), Some("draft".to_string()));

    // Blur with a cleared field and no Escape: todo is removed
    let _ = h.store.send(TodoAction::BeginEdit { id: id(1) }).await;
    let _ = h
        .store
        .send(TodoAction::EndEdit {
            value: String::new(),
        })
        .await;
    assert!(stored(&h.storage).is_empty());
    assert!(h.store.state(|s| s.editing.is_none()).await);
}

#[tokio::test]
async fn test_file_store_survives_restart() {
    let dir = tempfile::tempdir();
    assert!(dir.is_ok());
    let Ok(dir) = dir else { return };

    let build = || {
        let env = TodoEnvironment::new(
            Arc::new(test_ids()),
            TodoRepository::new(Arc::new(FileKeyValueStore::new(dir.path())), NAMESPACE),
            Arc::new(CapturingRenderer::default()),
        );
        Store::new(TodoState::new(), TodoReducer::new(), env)
    };

    let first = build();
    let _ = first.send(TodoAction::Load).await;
    let _ = first.send(create("persist me")).await;
    let _ = first.send(TodoAction::Toggle { id: id(1) }).await;
    let before = first.state(|s| s.model.todos().to_vec()).await;

    let second = build();
    let _ = second.send(TodoAction::Load).await;
    let after = second.state(|s| s.model.todos().to_vec()).await;

    assert_eq!(after, before);
    assert!(after.iter().all(|t| t.completed));
}

#[tokio::test]
async fn test_concurrent_creates_are_all_persisted() {
    let h = harness();

    let handles: Vec<_> = (0..10)
        .map(|n| {
            let store = h.store.clone();
            tokio::spawn(async move {
                let _ = store.send(create(&format!("task {n}"))).await;
            })
        })
        .collect();

    #[allow(clippy::panic)]
    for handle in handles {
        if let Err(e) = handle.await {
            panic!("concurrent create task panicked: {e}");
        }
    }

    let todos = h.store.state(|s| s.model.todos().to_vec()).await;
    assert_eq!(todos.len(), 10);
    assert_eq!(stored(&h.storage), todos);
}
