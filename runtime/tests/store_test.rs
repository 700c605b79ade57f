//! Store integration tests: effect execution, feedback, and serialization.

use composable_todo_core::environment::KeyValueStore;
use composable_todo_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use composable_todo_runtime::{Store, StoreConfig, StoreError};
use composable_todo_testing::InMemoryKeyValueStore;
use std::sync::Arc;

#[derive(Clone, Debug, Default)]
struct ListState {
    items: Vec<String>,
    saves: usize,
    echoes: usize,
}

#[derive(Clone, Debug)]
enum ListAction {
    Add(String),
    Saved,
    Echo,
}

struct ListEnvironment {
    storage: Arc<InMemoryKeyValueStore>,
}

struct ListReducer;

impl Reducer for ListReducer {
    type State = ListState;
    type Action = ListAction;
    type Environment = ListEnvironment;

    fn reduce(
        &self,
        state: &mut ListState,
        action: ListAction,
        env: &ListEnvironment,
    ) -> SmallVec<[Effect<ListAction>; 4]> {
        match action {
            ListAction::Add(item) => {
                state.items.push(item);
                let snapshot = state.items.join(",");
                let storage = Arc::clone(&env.storage);
                smallvec![Effect::run("persist", move || {
                    storage.set("items", &snapshot).ok().map(|()| ListAction::Saved)
                })]
            },
            ListAction::Saved => {
                state.saves += 1;
                SmallVec::new()
            },
            ListAction::Echo => {
                state.echoes += 1;
                smallvec![Effect::run("echo", || Some(ListAction::Echo))]
            },
        }
    }
}

fn new_store(
    config: StoreConfig,
) -> (
    Store<ListState, ListAction, ListEnvironment, ListReducer>,
    Arc<InMemoryKeyValueStore>,
) {
    let storage = Arc::new(InMemoryKeyValueStore::new());
    let env = ListEnvironment {
        storage: Arc::clone(&storage),
    };
    (
        Store::with_config(ListState::default(), ListReducer, env, config),
        storage,
    )
}

#[tokio::test]
async fn effects_have_run_when_send_returns() {
    let (store, storage) = new_store(StoreConfig::default());

    let result = store.send(ListAction::Add("a".to_string())).await;
    assert!(result.is_ok());
    assert_eq!(storage.raw("items").as_deref(), Some("a"));

    let result = store.send(ListAction::Add("b".to_string())).await;
    assert!(result.is_ok());
    assert_eq!(storage.raw("items").as_deref(), Some("a,b"));
}

#[tokio::test]
async fn feedback_actions_are_reduced() {
    let (store, _storage) = new_store(StoreConfig::default());

    let _ = store.send(ListAction::Add("a".to_string())).await;
    let saves = store.state(|s| s.saves).await;
    assert_eq!(saves, 1);
}

#[tokio::test]
async fn failed_effect_feeds_nothing_back() {
    let (store, storage) = new_store(StoreConfig::default());
    storage.fail_writes(true);

    let result = store.send(ListAction::Add("a".to_string())).await;
    assert!(result.is_ok());

    let (items, saves) = store.state(|s| (s.items.len(), s.saves)).await;
    assert_eq!(items, 1);
    assert_eq!(saves, 0);
}

#[tokio::test]
async fn runaway_feedback_is_cut_off() {
    let (store, _storage) = new_store(StoreConfig::default().with_max_feedback_actions(3));

    let result = store.send(ListAction::Echo).await;
    assert_eq!(result, Err(StoreError::FeedbackLimitExceeded { limit: 3 }));

    // The initial action plus three fed-back echoes were reduced
    let echoes = store.state(|s| s.echoes).await;
    assert_eq!(echoes, 4);
}

#[tokio::test]
async fn concurrent_sends_are_serialized() {
    let (store, storage) = new_store(StoreConfig::default());

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                let _ = store.send(ListAction::Add(i.to_string())).await;
            })
        })
        .collect();

    #[allow(clippy::panic)]
    for handle in handles {
        if let Err(e) = handle.await {
            panic!("concurrent send task panicked: {e}");
        }
    }

    let (items, saves) = store.state(|s| (s.items.clone(), s.saves)).await;
    assert_eq!(items.len(), 10);
    assert_eq!(saves, 10);
    // Last write reflects the full list, never an older snapshot
    assert_eq!(storage.raw("items"), Some(items.join(",")));
    assert_eq!(storage.write_count(), 10);
}
