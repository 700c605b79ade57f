//! Terminal `TodoMVC`.
//!
//! Reads commands from stdin, one per line, and redraws the list on stdout
//! after every change. Logs go to stderr.

use composable_todo_core::environment::UuidIdGenerator;
use composable_todo_runtime::Store;
use std::sync::Arc;
use todomvc::shell::{edit_actions, Command, ParseError, ABORT_EDIT, HELP};
use todomvc::{
    Config, FileKeyValueStore, Router, TerminalRenderer, TodoAction, TodoEnvironment,
    TodoReducer, TodoRepository, TodoState,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();
    let config = Config::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| "todomvc=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    composable_todo_runtime::metrics::register_metrics();

    info!(
        namespace = %config.namespace,
        data_dir = %config.data_dir.display(),
        initial_route = %config.initial_route,
        "Configuration loaded"
    );

    let env = TodoEnvironment::new(
        Arc::new(UuidIdGenerator),
        TodoRepository::new(
            Arc::new(FileKeyValueStore::new(&config.data_dir)),
            config.namespace.clone(),
        ),
        Arc::new(TerminalRenderer::new(std::io::stdout())),
    );
    let store = Store::new(TodoState::new(), TodoReducer::new(), env);
    let router = Router::new(config.initial_route.clone());

    dispatch(&store, vec![TodoAction::Load]).await?;
    dispatch(
        &store,
        vec![TodoAction::Navigate {
            fragment: router.initial_route().to_string(),
        }],
    )
    .await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => {
                println!("{HELP}");
                continue;
            },
            Ok(command) => command,
            Err(ParseError::Empty) => continue,
            Err(e) => {
                println!("! {e}");
                continue;
            },
        };

        let editing = matches!(command, Command::Edit(_));
        let actions = match store.state(|state| command.into_actions(state)).await {
            Ok(actions) => actions,
            Err(e) => {
                println!("! {e}");
                continue;
            },
        };
        dispatch(&store, actions).await?;

        if editing {
            let Some(session) = store.state(|state| state.editing.clone()).await else {
                continue;
            };
            println!("new title for '{}' ({ABORT_EDIT} cancels):", session.original_title());
            let value = lines
                .next_line()
                .await?
                .unwrap_or_else(|| ABORT_EDIT.to_string());
            dispatch(&store, edit_actions(&value)).await?;
        }
    }

    info!("Exiting");
    Ok(())
}

/// Sends actions in order, then reports a storage or render failure
///
/// Rejected commands are only logged.
async fn dispatch(
    store: &TodoStore,
    actions: Vec<TodoAction>,
) -> Result<(), composable_todo_runtime::StoreError> {
    for action in actions {
        store.send(action).await?;
    }
    if let Some(error) = store.state(|state| state.failure.clone()).await {
        println!("! {error}");
    }
    Ok(())
}
