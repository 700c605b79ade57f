//! Configuration management for the todo application.
//!
//! Loads configuration from environment variables with sensible defaults.
//! The binary also reads a `.env` file first, when one exists.

use crate::router::DEFAULT_ROUTE;
use crate::storage::DEFAULT_NAMESPACE;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Storage key holding the todo collection (`TODOMVC_NAMESPACE`)
    pub namespace: String,
    /// Directory for the file-backed store (`TODOMVC_DATA_DIR`)
    pub data_dir: PathBuf,
    /// Route selected on startup (`TODOMVC_INITIAL_ROUTE`)
    pub initial_route: String,
    /// Tracing filter directive (`RUST_LOG`)
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            data_dir: PathBuf::from(".todomvc"),
            initial_route: DEFAULT_ROUTE.to_string(),
            log_filter: "todomvc=info,composable_todo_runtime=info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or empty variables fall back to [`Config::default`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            namespace: var("TODOMVC_NAMESPACE").unwrap_or(defaults.namespace),
            data_dir: var("TODOMVC_DATA_DIR").map_or(defaults.data_dir, PathBuf::from),
            initial_route: var("TODOMVC_INITIAL_ROUTE").unwrap_or(defaults.initial_route),
            log_filter: var("RUST_LOG").unwrap_or(defaults.log_filter),
        }
    }
}
