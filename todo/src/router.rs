//! URL-fragment routing.
//!
//! One route pattern, `/:filter`. The router only extracts the segment; what
//! the segment means is decided by [`Filter::from_route_segment`].

use crate::types::Filter;

/// Route the app starts on
pub const DEFAULT_ROUTE: &str = "/all";

/// Maps fragments like `#/active` to filter segments
#[derive(Debug, Clone)]
pub struct Router {
    initial: String,
}

impl Router {
    /// Creates a router whose initial route is `initial`
    #[must_use]
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            initial: initial.into(),
        }
    }

    /// The route to navigate to on startup
    #[must_use]
    pub fn initial_route(&self) -> &str {
        &self.initial
    }

    /// Extracts the `:filter` segment from a fragment
    ///
    /// Accepts `#/x`, `/x` and `#/x/`. Returns `None` when the fragment has
    /// no segment or more than one, mirroring a route table with a single
    /// `/:filter` entry. The segment is returned verbatim.
    #[must_use]
    pub fn match_segment(fragment: &str) -> Option<&str> {
        let path = fragment.trim();
        let path = path.strip_prefix('#').unwrap_or(path);
        let path = path.strip_prefix('/')?;
        let path = path.strip_suffix('/').unwrap_or(path);

        if path.is_empty() || path.contains('/') {
            return None;
        }
        Some(path)
    }

    /// Resolves a fragment to the filter it selects
    #[must_use]
    pub fn resolve(fragment: &str) -> Option<Filter> {
        Self::match_segment(fragment).map(Filter::from_route_segment)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(DEFAULT_ROUTE)
    }
}
