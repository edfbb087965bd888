//! Application state shared across all routes.

use std::sync::Arc;

/// Global application state, generic over the storage engine so the HTTP
/// surface can be exercised against the in-memory store in tests.
pub struct AppState<S> {
    pub store: S,
}

impl<S> AppState<S> {
    pub fn new(store: S) -> Arc<Self> {
        Arc::new(Self { store })
    }
}
