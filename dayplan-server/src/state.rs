//! Application state shared across handlers.

use dayplan_store::Store;

/// Per-insert failure handling for the day-replace endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WritePolicy {
    /// Log failed inserts and still report success
    #[default]
    Lenient,
    /// Abort the request on the first failed insert
    Strict,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub write_policy: WritePolicy,
}

impl AppState {
    pub fn new(store: Store, write_policy: WritePolicy) -> Self {
        Self { store, write_policy }
    }
}
