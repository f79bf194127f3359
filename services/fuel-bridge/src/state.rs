use chrono::{DateTime, Utc};
use fuelbridge_core::StateStore;

/// Shared state handed to the query handlers
pub struct AppState {
    pub store: StateStore,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(store: StateStore) -> Self {
        Self {
            store,
            started_at: Utc::now(),
        }
    }
}
