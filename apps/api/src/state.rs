use std::sync::Arc;

use crate::matching::store::ProfileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Source of candidate and job records. Postgres in production, in-memory in tests.
    pub store: Arc<dyn ProfileStore>,
}
