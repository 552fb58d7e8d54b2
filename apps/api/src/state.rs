use std::sync::Arc;

use crate::pipeline::generator::PoemPipeline;
use crate::poems::store::PoemStore;
use crate::webhook::RebuildNotifier;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: PoemPipeline,
    /// Postgres when DATABASE_URL is set, otherwise in-memory.
    pub store: Arc<dyn PoemStore>,
    pub notifier: RebuildNotifier,
}
