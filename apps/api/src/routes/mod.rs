pub mod health;
pub mod site;

use axum::{
    routing::{get, post},
    Router,
};

use crate::pipeline::handlers as generation;
use crate::poems::handlers as poems;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Generation
        .route("/api/v1/poems/generate", post(generation::handle_generate))
        // Read path
        .route("/api/v1/poems", get(poems::handle_list_poems))
        .route("/api/v1/poems/:id", get(poems::handle_get_poem))
        // Static site
        .route("/api/v1/site/rebuild", post(site::rebuild_handler))
        .with_state(state)
}
