//! Axum route handlers for reading stored poems.

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::pipeline::generator::GeneratedPoem;
use crate::state::AppState;

/// GET /api/v1/poems
pub async fn handle_list_poems(
    State(state): State<AppState>,
) -> Result<Json<Vec<GeneratedPoem>>, AppError> {
    let poems = state.store.list().await?;
    info!("Fetched {} poems", poems.len());
    Ok(Json(poems))
}

/// GET /api/v1/poems/:id
pub async fn handle_get_poem(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GeneratedPoem>, AppError> {
    info!("Fetching poem {}", id);
    let poem = state
        .store
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Poem {id} not found")))?;
    Ok(Json(poem))
}
