//! Axum route handlers for poem generation.

use axum::{extract::State, Json};
use tracing::info;

use crate::errors::AppError;
use crate::pipeline::generator::GeneratedPoem;
use crate::state::AppState;

/// POST /api/v1/poems/generate
///
/// Runs the pipeline once and stores the result under its id.
/// Nothing is stored when any stage fails.
pub async fn handle_generate(
    State(state): State<AppState>,
) -> Result<Json<GeneratedPoem>, AppError> {
    let poem = state.pipeline.generate().await?;
    state.store.save(&poem).await?;
    info!("Stored poem {}", poem.id);
    Ok(Json(poem))
}
