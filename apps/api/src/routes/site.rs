use axum::{extract::State, http::StatusCode};

use crate::state::AppState;

/// POST /api/v1/site/rebuild
/// Kicks off the static-site rebuild webhook and returns immediately.
pub async fn rebuild_handler(State(state): State<AppState>) -> StatusCode {
    state.notifier.trigger();
    StatusCode::ACCEPTED
}
