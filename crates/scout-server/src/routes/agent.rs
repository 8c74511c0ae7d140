use axum::{extract::State, routing::get, routing::post, Json, Router};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct StatusResponse {
    ready: bool,
    missing_credentials: Vec<&'static str>,
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        ready: state.bridge.is_ready(),
        missing_credentials: state.bridge.settings().missing_credentials(),
    })
}

// Construction is caller driven: a failed startup attempt is only retried here.
async fn init(State(state): State<AppState>) -> Result<Json<StatusResponse>, ApiError> {
    state.bridge.ensure_ready().await?;
    Ok(status(State(state)).await)
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/status", get(status))
        .route("/init", post(init))
        .with_state(state)
}
