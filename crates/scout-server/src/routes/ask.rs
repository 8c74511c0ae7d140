use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct AskRequest {
    prompt: String,
}

#[derive(Debug, Serialize)]
struct AskResponse {
    response: String,
    answered: bool,
}

// Ask the agent one question, non streaming
async fn ask_handler(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let answer = state.bridge.ask(&request.prompt).await?;

    Ok(Json(AskResponse {
        answered: !answer.is_empty(),
        response: answer.display_text().to_string(),
    }))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/ask", post(ask_handler))
        .with_state(state)
}
