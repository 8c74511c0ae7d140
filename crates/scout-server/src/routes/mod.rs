pub mod agent;
pub mod ask;

use axum::Router;

use crate::state::AppState;

pub fn configure(state: AppState) -> Router {
    Router::new()
        .merge(agent::routes(state.clone()))
        .merge(ask::routes(state))
}
