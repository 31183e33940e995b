use std::sync::Arc;

use axum::{extract::State, response::IntoResponse};
use tracing::debug;

use crate::router::ApiState;

pub async fn handle_api(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    state.api_counter.increment_request_count();

    if !state.api_delay.is_zero() {
        tokio::time::sleep(state.api_delay).await;
    }

    debug!(zone = state.api_counter.zone(), "api request handled");
    "API request handled"
}
