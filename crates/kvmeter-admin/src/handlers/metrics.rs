use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{metrics::TEXT_CONTENT_TYPE, router::AdminState};

/// Scrape endpoint. Gathers live values on every request.
pub async fn prometheus_metrics(State(state): State<Arc<AdminState>>) -> impl IntoResponse {
    let payload = state.registry.render_text();

    let mut response = Response::new(Body::from(payload));
    *response.status_mut() = StatusCode::OK;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(TEXT_CONTENT_TYPE),
    );

    response
}
