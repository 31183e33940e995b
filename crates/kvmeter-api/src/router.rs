use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    routing::{get, post},
};
use kvmeter_admin::metrics::ApiRequestCounter;
use kvmeter_storage::KvStore;

use crate::handlers;

pub struct ApiState {
    pub store: Arc<dyn KvStore>,
    pub api_counter: Arc<ApiRequestCounter>,
    pub key_prefix: String,
    pub api_delay: Duration,
}

impl ApiState {
    pub fn prefixed_key(&self, key: &str) -> String {
        format!("{}{key}", self.key_prefix)
    }
}

pub fn api_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api", get(handlers::api::handle_api))
        .route("/set/{key}/{value}", post(handlers::kv::set_value))
        .route("/get/{key}", get(handlers::kv::get_value))
        .with_state(state)
}
