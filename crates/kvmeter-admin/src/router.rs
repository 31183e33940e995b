use std::sync::Arc;

use axum::{Router, routing::get};
use kvmeter_storage::KvStore;

use crate::{handlers, metrics::MetricsRegistry};

pub struct AdminState {
    pub registry: Arc<MetricsRegistry>,
    pub store: Arc<dyn KvStore>,
}

impl AdminState {
    pub fn new(registry: Arc<MetricsRegistry>, store: Arc<dyn KvStore>) -> Self {
        Self { registry, store }
    }
}

pub fn admin_router(state: Arc<AdminState>) -> Router {
    Router::new()
        .route("/", get(handlers::index::index))
        .route("/metrics", get(handlers::metrics::prometheus_metrics))
        .route("/health/live", get(handlers::health::health_live))
        .route("/health/ready", get(handlers::health::health_ready))
        .with_state(state)
}
