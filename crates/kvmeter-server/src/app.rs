use std::sync::Arc;

use axum::Router;
use kvmeter_admin::{
    AdminState, admin_router,
    metrics::{ApiRequestCounter, MetricsRegistry, ProcessCollector},
};
use kvmeter_api::{ApiState, api_router};
use kvmeter_common::error::Result;
use kvmeter_storage::{KvStore, ShardedMemoryStore};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Cli;

pub struct App {
    pub router: Router,
    pub registry: Arc<MetricsRegistry>,
    pub api_counter: Arc<ApiRequestCounter>,
}

/// Builds the registry, store and routes. Registration errors surface here,
/// before anything is served.
pub fn build_app(cli: &Cli) -> Result<App> {
    let registry = Arc::new(MetricsRegistry::new());
    let api_counter = ApiRequestCounter::register(&registry, &cli.metric_namespace)?;
    registry.register(Arc::new(ProcessCollector::new(&cli.metric_namespace)?))?;

    let memory_store = ShardedMemoryStore::new(cli.shards)?;
    info!(shards = memory_store.shard_count(), "sharded memory store ready");
    for (shard, range) in memory_store.slot_ranges().iter().enumerate() {
        info!(shard, start = range.start, end = range.end, "store shard slots");
    }
    let store: Arc<dyn KvStore> = Arc::new(memory_store);

    let admin_state = Arc::new(AdminState::new(Arc::clone(&registry), Arc::clone(&store)));
    let api_state = Arc::new(ApiState {
        store,
        api_counter: Arc::clone(&api_counter),
        key_prefix: cli.key_prefix.clone(),
        api_delay: cli.api_delay(),
    });

    let router = admin_router(admin_state)
        .merge(api_router(api_state))
        .layer(TraceLayer::new_for_http());

    Ok(App {
        router,
        registry,
        api_counter,
    })
}
