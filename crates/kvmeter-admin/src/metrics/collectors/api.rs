use std::sync::Arc;

use kvmeter_common::error::Result;

use crate::metrics::{
    collector::{Collector, CounterCollector},
    registry::MetricsRegistry,
    types::{MetricDescriptor, Sample},
};

pub const API_REQUEST_COUNT_NAME: &str = "api_request_count_total";

/// Counts calls to the business API, labelled with the configured zone.
#[derive(Debug)]
pub struct ApiRequestCounter {
    zone: String,
    requests: CounterCollector,
}

impl ApiRequestCounter {
    pub fn new(zone: &str) -> Result<Self> {
        Ok(Self {
            zone: zone.to_string(),
            requests: CounterCollector::new(
                API_REQUEST_COUNT_NAME,
                "Total number of API requests",
                &[("zone", zone)],
            )?,
        })
    }

    pub fn register(registry: &MetricsRegistry, zone: &str) -> Result<Arc<Self>> {
        let counter = Arc::new(Self::new(zone)?);
        registry.register(counter.clone())?;
        Ok(counter)
    }

    pub fn increment_request_count(&self) {
        self.requests.inc();
    }

    pub fn request_count(&self) -> u64 {
        self.requests.get()
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }
}

impl Collector for ApiRequestCounter {
    fn describe(&self) -> Vec<Arc<MetricDescriptor>> {
        self.requests.describe()
    }

    fn collect(&self) -> Vec<Sample> {
        self.requests.collect()
    }
}
