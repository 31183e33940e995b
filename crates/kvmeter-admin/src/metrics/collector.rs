use std::sync::Arc;

use kvmeter_common::error::Result;

use crate::metrics::{
    counter::Counter,
    types::{MetricDescriptor, MetricType, Sample},
};

/// Source of metrics that is asked for its current values on every scrape.
///
/// `describe` must return the same descriptors for the lifetime of the
/// collector; the registry uses it to reject collisions before the collector
/// becomes visible. `collect` only reads state and must not emit a sample for a
/// descriptor that `describe` did not return.
pub trait Collector: Send + Sync {
    fn describe(&self) -> Vec<Arc<MetricDescriptor>>;
    fn collect(&self) -> Vec<Sample>;
}

/// A single [`Counter`] exported under one descriptor.
#[derive(Debug)]
pub struct CounterCollector {
    descriptor: Arc<MetricDescriptor>,
    counter: Counter,
}

impl CounterCollector {
    pub fn new(name: &str, help: &str, const_labels: &[(&str, &str)]) -> Result<Self> {
        Ok(Self {
            descriptor: Arc::new(MetricDescriptor::new(name, help, const_labels)?),
            counter: Counter::new(),
        })
    }

    pub fn inc(&self) {
        self.counter.inc();
    }

    pub fn get(&self) -> u64 {
        self.counter.get()
    }
}

impl Collector for CounterCollector {
    fn describe(&self) -> Vec<Arc<MetricDescriptor>> {
        vec![Arc::clone(&self.descriptor)]
    }

    fn collect(&self) -> Vec<Sample> {
        vec![Sample {
            descriptor: Arc::clone(&self.descriptor),
            value: self.counter.get() as f64,
            kind: MetricType::Counter,
        }]
    }
}
