use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, PoisonError, RwLock},
};

use kvmeter_common::error::{KvmeterError, Result};
use tracing::debug;

use crate::metrics::{
    collector::{Collector, CounterCollector},
    encoding::encode_text,
    types::{DescriptorId, MetricDescriptor, Sample},
};

struct RegisteredCollector {
    collector: Arc<dyn Collector>,
    described: Arc<HashSet<DescriptorId>>,
}

/// What every descriptor sharing a metric name must agree on.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FamilyShape {
    help: String,
    label_keys: Vec<String>,
}

impl FamilyShape {
    fn of(descriptor: &MetricDescriptor) -> Self {
        Self {
            help: descriptor.help().to_string(),
            label_keys: descriptor
                .const_labels()
                .iter()
                .map(|(key, _)| key.clone())
                .collect(),
        }
    }
}

#[derive(Default)]
struct RegistryInner {
    collectors: Vec<RegisteredCollector>,
    identities: HashSet<DescriptorId>,
    families: HashMap<String, FamilyShape>,
}

/// Ordered, deduplicated set of collectors queried on every scrape.
///
/// The lock guards the collector list only. Counters owned by collectors are
/// never locked, so `gather` and the request hot path do not contend.
#[derive(Default)]
pub struct MetricsRegistry {
    inner: RwLock<RegistryInner>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a collector after checking every descriptor it describes.
    ///
    /// Fails with `AlreadyRegistered` when a name and label set is taken, and
    /// with `InconsistentFamily` when a descriptor shares a name with another
    /// one but differs in help text or label names. Nothing is stored on
    /// failure.
    pub fn register(&self, collector: Arc<dyn Collector>) -> Result<()> {
        let descriptors = collector.describe();

        let mut inner = self.inner.write().map_err(|_| {
            KvmeterError::InternalError("failed to acquire metrics registry lock".to_string())
        })?;

        let mut fresh = HashSet::with_capacity(descriptors.len());
        let mut fresh_families: HashMap<String, FamilyShape> = HashMap::new();
        for descriptor in &descriptors {
            let identity = descriptor.identity();
            if inner.identities.contains(&identity) || fresh.contains(&identity) {
                return Err(KvmeterError::AlreadyRegistered(identity.to_string()));
            }

            let name = descriptor.name();
            let shape = FamilyShape::of(descriptor);
            let known = inner
                .families
                .get(name)
                .or_else(|| fresh_families.get(name))
                .cloned();
            match known {
                Some(existing) if existing != shape => {
                    return Err(KvmeterError::InconsistentFamily(format!(
                        "{name} differs in help text or label names from an earlier descriptor"
                    )));
                }
                Some(_) => {}
                None => {
                    fresh_families.insert(name.to_string(), shape);
                }
            }

            fresh.insert(identity);
        }

        debug!(descriptors = fresh.len(), "registered metrics collector");
        inner.identities.extend(fresh.iter().cloned());
        inner.families.extend(fresh_families);
        inner.collectors.push(RegisteredCollector {
            collector,
            described: Arc::new(fresh),
        });
        Ok(())
    }

    pub fn register_counter(
        &self,
        name: &str,
        help: &str,
        const_labels: &[(&str, &str)],
    ) -> Result<Arc<CounterCollector>> {
        let counter = Arc::new(CounterCollector::new(name, help, const_labels)?);
        self.register(counter.clone())?;
        Ok(counter)
    }

    /// Collects every registered collector in registration order.
    ///
    /// # Panics
    ///
    /// Panics if a collector emits a sample for a descriptor it did not
    /// describe at registration.
    pub fn gather(&self) -> Vec<Sample> {
        let collectors = {
            let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
            inner
                .collectors
                .iter()
                .map(|entry| (Arc::clone(&entry.collector), Arc::clone(&entry.described)))
                .collect::<Vec<_>>()
        };

        let mut samples = Vec::new();
        for (collector, described) in collectors {
            for sample in collector.collect() {
                let identity = sample.descriptor.identity();
                assert!(
                    described.contains(&identity),
                    "collector emitted undescribed metric {identity}"
                );
                samples.push(sample);
            }
        }
        samples
    }

    pub fn render_text(&self) -> String {
        encode_text(&self.gather())
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .collectors
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::metrics::types::{MetricDescriptor, MetricType};

    fn values(registry: &MetricsRegistry) -> Vec<(String, f64)> {
        registry
            .gather()
            .into_iter()
            .map(|sample| (sample.descriptor.name().to_string(), sample.value))
            .collect()
    }

    #[test]
    fn colliding_registration_is_rejected_without_side_effects() {
        let registry = MetricsRegistry::new();
        let first = registry
            .register_counter("api_request_count_total", "first", &[("zone", "app")])
            .unwrap();
        first.inc();

        let second = Arc::new(
            CounterCollector::new("api_request_count_total", "second", &[("zone", "app")])
                .unwrap(),
        );
        second.inc();
        second.inc();

        let err = registry.register(second).unwrap_err();
        assert!(matches!(err, KvmeterError::AlreadyRegistered(_)));
        assert_eq!(registry.len(), 1);

        let samples = registry.gather();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].descriptor.help(), "first");
        assert_eq!(samples[0].value, 1.0);
    }

    #[test]
    fn same_name_with_different_label_values_is_allowed() {
        let registry = MetricsRegistry::new();
        registry
            .register_counter("requests_total", "help", &[("zone", "a")])
            .unwrap();
        registry
            .register_counter("requests_total", "help", &[("zone", "b")])
            .unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn same_name_with_different_help_is_rejected() {
        let registry = MetricsRegistry::new();
        registry
            .register_counter("requests_total", "first help", &[("zone", "a")])
            .unwrap();
        registry.register_counter("other_total", "help", &[]).unwrap();

        let err = registry
            .register_counter("requests_total", "different help", &[("zone", "b")])
            .err()
            .unwrap();
        assert!(matches!(err, KvmeterError::InconsistentFamily(_)));
        assert_eq!(registry.len(), 2);

        let output = registry.render_text();
        assert_eq!(output.matches("# HELP requests_total").count(), 1);
        assert!(!output.contains("different help"));
    }

    #[test]
    fn same_name_with_different_label_names_is_rejected() {
        let registry = MetricsRegistry::new();
        registry
            .register_counter("requests_total", "help", &[("zone", "a")])
            .unwrap();

        let mismatched: [&[(&str, &str)]; 3] =
            [&[("region", "a")], &[], &[("zone", "b"), ("env", "x")]];
        for labels in mismatched {
            let err = registry
                .register_counter("requests_total", "help", labels)
                .err()
                .unwrap();
            assert!(matches!(err, KvmeterError::InconsistentFamily(_)));
        }
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn interleaved_family_members_render_under_one_header() {
        let registry = MetricsRegistry::new();
        let first = registry
            .register_counter("requests_total", "Requests", &[("zone", "a")])
            .unwrap();
        registry.register_counter("other_total", "Other", &[]).unwrap();
        let second = registry
            .register_counter("requests_total", "Requests", &[("zone", "b")])
            .unwrap();
        first.inc();
        second.inc();
        second.inc();

        let output = registry.render_text();
        assert_eq!(output.matches("# HELP requests_total").count(), 1);
        assert_eq!(output.matches("# TYPE requests_total").count(), 1);
        assert!(output.starts_with(
            "# HELP requests_total Requests\n\
             # TYPE requests_total counter\n\
             requests_total{zone=\"a\"} 1\n\
             requests_total{zone=\"b\"} 2\n"
        ));
    }

    struct PairCollector {
        descriptors: Vec<Arc<MetricDescriptor>>,
    }

    impl Collector for PairCollector {
        fn describe(&self) -> Vec<Arc<MetricDescriptor>> {
            self.descriptors.clone()
        }

        fn collect(&self) -> Vec<Sample> {
            self.descriptors
                .iter()
                .map(|descriptor| Sample {
                    descriptor: Arc::clone(descriptor),
                    value: 7.0,
                    kind: MetricType::Gauge,
                })
                .collect()
        }
    }

    #[test]
    fn partial_collision_registers_nothing() {
        let registry = MetricsRegistry::new();
        registry.register_counter("taken", "help", &[]).unwrap();

        let pair = Arc::new(PairCollector {
            descriptors: vec![
                Arc::new(MetricDescriptor::new("free", "help", &[]).unwrap()),
                Arc::new(MetricDescriptor::new("taken", "help", &[]).unwrap()),
            ],
        });
        assert!(registry.register(pair).is_err());

        // "free" must still be available after the failed attempt.
        registry.register_counter("free", "help", &[]).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn collector_describing_a_duplicate_of_itself_is_rejected() {
        let registry = MetricsRegistry::new();
        let descriptor = Arc::new(MetricDescriptor::new("twice", "help", &[]).unwrap());
        let pair = Arc::new(PairCollector {
            descriptors: vec![Arc::clone(&descriptor), descriptor],
        });

        assert!(matches!(
            registry.register(pair),
            Err(KvmeterError::AlreadyRegistered(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn collector_with_inconsistent_members_is_rejected() {
        let registry = MetricsRegistry::new();
        let pair = Arc::new(PairCollector {
            descriptors: vec![
                Arc::new(MetricDescriptor::new("mixed", "one", &[("zone", "a")]).unwrap()),
                Arc::new(MetricDescriptor::new("mixed", "two", &[("zone", "b")]).unwrap()),
            ],
        });

        assert!(matches!(
            registry.register(pair),
            Err(KvmeterError::InconsistentFamily(_))
        ));
        assert!(registry.is_empty());
        registry.register_counter("mixed", "two", &[]).unwrap();
    }

    #[test]
    fn gather_follows_registration_order() {
        let registry = MetricsRegistry::new();
        for name in ["zeta_total", "alpha_total", "mid_total"] {
            registry.register_counter(name, "help", &[]).unwrap();
        }

        let expected = vec![
            ("zeta_total".to_string(), 0.0),
            ("alpha_total".to_string(), 0.0),
            ("mid_total".to_string(), 0.0),
        ];
        assert_eq!(values(&registry), expected);
        assert_eq!(values(&registry), expected);
    }

    #[test]
    fn gather_tracks_live_counter_values() {
        let registry = MetricsRegistry::new();
        let counter = registry
            .register_counter("api_request_count_total", "help", &[("zone", "app")])
            .unwrap();

        assert_eq!(values(&registry)[0].1, 0.0);

        for _ in 0..5 {
            counter.inc();
        }
        assert_eq!(values(&registry)[0].1, 5.0);

        std::thread::scope(|scope| {
            for _ in 0..10 {
                scope.spawn(|| {
                    for _ in 0..100 {
                        counter.inc();
                    }
                });
            }
        });
        assert_eq!(values(&registry)[0].1, 1005.0);

        for _ in 0..5 {
            assert_eq!(values(&registry)[0].1, 1005.0);
        }
    }

    #[test]
    fn gather_runs_alongside_increments_and_registration() {
        let registry = MetricsRegistry::new();
        let counter = registry.register_counter("hot_total", "help", &[]).unwrap();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..1_000 {
                        counter.inc();
                    }
                });
            }
            scope.spawn(|| {
                let mut last = 0.0;
                for _ in 0..200 {
                    let current = registry.gather()[0].value;
                    assert!(current >= last);
                    last = current;
                }
            });
            scope.spawn(|| {
                for index in 0..20 {
                    registry
                        .register_counter(&format!("late_{index}_total"), "help", &[])
                        .unwrap();
                }
            });
        });

        assert_eq!(counter.get(), 4_000);
        assert_eq!(registry.len(), 21);
    }

    struct RogueCollector;

    impl Collector for RogueCollector {
        fn describe(&self) -> Vec<Arc<MetricDescriptor>> {
            vec![Arc::new(MetricDescriptor::new("declared", "help", &[]).unwrap())]
        }

        fn collect(&self) -> Vec<Sample> {
            vec![Sample {
                descriptor: Arc::new(MetricDescriptor::new("smuggled", "help", &[]).unwrap()),
                value: 1.0,
                kind: MetricType::Counter,
            }]
        }
    }

    #[test]
    #[should_panic(expected = "undescribed metric smuggled")]
    fn undescribed_sample_is_fatal() {
        let registry = MetricsRegistry::new();
        registry.register(Arc::new(RogueCollector)).unwrap();
        registry.gather();
    }
}
