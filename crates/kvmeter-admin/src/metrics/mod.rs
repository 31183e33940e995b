pub mod collector;
pub mod collectors;
pub mod counter;
pub mod encoding;
pub mod registry;
pub mod types;

pub use collector::{Collector, CounterCollector};
pub use collectors::{api::ApiRequestCounter, process::ProcessCollector};
pub use counter::Counter;
pub use encoding::{TEXT_CONTENT_TYPE, encode_text};
pub use registry::MetricsRegistry;
pub use types::{MetricDescriptor, MetricType, Sample};
