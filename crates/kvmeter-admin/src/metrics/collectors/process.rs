use std::{sync::Arc, time::Instant};

use chrono::Utc;
use kvmeter_common::error::Result;

use crate::metrics::{
    collector::Collector,
    types::{MetricDescriptor, MetricType, Sample},
};

/// Process gauges computed at scrape time.
pub struct ProcessCollector {
    started_at: Instant,
    start_time_seconds: f64,
    uptime: Arc<MetricDescriptor>,
    start_time: Arc<MetricDescriptor>,
    resident_memory: Arc<MetricDescriptor>,
}

impl ProcessCollector {
    pub fn new(zone: &str) -> Result<Self> {
        let labels = [("zone", zone)];
        Ok(Self {
            started_at: Instant::now(),
            start_time_seconds: Utc::now().timestamp_millis() as f64 / 1000.0,
            uptime: Arc::new(MetricDescriptor::new(
                "process_uptime_seconds",
                "Process uptime in seconds",
                &labels,
            )?),
            start_time: Arc::new(MetricDescriptor::new(
                "process_start_time_seconds",
                "Start time of the process since unix epoch in seconds",
                &labels,
            )?),
            resident_memory: Arc::new(MetricDescriptor::new(
                "process_resident_memory_bytes",
                "Resident memory size of the process in bytes",
                &labels,
            )?),
        })
    }
}

impl Collector for ProcessCollector {
    fn describe(&self) -> Vec<Arc<MetricDescriptor>> {
        vec![
            Arc::clone(&self.uptime),
            Arc::clone(&self.start_time),
            Arc::clone(&self.resident_memory),
        ]
    }

    fn collect(&self) -> Vec<Sample> {
        let mut samples = vec![
            gauge(&self.uptime, self.started_at.elapsed().as_secs_f64()),
            gauge(&self.start_time, self.start_time_seconds),
        ];

        // Absent off Linux or when procfs is unreadable.
        if let Some(resident_bytes) = read_resident_memory_bytes() {
            samples.push(gauge(&self.resident_memory, resident_bytes as f64));
        }

        samples
    }
}

fn gauge(descriptor: &Arc<MetricDescriptor>, value: f64) -> Sample {
    Sample {
        descriptor: Arc::clone(descriptor),
        value,
        kind: MetricType::Gauge,
    }
}

#[cfg(target_os = "linux")]
fn read_resident_memory_bytes() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    for line in status.lines() {
        if let Some(rest) = line.strip_prefix("VmRSS:") {
            let kb = rest
                .split_whitespace()
                .next()
                .and_then(|value| value.parse::<u64>().ok())?;
            return kb.checked_mul(1024);
        }
    }
    None
}

#[cfg(not(target_os = "linux"))]
fn read_resident_memory_bytes() -> Option<u64> {
    None
}
