use std::time::Duration;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "kvmeter", about = "Key-value proxy with a pull-based request counter")]
pub struct Cli {
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, default_value = "8080")]
    pub port: u16,

    /// Value of the `zone` label attached to exported metrics.
    #[arg(long, alias = "metric.namespace", default_value = "app")]
    pub metric_namespace: String,

    /// Prefix prepended to every key before it reaches the store.
    #[arg(long, default_value = "kvmeter:prefix:")]
    pub key_prefix: String,

    #[arg(long, default_value = "3")]
    pub shards: usize,

    /// Simulated work per `/api` call; 0 disables the delay.
    #[arg(long, default_value = "1000")]
    pub api_delay_ms: u64,
}

impl Cli {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn api_delay(&self) -> Duration {
        Duration::from_millis(self.api_delay_ms)
    }
}
