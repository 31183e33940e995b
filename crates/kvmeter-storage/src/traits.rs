use async_trait::async_trait;
use bytes::Bytes;
use kvmeter_common::error::Result;

/// Byte-string key-value contract the HTTP proxy talks to.
///
/// `get` reports a missing key as [`KvmeterError::KeyNotFound`] so callers can
/// tell it apart from a store failure.
///
/// [`KvmeterError::KeyNotFound`]: kvmeter_common::KvmeterError::KeyNotFound
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &[u8]) -> Result<Bytes>;
    async fn set(&self, key: Bytes, value: Bytes) -> Result<()>;
    async fn ping(&self) -> Result<()>;
}
