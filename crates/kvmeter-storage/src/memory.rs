use std::{
    collections::{HashMap, hash_map::DefaultHasher},
    hash::{Hash, Hasher},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use async_trait::async_trait;
use bytes::Bytes;
use kvmeter_common::error::{KvmeterError, Result};
use tracing::debug;

use crate::traits::KvStore;

pub const SLOT_COUNT: u16 = 16384;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRange {
    pub start: u16,
    pub end: u16,
}

type Shard = RwLock<HashMap<Bytes, Bytes>>;

/// In-memory store split into shards that each own a contiguous range of hash
/// slots.
#[derive(Debug)]
pub struct ShardedMemoryStore {
    shards: Vec<Shard>,
    slot_starts: Vec<u16>,
}

impl ShardedMemoryStore {
    pub fn new(shard_count: usize) -> Result<Self> {
        if shard_count == 0 || shard_count > usize::from(SLOT_COUNT) {
            return Err(KvmeterError::InvalidArgument(format!(
                "shard count must be between 1 and {SLOT_COUNT}, got {shard_count}"
            )));
        }

        let slot_starts = (0..shard_count)
            .map(|index| rounded_slot_boundary(index, shard_count))
            .collect();
        let shards = (0..shard_count).map(|_| RwLock::new(HashMap::new())).collect();

        Ok(Self {
            shards,
            slot_starts,
        })
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    pub fn slot_ranges(&self) -> Vec<SlotRange> {
        self.slot_starts
            .iter()
            .enumerate()
            .map(|(index, start)| {
                let end = self
                    .slot_starts
                    .get(index + 1)
                    .map(|next| next - 1)
                    .unwrap_or(SLOT_COUNT - 1);
                SlotRange { start: *start, end }
            })
            .collect()
    }

    pub fn slot_for_key(key: &[u8]) -> u16 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() % u64::from(SLOT_COUNT)) as u16
    }

    pub fn shard_for_slot(&self, slot: u16) -> usize {
        // slot_starts[0] is always 0, so the partition point is at least 1.
        self.slot_starts.partition_point(|start| *start <= slot) - 1
    }

    fn shard_for_key(&self, key: &[u8]) -> &Shard {
        let slot = Self::slot_for_key(key);
        let index = self.shard_for_slot(slot);
        debug!(slot, shard = index, "routed key");
        &self.shards[index]
    }

    fn shard_read(shard: &Shard) -> Result<RwLockReadGuard<'_, HashMap<Bytes, Bytes>>> {
        shard
            .read()
            .map_err(|_| KvmeterError::InternalError("store shard lock poisoned".to_string()))
    }

    fn shard_write(shard: &Shard) -> Result<RwLockWriteGuard<'_, HashMap<Bytes, Bytes>>> {
        shard
            .write()
            .map_err(|_| KvmeterError::InternalError("store shard lock poisoned".to_string()))
    }
}

#[async_trait]
impl KvStore for ShardedMemoryStore {
    async fn get(&self, key: &[u8]) -> Result<Bytes> {
        let shard = Self::shard_read(self.shard_for_key(key))?;
        shard
            .get(key)
            .cloned()
            .ok_or_else(|| KvmeterError::KeyNotFound(String::from_utf8_lossy(key).into_owned()))
    }

    async fn set(&self, key: Bytes, value: Bytes) -> Result<()> {
        let mut shard = Self::shard_write(self.shard_for_key(&key))?;
        shard.insert(key, value);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        for shard in &self.shards {
            Self::shard_read(shard)?;
        }
        Ok(())
    }
}

/// `round(index * SLOT_COUNT / shard_count)` in integer arithmetic, which
/// splits 3 shards into 0-5460, 5461-10922 and 10923-16383.
fn rounded_slot_boundary(index: usize, shard_count: usize) -> u16 {
    let slots = usize::from(SLOT_COUNT);
    ((2 * index * slots + shard_count) / (2 * shard_count)) as u16
}
