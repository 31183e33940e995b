pub mod memory;
pub mod traits;

pub use memory::{SLOT_COUNT, ShardedMemoryStore, SlotRange};
pub use traits::KvStore;
