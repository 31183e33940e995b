pub mod error;

pub use error::{KvmeterError, Result};
