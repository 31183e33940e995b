pub mod api;
pub mod kv;
