pub mod api;
pub mod process;
