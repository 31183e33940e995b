pub mod app;
pub mod config;

pub use app::{App, build_app};
pub use config::Cli;
