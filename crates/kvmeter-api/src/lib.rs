pub mod error;
pub mod handlers;
pub mod router;

pub use router::{ApiState, api_router};
