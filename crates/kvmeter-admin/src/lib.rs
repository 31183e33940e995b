pub mod handlers;
pub mod metrics;
pub mod router;

pub use router::{AdminState, admin_router};
