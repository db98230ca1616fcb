pub mod error;
pub mod handlers;
pub mod router;
pub mod types;

pub use error::ApiResponse;
pub use router::create_router;
pub use types::*;
