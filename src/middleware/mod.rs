pub mod auth;
pub mod response;

pub use auth::{authenticate, authorize};
pub use response::{ApiResponse, ApiResult};
