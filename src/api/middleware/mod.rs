pub mod auth;
pub mod request_id;

pub use auth::{AuthenticatedUser, BearerAuth};
pub use request_id::{RequestId, RequestIdMiddleware};
