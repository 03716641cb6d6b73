pub mod auth;
pub mod response;
pub mod role;

pub use auth::jwt_auth_middleware;
pub use response::{ApiResponse, ApiResult, Deleted};
pub use role::{authorize, require_roles, Decision, RoleGate};
