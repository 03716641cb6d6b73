// Public handlers: no authentication, mounted at `/` and `/auth/*`
pub mod auth;
pub mod root;

pub use auth::{forgot_password, login, logout, refresh_token, register, reset_password};
pub use root::{health, index};
