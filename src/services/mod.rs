pub mod auth_service;
pub mod category_service;
pub mod customer_service;
pub mod mailer;
pub mod order_line_service;
pub mod order_service;
pub mod product_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use category_service::CategoryService;
pub use customer_service::CustomerService;
pub use mailer::{LogMailer, Mail, MailError, Mailer};
pub use order_line_service::OrderLineService;
pub use order_service::OrderService;
pub use product_service::ProductService;
pub use user_service::UserService;

use crate::error::ApiError;

/// Single-record lookups load views through the batch path; exactly one comes back
pub(crate) fn first_view<T>(views: Vec<T>) -> Result<T, ApiError> {
    views
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::internal_server_error("Loaded record disappeared"))
}
