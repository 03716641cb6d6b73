// Protected handlers: mounted under /api/v1 behind `jwt_auth_middleware`,
// with a role gate on each method route
pub mod categories;
pub mod customers;
pub mod order_lines;
pub mod orders;
pub mod products;
pub mod profile;
pub mod users;
