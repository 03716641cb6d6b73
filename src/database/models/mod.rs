pub mod category;
pub mod customer;
pub mod order;
pub mod order_line;
pub mod product;
pub mod user;

pub use category::{Category, CategoryView};
pub use customer::{Customer, CustomerView};
pub use order::{Order, OrderStatus, OrderView};
pub use order_line::{OrderItemView, OrderLine, OrderLineView};
pub use product::{Product, ProductView};
pub use user::{User, UserView};
