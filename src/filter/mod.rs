pub mod builder;
pub mod error;
pub mod filter;
pub mod filter_order;
pub mod filter_where;
pub mod rules;
pub mod types;

pub use builder::build_filter;
pub use filter::Filter;
pub use rules::ResourceKind;
pub use types::*;
