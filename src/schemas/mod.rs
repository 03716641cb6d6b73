//! Request schemas and the DTOs they guard, one module per resource

pub mod auth;
pub mod category;
pub mod customer;
pub mod order;
pub mod order_line;
pub mod product;
pub mod user;

use once_cell::sync::Lazy;
use serde::Deserialize;
use uuid::Uuid;

use crate::validation::{Field, Rule, Schema};

/// Bind a DTO type to the static schema that validates it
macro_rules! validated {
    ($($ty:ty => $schema:expr),+ $(,)?) => {
        $(
            impl $crate::validation::Validated for $ty {
                fn schema() -> &'static $crate::validation::Schema {
                    &$schema
                }
            }
        )+
    };
}
pub(crate) use validated;

const DIRECTIONS: &[&str] = &["asc", "desc"];

pub fn sort_field(name: &'static str) -> Field {
    Field::one_of(name, DIRECTIONS)
}

/// List-query schema: shared paging and primary key ordering plus resource keys
pub fn query_schema(fields: Vec<Field>) -> Schema {
    let common = vec![
        Field::integer("offset").min(0).when_absent("limit", Rule::new().max(1000)),
        Field::integer("limit").min(1).max(1000).when_present("offset", Rule::new().max(100)),
        sort_field("order"),
        Field::boolean("order_desc"),
    ];
    Schema::new(common.into_iter().chain(fields).collect()).nand(&["order", "order_desc"])
}

pub static ID_PATH: Lazy<Schema> = Lazy::new(|| Schema::new(vec![Field::integer("id").required()]));
pub static UUID_PATH: Lazy<Schema> = Lazy::new(|| Schema::new(vec![Field::uuid("id").required()]));

/// `/:id` for integer-keyed resources
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IdPath {
    pub id: i64,
}

/// `/:id` for products
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UuidPath {
    pub id: Uuid,
}

validated!(IdPath => ID_PATH, UuidPath => UUID_PATH);
