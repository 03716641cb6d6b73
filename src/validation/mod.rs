// Declarative payload validation
pub mod engine;
pub mod error;
pub mod extract;
pub mod schema;

pub use engine::validate;
pub use error::{FieldViolation, ValidationError};
pub use extract::{ValidBody, ValidPath, ValidQuery, Validated};
pub use schema::{Constraint, Field, FieldKind, Presence, Rule, Schema};
