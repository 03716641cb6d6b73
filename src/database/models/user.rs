use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::customer::Customer;
use crate::auth::Role;
use crate::database::DatabaseError;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Result<Role, DatabaseError> {
        self.role
            .parse()
            .map_err(|e: String| DatabaseError::QueryError(format!("user {}: {}", self.id, e)))
    }
}

/// User with its customer profile, if any
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    #[serde(flatten)]
    pub user: User,
    pub customer: Option<Customer>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 1,
            email: "ana@example.com".to_string(),
            password_hash: "$2b$04$secret".to_string(),
            role: "seller".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let value = serde_json::to_value(UserView { user: user(), customer: None }).unwrap();
        assert!(value.get("passwordHash").is_none());
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["email"], "ana@example.com");
        assert!(value["customer"].is_null());
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn stored_role_parses() {
        assert_eq!(user().role().unwrap(), Role::Seller);
        let mut broken = user();
        broken.role = "root".to_string();
        assert!(broken.role().is_err());
    }
}
