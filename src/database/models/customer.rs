use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::user::User;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub last_name: String,
    pub phone: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Customer with the user account it belongs to
#[derive(Debug, Clone, Serialize)]
pub struct CustomerView {
    #[serde(flatten)]
    pub customer: Customer,
    pub user: Option<User>,
}
