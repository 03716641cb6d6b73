use std::collections::HashMap;

use sqlx::PgExecutor;

use crate::app::AppState;
use crate::auth::{hash_password, Role};
use crate::database::models::{Customer, User, UserView};
use crate::database::{Database, DatabaseError, Repository};
use crate::error::ApiError;
use crate::filter::Filter;
use crate::middleware::Deleted;
use crate::schemas::user::{CreateUser, UpdateUser};

use super::first_view;

pub struct UserService<'a> {
    state: &'a AppState,
    users: Repository<User>,
}

impl<'a> UserService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            state,
            users: Repository::new("users", &state.db),
        }
    }

    pub async fn create(&self, input: CreateUser) -> Result<UserView, ApiError> {
        let password_hash = hash_password(input.password, self.state.config.security.bcrypt_cost).await?;
        let user = insert_user(self.state.db.pool(), &input.email, &password_hash, input.role).await?;
        tracing::info!("Created user {} with role {}", user.id, user.role);
        Ok(UserView { user, customer: None })
    }

    pub async fn find(&self, filter: Filter) -> Result<Vec<UserView>, ApiError> {
        let users = self.users.select_any(filter).await?;
        Ok(load_views(&self.state.db, users).await?)
    }

    pub async fn find_one(&self, id: i64) -> Result<UserView, ApiError> {
        let user = self.users.select_404(id).await?;
        first_view(load_views(&self.state.db, vec![user]).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(self.state.db.pool())
            .await
            .map_err(DatabaseError::from)?;
        Ok(user)
    }

    pub async fn update(&self, id: i64, changes: UpdateUser) -> Result<UserView, ApiError> {
        self.users.select_404(id).await?;
        update_user(self.state.db.pool(), id, changes).await?;
        self.find_one(id).await
    }

    pub async fn find_record(&self, id: i64) -> Result<User, ApiError> {
        Ok(self.users.select_404(id).await?)
    }

    /// Swap the password only while the stored hash is still `current_hash`; false if it moved on
    pub async fn replace_password(&self, id: i64, current_hash: &str, password: String) -> Result<bool, ApiError> {
        let password_hash = hash_password(password, self.state.config.security.bcrypt_cost).await?;
        let result = sqlx::query("UPDATE users SET password_hash = $3 WHERE id = $1 AND password_hash = $2")
            .bind(id)
            .bind(current_hash)
            .bind(password_hash)
            .execute(self.state.db.pool())
            .await
            .map_err(DatabaseError::from)?;
        Ok(result.rows_affected() == 1)
    }

    /// Removes the user and, through the store's cascade, its customer profile
    pub async fn delete(&self, id: i64) -> Result<Deleted<i64>, ApiError> {
        self.users.select_404(id).await?;
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.state.db.pool())
            .await
            .map_err(DatabaseError::from)?;
        Ok(Deleted { id })
    }
}

pub(crate) async fn insert_user<'e, E: PgExecutor<'e>>(
    executor: E,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<User, DatabaseError> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (email, password_hash, role) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(email)
    .bind(password_hash)
    .bind(role.as_str())
    .fetch_one(executor)
    .await?;
    Ok(user)
}

/// Apply only the supplied fields
pub(crate) async fn update_user<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
    changes: UpdateUser,
) -> Result<(), DatabaseError> {
    sqlx::query("UPDATE users SET email = COALESCE($2, email), role = COALESCE($3, role) WHERE id = $1")
        .bind(id)
        .bind(changes.email)
        .bind(changes.role.map(|r| r.as_str()))
        .execute(executor)
        .await?;
    Ok(())
}

/// Attach each user's customer profile in one batched query
pub(crate) async fn load_views(db: &Database, users: Vec<User>) -> Result<Vec<UserView>, DatabaseError> {
    let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
    let mut customers: HashMap<i64, Customer> = Repository::<Customer>::new("customers", db)
        .select_ids("user_id", &ids)
        .await?
        .into_iter()
        .map(|c| (c.user_id, c))
        .collect();

    Ok(users
        .into_iter()
        .map(|user| {
            let customer = customers.remove(&user.id);
            UserView { user, customer }
        })
        .collect())
}
