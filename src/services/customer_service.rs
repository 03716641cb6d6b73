use std::collections::HashMap;

use sqlx::PgExecutor;

use crate::app::AppState;
use crate::auth::hash_password;
use crate::database::models::{Customer, CustomerView, User};
use crate::database::{Database, DatabaseError, Repository};
use crate::error::ApiError;
use crate::filter::Filter;
use crate::middleware::Deleted;
use crate::schemas::customer::{CreateCustomer, UpdateCustomer};

use super::first_view;
use super::user_service::{insert_user, update_user};

pub struct CustomerService<'a> {
    state: &'a AppState,
    customers: Repository<Customer>,
}

impl<'a> CustomerService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            state,
            customers: Repository::new("customers", &state.db),
        }
    }

    /// Creates the user account and its customer profile in one transaction
    pub async fn create(&self, input: CreateCustomer) -> Result<CustomerView, ApiError> {
        let password_hash = hash_password(input.user.password.clone(), self.state.config.security.bcrypt_cost).await?;

        let mut tx = self.state.db.pool().begin().await.map_err(DatabaseError::from)?;
        let view = insert_customer_with_user(&mut tx, &input, &password_hash).await?;
        tx.commit().await.map_err(DatabaseError::from)?;

        tracing::info!("Created customer {} for user {}", view.customer.id, view.customer.user_id);
        Ok(view)
    }

    pub async fn find(&self, filter: Filter) -> Result<Vec<CustomerView>, ApiError> {
        let customers = self.customers.select_any(filter).await?;
        Ok(load_views(&self.state.db, customers).await?)
    }

    pub async fn find_one(&self, id: i64) -> Result<CustomerView, ApiError> {
        let customer = self.customers.select_404(id).await?;
        first_view(load_views(&self.state.db, vec![customer]).await?)
    }

    /// The profile and its nested user changes commit together
    pub async fn update(&self, id: i64, changes: UpdateCustomer) -> Result<CustomerView, ApiError> {
        let customer = self.customers.select_404(id).await?;

        let mut tx = self.state.db.pool().begin().await.map_err(DatabaseError::from)?;
        sqlx::query(
            "UPDATE customers SET name = COALESCE($2, name), last_name = COALESCE($3, last_name), \
             phone = COALESCE($4, phone) WHERE id = $1",
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.last_name)
        .bind(changes.phone)
        .execute(&mut *tx)
        .await
        .map_err(DatabaseError::from)?;

        if let Some(user_changes) = changes.user {
            update_user(&mut *tx, customer.user_id, user_changes).await?;
        }
        tx.commit().await.map_err(DatabaseError::from)?;

        self.find_one(id).await
    }

    /// Orders placed by the customer are kept with their customer reference cleared
    pub async fn delete(&self, id: i64) -> Result<Deleted<i64>, ApiError> {
        self.customers.select_404(id).await?;
        sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(self.state.db.pool())
            .await
            .map_err(DatabaseError::from)?;
        Ok(Deleted { id })
    }
}

/// Insert a user and its customer profile on an open transaction
pub(crate) async fn insert_customer_with_user(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    input: &CreateCustomer,
    password_hash: &str,
) -> Result<CustomerView, DatabaseError> {
    let user = insert_user(&mut **tx, &input.user.email, password_hash, input.user.role).await?;
    let customer = insert_customer(&mut **tx, input, user.id).await?;
    Ok(CustomerView { customer, user: Some(user) })
}

async fn insert_customer<'e, E: PgExecutor<'e>>(
    executor: E,
    input: &CreateCustomer,
    user_id: i64,
) -> Result<Customer, DatabaseError> {
    let customer = sqlx::query_as::<_, Customer>(
        "INSERT INTO customers (name, last_name, phone, user_id) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(&input.name)
    .bind(&input.last_name)
    .bind(&input.phone)
    .bind(user_id)
    .fetch_one(executor)
    .await?;
    Ok(customer)
}

/// Attach each customer's user account in one batched query
pub(crate) async fn load_views(db: &Database, customers: Vec<Customer>) -> Result<Vec<CustomerView>, DatabaseError> {
    let ids: Vec<i64> = customers.iter().map(|c| c.user_id).collect();
    let users: HashMap<i64, User> = Repository::<User>::new("users", db)
        .select_ids("id", &ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    Ok(customers
        .into_iter()
        .map(|customer| {
            let user = users.get(&customer.user_id).cloned();
            CustomerView { customer, user }
        })
        .collect())
}
