use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::models::order::OrderStatus;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Errors from the data-access layer, already classified for the API boundary
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(ref db) => match db.code().as_deref() {
                Some("23505") => DatabaseError::UniqueViolation(unique_message(db.constraint())),
                Some("23503") => DatabaseError::ForeignKeyViolation(foreign_key_message(db.message())),
                _ => DatabaseError::QueryError(db.message().to_string()),
            },
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                DatabaseError::ConnectionError(err.to_string())
            }
            other => DatabaseError::Sqlx(other),
        }
    }
}

fn unique_message(constraint: Option<&str>) -> String {
    match constraint {
        Some("users_email_key") => "Email already in use".to_string(),
        Some("categories_name_key") => "Category name already in use".to_string(),
        Some("customers_user_id_key") => "User already has a customer profile".to_string(),
        _ => "Resource already exists".to_string(),
    }
}

fn foreign_key_message(message: &str) -> String {
    if message.starts_with("update or delete") {
        "Record is still referenced by other records".to_string()
    } else {
        "Referenced record does not exist".to_string()
    }
}

/// Explicitly constructed data-access handle shared through application state
#[derive(Clone, Debug)]
pub struct Database {
    pool: PgPool,
    log_queries: bool,
}

impl Database {
    /// Build the pool without connecting; the first query opens a connection
    pub fn connect_lazy(config: &DatabaseConfig, log_queries: bool) -> Result<Self, DatabaseError> {
        if config.url.is_empty() {
            return Err(DatabaseError::Config("DATABASE_URL is not set".to_string()));
        }

        let options = PgConnectOptions::from_str(&config.url)
            .map_err(|e| DatabaseError::Config(format!("invalid DATABASE_URL: {}", e)))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_lazy_with(options);

        Ok(Self { pool, log_queries })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn log_queries(&self) -> bool {
        self.log_queries
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Apply the bundled schema; every statement is idempotent
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        for statement in schema_statements() {
            sqlx::query(statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;

        info!("Database schema is up to date");
        Ok(())
    }

    /// Close the pool on shutdown
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}

fn schema_statements() -> impl Iterator<Item = &'static str> {
    SCHEMA_SQL
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.lines().all(|l| l.trim_start().starts_with("--")))
}
