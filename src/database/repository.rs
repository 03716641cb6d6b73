use std::fmt::Display;

use sqlx::{
    postgres::{PgArguments, PgRow},
    query::QueryAs,
    FromRow, Postgres,
};
use uuid::Uuid;

use crate::database::manager::{Database, DatabaseError};
use crate::database::query_builder::QueryBuilder;
use crate::filter::Filter;

/// Primary or foreign key type that can be bound as a Postgres array
pub trait RecordKey: Copy + Display + Send + Sync + 'static {
    fn bind_all<'q, O>(q: QueryAs<'q, Postgres, O, PgArguments>, ids: &[Self]) -> QueryAs<'q, Postgres, O, PgArguments>
    where
        O: for<'r> FromRow<'r, PgRow>;
}

impl RecordKey for i64 {
    fn bind_all<'q, O>(q: QueryAs<'q, Postgres, O, PgArguments>, ids: &[Self]) -> QueryAs<'q, Postgres, O, PgArguments>
    where
        O: for<'r> FromRow<'r, PgRow>,
    {
        q.bind(ids.to_vec())
    }
}

impl RecordKey for Uuid {
    fn bind_all<'q, O>(q: QueryAs<'q, Postgres, O, PgArguments>, ids: &[Self]) -> QueryAs<'q, Postgres, O, PgArguments>
    where
        O: for<'r> FromRow<'r, PgRow>,
    {
        q.bind(ids.to_vec())
    }
}

/// Read access to one table
pub struct Repository<T> {
    table_name: &'static str,
    db: Database,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(table_name: &'static str, db: &Database) -> Self {
        Self {
            table_name,
            db: db.clone(),
            _phantom: std::marker::PhantomData,
        }
    }

    pub async fn select_any(&self, filter: Filter) -> Result<Vec<T>, DatabaseError> {
        QueryBuilder::<T>::new(filter)
            .log_queries(self.db.log_queries())
            .select_all(self.db.pool())
            .await
    }

    /// Batch load rows whose `column` is in `ids`, one query regardless of count
    pub async fn select_ids<K: RecordKey>(&self, column: &'static str, ids: &[K]) -> Result<Vec<T>, DatabaseError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let query = format!(
            "SELECT * FROM \"{}\" WHERE \"{}\" = ANY($1) ORDER BY \"id\"",
            self.table_name, column
        );
        let q = K::bind_all(sqlx::query_as::<_, T>(&query), ids);
        Ok(q.fetch_all(self.db.pool()).await?)
    }

    pub async fn select_404<K: RecordKey>(&self, id: K) -> Result<T, DatabaseError> {
        self.select_ids("id", &[id])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DatabaseError::NotFound(format!("{} {} not found", self.record_name(), id)))
    }

    fn record_name(&self) -> &'static str {
        match self.table_name {
            "users" => "User",
            "customers" => "Customer",
            "categories" => "Category",
            "products" => "Product",
            "orders" => "Order",
            "order_lines" => "OrderLine",
            other => other,
        }
    }
}
