use sqlx::{
    postgres::{PgArguments, PgRow},
    query::QueryAs,
    FromRow, PgPool, Postgres,
};

use crate::database::manager::DatabaseError;
use crate::filter::{Filter, FilterValue};

/// Runs a [`Filter`] listing against the pool and maps rows into `T`
pub struct QueryBuilder<T> {
    filter: Filter,
    log_queries: bool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> QueryBuilder<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            log_queries: false,
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn log_queries(mut self, enabled: bool) -> Self {
        self.log_queries = enabled;
        self
    }

    pub async fn select_all(self, pool: &PgPool) -> Result<Vec<T>, DatabaseError> {
        let sql_result = self.filter.to_sql();
        if self.log_queries {
            tracing::debug!(sql = %sql_result.query, params = ?sql_result.params, "filter query");
        }

        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let rows = q.fetch_all(pool).await?;
        Ok(rows)
    }
}

fn bind_param_query_as<'q, O>(
    q: QueryAs<'q, Postgres, O, PgArguments>,
    v: &FilterValue,
) -> QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v {
        FilterValue::Int(i) => q.bind(*i),
        FilterValue::Text(s) => q.bind(s.clone()),
        FilterValue::Uuid(u) => q.bind(*u),
    }
}
