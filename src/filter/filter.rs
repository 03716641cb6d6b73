use serde_json::Value;

use super::builder::build_filter;
use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::rules::ResourceKind;
use super::types::{FilterSpec, SqlResult};

/// A resource listing query ready to be rendered as SQL
pub struct Filter {
    resource: ResourceKind,
    spec: FilterSpec,
}

impl Filter {
    pub fn new(resource: ResourceKind, spec: FilterSpec) -> Result<Self, FilterError> {
        if let Some(page) = &spec.pagination {
            if page.limit < 0 {
                return Err(FilterError::InvalidPagination("limit must be non-negative".to_string()));
            }
            if page.offset < 0 {
                return Err(FilterError::InvalidPagination("offset must be non-negative".to_string()));
            }
        }
        Ok(Self { resource, spec })
    }

    pub fn from_query(resource: ResourceKind, raw: &Value) -> Result<Self, FilterError> {
        Self::new(resource, build_filter(resource, raw)?)
    }

    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    pub fn to_sql(&self) -> SqlResult {
        let rules = self.resource.rules();
        let table = rules.table;

        let joins: Vec<String> = self
            .spec
            .associations()
            .iter()
            .map(|a| format!("LEFT JOIN \"{0}\" ON \"{0}\".\"id\" = \"{1}\".\"{2}\"", a.table, table, a.foreign_key))
            .collect();
        let (where_clause, params) = FilterWhere::generate(&self.spec.predicates, table, 0);
        let order_clause = FilterOrder::generate(&self.spec.sort, table, rules.primary_key);
        let limit_clause = match &self.spec.pagination {
            Some(page) => format!("LIMIT {} OFFSET {}", page.limit, page.offset),
            None => String::new(),
        };

        let query = [
            format!("SELECT \"{}\".* FROM \"{}\"", table, table),
            joins.join(" "),
            format!("WHERE {}", where_clause),
            order_clause,
            limit_clause,
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlResult { query, params }
    }
}
