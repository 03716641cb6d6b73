use super::types::{SortDirection, SortKey, SortTarget};

pub struct FilterOrder;

impl FilterOrder {
    /// `ORDER BY` clause for the given keys. The primary key is appended as a
    /// final ascending tie-breaker so pages never overlap.
    pub fn generate(keys: &[SortKey], base_table: &str, primary_key: &'static str) -> String {
        let mut parts: Vec<String> = keys
            .iter()
            .map(|k| format!("{} {}", k.target.column().to_sql(base_table), k.direction.to_sql()))
            .collect();

        if !keys.iter().any(|k| k.target == SortTarget::Field(primary_key)) {
            let tie_breaker = SortKey { target: SortTarget::Field(primary_key), direction: SortDirection::Asc };
            parts.push(format!("{} {}", tie_breaker.target.column().to_sql(base_table), tie_breaker.direction.to_sql()));
        }

        format!("ORDER BY {}", parts.join(", "))
    }
}
