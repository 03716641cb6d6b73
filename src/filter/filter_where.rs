use super::types::{FilterOp, FilterValue, Predicate};

pub struct FilterWhere<'a> {
    base_table: &'a str,
    param_values: Vec<FilterValue>,
    param_index: usize,
}

impl<'a> FilterWhere<'a> {
    pub fn new(base_table: &'a str, starting_param_index: usize) -> Self {
        Self {
            base_table,
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// AND-joined condition list with its bind values, `1=1` when there is nothing to filter
    pub fn generate(predicates: &[Predicate], base_table: &str, starting_param_index: usize) -> (String, Vec<FilterValue>) {
        let mut filter_where = FilterWhere::new(base_table, starting_param_index);
        let conditions: Vec<String> = predicates.iter().map(|p| filter_where.build_condition(p)).collect();

        let where_clause = if conditions.is_empty() { "1=1".to_string() } else { conditions.join(" AND ") };
        (where_clause, filter_where.param_values)
    }

    fn build_condition(&mut self, predicate: &Predicate) -> String {
        let column = predicate.column.to_sql(self.base_table);
        let value = match (&predicate.op, &predicate.value) {
            (FilterOp::Contains, FilterValue::Text(s)) => FilterValue::Text(format!("%{}%", escape_like(s))),
            (_, v) => v.clone(),
        };
        format!("{} {} {}", column, predicate.op.to_sql(), self.param(value))
    }

    fn param(&mut self, value: FilterValue) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

/// Treat LIKE wildcards in user input literally
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
