use serde_json::{Map, Value};
use uuid::Uuid;

use super::error::FilterError;
use super::rules::{FilterRule, ResourceKind};
use super::types::{FilterSpec, FilterValue, Pagination, Predicate, SortDirection, SortKey, SortTarget, ValueKind};

/// Translate an already-validated query object into a typed [`FilterSpec`].
///
/// The resource's rule tables are walked once each, in declared order, so the
/// resulting sort precedence never depends on the order of keys in the query.
/// Keys without a rule are ignored.
pub fn build_filter(resource: ResourceKind, raw: &Value) -> Result<FilterSpec, FilterError> {
    let rules = resource.rules();
    let empty = Map::new();
    let query = raw.as_object().unwrap_or(&empty);
    let mut spec = FilterSpec::default();

    for rule in rules.filters {
        if let Some(value) = query.get(rule.param) {
            spec.predicates.push(Predicate {
                column: rule.column,
                op: rule.op,
                value: typed_value(rule, value)?,
            });
        }
    }

    // Primary key ordering first
    if let Some(order) = query.get("order") {
        let direction = order
            .as_str()
            .and_then(SortDirection::parse)
            .ok_or(FilterError::InvalidDirection("order"))?;
        spec.sort.push(SortKey { target: SortTarget::Field(rules.primary_key), direction });
    } else if query.get("order_desc").and_then(Value::as_bool) == Some(true) {
        spec.sort.push(SortKey {
            target: SortTarget::Field(rules.primary_key),
            direction: SortDirection::Desc,
        });
    }

    for rule in rules.sorts {
        if let Some(value) = query.get(rule.param) {
            let direction = value
                .as_str()
                .and_then(SortDirection::parse)
                .ok_or(FilterError::InvalidDirection(rule.param))?;
            spec.sort.push(SortKey { target: rule.target, direction });
        }
    }

    spec.pagination = match (query.get("offset"), query.get("limit")) {
        (Some(offset), Some(limit)) => Some(Pagination {
            offset: as_int(offset).ok_or(FilterError::InvalidValue { param: "offset", expected: "integer" })?,
            limit: as_int(limit).ok_or(FilterError::InvalidValue { param: "limit", expected: "integer" })?,
        }),
        _ => None,
    };

    Ok(spec)
}

fn as_int(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

fn typed_value(rule: &FilterRule, value: &Value) -> Result<FilterValue, FilterError> {
    match rule.kind {
        ValueKind::Int => as_int(value)
            .map(FilterValue::Int)
            .ok_or(FilterError::InvalidValue { param: rule.param, expected: "integer" }),
        ValueKind::Text => value
            .as_str()
            .map(|s| FilterValue::Text(s.to_string()))
            .ok_or(FilterError::InvalidValue { param: rule.param, expected: "string" }),
        ValueKind::Uuid => value
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .map(FilterValue::Uuid)
            .ok_or(FilterError::InvalidValue { param: rule.param, expected: "uuid" }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::types::{Column, FilterOp};
    use serde_json::json;

    #[test]
    fn empty_query_is_an_unfiltered_listing() {
        let spec = build_filter(ResourceKind::Categories, &json!({})).unwrap();
        assert_eq!(spec, FilterSpec::default());
    }

    #[test]
    fn string_filters_combine_conjunctively() {
        let spec = build_filter(ResourceKind::Products, &json!({ "name": "Book", "description": "paper" })).unwrap();
        assert_eq!(spec.predicates.len(), 2);
        assert!(spec.predicates.iter().all(|p| p.op == FilterOp::Contains));
    }

    #[test]
    fn price_range_is_a_closed_interval() {
        let spec = build_filter(
            ResourceKind::Products,
            &json!({ "price_min": 10, "price_max": 40, "category_id": 3 }),
        )
        .unwrap();

        assert_eq!(spec.predicates[0].op, FilterOp::Gte);
        assert_eq!(spec.predicates[0].value, FilterValue::Int(10));
        assert_eq!(spec.predicates[1].op, FilterOp::Lte);
        assert_eq!(spec.predicates[2].op, FilterOp::Eq);
        assert_eq!(spec.predicates[2].column, Column::Own("category_id"));
    }

    #[test]
    fn exact_price_is_an_equality_on_price() {
        let spec = build_filter(ResourceKind::Products, &json!({ "category_id": 1, "price": 25 })).unwrap();

        assert_eq!(spec.predicates.len(), 2);
        assert_eq!(spec.predicates[1].column, Column::Own("price"));
        assert_eq!(spec.predicates[1].op, FilterOp::Eq);
        assert_eq!(spec.predicates[1].value, FilterValue::Int(25));
    }

    #[test]
    fn sort_precedence_follows_declaration_not_query_order() {
        let spec = build_filter(
            ResourceKind::Products,
            &json!({ "order_by_price": "desc", "order_by_name": "asc", "order_by_category": "asc", "order": "desc" }),
        )
        .unwrap();

        let targets: Vec<_> = spec.sort.iter().map(|s| s.target).collect();
        assert_eq!(targets[0], SortTarget::Field("id"));
        assert!(matches!(targets[1], SortTarget::Association(a, "name") if a.table == "categories"));
        assert_eq!(targets[2], SortTarget::Field("name"));
        assert_eq!(targets[3], SortTarget::Field("price"));
        assert_eq!(spec.sort[3].direction, SortDirection::Desc);
    }

    #[test]
    fn order_desc_flag_sorts_primary_key_descending() {
        let spec = build_filter(ResourceKind::Users, &json!({ "order_desc": true })).unwrap();
        assert_eq!(spec.sort, vec![SortKey { target: SortTarget::Field("id"), direction: SortDirection::Desc }]);

        let spec = build_filter(ResourceKind::Users, &json!({ "order_desc": false })).unwrap();
        assert!(spec.sort.is_empty());
    }

    #[test]
    fn pagination_requires_both_keys() {
        let spec = build_filter(ResourceKind::Orders, &json!({ "limit": 10 })).unwrap();
        assert!(spec.pagination.is_none());

        let spec = build_filter(ResourceKind::Orders, &json!({ "limit": 10, "offset": 20 })).unwrap();
        assert_eq!(spec.pagination, Some(Pagination { offset: 20, limit: 10 }));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let spec = build_filter(ResourceKind::Users, &json!({ "favourite_colour": "red" })).unwrap();
        assert!(spec.predicates.is_empty());
    }

    #[test]
    fn product_ids_are_typed_as_uuid() {
        let id = Uuid::new_v4();
        let spec = build_filter(ResourceKind::OrderLines, &json!({ "product_id": id.to_string() })).unwrap();
        assert_eq!(spec.predicates[0].value, FilterValue::Uuid(id));

        assert!(build_filter(ResourceKind::OrderLines, &json!({ "product_id": "nope" })).is_err());
    }
}
