use serde_json::{Map, Value};
use validator::ValidateEmail;

use super::error::{FieldViolation, ValidationError};
use super::schema::{Constraint, Field, FieldKind, Presence, Schema};

/// Validate `payload` against `schema`, collecting every violation.
///
/// On success the returned value is the normalised payload: strings coming
/// from query/path slices are converted to numbers and booleans, enum values
/// are canonicalised and declared defaults are filled in.
pub fn validate(schema: &Schema, payload: &Value) -> Result<Value, ValidationError> {
    let mut violations = Vec::new();
    let value = validate_object(schema, payload, "", &mut violations);

    if violations.is_empty() {
        Ok(value)
    } else {
        Err(ValidationError { violations })
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn violation(violations: &mut Vec<FieldViolation>, path: &str, message: String) {
    violations.push(FieldViolation::new(path, message));
}

fn validate_object(schema: &Schema, payload: &Value, prefix: &str, violations: &mut Vec<FieldViolation>) -> Value {
    let label = if prefix.is_empty() { "value" } else { prefix };
    let Some(input) = payload.as_object() else {
        violation(violations, label, format!("\"{}\" must be of type object", label));
        return Value::Null;
    };

    for key in input.keys() {
        if schema.get(key).is_none() {
            let path = join_path(prefix, key);
            violation(violations, &path, format!("\"{}\" is not allowed", path));
        }
    }

    // Coerce everything first so sibling references compare converted values
    let mut coerced = Map::new();
    for field in &schema.fields {
        if let Some(raw) = input.get(field.name) {
            let path = join_path(prefix, field.name);
            if let Some(value) = coerce(&field.kind, raw, &path, violations) {
                coerced.insert(field.name.to_string(), value);
            }
        }
    }

    let mut output = Map::new();
    for field in &schema.fields {
        let path = join_path(prefix, field.name);
        let (presence, constraints) = effective_rules(field, input);

        match coerced.get(field.name) {
            Some(value) => {
                for constraint in &constraints {
                    check(constraint, value, &coerced, &path, violations);
                }
                output.insert(field.name.to_string(), value.clone());
            }
            // Supplied but failed coercion; already reported
            None if input.contains_key(field.name) => {}
            None => {
                if presence == Presence::Required {
                    violation(violations, &path, format!("\"{}\" is required", path));
                } else if let Some(default) = &field.default {
                    output.insert(field.name.to_string(), default.clone());
                }
            }
        }
    }

    for group in &schema.exclusive {
        let present: Vec<&str> = group.iter().copied().filter(|k| input.contains_key(*k)).collect();
        if present.len() > 1 {
            let path = join_path(prefix, present[0]);
            violation(
                violations,
                &path,
                format!("\"{}\" must not exist simultaneously with [{}]", path, present[1..].join(", ")),
            );
        }
    }

    for group in &schema.exactly_one {
        let present = group.iter().filter(|k| input.contains_key(**k)).count();
        if present == 0 {
            violation(
                violations,
                label,
                format!("\"{}\" must contain at least one of [{}]", label, group.join(", ")),
            );
        } else if present > 1 {
            violation(
                violations,
                label,
                format!("\"{}\" contains a conflict between exclusive peers [{}]", label, group.join(", ")),
            );
        }
    }

    Value::Object(output)
}

/// Base rules of a field with every matching conditional layered on top
fn effective_rules(field: &Field, input: &Map<String, Value>) -> (Presence, Vec<Constraint>) {
    let mut presence = field.presence;
    let mut constraints = field.constraints.clone();

    for conditional in &field.conditionals {
        let rule = if input.contains_key(conditional.sibling) {
            conditional.then.as_ref()
        } else {
            conditional.otherwise.as_ref()
        };

        if let Some(rule) = rule {
            if let Some(p) = rule.presence {
                presence = p;
            }
            for constraint in &rule.constraints {
                constraints.retain(|existing| !existing.same_slot(constraint));
                constraints.push(constraint.clone());
            }
        }
    }

    (presence, constraints)
}

fn coerce(kind: &FieldKind, raw: &Value, path: &str, violations: &mut Vec<FieldViolation>) -> Option<Value> {
    match kind {
        FieldKind::String => non_empty_string(raw, path, violations).map(|s| Value::String(s.to_string())),
        FieldKind::Email => {
            let s = non_empty_string(raw, path, violations)?;
            if s.validate_email() {
                Some(Value::String(s.to_string()))
            } else {
                violation(violations, path, format!("\"{}\" must be a valid email", path));
                None
            }
        }
        FieldKind::Uri => {
            let s = non_empty_string(raw, path, violations)?;
            match url::Url::parse(s) {
                Ok(_) => Some(Value::String(s.to_string())),
                Err(_) => {
                    violation(violations, path, format!("\"{}\" must be a valid uri", path));
                    None
                }
            }
        }
        FieldKind::Uuid => {
            let s = non_empty_string(raw, path, violations)?;
            match uuid::Uuid::parse_str(s) {
                Ok(id) => Some(Value::String(id.to_string())),
                Err(_) => {
                    violation(violations, path, format!("\"{}\" must be a valid GUID", path));
                    None
                }
            }
        }
        FieldKind::Integer => {
            let parsed = match raw {
                Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)).ok_or("integer"),
                Value::String(s) => s.trim().parse::<i64>().map_err(|_| "number"),
                _ => Err("number"),
            };
            match parsed {
                Ok(n) => Some(Value::from(n)),
                Err(expected) => {
                    let article = if expected == "integer" { "an" } else { "a" };
                    violation(violations, path, format!("\"{}\" must be {} {}", path, article, expected));
                    None
                }
            }
        }
        FieldKind::Boolean => match raw {
            Value::Bool(b) => Some(Value::Bool(*b)),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Some(Value::Bool(true)),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Some(Value::Bool(false)),
            _ => {
                violation(violations, path, format!("\"{}\" must be a boolean", path));
                None
            }
        },
        FieldKind::OneOf(allowed) => {
            let matched = raw
                .as_str()
                .and_then(|s| allowed.iter().find(|a| a.eq_ignore_ascii_case(s.trim())));
            match matched {
                Some(canonical) => Some(Value::String(canonical.to_string())),
                None => {
                    violation(violations, path, format!("\"{}\" must be one of [{}]", path, allowed.join(", ")));
                    None
                }
            }
        }
        FieldKind::Object(schema) => Some(validate_object(schema, raw, path, violations)),
        FieldKind::Array(items) => {
            let Some(values) = raw.as_array() else {
                violation(violations, path, format!("\"{}\" must be an array", path));
                return None;
            };
            let coerced = values
                .iter()
                .enumerate()
                .filter_map(|(i, item)| coerce(items, item, &format!("{}[{}]", path, i), violations))
                .collect();
            Some(Value::Array(coerced))
        }
    }
}

/// `15.0` is an integer; `15.5` and anything past the i64 range are not
fn integral(f: f64) -> Option<i64> {
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.is_finite() && f.fract() == 0.0 && in_range).then_some(f as i64)
}

fn non_empty_string<'a>(raw: &'a Value, path: &str, violations: &mut Vec<FieldViolation>) -> Option<&'a str> {
    match raw.as_str() {
        Some("") => {
            violation(violations, path, format!("\"{}\" is not allowed to be empty", path));
            None
        }
        Some(s) => Some(s),
        None => {
            violation(violations, path, format!("\"{}\" must be a string", path));
            None
        }
    }
}

fn check(
    constraint: &Constraint,
    value: &Value,
    siblings: &Map<String, Value>,
    path: &str,
    violations: &mut Vec<FieldViolation>,
) {
    match constraint {
        Constraint::MinLength(n) => {
            if value.as_str().is_some_and(|s| s.chars().count() < *n) {
                violation(violations, path, format!("\"{}\" length must be at least {} characters long", path, n));
            }
        }
        Constraint::MaxLength(n) => {
            if value.as_str().is_some_and(|s| s.chars().count() > *n) {
                violation(
                    violations,
                    path,
                    format!("\"{}\" length must be less than or equal to {} characters long", path, n),
                );
            }
        }
        Constraint::Min(n) => {
            if value.as_i64().is_some_and(|v| v < *n) {
                violation(violations, path, format!("\"{}\" must be greater than or equal to {}", path, n));
            }
        }
        Constraint::Max(n) => {
            if value.as_i64().is_some_and(|v| v > *n) {
                violation(violations, path, format!("\"{}\" must be less than or equal to {}", path, n));
            }
        }
        Constraint::MinRef(sibling) => {
            let bound = siblings.get(*sibling).and_then(Value::as_i64);
            if let (Some(v), Some(bound)) = (value.as_i64(), bound) {
                if v < bound {
                    violation(
                        violations,
                        path,
                        format!("\"{}\" must be greater than or equal to ref:{}", path, sibling),
                    );
                }
            }
        }
        Constraint::MaxRef(sibling) => {
            let bound = siblings.get(*sibling).and_then(Value::as_i64);
            if let (Some(v), Some(bound)) = (value.as_i64(), bound) {
                if v > bound {
                    violation(violations, path, format!("\"{}\" must be less than or equal to ref:{}", path, sibling));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::schema::{Field, Rule};
    use serde_json::json;

    fn paging() -> Schema {
        Schema::new(vec![
            Field::integer("offset").min(0).when_absent("limit", Rule::new().max(1000)),
            Field::integer("limit").min(1).max(1000).when_present("offset", Rule::new().max(100)),
        ])
    }

    #[test]
    fn collects_every_violation() {
        let schema = Schema::new(vec![
            Field::string("name").min_len(3).required(),
            Field::integer("price").min(10).required(),
        ]);

        let err = validate(&schema, &json!({ "name": "ab", "price": 2 })).unwrap_err();
        assert_eq!(err.violations.len(), 2);
        assert!(err.has_path("name"));
        assert!(err.has_path("price"));
    }

    #[test]
    fn whole_floats_count_as_integers() {
        let schema = Schema::new(vec![Field::integer("price").min(10)]);

        let value = validate(&schema, &json!({ "price": 15.0 })).unwrap();
        assert_eq!(value["price"], json!(15));

        let err = validate(&schema, &json!({ "price": 15.5 })).unwrap_err();
        assert_eq!(err.violations[0].message, "\"price\" must be an integer");
        assert!(validate(&schema, &json!({ "price": 1e300 })).is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let schema = Schema::new(vec![Field::string("name")]);
        let err = validate(&schema, &json!({ "name": "books", "admin": true })).unwrap_err();
        assert_eq!(err.violations[0].message, "\"admin\" is not allowed");
    }

    #[test]
    fn query_strings_are_converted_before_range_checks() {
        let value = validate(&paging(), &json!({ "offset": "20", "limit": "10" })).unwrap();
        assert_eq!(value, json!({ "offset": 20, "limit": 10 }));

        let err = validate(&paging(), &json!({ "limit": "ten" })).unwrap_err();
        assert_eq!(err.violations[0].message, "\"limit\" must be a number");
    }

    #[test]
    fn limit_bound_tightens_when_offset_present() {
        assert!(validate(&paging(), &json!({ "limit": 500 })).is_ok());
        let err = validate(&paging(), &json!({ "offset": 0, "limit": 500 })).unwrap_err();
        assert_eq!(err.violations[0].message, "\"limit\" must be less than or equal to 100");
    }

    #[test]
    fn offset_is_capped_without_limit() {
        assert!(validate(&paging(), &json!({ "offset": 1000 })).is_ok());
        assert!(validate(&paging(), &json!({ "offset": 1001 })).is_err());
        assert!(validate(&paging(), &json!({ "offset": 5000, "limit": 10 })).is_ok());
    }

    #[test]
    fn sibling_references_order_a_range() {
        let schema = Schema::new(vec![
            Field::integer("price_min").min(10).when_present("price_max", Rule::new().max_ref("price_max")),
            Field::integer("price_max").min(10).when_present("price_min", Rule::new().min_ref("price_min")),
        ]);

        assert!(validate(&schema, &json!({ "price_min": "10", "price_max": "50" })).is_ok());
        let err = validate(&schema, &json!({ "price_min": 60, "price_max": 50 })).unwrap_err();
        assert!(err.has_path("price_min"));
        assert!(err.has_path("price_max"));
    }

    #[test]
    fn one_of_a_pair_is_required() {
        let schema = Schema::new(vec![
            Field::integer("category_id").when_absent("category_name", Rule::new().required()),
            Field::string("category_name").when_absent("category_id", Rule::new().required()),
        ]);

        assert!(validate(&schema, &json!({ "category_name": "Books" })).is_ok());
        assert!(validate(&schema, &json!({})).is_err());
    }

    #[test]
    fn exactly_one_and_nand_groups() {
        let schema = Schema::new(vec![Field::integer("a"), Field::integer("b")]).xor(&["a", "b"]);
        assert!(validate(&schema, &json!({ "a": 1 })).is_ok());
        assert!(validate(&schema, &json!({})).is_err());
        assert!(validate(&schema, &json!({ "a": 1, "b": 2 })).is_err());

        let schema = Schema::new(vec![Field::string("order"), Field::boolean("order_desc")]).nand(&["order", "order_desc"]);
        assert!(validate(&schema, &json!({ "order": "asc" })).is_ok());
        assert!(validate(&schema, &json!({ "order": "asc", "order_desc": "true" })).is_err());
    }

    #[test]
    fn nested_objects_report_dotted_paths_and_fill_defaults() {
        let user = Schema::new(vec![
            Field::email("email").required(),
            Field::one_of("role", &["admin", "seller", "customer"]).default_value("customer"),
        ]);
        let customer = Schema::new(vec![Field::string("name").required(), Field::object("user", &user).required()]);

        let err = validate(&customer, &json!({ "name": "Ana", "user": { "email": "nope" } })).unwrap_err();
        assert_eq!(err.violations[0].path, "user.email");

        let value = validate(&customer, &json!({ "name": "Ana", "user": { "email": "ana@example.com" } })).unwrap();
        assert_eq!(value["user"]["role"], "customer");
    }

    #[test]
    fn enum_values_are_case_insensitive_and_canonicalised() {
        let schema = Schema::new(vec![Field::one_of("order", &["asc", "desc"])]);
        assert_eq!(validate(&schema, &json!({ "order": "DESC" })).unwrap()["order"], "desc");
    }

    #[test]
    fn array_items_are_validated_individually() {
        let item = Schema::new(vec![Field::uuid("productId").required(), Field::integer("quantity").min(1).required()]);
        let schema = Schema::new(vec![Field::array("items", FieldKind::Object(Box::new(item)))]);

        let err = validate(
            &schema,
            &json!({ "items": [{ "productId": "not-a-uuid", "quantity": 0 }] }),
        )
        .unwrap_err();
        assert!(err.has_path("items[0].productId"));
        assert!(err.has_path("items[0].quantity"));
    }

    #[test]
    fn empty_strings_are_not_allowed() {
        let schema = Schema::new(vec![Field::string("name")]);
        let err = validate(&schema, &json!({ "name": "" })).unwrap_err();
        assert_eq!(err.violations[0].message, "\"name\" is not allowed to be empty");
    }
}
