use serde::Serialize;
use thiserror::Error;

/// One failed rule, addressed by its dotted path inside the payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub path: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Every violation found in a payload; never constructed empty
#[derive(Debug, Clone, Error)]
#[error("{}", join_messages(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn has_path(&self, path: &str) -> bool {
        self.violations.iter().any(|v| v.path == path)
    }
}

fn join_messages(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join(". ")
}
