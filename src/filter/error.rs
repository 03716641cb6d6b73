use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid value for {param}: expected {expected}")]
    InvalidValue { param: &'static str, expected: &'static str },

    #[error("Invalid sort direction for {0}")]
    InvalidDirection(&'static str),

    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),
}
