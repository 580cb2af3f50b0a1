use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    #[error("Invalid month `{0}` (expected YYYY-MM)")]
    InvalidMonth(String),
}
