use thiserror::Error;

/// Error type that captures ledger, storage and boundary validation failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid period key `{0}` (expected YYYY-MM)")]
    InvalidPeriod(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
}

impl LedgerError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        LedgerError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
