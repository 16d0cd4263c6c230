pub mod budget_service;
pub mod category_service;
pub mod summary_service;
pub mod transaction_service;

pub use budget_service::{BudgetService, BudgetThresholds};
pub use category_service::CategoryService;
pub use summary_service::SummaryService;
pub use transaction_service::TransactionService;

use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(LedgerError),
    #[error("{0}")]
    Invalid(String),
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
}

impl From<LedgerError> for ServiceError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound { kind, id } => ServiceError::NotFound { kind, id },
            LedgerError::Validation(message) => ServiceError::Invalid(message),
            other => ServiceError::Ledger(other),
        }
    }
}

#[cfg(test)]
mod tests;
