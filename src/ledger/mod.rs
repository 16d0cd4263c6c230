//! Ledger domain models and the derived report value objects.

pub mod budget;
pub mod category;
pub mod period;
pub mod reports;
pub mod transaction;

pub use budget::{Budget, BudgetDraft};
pub use category::{CategoryCatalog, TransactionType};
pub use period::{DateWindow, PeriodKey};
pub use reports::{
    BudgetOverview, BudgetProgress, BudgetStatus, CategoryBreakdown, CategoryTotal,
    DuplicateBudget, Summary,
};
pub use transaction::{Transaction, TransactionDraft, TransactionPatch, MAX_AMOUNT};
