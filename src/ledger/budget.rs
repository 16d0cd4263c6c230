use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::period::PeriodKey;

/// A monthly spending limit for one expense category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub category: String,
    /// The limit. Non-positive limits are tolerated by the tracker.
    pub amount: Decimal,
    pub month: PeriodKey,
}

impl Budget {
    pub fn new(
        owner_id: Uuid,
        category: impl Into<String>,
        amount: Decimal,
        month: PeriodKey,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            category: category.into(),
            amount,
            month,
        }
    }
}

/// Caller-supplied budget fields; `month` is still raw text at this point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetDraft {
    pub category: String,
    pub amount: Decimal,
    pub month: String,
}

impl BudgetDraft {
    pub fn new(category: impl Into<String>, amount: Decimal, month: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            amount,
            month: month.into(),
        }
    }
}
