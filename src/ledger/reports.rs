//! Derived value objects handed to the presentation layer. Nothing here is persisted.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{category::TransactionType, period::PeriodKey};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Income, expense and balance over a period (or all time when `period` is `None`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub period: Option<PeriodKey>,
    pub income_total: Decimal,
    pub expense_total: Decimal,
    pub balance: Decimal,
    pub transaction_count: usize,
}

impl Summary {
    pub fn empty(period: Option<PeriodKey>) -> Self {
        Self {
            period,
            income_total: Decimal::ZERO,
            expense_total: Decimal::ZERO,
            balance: Decimal::ZERO,
            transaction_count: 0,
        }
    }

    /// Share of income left after expenses, in percent. Zero without income.
    pub fn savings_rate(&self) -> Decimal {
        if self.income_total <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.balance / self.income_total * HUNDRED
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

/// Per-category totals for one transaction type.
///
/// Row order carries no meaning; use [`CategoryBreakdown::sorted_by_total_desc`]
/// when a ranking is needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub period: Option<PeriodKey>,
    pub kind: TransactionType,
    pub rows: Vec<CategoryTotal>,
}

impl CategoryBreakdown {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total(&self) -> Decimal {
        self.rows
            .iter()
            .fold(Decimal::ZERO, |acc, row| acc.saturating_add(row.total))
    }

    pub fn get(&self, category: &str) -> Option<Decimal> {
        self.rows
            .iter()
            .find(|row| row.category == category)
            .map(|row| row.total)
    }

    /// Largest total first; equal totals fall back to the label.
    pub fn sorted_by_total_desc(&self) -> Vec<CategoryTotal> {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.category.cmp(&b.category))
        });
        rows
    }

    /// Percentage of the breakdown total contributed by `category`.
    pub fn share_of(&self, category: &str) -> Decimal {
        let total = self.total();
        if total <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.get(category).unwrap_or(Decimal::ZERO) / total * HUNDRED
    }
}

/// Alert tier for a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Ok,
    Warning,
    Over,
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BudgetStatus::Ok => "ok",
            BudgetStatus::Warning => "warning",
            BudgetStatus::Over => "over",
        };
        f.write_str(label)
    }
}

/// Budget versus actual spending for one budget row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetProgress {
    pub budget_id: Uuid,
    pub category: String,
    pub period: PeriodKey,
    pub limit: Decimal,
    pub spent: Decimal,
    /// Negative once spending exceeds the limit.
    pub remaining: Decimal,
    /// Unrounded; zero when the limit is not positive.
    pub percent_used: Decimal,
    pub status: BudgetStatus,
}

impl BudgetProgress {
    pub fn is_over_limit(&self) -> bool {
        self.remaining < Decimal::ZERO
    }
}

/// Several budgets declared for the same category and period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateBudget {
    pub category: String,
    pub period: PeriodKey,
    pub budget_ids: Vec<Uuid>,
}

/// Every budget row plus rolled-up totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetOverview {
    pub rows: Vec<BudgetProgress>,
    pub total_limit: Decimal,
    pub total_spent: Decimal,
    pub total_remaining: Decimal,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub duplicates: Vec<DuplicateBudget>,
}

impl BudgetOverview {
    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }

    pub fn rows_with_status(&self, status: BudgetStatus) -> impl Iterator<Item = &BudgetProgress> {
        self.rows.iter().filter(move |row| row.status == status)
    }
}
