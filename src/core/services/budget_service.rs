//! Budget versus actual tracking and the validated budget write path.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::LedgerError;
use crate::ledger::{
    Budget, BudgetDraft, BudgetOverview, BudgetProgress, BudgetStatus, CategoryBreakdown,
    CategoryCatalog, DuplicateBudget, PeriodKey, Transaction, TransactionType, MAX_AMOUNT,
};
use crate::storage::LedgerStore;

use super::{ServiceError, ServiceResult, SummaryService};

/// Percent-used cut-offs for the alert tiers.
///
/// `ok` up to and including `warning_above`, `warning` up to and including
/// `over_above`, `over` beyond that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetThresholds {
    pub warning_above: Decimal,
    pub over_above: Decimal,
}

impl Default for BudgetThresholds {
    fn default() -> Self {
        Self {
            warning_above: Decimal::from(70),
            over_above: Decimal::from(90),
        }
    }
}

impl BudgetThresholds {
    pub fn new(warning_above: Decimal, over_above: Decimal) -> Result<Self, LedgerError> {
        if warning_above < Decimal::ZERO || over_above < Decimal::ZERO {
            return Err(LedgerError::Validation(
                "budget thresholds must not be negative".into(),
            ));
        }
        if warning_above > over_above {
            return Err(LedgerError::Validation(format!(
                "warning threshold {} exceeds over threshold {}",
                warning_above, over_above
            )));
        }
        Ok(Self {
            warning_above,
            over_above,
        })
    }

    pub fn classify(&self, percent_used: Decimal) -> BudgetStatus {
        if percent_used > self.over_above {
            BudgetStatus::Over
        } else if percent_used > self.warning_above {
            BudgetStatus::Warning
        } else {
            BudgetStatus::Ok
        }
    }
}

/// Stateless budgeting utilities over budget and transaction snapshots.
pub struct BudgetService;

impl BudgetService {
    /// Compares one budget with the owner's expense activity in the budget month.
    pub fn compute_budget_progress(
        budget: &Budget,
        transactions: &[Transaction],
        thresholds: &BudgetThresholds,
    ) -> BudgetProgress {
        let breakdown = SummaryService::compute_category_breakdown(
            transactions,
            Some(budget.month),
            TransactionType::Expense,
        );
        progress_from_breakdown(budget, &breakdown, thresholds)
    }

    /// One progress row per budget, in input order, plus totals.
    ///
    /// Budgets sharing a category and month are kept as separate rows and
    /// reported in [`BudgetOverview::duplicates`].
    pub fn aggregate_all_budgets(
        budgets: &[Budget],
        transactions: &[Transaction],
        thresholds: &BudgetThresholds,
    ) -> BudgetOverview {
        let mut breakdowns: HashMap<PeriodKey, CategoryBreakdown> = HashMap::new();
        let rows: Vec<BudgetProgress> = budgets
            .iter()
            .map(|budget| {
                let breakdown = breakdowns.entry(budget.month).or_insert_with(|| {
                    SummaryService::compute_category_breakdown(
                        transactions,
                        Some(budget.month),
                        TransactionType::Expense,
                    )
                });
                progress_from_breakdown(budget, breakdown, thresholds)
            })
            .collect();

        let total_limit = saturating_sum(budgets.iter().map(|budget| budget.amount));
        let total_spent = saturating_sum(rows.iter().map(|row| row.spent));
        let duplicates = find_duplicates(budgets);
        for duplicate in &duplicates {
            tracing::warn!(
                category = %duplicate.category,
                period = %duplicate.period,
                count = duplicate.budget_ids.len(),
                "multiple budgets declared for the same category and period"
            );
        }

        BudgetOverview {
            rows,
            total_limit,
            total_spent,
            total_remaining: total_limit.saturating_sub(total_spent),
            duplicates,
        }
    }

    /// Validates and stores a new budget for `owner_id`.
    pub fn add(
        store: &dyn LedgerStore,
        owner_id: Uuid,
        draft: BudgetDraft,
        catalog: &CategoryCatalog,
    ) -> ServiceResult<Budget> {
        if draft.amount <= Decimal::ZERO {
            return Err(ServiceError::Invalid(
                "budget amount must be greater than zero".into(),
            ));
        }
        if draft.amount > MAX_AMOUNT {
            return Err(ServiceError::Invalid(format!(
                "budget amount must not exceed {}",
                MAX_AMOUNT
            )));
        }
        let category = catalog.validate(TransactionType::Expense, &draft.category)?;
        let month = PeriodKey::parse(draft.month.trim())?;

        let existing = store.list_budgets(owner_id, Some(month))?;
        if existing.iter().any(|budget| budget.category == category) {
            tracing::warn!(
                %owner_id,
                %category,
                %month,
                "adding a second budget for an already budgeted category"
            );
        }

        let stored = store.insert_budget(Budget::new(owner_id, category, draft.amount, month))?;
        tracing::info!(budget_id = %stored.id, category = %stored.category, month = %stored.month, "budget created");
        Ok(stored)
    }

    /// Deletes a budget owned by `owner_id`.
    pub fn remove(store: &dyn LedgerStore, owner_id: Uuid, id: Uuid) -> ServiceResult<Budget> {
        let removed = store.delete_budget(owner_id, id)?;
        tracing::info!(budget_id = %id, "budget removed");
        Ok(removed)
    }
}

fn progress_from_breakdown(
    budget: &Budget,
    breakdown: &CategoryBreakdown,
    thresholds: &BudgetThresholds,
) -> BudgetProgress {
    let spent = breakdown.get(&budget.category).unwrap_or(Decimal::ZERO);
    let remaining = budget.amount.saturating_sub(spent);
    let (percent_used, status) = if budget.amount <= Decimal::ZERO {
        (Decimal::ZERO, BudgetStatus::Ok)
    } else {
        // Overflow only happens when spending dwarfs the limit.
        match spent
            .checked_div(budget.amount)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        {
            Some(percent) => (percent, thresholds.classify(percent)),
            None => (Decimal::MAX, BudgetStatus::Over),
        }
    };
    BudgetProgress {
        budget_id: budget.id,
        category: budget.category.clone(),
        period: budget.month,
        limit: budget.amount,
        spent,
        remaining,
        percent_used,
        status,
    }
}

fn saturating_sum(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, Decimal::saturating_add)
}

fn find_duplicates(budgets: &[Budget]) -> Vec<DuplicateBudget> {
    let mut groups: BTreeMap<(PeriodKey, &str), Vec<Uuid>> = BTreeMap::new();
    for budget in budgets {
        groups
            .entry((budget.month, budget.category.as_str()))
            .or_default()
            .push(budget.id);
    }
    groups
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .map(|((period, category), budget_ids)| DuplicateBudget {
            category: category.to_string(),
            period,
            budget_ids,
        })
        .collect()
}
