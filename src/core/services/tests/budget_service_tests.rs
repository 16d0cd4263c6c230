use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::{at, expense, income};
use crate::core::services::{BudgetService, BudgetThresholds, ServiceError};
use crate::ledger::{
    Budget, BudgetDraft, BudgetStatus, CategoryCatalog, PeriodKey, Transaction, MAX_AMOUNT,
};
use crate::storage::{LedgerStore, MemoryLedgerStore};

fn jan() -> PeriodKey {
    PeriodKey::new(2024, 1).unwrap()
}

fn progress_for(limit: Decimal, spent: Decimal) -> crate::ledger::BudgetProgress {
    let owner = Uuid::new_v4();
    let budget = Budget::new(owner, "Food", limit, jan());
    let txns = vec![expense(owner, spent, "Food", at(2024, 1, 10))];
    BudgetService::compute_budget_progress(&budget, &txns, &BudgetThresholds::default())
}

#[test]
fn status_boundaries_are_inclusive_on_the_lower_tier() {
    assert_eq!(progress_for(dec!(100), dec!(70)).status, BudgetStatus::Ok);
    assert_eq!(progress_for(dec!(100), dec!(70.01)).status, BudgetStatus::Warning);
    assert_eq!(progress_for(dec!(100), dec!(90)).status, BudgetStatus::Warning);
    assert_eq!(progress_for(dec!(100), dec!(90.01)).status, BudgetStatus::Over);
}

#[test]
fn overspending_goes_negative() {
    let progress = progress_for(dec!(200), dec!(300));
    assert_eq!(progress.spent, dec!(300));
    assert_eq!(progress.remaining, dec!(-100));
    assert_eq!(progress.percent_used, dec!(150));
    assert_eq!(progress.status, BudgetStatus::Over);
    assert!(progress.is_over_limit());
}

#[test]
fn zero_limit_never_divides() {
    let progress = progress_for(Decimal::ZERO, dec!(25));
    assert_eq!(progress.percent_used, Decimal::ZERO);
    assert_eq!(progress.status, BudgetStatus::Ok);
    assert_eq!(progress.remaining, dec!(-25));
}

#[test]
fn negative_limit_is_treated_like_zero() {
    let progress = progress_for(dec!(-50), dec!(10));
    assert_eq!(progress.percent_used, Decimal::ZERO);
    assert_eq!(progress.status, BudgetStatus::Ok);
    assert_eq!(progress.remaining, dec!(-60));
}

#[test]
fn huge_spend_against_tiny_limit_saturates() {
    let huge = Decimal::from_i128_with_scale(10_i128.pow(25), 0);
    let progress = progress_for(dec!(0.0001), huge);
    assert_eq!(progress.spent, huge);
    assert_eq!(progress.percent_used, Decimal::MAX);
    assert_eq!(progress.status, BudgetStatus::Over);

    let large = Decimal::from_i128_with_scale(10_i128.pow(27), 0);
    let progress = progress_for(dec!(0.1), large);
    assert_eq!(progress.percent_used, Decimal::MAX);
    assert_eq!(progress.status, BudgetStatus::Over);
}

#[test]
fn overview_totals_saturate() {
    let owner = Uuid::new_v4();
    let half = Decimal::MAX / Decimal::TWO + Decimal::ONE;
    let budgets = vec![
        Budget::new(owner, "Food", half, jan()),
        Budget::new(owner, "Rent", half, jan()),
    ];
    let overview = BudgetService::aggregate_all_budgets(&budgets, &[], &BudgetThresholds::default());
    assert_eq!(overview.total_limit, Decimal::MAX);
    assert_eq!(overview.total_spent, Decimal::ZERO);
    assert_eq!(overview.total_remaining, Decimal::MAX);
}

#[test]
fn spending_outside_the_budget_month_is_ignored() {
    let owner = Uuid::new_v4();
    let budget = Budget::new(owner, "Food", dec!(200), jan());
    let txns = vec![
        expense(owner, dec!(50), "Food", at(2024, 1, 31)),
        expense(owner, dec!(80), "Food", at(2024, 2, 1)),
        expense(owner, dec!(30), "Shopping", at(2024, 1, 5)),
        income(owner, dec!(500), "Food", at(2024, 1, 6)),
    ];
    let progress =
        BudgetService::compute_budget_progress(&budget, &txns, &BudgetThresholds::default());
    assert_eq!(progress.spent, dec!(50));
    assert_eq!(progress.remaining, dec!(150));
    assert_eq!(progress.percent_used, dec!(25));
    assert_eq!(progress.period, jan());
}

#[test]
fn custom_thresholds_shift_tiers() {
    let thresholds = BudgetThresholds::new(dec!(50), dec!(100)).unwrap();
    assert_eq!(thresholds.classify(dec!(50)), BudgetStatus::Ok);
    assert_eq!(thresholds.classify(dec!(75)), BudgetStatus::Warning);
    assert_eq!(thresholds.classify(dec!(100)), BudgetStatus::Warning);
    assert_eq!(thresholds.classify(dec!(100.5)), BudgetStatus::Over);
}

#[test]
fn inverted_thresholds_are_rejected() {
    assert!(BudgetThresholds::new(dec!(95), dec!(90)).is_err());
    assert!(BudgetThresholds::new(dec!(-1), dec!(90)).is_err());
}

#[test]
fn overview_rolls_up_rows_in_input_order() {
    let owner = Uuid::new_v4();
    let feb = jan().next();
    let budgets = vec![
        Budget::new(owner, "Food", dec!(200), jan()),
        Budget::new(owner, "Rent", dec!(1000), jan()),
        Budget::new(owner, "Food", dec!(150), feb),
    ];
    let txns = sample_spending(owner);
    let overview =
        BudgetService::aggregate_all_budgets(&budgets, &txns, &BudgetThresholds::default());

    assert_eq!(overview.rows.len(), 3);
    let ids: Vec<Uuid> = overview.rows.iter().map(|row| row.budget_id).collect();
    assert_eq!(ids, budgets.iter().map(|b| b.id).collect::<Vec<_>>());
    assert_eq!(overview.rows[0].spent, dec!(120));
    assert_eq!(overview.rows[1].spent, dec!(1000));
    assert_eq!(overview.rows[2].spent, dec!(160));

    assert_eq!(overview.total_limit, dec!(1350));
    assert_eq!(overview.total_spent, dec!(1280));
    assert_eq!(overview.total_remaining, dec!(70));
    let summed: Decimal = overview.rows.iter().map(|row| row.remaining).sum();
    assert_eq!(summed, overview.total_remaining);
    assert!(!overview.has_duplicates());
    assert_eq!(overview.rows_with_status(BudgetStatus::Over).count(), 2);
}

#[test]
fn overview_matches_single_budget_progress() {
    let owner = Uuid::new_v4();
    let budgets = vec![
        Budget::new(owner, "Food", dec!(200), jan()),
        Budget::new(owner, "Entertainment", dec!(60), jan()),
    ];
    let txns = sample_spending(owner);
    let thresholds = BudgetThresholds::default();
    let overview = BudgetService::aggregate_all_budgets(&budgets, &txns, &thresholds);
    for (budget, row) in budgets.iter().zip(&overview.rows) {
        assert_eq!(
            row,
            &BudgetService::compute_budget_progress(budget, &txns, &thresholds)
        );
    }
}

#[test]
fn duplicate_budgets_stay_separate_and_are_reported() {
    let owner = Uuid::new_v4();
    let first = Budget::new(owner, "Food", dec!(100), jan());
    let second = Budget::new(owner, "Food", dec!(300), jan());
    let txns = vec![expense(owner, dec!(90), "Food", at(2024, 1, 3))];
    let overview = BudgetService::aggregate_all_budgets(
        &[first.clone(), second.clone()],
        &txns,
        &BudgetThresholds::default(),
    );
    assert_eq!(overview.rows.len(), 2);
    assert_eq!(overview.rows[0].spent, dec!(90));
    assert_eq!(overview.rows[1].spent, dec!(90));
    assert_eq!(overview.rows[0].status, BudgetStatus::Warning);
    assert_eq!(overview.rows[1].status, BudgetStatus::Ok);
    assert_eq!(overview.duplicates.len(), 1);
    assert_eq!(overview.duplicates[0].category, "Food");
    assert_eq!(overview.duplicates[0].budget_ids, vec![first.id, second.id]);
}

#[test]
fn empty_overview_is_zeroed() {
    let overview = BudgetService::aggregate_all_budgets(&[], &[], &BudgetThresholds::default());
    assert!(overview.rows.is_empty());
    assert_eq!(overview.total_limit, Decimal::ZERO);
    assert_eq!(overview.total_spent, Decimal::ZERO);
    assert_eq!(overview.total_remaining, Decimal::ZERO);
}

#[test]
fn add_validates_and_canonicalizes() {
    let store = MemoryLedgerStore::new();
    let owner = Uuid::new_v4();
    let catalog = CategoryCatalog::default();
    let stored = BudgetService::add(
        &store,
        owner,
        BudgetDraft::new("food", dec!(250), "2024-03"),
        &catalog,
    )
    .unwrap();
    assert_eq!(stored.category, "Food");
    assert_eq!(stored.month, PeriodKey::new(2024, 3).unwrap());
    assert_eq!(store.list_budgets(owner, None).unwrap().len(), 1);
}

#[test]
fn add_rejects_bad_drafts() {
    let store = MemoryLedgerStore::new();
    let owner = Uuid::new_v4();
    let catalog = CategoryCatalog::default();
    let cases = [
        BudgetDraft::new("Food", Decimal::ZERO, "2024-03"),
        BudgetDraft::new("Food", dec!(-5), "2024-03"),
        BudgetDraft::new("Salary", dec!(10), "2024-03"),
        BudgetDraft::new("Food", dec!(10), "2024-13"),
        BudgetDraft::new("Food", dec!(10), "March"),
        BudgetDraft::new("Food", MAX_AMOUNT + Decimal::ONE, "2024-03"),
    ];
    for draft in cases {
        assert!(BudgetService::add(&store, owner, draft, &catalog).is_err());
    }
    assert!(store.list_budgets(owner, None).unwrap().is_empty());
}

#[test]
fn add_accepts_duplicates() {
    let store = MemoryLedgerStore::new();
    let owner = Uuid::new_v4();
    let catalog = CategoryCatalog::default();
    for amount in [dec!(100), dec!(200)] {
        BudgetService::add(&store, owner, BudgetDraft::new("Food", amount, "2024-01"), &catalog)
            .unwrap();
    }
    assert_eq!(store.list_budgets(owner, Some(jan())).unwrap().len(), 2);
}

#[test]
fn remove_is_owner_scoped() {
    let store = MemoryLedgerStore::new();
    let owner = Uuid::new_v4();
    let catalog = CategoryCatalog::default();
    let stored =
        BudgetService::add(&store, owner, BudgetDraft::new("Rent", dec!(900), "2024-01"), &catalog)
            .unwrap();
    let err = BudgetService::remove(&store, Uuid::new_v4(), stored.id).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { .. }));
    let removed = BudgetService::remove(&store, owner, stored.id).unwrap();
    assert_eq!(removed.id, stored.id);
    assert!(store.list_budgets(owner, None).unwrap().is_empty());
}

fn sample_spending(owner: Uuid) -> Vec<Transaction> {
    vec![
        expense(owner, dec!(70), "Food", at(2024, 1, 4)),
        expense(owner, dec!(50), "Food", at(2024, 1, 20)),
        expense(owner, dec!(1000), "Rent", at(2024, 1, 1)),
        expense(owner, dec!(160), "Food", at(2024, 2, 2)),
        income(owner, dec!(2500), "Salary", at(2024, 1, 1)),
    ]
}
