use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::{at, expense};
use crate::core::services::{CategoryService, SummaryService};
use crate::ledger::{Budget, CategoryCatalog, PeriodKey, TransactionType};

#[test]
fn list_follows_catalog_order() {
    let catalog = CategoryCatalog::default();
    let income = CategoryService::list(&catalog, TransactionType::Income);
    assert_eq!(income.first(), Some(&"Salary"));
    assert!(income.contains(&"Other Income"));
    let expense = CategoryService::list(&catalog, TransactionType::Expense);
    assert_eq!(expense.len(), 10);
}

#[test]
fn placeholders_fill_inactive_catalog_labels() {
    let owner = Uuid::new_v4();
    let txns = vec![
        expense(owner, dec!(20), "Food", at(2024, 1, 2)),
        expense(owner, dec!(5), "Rent", at(2024, 1, 3)),
    ];
    let catalog = CategoryCatalog::default();
    let breakdown = SummaryService::compute_category_breakdown(&txns, None, TransactionType::Expense);
    let placeholders = CategoryService::placeholder_rows(&catalog, TransactionType::Expense, &breakdown);
    assert_eq!(placeholders.len(), 8);
    assert!(placeholders.iter().all(|row| row.total == Decimal::ZERO));
    assert!(placeholders.iter().all(|row| row.category != "Food"));

    let filled = CategoryService::with_placeholders(&catalog, &breakdown);
    assert_eq!(filled.rows.len(), 10);
    assert_eq!(filled.total(), breakdown.total());
}

#[test]
fn budget_placeholders_only_cover_unspent_budgets() {
    let owner = Uuid::new_v4();
    let jan = PeriodKey::new(2024, 1).unwrap();
    let txns = vec![expense(owner, dec!(20), "Food", at(2024, 1, 2))];
    let budgets = vec![
        Budget::new(owner, "Food", dec!(100), jan),
        Budget::new(owner, "Shopping", dec!(50), jan),
        Budget::new(owner, "Shopping", dec!(75), jan),
        Budget::new(owner, "Education", dec!(50), jan.next()),
    ];
    let breakdown =
        SummaryService::compute_category_breakdown(&txns, Some(jan), TransactionType::Expense);
    let rows = CategoryService::budget_placeholders(&budgets, &breakdown);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category, "Shopping");
}
