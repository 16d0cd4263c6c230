//! Catalog lookups and zero-valued placeholder rows for the presentation layer.

use std::collections::BTreeSet;

use rust_decimal::Decimal;

use crate::ledger::{Budget, CategoryBreakdown, CategoryCatalog, CategoryTotal, TransactionType};

/// Read-only helpers around [`CategoryCatalog`].
pub struct CategoryService;

impl CategoryService {
    pub fn list(catalog: &CategoryCatalog, kind: TransactionType) -> Vec<&str> {
        catalog
            .categories_for(kind)
            .iter()
            .map(String::as_str)
            .collect()
    }

    /// Zero rows for catalog labels of `kind` that have no activity in `breakdown`.
    pub fn placeholder_rows(
        catalog: &CategoryCatalog,
        kind: TransactionType,
        breakdown: &CategoryBreakdown,
    ) -> Vec<CategoryTotal> {
        catalog
            .categories_for(kind)
            .iter()
            .filter(|label| breakdown.get(label).is_none())
            .map(|label| zero_row(label))
            .collect()
    }

    /// Zero rows for budgeted categories that have no spending in `breakdown`.
    pub fn budget_placeholders(budgets: &[Budget], breakdown: &CategoryBreakdown) -> Vec<CategoryTotal> {
        let missing: BTreeSet<&str> = budgets
            .iter()
            .filter(|budget| breakdown.period.map_or(true, |p| budget.month == p))
            .map(|budget| budget.category.as_str())
            .filter(|category| breakdown.get(category).is_none())
            .collect();
        missing.into_iter().map(zero_row).collect()
    }

    /// The breakdown with catalog placeholders appended.
    pub fn with_placeholders(catalog: &CategoryCatalog, breakdown: &CategoryBreakdown) -> CategoryBreakdown {
        let mut filled = breakdown.clone();
        filled
            .rows
            .extend(Self::placeholder_rows(catalog, breakdown.kind, breakdown));
        filled
    }
}

fn zero_row(category: &str) -> CategoryTotal {
    CategoryTotal {
        category: category.to_string(),
        total: Decimal::ZERO,
    }
}
