//! Transaction direction and the category catalog used at the write boundary.

use std::{collections::BTreeMap, fmt, str::FromStr};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

/// Direction of a transaction. Amounts are unsigned; this carries the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub const ALL: [TransactionType; 2] = [TransactionType::Income, TransactionType::Expense];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(LedgerError::Validation(format!(
                "transaction type must be income or expense, got `{}`",
                s
            ))),
        }
    }
}

const DEFAULT_INCOME: &[&str] = &[
    "Salary",
    "Freelance",
    "Investment",
    "Gift",
    "Bonus",
    "Other Income",
];

const DEFAULT_EXPENSE: &[&str] = &[
    "Food",
    "Transportation",
    "Entertainment",
    "Bills",
    "Shopping",
    "Healthcare",
    "Education",
    "Rent",
    "Utilities",
    "Other",
];

static DEFAULT_CATALOG: Lazy<CategoryCatalog> = Lazy::new(|| CategoryCatalog {
    income: DEFAULT_INCOME.iter().map(|s| s.to_string()).collect(),
    expense: DEFAULT_EXPENSE.iter().map(|s| s.to_string()).collect(),
});

/// Allowed category labels per [`TransactionType`].
///
/// Only the validating services consult the catalog. Aggregation accepts any
/// non-empty label so reports stay correct when the catalog changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCatalog {
    income: Vec<String>,
    expense: Vec<String>,
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        DEFAULT_CATALOG.clone()
    }
}

impl CategoryCatalog {
    pub fn new(income: Vec<String>, expense: Vec<String>) -> Self {
        Self {
            income: normalize_labels(income),
            expense: normalize_labels(expense),
        }
    }

    /// Starts from the default table and replaces the lists named in `overrides`.
    pub fn with_overrides(overrides: &BTreeMap<TransactionType, Vec<String>>) -> Self {
        let mut catalog = Self::default();
        for (kind, labels) in overrides {
            let labels = normalize_labels(labels.clone());
            if labels.is_empty() {
                continue;
            }
            match kind {
                TransactionType::Income => catalog.income = labels,
                TransactionType::Expense => catalog.expense = labels,
            }
        }
        catalog
    }

    pub fn categories_for(&self, kind: TransactionType) -> &[String] {
        match kind {
            TransactionType::Income => &self.income,
            TransactionType::Expense => &self.expense,
        }
    }

    /// Returns the catalog spelling of `label`, matching case-insensitively.
    pub fn canonical_label(&self, kind: TransactionType, label: &str) -> Option<&str> {
        let wanted = label.trim();
        self.categories_for(kind)
            .iter()
            .find(|candidate| candidate.eq_ignore_ascii_case(wanted))
            .map(String::as_str)
    }

    pub fn contains(&self, kind: TransactionType, label: &str) -> bool {
        self.canonical_label(kind, label).is_some()
    }

    pub fn validate(&self, kind: TransactionType, label: &str) -> Result<String, LedgerError> {
        if label.trim().is_empty() {
            return Err(LedgerError::Validation("category must not be empty".into()));
        }
        self.canonical_label(kind, label)
            .map(str::to_string)
            .ok_or_else(|| {
                LedgerError::Validation(format!("`{}` is not a known {} category", label, kind))
            })
    }
}

fn normalize_labels(labels: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(labels.len());
    for label in labels {
        let trimmed = label.trim();
        if trimmed.is_empty() || seen.iter().any(|s| s.eq_ignore_ascii_case(trimmed)) {
            continue;
        }
        seen.push(trimmed.to_string());
    }
    seen
}
