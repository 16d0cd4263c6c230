//! The ledger store contract consumed by the services, plus two backends.
//!
//! Every read and write is scoped to one owner. Backends share
//! [`TransactionQuery::apply`] so filtering behaves the same everywhere.

pub mod json_backend;
pub mod memory;

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::Result;
use crate::ledger::{Budget, DateWindow, PeriodKey, Transaction, TransactionType};

pub use json_backend::JsonLedgerStore;
pub use memory::{LedgerState, MemoryLedgerStore};

/// Page size used when a caller does not pick one.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Abstraction over persistence backends holding transactions and budgets.
pub trait LedgerStore: Send + Sync {
    /// Stores a new transaction under a freshly assigned id and returns it.
    fn insert_transaction(&self, transaction: Transaction) -> Result<Transaction>;
    /// Replaces the stored row matching `(owner_id, id)` of `transaction`.
    fn update_transaction(&self, transaction: Transaction) -> Result<Transaction>;
    /// Removes the row immediately and returns what was deleted.
    fn delete_transaction(&self, owner_id: Uuid, id: Uuid) -> Result<Transaction>;
    fn get_transaction(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Transaction>>;
    fn query_transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>>;
    /// Stores a new budget under a freshly assigned id. Duplicates are not rejected.
    fn insert_budget(&self, budget: Budget) -> Result<Budget>;
    fn delete_budget(&self, owner_id: Uuid, id: Uuid) -> Result<Budget>;
    fn list_budgets(&self, owner_id: Uuid, period: Option<PeriodKey>) -> Result<Vec<Budget>>;
}

/// Ordering options offered by transaction listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionSort {
    #[default]
    DateNewest,
    DateOldest,
    AmountHighToLow,
    AmountLowToHigh,
    Category,
}

impl TransactionSort {
    fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        let primary = match self {
            TransactionSort::DateNewest => b.date.cmp(&a.date),
            TransactionSort::DateOldest => a.date.cmp(&b.date),
            TransactionSort::AmountHighToLow => b.amount.cmp(&a.amount),
            TransactionSort::AmountLowToHigh => a.amount.cmp(&b.amount),
            TransactionSort::Category => a
                .category
                .cmp(&b.category)
                .then_with(|| b.date.cmp(&a.date)),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

/// Owner-scoped filter over stored transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionQuery {
    pub owner_id: Uuid,
    pub window: Option<DateWindow>,
    pub category: Option<String>,
    pub transaction_type: Option<TransactionType>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub description_contains: Option<String>,
    pub sort: TransactionSort,
    pub skip: usize,
    pub limit: Option<usize>,
}

impl TransactionQuery {
    /// A listing query: newest first, first [`DEFAULT_PAGE_SIZE`] rows.
    pub fn for_owner(owner_id: Uuid) -> Self {
        Self {
            owner_id,
            window: None,
            category: None,
            transaction_type: None,
            min_amount: None,
            max_amount: None,
            description_contains: None,
            sort: TransactionSort::default(),
            skip: 0,
            limit: Some(DEFAULT_PAGE_SIZE),
        }
    }

    /// Every transaction of the owner, unpaged. Used for report snapshots.
    pub fn snapshot(owner_id: Uuid) -> Self {
        Self::for_owner(owner_id).unbounded()
    }

    pub fn within(mut self, window: DateWindow) -> Self {
        self.window = Some(window);
        self
    }

    pub fn in_period(self, period: PeriodKey) -> Self {
        self.within(DateWindow::for_period(period))
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn of_type(mut self, kind: TransactionType) -> Self {
        self.transaction_type = Some(kind);
        self
    }

    pub fn amount_between(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.min_amount = min;
        self.max_amount = max;
        self
    }

    pub fn description_contains(mut self, needle: impl Into<String>) -> Self {
        let needle = needle.into().trim().to_lowercase();
        self.description_contains = (!needle.is_empty()).then_some(needle);
        self
    }

    pub fn sorted_by(mut self, sort: TransactionSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn page(mut self, skip: usize, limit: usize) -> Self {
        self.skip = skip;
        self.limit = Some(limit);
        self
    }

    pub fn unbounded(mut self) -> Self {
        self.limit = None;
        self
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        if txn.owner_id != self.owner_id {
            return false;
        }
        if let Some(window) = &self.window {
            if !window.contains(&txn.date) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &txn.category != category {
                return false;
            }
        }
        if let Some(kind) = self.transaction_type {
            if txn.transaction_type != kind {
                return false;
            }
        }
        if self.min_amount.map_or(false, |min| txn.amount < min) {
            return false;
        }
        if self.max_amount.map_or(false, |max| txn.amount > max) {
            return false;
        }
        if let Some(needle) = &self.description_contains {
            let hit = txn
                .description
                .as_deref()
                .map(|text| text.to_lowercase().contains(needle.as_str()))
                .unwrap_or(false);
            if !hit {
                return false;
            }
        }
        true
    }

    /// Filters, sorts and pages `rows`.
    pub fn apply<'a, I>(&self, rows: I) -> Vec<Transaction>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut selected: Vec<Transaction> = rows
            .into_iter()
            .filter(|txn| self.matches(txn))
            .cloned()
            .collect();
        selected.sort_by(|a, b| self.sort.compare(a, b));
        let paged = selected.into_iter().skip(self.skip);
        match self.limit {
            Some(limit) => paged.take(limit).collect(),
            None => paged.collect(),
        }
    }
}
