use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{LedgerError, Result};
use crate::ledger::{Budget, PeriodKey, Transaction};

use super::{LedgerStore, TransactionQuery};

const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Plain rows shared by the in-memory and JSON backends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerState {
    #[serde(default = "LedgerState::schema_version_default")]
    pub schema_version: u8,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
}

impl Default for LedgerState {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            transactions: Vec::new(),
            budgets: Vec::new(),
        }
    }
}

impl LedgerState {
    pub const CURRENT_SCHEMA_VERSION: u8 = CURRENT_SCHEMA_VERSION;

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    pub(crate) fn insert_transaction(&mut self, mut transaction: Transaction) -> Transaction {
        transaction.id = Uuid::new_v4();
        self.transactions.push(transaction.clone());
        transaction
    }

    pub(crate) fn update_transaction(&mut self, transaction: Transaction) -> Result<Transaction> {
        let slot = self
            .transactions
            .iter_mut()
            .find(|txn| txn.id == transaction.id && txn.owner_id == transaction.owner_id)
            .ok_or_else(|| LedgerError::not_found("Transaction", transaction.id))?;
        *slot = transaction.clone();
        Ok(transaction)
    }

    pub(crate) fn delete_transaction(&mut self, owner_id: Uuid, id: Uuid) -> Result<Transaction> {
        let index = self
            .transactions
            .iter()
            .position(|txn| txn.id == id && txn.owner_id == owner_id)
            .ok_or_else(|| LedgerError::not_found("Transaction", id))?;
        Ok(self.transactions.remove(index))
    }

    pub(crate) fn get_transaction(&self, owner_id: Uuid, id: Uuid) -> Option<Transaction> {
        self.transactions
            .iter()
            .find(|txn| txn.id == id && txn.owner_id == owner_id)
            .cloned()
    }

    pub(crate) fn insert_budget(&mut self, mut budget: Budget) -> Budget {
        budget.id = Uuid::new_v4();
        self.budgets.push(budget.clone());
        budget
    }

    pub(crate) fn delete_budget(&mut self, owner_id: Uuid, id: Uuid) -> Result<Budget> {
        let index = self
            .budgets
            .iter()
            .position(|budget| budget.id == id && budget.owner_id == owner_id)
            .ok_or_else(|| LedgerError::not_found("Budget", id))?;
        Ok(self.budgets.remove(index))
    }

    pub(crate) fn list_budgets(&self, owner_id: Uuid, period: Option<PeriodKey>) -> Vec<Budget> {
        self.budgets
            .iter()
            .filter(|budget| budget.owner_id == owner_id)
            .filter(|budget| period.map_or(true, |p| budget.month == p))
            .cloned()
            .collect()
    }
}

/// Volatile store guarded by a single reader-writer lock.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    state: RwLock<LedgerState>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: LedgerState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, LedgerState>> {
        self.state
            .read()
            .map_err(|_| LedgerError::Storage("ledger state lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, LedgerState>> {
        self.state
            .write()
            .map_err(|_| LedgerError::Storage("ledger state lock poisoned".into()))
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn insert_transaction(&self, transaction: Transaction) -> Result<Transaction> {
        Ok(self.write()?.insert_transaction(transaction))
    }

    fn update_transaction(&self, transaction: Transaction) -> Result<Transaction> {
        self.write()?.update_transaction(transaction)
    }

    fn delete_transaction(&self, owner_id: Uuid, id: Uuid) -> Result<Transaction> {
        self.write()?.delete_transaction(owner_id, id)
    }

    fn get_transaction(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Transaction>> {
        Ok(self.read()?.get_transaction(owner_id, id))
    }

    fn query_transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>> {
        Ok(query.apply(&self.read()?.transactions))
    }

    fn insert_budget(&self, budget: Budget) -> Result<Budget> {
        Ok(self.write()?.insert_budget(budget))
    }

    fn delete_budget(&self, owner_id: Uuid, id: Uuid) -> Result<Budget> {
        self.write()?.delete_budget(owner_id, id)
    }

    fn list_budgets(&self, owner_id: Uuid, period: Option<PeriodKey>) -> Result<Vec<Budget>> {
        Ok(self.read()?.list_budgets(owner_id, period))
    }
}
