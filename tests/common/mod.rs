#![allow(dead_code)]

use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime};
use mymoney_core::{
    config::ConfigManager,
    ledger::{Transaction, TransactionType},
    storage::JsonLedgerStore,
    utils::ledger_file_in,
    LedgerManager, OwnerContext,
};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use tempfile::TempDir;
use uuid::Uuid;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated manager backed by a JSON store in a unique directory.
pub fn setup_test_env() -> (LedgerManager, ConfigManager, OwnerContext) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    let config = config_manager.load().expect("load default config");
    let store = JsonLedgerStore::open(ledger_file_in(&base)).expect("open json ledger store");
    let manager =
        LedgerManager::new(Box::new(store), config).expect("create ledger manager");

    (manager, config_manager, OwnerContext::new(Uuid::new_v4()))
}

pub fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .expect("valid date")
        .and_hms_opt(10, 0, 0)
        .expect("valid time")
}

pub fn expense(owner: Uuid, amount: Decimal, category: &str, date: NaiveDateTime) -> Transaction {
    Transaction::new(owner, amount, category, TransactionType::Expense, date)
}

pub fn income(owner: Uuid, amount: Decimal, category: &str, date: NaiveDateTime) -> Transaction {
    Transaction::new(owner, amount, category, TransactionType::Income, date)
}
