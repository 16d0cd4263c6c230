mod budget_service_tests;
mod category_service_tests;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::ledger::{Transaction, TransactionType};

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn expense(owner: Uuid, amount: Decimal, category: &str, date: NaiveDateTime) -> Transaction {
    Transaction::new(owner, amount, category, TransactionType::Expense, date)
}

fn income(owner: Uuid, amount: Decimal, category: &str, date: NaiveDateTime) -> Transaction {
    Transaction::new(owner, amount, category, TransactionType::Income, date)
}
