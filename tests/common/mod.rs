#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime};
use finance_tracker::ledger::{Transaction, TransactionType};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated directory that outlives the calling test.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn on(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("valid date")
        .and_hms_opt(12, 0, 0)
        .expect("valid time")
}

pub fn income(id: u32, date: NaiveDateTime, amount: Decimal, wallet_id: u32) -> Transaction {
    Transaction::new(id, date, amount, TransactionType::Income, format!("Income {id}"), wallet_id)
}

pub fn expense(id: u32, date: NaiveDateTime, amount: Decimal, wallet_id: u32) -> Transaction {
    Transaction::new(id, date, amount, TransactionType::Expense, format!("Expense {id}"), wallet_id)
}
