#![doc(test(attr(deny(warnings))))]

//! Finance Tracker keeps personal wallets and their income/expense history, and
//! computes balances and monthly summaries over them.
//!
//! ```
//! use chrono::NaiveDate;
//! use finance_tracker::core::services::FinanceService;
//! use finance_tracker::ledger::{Transaction, TransactionType, Wallet};
//! use rust_decimal::Decimal;
//!
//! let mut service = FinanceService::new();
//! service
//!     .add_wallet(Wallet::new(1, "Card", "RUB", Decimal::from(200)))
//!     .unwrap();
//! let date = NaiveDate::from_ymd_opt(2026, 1, 15)
//!     .unwrap()
//!     .and_hms_opt(12, 0, 0)
//!     .unwrap();
//! let rent = Transaction::new(1, date, Decimal::from(150), TransactionType::Expense, "Rent", 1);
//! assert!(service.try_add_transaction(1, rent));
//! assert_eq!(service.total_monthly_summary(2026, 1).expense, Decimal::from(150));
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod demo;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;
pub mod view;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Finance Tracker tracing initialized.");
    });
}
