pub mod finance_service;

pub use finance_service::{FinanceService, TransactionGroup, TOP_EXPENSES_LIMIT, UNKNOWN_WALLET};
