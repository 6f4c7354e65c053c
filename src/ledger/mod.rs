//! Wallet and transaction models, persistence-friendly and free of UI concerns.

pub mod summary;
pub mod transaction;
pub mod wallet;

pub use summary::MonthlySummary;
pub use transaction::{Transaction, TransactionDraft, TransactionType};
pub use wallet::Wallet;
