//! Display-ready projections of the finance service for UI and CLI layers.

pub mod summary_view;

use rust_decimal::Decimal;

use crate::core::services::FinanceService;
use crate::ledger::{MonthlySummary, Transaction};

pub use summary_view::{MonthlySummaryView, SummaryField};

// Languages that write the decimal part after a comma.
const COMMA_DECIMAL_LANGUAGES: &[&str] = &["ru", "uk", "be", "kk", "de", "fr", "es", "it", "pt", "pl", "cs", "nl"];

/// Renders money with two decimals and the decimal separator of a locale such as `ru-RU`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountFormat {
    decimal_separator: char,
}

impl AmountFormat {
    pub fn for_locale(locale: &str) -> Self {
        let language = locale
            .split(|c: char| c == '-' || c == '_')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        let decimal_separator = if COMMA_DECIMAL_LANGUAGES.contains(&language.as_str()) {
            ','
        } else {
            '.'
        };
        Self { decimal_separator }
    }

    pub fn format(&self, amount: Decimal) -> String {
        let text = format!("{:.2}", amount.round_dp(2));
        match self.decimal_separator {
            '.' => text,
            separator => text.replace('.', &separator.to_string()),
        }
    }
}

/// A transaction paired with the name of the wallet it is shown under.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransactionDisplay<'a> {
    pub transaction: &'a Transaction,
    pub wallet_name: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WalletRow<'a> {
    pub id: u32,
    pub name: &'a str,
    pub currency: &'a str,
    pub balance: Decimal,
    pub transaction_count: usize,
}

/// Everything a monthly overview page renders.
#[derive(Debug, Clone)]
pub struct MonthlyReport<'a> {
    pub year: i32,
    pub month: u32,
    pub wallets: Vec<WalletRow<'a>>,
    /// Grouped transactions flattened in group order, each group oldest first.
    pub transactions: Vec<TransactionDisplay<'a>>,
    /// Top expenses flattened wallet by wallet (by name), largest first within a wallet.
    pub top_expenses: Vec<TransactionDisplay<'a>>,
    pub summary: MonthlySummary,
}

impl<'a> MonthlyReport<'a> {
    pub fn build(service: &'a FinanceService, year: i32, month: u32) -> Self {
        let wallets = service
            .wallets()
            .iter()
            .map(|wallet| WalletRow {
                id: wallet.id,
                name: wallet.name.as_str(),
                currency: wallet.currency.as_str(),
                balance: wallet.current_balance(),
                transaction_count: wallet.transaction_count(),
            })
            .collect();

        let transactions = service
            .monthly_transactions_grouped(year, month)
            .into_iter()
            .flat_map(|group| group.transactions)
            .map(|transaction| TransactionDisplay {
                transaction,
                wallet_name: service.wallet_name(transaction.wallet_id),
            })
            .collect();

        let top_expenses = service
            .top3_expenses_per_wallet(year, month)
            .into_iter()
            .flat_map(|(wallet_name, expenses)| {
                expenses.into_iter().map(move |transaction| TransactionDisplay {
                    transaction,
                    wallet_name,
                })
            })
            .collect();

        Self {
            year,
            month,
            wallets,
            transactions,
            top_expenses,
            summary: service.total_monthly_summary(year, month),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
