//! Synthetic wallets for demos and first-run exploration.

use chrono::{Duration, NaiveDateTime};
use rand::{seq::SliceRandom, Rng};
use rust_decimal::Decimal;

use crate::ledger::{Transaction, TransactionType, Wallet};

pub const DEMO_WALLET_COUNT: u32 = 3;
pub const CANDIDATES_PER_WALLET: usize = 20;
/// Candidates are dated between 1 and `MAX_AGE_DAYS - 1` days before `today`.
pub const MAX_AGE_DAYS: i64 = 90;

const CURRENCIES: &[&str] = &["RUB", "USD", "EUR"];
const INCOME_DESCRIPTIONS: &[&str] = &[
    "Salary",
    "Freelance",
    "Investments",
    "Gift",
    "Debt repayment",
    "Trading profit",
];
const EXPENSE_DESCRIPTIONS: &[&str] = &[
    "Groceries",
    "Transport",
    "Entertainment",
    "Rent",
    "Clothes",
    "Restaurant",
    "Taxi",
    "Health",
];

/// Generates demo wallets with a few months of history ending before `today`.
///
/// Candidate transactions go through [`Wallet::add_transaction`] oldest first, so an
/// expense that would overdraw is dropped rather than recorded. Transaction ids are
/// unique across all generated wallets.
pub fn generate_demo_wallets<R: Rng + ?Sized>(rng: &mut R, today: NaiveDateTime) -> Vec<Wallet> {
    let mut next_id = 1u32;
    let mut wallets = Vec::new();

    for wallet_id in 1..=DEMO_WALLET_COUNT {
        let currency = CURRENCIES.choose(rng).copied().unwrap_or("RUB");
        let initial_balance = Decimal::from(rng.gen_range(1000u32..5000));
        let mut wallet = Wallet::new(
            wallet_id,
            format!("Wallet {wallet_id}"),
            currency,
            initial_balance,
        );

        let mut candidates: Vec<(NaiveDateTime, TransactionType, Decimal, &str)> = (0
            ..CANDIDATES_PER_WALLET)
            .map(|_| candidate(rng, today))
            .collect();
        candidates.sort_by_key(|(date, ..)| *date);

        for (date, kind, amount, description) in candidates {
            let txn = Transaction::new(next_id, date, amount, kind, description, wallet_id);
            if wallet.add_transaction(txn) {
                next_id += 1;
            }
        }
        tracing::debug!(
            wallet_id,
            transactions = wallet.transaction_count(),
            "demo wallet generated"
        );
        wallets.push(wallet);
    }
    wallets
}

fn candidate<R: Rng + ?Sized>(
    rng: &mut R,
    today: NaiveDateTime,
) -> (NaiveDateTime, TransactionType, Decimal, &'static str) {
    let date = today - Duration::days(rng.gen_range(1..MAX_AGE_DAYS));
    if rng.gen_bool(0.5) {
        let amount = Decimal::from(rng.gen_range(100u32..2000));
        let description = INCOME_DESCRIPTIONS.choose(rng).copied().unwrap_or("Income");
        (date, TransactionType::Income, amount, description)
    } else {
        let amount = Decimal::from(rng.gen_range(10u32..500));
        let description = EXPENSE_DESCRIPTIONS.choose(rng).copied().unwrap_or("Expense");
        (date, TransactionType::Expense, amount, description)
    }
}
