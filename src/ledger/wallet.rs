use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::summary::MonthlySummary;
use super::transaction::{Transaction, TransactionType};

/// A named account holding an opening balance and the transactions recorded against it.
///
/// Transactions are kept in insertion order, which is not necessarily date order.
/// The list can only grow through [`Wallet::add_transaction`], the single place the
/// no-overdraft rule is checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Wallet {
    pub id: u32,
    pub name: String,
    pub currency: String,
    pub initial_balance: Decimal,
    #[serde(default)]
    transactions: Vec<Transaction>,
}

impl Wallet {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        currency: impl Into<String>,
        initial_balance: Decimal,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            currency: currency.into(),
            initial_balance,
            transactions: Vec::new(),
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Name trimmed and lowercased; two wallets with equal keys count as the same name.
    pub fn name_key(&self) -> String {
        self.name.trim().to_lowercase()
    }

    /// Initial balance plus all income minus all expenses, recomputed on every call.
    pub fn current_balance(&self) -> Decimal {
        self.transactions
            .iter()
            .fold(self.initial_balance, |balance, txn| balance + txn.signed_amount())
    }

    /// Appends `transaction` unless it is an expense larger than the current balance.
    ///
    /// An expense equal to the balance is accepted and leaves the wallet at zero.
    /// Returns `false` and leaves the wallet untouched on rejection.
    pub fn add_transaction(&mut self, transaction: Transaction) -> bool {
        if transaction.kind == TransactionType::Expense {
            let balance = self.current_balance();
            if transaction.amount > balance {
                tracing::warn!(
                    wallet_id = self.id,
                    transaction_id = transaction.id,
                    amount = %transaction.amount,
                    balance = %balance,
                    "expense rejected: insufficient funds"
                );
                return false;
            }
        }
        tracing::debug!(
            wallet_id = self.id,
            transaction_id = transaction.id,
            kind = %transaction.kind,
            amount = %transaction.amount,
            "transaction recorded"
        );
        self.transactions.push(transaction);
        true
    }

    /// Transactions dated in the given year and month, in insertion order.
    pub fn transactions_in_month(
        &self,
        year: i32,
        month: u32,
    ) -> impl Iterator<Item = &Transaction> + '_ {
        self.transactions
            .iter()
            .filter(move |txn| txn.is_in_month(year, month))
    }

    pub fn monthly_summary(&self, year: i32, month: u32) -> MonthlySummary {
        MonthlySummary::from_transactions(self.transactions_in_month(year, month))
    }

    pub fn max_transaction_id(&self) -> Option<u32> {
        self.transactions.iter().map(|txn| txn.id).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal_macros::dec;

    fn on(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn expense(id: u32, amount: Decimal) -> Transaction {
        Transaction::new(id, on(2026, 1, 10), amount, TransactionType::Expense, "Test", 1)
    }

    fn income(id: u32, amount: Decimal) -> Transaction {
        Transaction::new(id, on(2026, 1, 10), amount, TransactionType::Income, "Test", 1)
    }

    #[test]
    fn balance_without_transactions_is_initial_balance() {
        let wallet = Wallet::new(1, "Test wallet", "RUB", dec!(1000));
        assert_eq!(wallet.current_balance(), dec!(1000));
    }

    #[test]
    fn income_increases_balance() {
        let mut wallet = Wallet::new(1, "Test wallet", "RUB", dec!(1000));
        assert!(wallet.add_transaction(income(1, dec!(500))));
        assert_eq!(wallet.current_balance(), dec!(1500));
    }

    #[test]
    fn expense_decreases_balance() {
        let mut wallet = Wallet::new(1, "Test wallet", "RUB", dec!(1000));
        assert!(wallet.add_transaction(expense(1, dec!(300))));
        assert_eq!(wallet.current_balance(), dec!(700));
    }

    #[test]
    fn overdraft_is_rejected_without_mutation() {
        let mut wallet = Wallet::new(1, "Test wallet", "RUB", dec!(100));
        assert!(!wallet.add_transaction(expense(1, dec!(150))));
        assert!(wallet.transactions().is_empty());
        assert_eq!(wallet.current_balance(), dec!(100));

        assert!(!wallet.add_transaction(expense(2, dec!(150))));
        assert_eq!(wallet.transaction_count(), 0);
    }

    #[test]
    fn valid_expense_is_accepted() {
        let mut wallet = Wallet::new(1, "Test wallet", "RUB", dec!(200));
        assert!(wallet.add_transaction(expense(1, dec!(150))));
        assert_eq!(wallet.transaction_count(), 1);
        assert_eq!(wallet.current_balance(), dec!(50));
    }

    #[test]
    fn expense_equal_to_balance_is_accepted_one_cent_more_is_not() {
        let mut wallet = Wallet::new(1, "Cash", "USD", dec!(80.25));
        assert!(!wallet.add_transaction(expense(1, dec!(80.26))));
        assert!(wallet.add_transaction(expense(2, dec!(80.25))));
        assert_eq!(wallet.current_balance(), dec!(0));
        assert!(!wallet.add_transaction(expense(3, dec!(0.01))));
    }

    #[test]
    fn income_is_never_rejected_even_when_balance_is_negative() {
        let mut wallet = Wallet::new(1, "Debt", "EUR", dec!(-50));
        assert!(wallet.add_transaction(income(1, dec!(20))));
        assert_eq!(wallet.current_balance(), dec!(-30));
        assert!(!wallet.add_transaction(expense(2, dec!(1))));
    }

    #[test]
    fn lowering_initial_balance_is_not_revalidated() {
        let mut wallet = Wallet::new(1, "Cash", "USD", dec!(100));
        assert!(wallet.add_transaction(expense(1, dec!(100))));
        wallet.initial_balance = dec!(40);
        assert_eq!(wallet.current_balance(), dec!(-60));
    }

    #[test]
    fn monthly_summary_ignores_other_months_and_years() {
        let mut wallet = Wallet::new(1, "Card", "RUB", dec!(1000));
        wallet.add_transaction(Transaction::new(1, on(2026, 1, 3), dec!(200), TransactionType::Income, "Pay", 1));
        wallet.add_transaction(Transaction::new(2, on(2026, 1, 20), dec!(75), TransactionType::Expense, "Food", 1));
        wallet.add_transaction(Transaction::new(3, on(2026, 2, 1), dec!(30), TransactionType::Expense, "Taxi", 1));
        wallet.add_transaction(Transaction::new(4, on(2025, 1, 15), dec!(500), TransactionType::Income, "Bonus", 1));

        let summary = wallet.monthly_summary(2026, 1);
        assert_eq!(summary, MonthlySummary::new(dec!(200), dec!(75)));
        assert_eq!(summary.net(), dec!(125));
        assert_eq!(wallet.monthly_summary(2024, 1), MonthlySummary::default());
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut wallet = Wallet::new(1, "Card", "RUB", dec!(1000));
        wallet.add_transaction(Transaction::new(9, on(2026, 3, 1), dec!(1), TransactionType::Income, "Late", 1));
        wallet.add_transaction(Transaction::new(2, on(2026, 1, 1), dec!(1), TransactionType::Income, "Early", 1));
        let ids: Vec<u32> = wallet.transactions().iter().map(|txn| txn.id).collect();
        assert_eq!(ids, vec![9, 2]);
        assert_eq!(wallet.max_transaction_id(), Some(9));
    }
}
