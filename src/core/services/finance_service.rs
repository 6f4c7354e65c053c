//! Aggregation queries and the guarded insertion path over the session's wallets.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::errors::{FinanceError, Result};
use crate::ledger::{MonthlySummary, Transaction, TransactionType, Wallet};

/// Label returned by [`FinanceService::wallet_name`] when no wallet matches.
pub const UNKNOWN_WALLET: &str = "Unknown";

/// Maximum number of expenses reported per wallet by
/// [`FinanceService::top3_expenses_per_wallet`].
pub const TOP_EXPENSES_LIMIT: usize = 3;

/// All transactions of one type within a month, with their summed amount.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionGroup<'a> {
    pub kind: TransactionType,
    pub total: Decimal,
    /// Members sorted by date ascending; equal dates keep encounter order.
    pub transactions: Vec<&'a Transaction>,
}

impl TransactionGroup<'_> {
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Owns the wallet collection for a session.
///
/// Wallet ids and names are not required to be unique when a collection is supplied
/// wholesale (for example after a load): lookups by id use the first match, and
/// the top-expense map keeps the last wallet seen for a repeated name.
/// [`FinanceService::add_wallet`] refuses to create new duplicates.
#[derive(Debug, Clone, Default)]
pub struct FinanceService {
    wallets: Vec<Wallet>,
}

impl FinanceService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wallets(wallets: Vec<Wallet>) -> Self {
        Self { wallets }
    }

    pub fn wallets(&self) -> &[Wallet] {
        &self.wallets
    }

    /// Swaps in a freshly loaded collection, returning the previous one.
    pub fn replace_wallets(&mut self, wallets: Vec<Wallet>) -> Vec<Wallet> {
        std::mem::replace(&mut self.wallets, wallets)
    }

    pub fn wallet(&self, wallet_id: u32) -> Option<&Wallet> {
        self.wallets.iter().find(|wallet| wallet.id == wallet_id)
    }

    /// Adds a new wallet after checking its name is set and neither id nor name is taken.
    pub fn add_wallet(&mut self, wallet: Wallet) -> Result<()> {
        let name_key = wallet.name_key();
        if name_key.is_empty() {
            return Err(FinanceError::InvalidInput(
                "wallet name must not be empty".into(),
            ));
        }
        if self.wallet(wallet.id).is_some() {
            return Err(FinanceError::InvalidInput(format!(
                "wallet id {} is already in use",
                wallet.id
            )));
        }
        if self
            .wallets
            .iter()
            .any(|existing| existing.name_key() == name_key)
        {
            return Err(FinanceError::DuplicateWallet(wallet.name));
        }
        tracing::info!(wallet_id = wallet.id, name = %wallet.name, "wallet added");
        self.wallets.push(wallet);
        Ok(())
    }

    /// Routes `transaction` to the first wallet with `wallet_id` and applies its overdraft check.
    ///
    /// Returns `false` when no wallet matches or the wallet rejects the expense.
    pub fn try_add_transaction(&mut self, wallet_id: u32, transaction: Transaction) -> bool {
        match self.wallets.iter_mut().find(|wallet| wallet.id == wallet_id) {
            Some(wallet) => wallet.add_transaction(transaction),
            None => {
                tracing::warn!(wallet_id, transaction_id = transaction.id, "unknown wallet");
                false
            }
        }
    }

    /// Name of the first wallet with `wallet_id`, or [`UNKNOWN_WALLET`].
    pub fn wallet_name(&self, wallet_id: u32) -> &str {
        self.wallet(wallet_id)
            .map(|wallet| wallet.name.as_str())
            .unwrap_or(UNKNOWN_WALLET)
    }

    fn transactions_in_month(
        &self,
        year: i32,
        month: u32,
    ) -> impl Iterator<Item = &Transaction> + '_ {
        self.wallets
            .iter()
            .flat_map(move |wallet| wallet.transactions_in_month(year, month))
    }

    /// Pools the month's transactions across wallets and groups them by type.
    ///
    /// Empty groups are omitted. Groups come largest total first; on equal totals the
    /// type encountered first wins. Members are sorted by date ascending.
    pub fn monthly_transactions_grouped(&self, year: i32, month: u32) -> Vec<TransactionGroup<'_>> {
        let mut groups: Vec<TransactionGroup<'_>> = Vec::new();
        for txn in self.transactions_in_month(year, month) {
            match groups.iter_mut().find(|group| group.kind == txn.kind) {
                Some(group) => {
                    group.total += txn.amount;
                    group.transactions.push(txn);
                }
                None => groups.push(TransactionGroup {
                    kind: txn.kind,
                    total: txn.amount,
                    transactions: vec![txn],
                }),
            }
        }
        for group in &mut groups {
            group.transactions.sort_by_key(|txn| txn.date);
        }
        groups.sort_by(|a, b| b.total.cmp(&a.total));
        groups
    }

    /// Up to three largest expenses of the month for every wallet, keyed by wallet name.
    ///
    /// Every wallet gets an entry, possibly empty. Equal amounts keep insertion order.
    /// Wallets sharing a name collide and the later one wins.
    pub fn top3_expenses_per_wallet(
        &self,
        year: i32,
        month: u32,
    ) -> BTreeMap<&str, Vec<&Transaction>> {
        let mut result = BTreeMap::new();
        for wallet in &self.wallets {
            let mut expenses: Vec<&Transaction> = wallet
                .transactions_in_month(year, month)
                .filter(|txn| txn.is_expense())
                .collect();
            expenses.sort_by(|a, b| b.amount.cmp(&a.amount));
            expenses.truncate(TOP_EXPENSES_LIMIT);
            if result.insert(wallet.name.as_str(), expenses).is_some() {
                tracing::warn!(
                    name = %wallet.name,
                    wallet_id = wallet.id,
                    "duplicate wallet name replaces earlier top expenses"
                );
            }
        }
        result
    }

    /// Income and expense totals of the month across every wallet.
    pub fn total_monthly_summary(&self, year: i32, month: u32) -> MonthlySummary {
        MonthlySummary::from_transactions(self.transactions_in_month(year, month))
    }

    /// One past the largest transaction id in any wallet, starting at 1.
    ///
    /// Fails when a loaded collection already holds `u32::MAX`.
    pub fn next_transaction_id(&self) -> Result<u32> {
        let largest = self
            .wallets
            .iter()
            .filter_map(Wallet::max_transaction_id)
            .max();
        id_after(largest, "transaction")
    }

    pub fn next_wallet_id(&self) -> Result<u32> {
        id_after(self.wallets.iter().map(|wallet| wallet.id).max(), "wallet")
    }

    /// Current balances summed per currency code. No conversion is applied.
    pub fn total_balance_by_currency(&self) -> BTreeMap<String, Decimal> {
        let mut totals = BTreeMap::new();
        for wallet in &self.wallets {
            *totals
                .entry(wallet.currency.clone())
                .or_insert(Decimal::ZERO) += wallet.current_balance();
        }
        totals
    }
}

fn id_after(largest: Option<u32>, entity: &str) -> Result<u32> {
    match largest {
        None => Ok(1),
        Some(id) => id.checked_add(1).ok_or_else(|| {
            FinanceError::InvalidInput(format!("no {entity} ids left after {id}"))
        }),
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
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn txn(id: u32, date: NaiveDateTime, amount: Decimal, kind: TransactionType, wallet_id: u32) -> Transaction {
        Transaction::new(id, date, amount, kind, format!("txn {id}"), wallet_id)
    }

    fn service_with(wallets: Vec<Wallet>) -> FinanceService {
        FinanceService::with_wallets(wallets)
    }

    #[test]
    fn groups_by_type_and_orders_by_total() {
        let mut wallet = Wallet::new(1, "Test", "RUB", dec!(1000));
        wallet.add_transaction(txn(1, on(2026, 1, 15), dec!(100), TransactionType::Income, 1));
        wallet.add_transaction(txn(2, on(2026, 1, 20), dec!(50), TransactionType::Expense, 1));
        wallet.add_transaction(txn(3, on(2026, 1, 5), dec!(90), TransactionType::Expense, 1));
        let service = service_with(vec![wallet]);

        let groups = service.monthly_transactions_grouped(2026, 1);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].kind, TransactionType::Expense);
        assert_eq!(groups[0].total, dec!(140));
        assert_eq!(groups[1].kind, TransactionType::Income);
        assert_eq!(groups[1].len(), 1);

        let dates: Vec<u32> = groups[0].transactions.iter().map(|t| t.id).collect();
        assert_eq!(dates, vec![3, 2], "members sorted by date ascending");
    }

    #[test]
    fn grouping_omits_empty_groups() {
        let mut wallet = Wallet::new(1, "Test", "RUB", dec!(0));
        wallet.add_transaction(txn(1, on(2026, 1, 15), dec!(100), TransactionType::Income, 1));
        let service = service_with(vec![wallet]);

        let groups = service.monthly_transactions_grouped(2026, 1);
        assert_eq!(groups.len(), 1);
        assert!(groups.iter().all(|group| !group.is_empty()));
        assert!(service.monthly_transactions_grouped(2026, 2).is_empty());
    }

    #[test]
    fn equal_group_totals_keep_encounter_order() {
        let mut wallet = Wallet::new(1, "Test", "RUB", dec!(500));
        wallet.add_transaction(txn(1, on(2026, 4, 2), dec!(60), TransactionType::Expense, 1));
        wallet.add_transaction(txn(2, on(2026, 4, 1), dec!(60), TransactionType::Income, 1));
        let service = service_with(vec![wallet]);

        let kinds: Vec<TransactionType> = service
            .monthly_transactions_grouped(2026, 4)
            .iter()
            .map(|group| group.kind)
            .collect();
        assert_eq!(kinds, vec![TransactionType::Expense, TransactionType::Income]);
    }

    #[test]
    fn grouping_pools_all_wallets() {
        let mut first = Wallet::new(1, "Card", "RUB", dec!(100));
        first.add_transaction(txn(1, on(2026, 1, 3), dec!(40), TransactionType::Expense, 1));
        let mut second = Wallet::new(2, "Cash", "RUB", dec!(100));
        second.add_transaction(txn(2, on(2026, 1, 2), dec!(30), TransactionType::Expense, 2));
        let service = service_with(vec![first, second]);

        let groups = service.monthly_transactions_grouped(2026, 1);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].total, dec!(70));
        assert_eq!(groups[0].transactions[0].wallet_id, 2);
    }

    #[test]
    fn top_expenses_are_capped_and_sorted() {
        let mut wallet = Wallet::new(1, "Test", "RUB", dec!(1000));
        for i in 1..=5u32 {
            wallet.add_transaction(txn(i, on(2026, 1, i), Decimal::from(i * 10), TransactionType::Expense, 1));
        }
        wallet.add_transaction(txn(6, on(2026, 1, 6), dec!(100), TransactionType::Income, 1));
        let service = service_with(vec![wallet]);

        let top = service.top3_expenses_per_wallet(2026, 1);
        assert_eq!(top.len(), 1);
        let amounts: Vec<Decimal> = top["Test"].iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![dec!(50), dec!(40), dec!(30)]);
    }

    #[test]
    fn every_wallet_gets_a_top_expense_entry() {
        let mut busy = Wallet::new(1, "Busy", "RUB", dec!(100));
        busy.add_transaction(txn(1, on(2026, 1, 1), dec!(10), TransactionType::Expense, 1));
        let idle = Wallet::new(2, "Idle", "USD", dec!(100));
        let service = service_with(vec![busy, idle]);

        let top = service.top3_expenses_per_wallet(2026, 1);
        assert_eq!(top.len(), 2);
        assert!(top["Idle"].is_empty());
        assert_eq!(top["Busy"].len(), 1);
    }

    #[test]
    fn top_expenses_ties_keep_insertion_order() {
        let mut wallet = Wallet::new(1, "Test", "RUB", dec!(1000));
        for id in 1..=4u32 {
            wallet.add_transaction(txn(id, on(2026, 1, 10), dec!(25), TransactionType::Expense, 1));
        }
        let service = service_with(vec![wallet]);
        let ids: Vec<u32> = service.top3_expenses_per_wallet(2026, 1)["Test"]
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn duplicate_wallet_names_collide_last_wins() {
        let mut first = Wallet::new(1, "Shared", "RUB", dec!(100));
        first.add_transaction(txn(1, on(2026, 1, 1), dec!(10), TransactionType::Expense, 1));
        let second = Wallet::new(2, "Shared", "RUB", dec!(100));
        let service = service_with(vec![first, second]);

        let top = service.top3_expenses_per_wallet(2026, 1);
        assert_eq!(top.len(), 1);
        assert!(top["Shared"].is_empty());
    }

    #[test]
    fn wallet_name_uses_first_match_or_sentinel() {
        let service = service_with(vec![
            Wallet::new(1, "First", "RUB", dec!(0)),
            Wallet::new(1, "Second", "RUB", dec!(0)),
        ]);
        assert_eq!(service.wallet_name(1), "First");
        assert_eq!(service.wallet_name(99), UNKNOWN_WALLET);
    }

    #[test]
    fn total_summary_excludes_other_months() {
        let mut wallet = Wallet::new(1, "Test", "RUB", dec!(0));
        wallet.add_transaction(txn(1, on(2026, 1, 15), dec!(200), TransactionType::Income, 1));
        wallet.add_transaction(txn(2, on(2026, 1, 20), dec!(100), TransactionType::Expense, 1));
        wallet.add_transaction(txn(3, on(2026, 2, 1), dec!(50), TransactionType::Income, 1));
        let service = service_with(vec![wallet]);

        let summary = service.total_monthly_summary(2026, 1);
        assert_eq!(summary, MonthlySummary::new(dec!(200), dec!(100)));
        assert_eq!(summary.net(), dec!(100));
    }

    #[test]
    fn try_add_routes_to_first_matching_wallet() {
        let mut service = service_with(vec![
            Wallet::new(1, "Poor", "RUB", dec!(10)),
            Wallet::new(1, "Rich", "RUB", dec!(1000)),
        ]);
        let expense = txn(1, on(2026, 1, 1), dec!(50), TransactionType::Expense, 1);
        assert!(!service.try_add_transaction(1, expense));
        assert_eq!(service.wallets()[1].transaction_count(), 0);
    }

    #[test]
    fn try_add_unknown_wallet_returns_false() {
        let mut service = service_with(vec![Wallet::new(1, "Card", "RUB", dec!(10))]);
        let income = txn(1, on(2026, 1, 1), dec!(50), TransactionType::Income, 7);
        assert!(!service.try_add_transaction(7, income));
        assert_eq!(service.wallets()[0].transaction_count(), 0);
    }

    #[test]
    fn add_wallet_rejects_duplicates_and_blank_names() {
        let mut service = FinanceService::new();
        service.add_wallet(Wallet::new(1, "Card", "RUB", dec!(0))).unwrap();

        let err = service
            .add_wallet(Wallet::new(2, " card ", "USD", dec!(0)))
            .expect_err("duplicate name must fail");
        assert!(matches!(err, FinanceError::DuplicateWallet(_)));
        assert!(service.add_wallet(Wallet::new(1, "Other", "RUB", dec!(0))).is_err());
        assert!(service.add_wallet(Wallet::new(3, "   ", "RUB", dec!(0))).is_err());
        assert_eq!(service.wallets().len(), 1);
    }

    #[test]
    fn next_ids_follow_maximum() {
        let mut service = FinanceService::new();
        assert_eq!(service.next_transaction_id().unwrap(), 1);
        assert_eq!(service.next_wallet_id().unwrap(), 1);

        service.add_wallet(Wallet::new(4, "Card", "RUB", dec!(100))).unwrap();
        service.add_wallet(Wallet::new(2, "Cash", "RUB", dec!(100))).unwrap();
        service.try_add_transaction(2, txn(11, on(2026, 1, 1), dec!(5), TransactionType::Income, 2));
        service.try_add_transaction(4, txn(3, on(2026, 1, 1), dec!(5), TransactionType::Income, 4));
        assert_eq!(service.next_transaction_id().unwrap(), 12);
        assert_eq!(service.next_wallet_id().unwrap(), 5);
    }

    #[test]
    fn exhausted_ids_are_reported_instead_of_wrapping() {
        let wallets: Vec<Wallet> = serde_json::from_str(
            r#"[{
                "Id": 4294967295,
                "Name": "Edge",
                "Currency": "RUB",
                "InitialBalance": 10,
                "Transactions": [{
                    "Id": 4294967295,
                    "Date": "2026-01-01T00:00:00",
                    "Amount": 1,
                    "Type": "Income",
                    "Description": "Top up",
                    "WalletId": 4294967295
                }]
            }]"#,
        )
        .unwrap();
        let service = service_with(wallets);

        let err = service.next_wallet_id().expect_err("wallet ids exhausted");
        assert!(matches!(err, FinanceError::InvalidInput(ref message) if message.contains("wallet ids")));
        assert!(matches!(
            service.next_transaction_id(),
            Err(FinanceError::InvalidInput(_))
        ));
    }

    #[test]
    fn balances_are_summed_per_currency() {
        let mut service = FinanceService::new();
        service.add_wallet(Wallet::new(1, "Card", "RUB", dec!(100))).unwrap();
        service.add_wallet(Wallet::new(2, "Cash", "RUB", dec!(50.5))).unwrap();
        service.add_wallet(Wallet::new(3, "Travel", "EUR", dec!(20))).unwrap();
        service.try_add_transaction(3, txn(1, on(2026, 1, 1), dec!(5), TransactionType::Expense, 3));

        let totals = service.total_balance_by_currency();
        assert_eq!(totals["RUB"], dec!(150.5));
        assert_eq!(totals["EUR"], dec!(15));
    }
}
