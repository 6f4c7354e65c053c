use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::transaction::{Transaction, TransactionType};

/// Income and expense totals over some period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub income: Decimal,
    pub expense: Decimal,
}

impl MonthlySummary {
    pub fn new(income: Decimal, expense: Decimal) -> Self {
        Self { income, expense }
    }

    /// Sums amounts per type over the supplied transactions.
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        transactions
            .into_iter()
            .fold(Self::default(), |mut totals, txn| {
                match txn.kind {
                    TransactionType::Income => totals.income += txn.amount,
                    TransactionType::Expense => totals.expense += txn.amount,
                }
                totals
            })
    }

    pub fn net(&self) -> Decimal {
        self.income - self.expense
    }
}

impl std::ops::Add for MonthlySummary {
    type Output = MonthlySummary;

    fn add(self, other: MonthlySummary) -> MonthlySummary {
        MonthlySummary {
            income: self.income + other.income,
            expense: self.expense + other.expense,
        }
    }
}

impl std::iter::Sum for MonthlySummary {
    fn sum<I: Iterator<Item = MonthlySummary>>(iter: I) -> Self {
        iter.fold(MonthlySummary::default(), |acc, item| acc + item)
    }
}
