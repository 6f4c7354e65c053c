use std::fmt;

use rust_decimal::Decimal;

use crate::ledger::MonthlySummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryField {
    Income,
    Expense,
    Balance,
}

type Listener = Box<dyn FnMut(SummaryField, Decimal)>;

/// Observable income/expense totals with a derived balance.
///
/// Every setter notifies subscribers of the field it changed and then of the
/// recomputed balance.
#[derive(Default)]
pub struct MonthlySummaryView {
    income: Decimal,
    expense: Decimal,
    balance: Decimal,
    listeners: Vec<Listener>,
}

impl MonthlySummaryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(SummaryField, Decimal) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn income(&self) -> Decimal {
        self.income
    }

    pub fn expense(&self) -> Decimal {
        self.expense
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn set_income(&mut self, value: Decimal) {
        self.income = value;
        self.notify(SummaryField::Income, value);
        self.refresh_balance();
    }

    pub fn set_expense(&mut self, value: Decimal) {
        self.expense = value;
        self.notify(SummaryField::Expense, value);
        self.refresh_balance();
    }

    /// Sets income then expense from a computed summary.
    pub fn apply(&mut self, summary: MonthlySummary) {
        self.set_income(summary.income);
        self.set_expense(summary.expense);
    }

    fn refresh_balance(&mut self) {
        self.balance = self.income - self.expense;
        self.notify(SummaryField::Balance, self.balance);
    }

    fn notify(&mut self, field: SummaryField, value: Decimal) {
        for listener in &mut self.listeners {
            listener(field, value);
        }
    }
}

impl fmt::Debug for MonthlySummaryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonthlySummaryView")
            .field("income", &self.income)
            .field("expense", &self.expense)
            .field("balance", &self.balance)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
