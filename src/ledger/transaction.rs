use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{FinanceError, Result};

/// Direction of a money movement. The sign of a transaction lives here, never in its amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = FinanceError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(FinanceError::InvalidInput(format!(
                "unknown transaction type `{other}`"
            ))),
        }
    }
}

// Older data files store the type as its ordinal. Read through `Value`: with arbitrary
// precision enabled, numbers inside untagged enums arrive as maps.
impl TryFrom<Value> for TransactionType {
    type Error = String;

    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        match value {
            Value::Number(number) => match number.as_u64() {
                Some(0) => Ok(TransactionType::Income),
                Some(1) => Ok(TransactionType::Expense),
                _ => Err(format!("unknown transaction type ordinal {number}")),
            },
            Value::String(name) => name
                .parse::<TransactionType>()
                .map_err(|err| err.to_string()),
            other => Err(format!("unexpected transaction type {other}")),
        }
    }
}

/// A single dated income or expense record owned by one wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Transaction {
    pub id: u32,
    #[serde(with = "local_datetime")]
    pub date: NaiveDateTime,
    pub amount: Decimal,
    #[serde(rename = "Type")]
    pub kind: TransactionType,
    pub description: String,
    pub wallet_id: u32,
}

impl Transaction {
    /// Builds a transaction without validating it. See [`TransactionDraft`] for the checked path.
    pub fn new(
        id: u32,
        date: NaiveDateTime,
        amount: Decimal,
        kind: TransactionType,
        description: impl Into<String>,
        wallet_id: u32,
    ) -> Self {
        Self {
            id,
            date,
            amount,
            kind,
            description: description.into(),
            wallet_id,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    /// True when the transaction date falls in the given calendar month of the given year.
    pub fn is_in_month(&self, year: i32, month: u32) -> bool {
        self.date.year() == year && self.date.month() == month
    }

    /// Amount with the direction applied: positive for income, negative for expenses.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

/// User-entered transaction fields awaiting validation and an identifier.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub wallet_id: u32,
    pub kind: TransactionType,
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDateTime,
}

impl TransactionDraft {
    /// Checks the amount is positive and the description is not blank, then assigns `id`.
    pub fn validate(self, id: u32) -> Result<Transaction> {
        if self.amount <= Decimal::ZERO {
            return Err(FinanceError::InvalidInput(
                "amount must be greater than zero".into(),
            ));
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(FinanceError::InvalidInput(
                "description must not be empty".into(),
            ));
        }
        Ok(Transaction::new(
            id,
            self.date,
            self.amount,
            self.kind,
            description,
            self.wallet_id,
        ))
    }
}

mod local_datetime {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    /// Accepts naive timestamps and RFC 3339 timestamps; an offset is dropped,
    /// keeping the wall-clock time it was recorded in.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| DateTime::parse_from_rfc3339(&raw).map(|parsed| parsed.naive_local()))
            .map_err(de::Error::custom)
    }
}
