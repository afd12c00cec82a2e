use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::account::CoreError;
use super::amount::Amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(CoreError::UnknownTransactionType(other.to_string())),
        }
    }
}

/// The structured result of reading one free-text sentence.
///
/// Built once by the parser and handed over; fields are read-only. Edits go
/// through [`TransactionRecord`] on the caller's side. The parser never
/// produces an empty description: it falls back to the input sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedTransaction {
    #[serde(rename = "type")]
    kind: TransactionType,
    amount: Amount,
    description: String,
    category: Option<String>,
    date: NaiveDate,
}

impl ParsedTransaction {
    pub fn new(
        kind: TransactionType,
        amount: Amount,
        description: impl Into<String>,
        category: Option<String>,
        date: NaiveDate,
    ) -> Self {
        ParsedTransaction {
            kind,
            amount,
            description: description.into(),
            category,
            date,
        }
    }

    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The flat shape persistence expects: empty category, ISO date string.
    pub fn to_record(&self) -> TransactionRecord {
        TransactionRecord {
            kind: self.kind,
            amount: self.amount,
            description: self.description.clone(),
            category: self.category.clone().unwrap_or_default(),
            date: self.date.format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Amount,
    pub description: String,
    /// Empty when uncategorized.
    pub category: String,
    /// `YYYY-MM-DD`.
    pub date: String,
}

impl TransactionRecord {
    pub fn parsed_date(&self) -> Result<NaiveDate, CoreError> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|_| CoreError::InvalidDate(self.date.clone()))
    }

    pub fn category(&self) -> Option<&str> {
        if self.category.is_empty() {
            None
        } else {
            Some(&self.category)
        }
    }
}
