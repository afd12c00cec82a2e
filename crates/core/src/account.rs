use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub i64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named wallet that transactions are booked against ("Cash", "Home account").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Option<AccountId>,
    pub name: String,
    pub description: String,
    pub created_at: Option<String>,
}

impl Account {
    pub fn new(name: &str, description: &str) -> Self {
        Account {
            id: None,
            name: name.to_string(),
            description: description.to_string(),
            created_at: None,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoreError {
    #[error("Amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("Amount {0} does not fit in paise")]
    AmountOutOfRange(Decimal),
    #[error("Unknown transaction type: '{0}'")]
    UnknownTransactionType(String),
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}
