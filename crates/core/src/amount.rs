use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::account::CoreError;

/// A strictly positive monetary quantity in rupees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, CoreError> {
        if value <= Decimal::ZERO {
            return Err(CoreError::NonPositiveAmount(value));
        }
        Ok(Amount(value))
    }

    pub fn from_paise(paise: i64) -> Result<Self, CoreError> {
        Self::new(Decimal::from(paise) / Decimal::from(100))
    }

    /// Rounds to the nearest paisa. Amounts that round to zero are rejected.
    pub fn to_paise(self) -> Result<i64, CoreError> {
        let paise = self
            .0
            .checked_mul(Decimal::from(100))
            .and_then(|c| c.round().to_i64())
            .ok_or(CoreError::AmountOutOfRange(self.0))?;
        if paise <= 0 {
            return Err(CoreError::NonPositiveAmount(self.0));
        }
        Ok(paise)
    }

    pub fn value(self) -> Decimal {
        self.0
    }

    /// Shortest textual form: `600` for whole amounts, `12.5` otherwise.
    pub fn literal(self) -> String {
        self.0.normalize().to_string()
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = CoreError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn rejects_zero_and_negative() {
        assert!(matches!(Amount::new(Decimal::ZERO), Err(CoreError::NonPositiveAmount(_))));
        assert!(Amount::new(dec("-5")).is_err());
        assert!(Amount::new(dec("0.01")).is_ok());
    }

    #[test]
    fn literal_drops_trailing_zeros() {
        assert_eq!(Amount::new(dec("600")).unwrap().literal(), "600");
        assert_eq!(Amount::new(dec("5.00")).unwrap().literal(), "5");
        assert_eq!(Amount::new(dec("12.50")).unwrap().literal(), "12.5");
    }

    #[test]
    fn paise_conversion() {
        let a = Amount::new(dec("1234.56")).unwrap();
        assert_eq!(a.to_paise().unwrap(), 123456);
        assert_eq!(Amount::from_paise(123456).unwrap(), a);
        assert!(Amount::from_paise(0).is_err());
    }

    #[test]
    fn display_uses_rupee_sign() {
        assert_eq!(Amount::new(dec("50")).unwrap().to_string(), "₹50.00");
    }

    #[test]
    fn paise_overflow_is_out_of_range() {
        let huge = Amount::new(dec("9999999999999999999999999999")).unwrap();
        assert!(matches!(huge.to_paise(), Err(CoreError::AmountOutOfRange(_))));
        // Fits in a Decimal after scaling but not in an i64.
        let big = Amount::new(dec("100000000000000000")).unwrap();
        assert!(matches!(big.to_paise(), Err(CoreError::AmountOutOfRange(_))));
    }

    #[test]
    fn sub_paisa_amounts_are_not_positive() {
        let tiny = Amount::new(dec("0.004")).unwrap();
        assert!(matches!(tiny.to_paise(), Err(CoreError::NonPositiveAmount(_))));
        assert_eq!(Amount::new(dec("0.006")).unwrap().to_paise().unwrap(), 1);
    }

    #[test]
    fn deserialize_rejects_zero() {
        assert!(serde_json::from_str::<Amount>("\"0\"").is_err());
        let a: Amount = serde_json::from_str("\"42.5\"").unwrap();
        assert_eq!(a.literal(), "42.5");
    }
}
