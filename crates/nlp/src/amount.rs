use std::str::FromStr;

use regex::Regex;
use rust_decimal::Decimal;
use tally_core::Amount;

use crate::error::ParseError;
use crate::patterns::re;

re!(re_multiplicative,
    r"(\d+(?:\.\d+)?)\s+\w+(?:\s+\w+)*?\s+(?:of|for)\s+(\d+(?:,\d+)*(?:\.\d+)?)\s+each");
re!(re_rupee_sign,
    r"(?i)₹\s*(\d+(?:,\d+)*(?:\.\d+)?)");
re!(re_rs_prefix,
    r"(?i)rs\.?\s*(\d+(?:,\d+)*(?:\.\d+)?)");
re!(re_rupee_suffix,
    r"(?i)(\d+(?:,\d+)*(?:\.\d+)?)\s*rupees?");
re!(re_rs_suffix,
    r"(?i)(\d+(?:,\d+)*(?:\.\d+)?)\s*rs\.?");
re!(re_bare_number,
    r"\b(\d+(?:,\d+)*(?:\.\d+)?)\b");

/// Which rule produced the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountSource {
    /// `<qty> ... of|for <price> each`
    Multiplicative,
    RupeeSign,
    RsPrefix,
    RupeeSuffix,
    RsSuffix,
    /// A number with no currency marker at all.
    BareNumber,
}

impl AmountSource {
    pub fn name(self) -> &'static str {
        match self {
            AmountSource::Multiplicative => "multiplicative",
            AmountSource::RupeeSign => "rupee_sign",
            AmountSource::RsPrefix => "rs_prefix",
            AmountSource::RupeeSuffix => "rupee_suffix",
            AmountSource::RsSuffix => "rs_suffix",
            AmountSource::BareNumber => "bare_number",
        }
    }
}

/// Single-amount patterns, most specific first. The bare number must stay last.
fn single_amount_patterns() -> [(AmountSource, &'static Regex); 5] {
    [
        (AmountSource::RupeeSign, re_rupee_sign()),
        (AmountSource::RsPrefix, re_rs_prefix()),
        (AmountSource::RupeeSuffix, re_rupee_suffix()),
        (AmountSource::RsSuffix, re_rs_suffix()),
        (AmountSource::BareNumber, re_bare_number()),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedAmount {
    pub amount: Amount,
    /// The numeric text as written, e.g. `5,000`, or the unit price for the
    /// multiplicative form.
    pub matched: String,
    /// Item count for the multiplicative form.
    pub quantity: Option<Decimal>,
    pub source: AmountSource,
}

/// Find the monetary quantity in lower-cased, trimmed text.
pub fn extract_amount(text: &str) -> Result<ExtractedAmount, ParseError> {
    if let Some(found) = try_multiplicative(text) {
        return Ok(found);
    }

    // With "each" present the bare number would catch the quantity in
    // "2 shirts of 300 each", so only currency-marked numbers count.
    let has_each = text.contains("each");

    for (source, regex) in single_amount_patterns() {
        if has_each && source == AmountSource::BareNumber {
            continue;
        }
        let found = regex.captures_iter(text).find_map(|c| {
            let raw = c.get(1)?.as_str();
            let amount = Amount::new(parse_number(raw)?).ok()?;
            Some(ExtractedAmount {
                amount,
                matched: raw.to_string(),
                quantity: None,
                source,
            })
        });
        if let Some(found) = found {
            return Ok(found);
        }
    }

    Err(ParseError::NoAmountFound)
}

fn try_multiplicative(text: &str) -> Option<ExtractedAmount> {
    let c = re_multiplicative().captures(text)?;
    let qty = parse_number(c.get(1)?.as_str())?;
    let price_raw = c.get(2)?.as_str();
    let price = parse_number(price_raw)?;
    let amount = Amount::new(qty.checked_mul(price)?).ok()?;
    Some(ExtractedAmount {
        amount,
        matched: price_raw.to_string(),
        quantity: Some(qty),
        source: AmountSource::Multiplicative,
    })
}

/// `5,000.50` -> 5000.50. `None` when the digits don't fit a decimal.
fn parse_number(s: &str) -> Option<Decimal> {
    Decimal::from_str(&s.replace(',', "")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount_of(text: &str) -> Decimal {
        extract_amount(text).unwrap().amount.value()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn multiplicative_of_each() {
        let r = extract_amount("bought 2 shirts of 300 each").unwrap();
        assert_eq!(r.amount.value(), dec("600"));
        assert_eq!(r.source, AmountSource::Multiplicative);
        assert_eq!(r.quantity, Some(dec("2")));
        assert_eq!(r.matched, "300");
    }

    #[test]
    fn multiplicative_for_each() {
        assert_eq!(amount_of("got 3 books for 150 each"), dec("450"));
    }

    #[test]
    fn multiplicative_with_separator_and_decimals() {
        assert_eq!(amount_of("1.5 kg mangoes for 1,200 each"), dec("1800"));
    }

    #[test]
    fn each_guard_never_returns_quantity() {
        // No "of|for" between the numbers, so the multiplicative rule misses.
        let r = extract_amount("2 shirts at 300 each");
        assert_eq!(r, Err(ParseError::NoAmountFound));
    }

    #[test]
    fn each_guard_still_allows_currency_marked_amounts() {
        let r = extract_amount("2 shirts at rs 300 each").unwrap();
        assert_eq!(r.amount.value(), dec("300"));
        assert_eq!(r.source, AmountSource::RsPrefix);
    }

    #[test]
    fn rupee_sign_prefix() {
        let r = extract_amount("paid ₹5,000 for rent").unwrap();
        assert_eq!(r.amount.value(), dec("5000"));
        assert_eq!(r.matched, "5,000");
        assert_eq!(r.source, AmountSource::RupeeSign);
    }

    #[test]
    fn rs_prefix_with_dot() {
        let r = extract_amount("added rs. 500 to home account").unwrap();
        assert_eq!(r.amount.value(), dec("500"));
        assert_eq!(r.source, AmountSource::RsPrefix);
    }

    #[test]
    fn rupees_suffix_beats_earlier_bare_number() {
        let r = extract_amount("on 5 dec paid 250 rupees").unwrap();
        assert_eq!(r.amount.value(), dec("250"));
        assert_eq!(r.source, AmountSource::RupeeSuffix);
    }

    #[test]
    fn rs_suffix() {
        let r = extract_amount("tea 20rs").unwrap();
        assert_eq!(r.amount.value(), dec("20"));
        assert_eq!(r.source, AmountSource::RsSuffix);
    }

    #[test]
    fn bare_number_fallback() {
        let r = extract_amount("pen 5").unwrap();
        assert_eq!(r.amount.value(), dec("5"));
        assert_eq!(r.source, AmountSource::BareNumber);
    }

    #[test]
    fn decimal_amount() {
        assert_eq!(amount_of("coffee 12.50"), dec("12.50"));
    }

    #[test]
    fn zero_is_skipped_for_next_match() {
        assert_eq!(amount_of("0 issues, paid 40"), dec("40"));
        assert_eq!(extract_amount("0 rupees"), Err(ParseError::NoAmountFound));
    }

    #[test]
    fn no_number_is_an_error() {
        assert_eq!(extract_amount("bought a pen"), Err(ParseError::NoAmountFound));
        assert_eq!(extract_amount(""), Err(ParseError::NoAmountFound));
    }

    #[test]
    fn oversized_number_is_not_an_amount() {
        assert_eq!(
            extract_amount("99999999999999999999999999999999999"),
            Err(ParseError::NoAmountFound)
        );
    }
}
