use regex::Regex;

use crate::amount::ExtractedAmount;
use crate::date::ResolvedDate;
use crate::patterns::{bounded, re, PatternTables};

re!(re_filler,
    r"₹|\brs\.|\b(?:rupees?|rs|each)\b");
re!(re_relative_day,
    r"\b(?:today|yesterday|ago)\b");
re!(re_on_word,
    r"\bon\b");
re!(re_spaces,
    r"\s+");
re!(re_leading_connector,
    r"^(?:for|to)\s+");
re!(re_trailing_connector,
    r"\s+(?:for|to|of)$");

/// What is left of the sentence once amount, currency, type keywords and date
/// words are gone. Never empty: falls back to the trimmed original.
pub fn extract_description(
    original: &str,
    amount: &ExtractedAmount,
    date: &ResolvedDate,
    tables: &PatternTables,
) -> String {
    let mut text = original.to_lowercase();

    // The date phrase goes first: it may contain the same digits as the amount.
    if let Some(phrase) = &date.phrase {
        text = remove_term(&text, phrase);
    }

    let literal = amount.amount.literal();
    text = remove_number(&text, &literal);
    if amount.matched != literal {
        text = remove_number(&text, &amount.matched);
    }

    text = re_filler().replace_all(&text, " ").into_owned();
    if let Some(keywords) = tables.type_keyword_re() {
        text = keywords.replace_all(&text, " ").into_owned();
    }
    text = re_relative_day().replace_all(&text, " ").into_owned();
    text = re_on_word().replace_all(&text, " ").into_owned();

    let text = re_spaces().replace_all(&text, " ");
    let text = re_leading_connector().replace(text.trim(), "");
    let text = re_trailing_connector().replace(&text, "");

    if text.is_empty() {
        return original.trim().to_string();
    }
    text.into_owned()
}

fn remove_term(text: &str, term: &str) -> String {
    match Regex::new(&bounded(term)) {
        Ok(re) => re.replace_all(text, " ").into_owned(),
        Err(_) => text.replace(term, " "),
    }
}

/// Drop `number` where it stands alone; `5` leaves `50`, `5.5` and `5,000` alone
/// but goes in `20rs` or `₹5`.
fn remove_number(text: &str, number: &str) -> String {
    let pattern = format!(
        r"(^|[^0-9.,]){}($|[^0-9.,]|[.,]$|[.,][^0-9])",
        regex::escape(number)
    );
    match Regex::new(&pattern) {
        Ok(re) => re.replace_all(text, "${1} ${2}").into_owned(),
        Err(_) => text.replace(number, " "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::extract_amount;
    use crate::date::resolve_date;
    use chrono::NaiveDate;

    fn describe(original: &str) -> String {
        let tables = PatternTables::builtin();
        let normalized = original.trim().to_lowercase();
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let amount = extract_amount(&normalized).unwrap();
        let date = resolve_date(&normalized, today);
        extract_description(original, &amount, &date, &tables)
    }

    #[test]
    fn strips_keyword_amount_currency_and_dangling_for() {
        assert_eq!(describe("bought pen for 5 rupees"), "pen");
    }

    #[test]
    fn strips_explicit_date_phrase_and_on() {
        assert_eq!(describe("spent 50 on milk on Dec 5"), "milk");
    }

    #[test]
    fn strips_leading_to() {
        assert_eq!(describe("added Rs 500 to home account yesterday"), "home account");
    }

    #[test]
    fn multiplicative_keeps_quantity_and_item() {
        assert_eq!(describe("bought 2 shirts of 300 each"), "2 shirts");
    }

    #[test]
    fn falls_back_to_original_when_nothing_is_left() {
        assert_eq!(describe("  got 2000 rupees salary today "), "got 2000 rupees salary today");
    }

    #[test]
    fn keywords_do_not_cut_into_words() {
        assert_eq!(describe("coffee 40"), "coffee");
        assert_eq!(describe("paid 120 for costume"), "costume");
    }

    #[test]
    fn separator_amounts_are_removed_as_written() {
        assert_eq!(describe("paid ₹5,000 for rent"), "rent");
    }

    #[test]
    fn number_removal_respects_digit_edges() {
        assert_eq!(remove_number("5 pens and 50 pencils", "5").trim(), "pens and 50 pencils");
        assert_eq!(remove_number("tea 20rs", "20"), "tea  rs");
        assert_eq!(remove_number("5.5 kg", "5"), "5.5 kg");
        assert_eq!(remove_number("paid 500.", "500"), "paid  .");
    }
}
