use std::sync::Arc;

use chrono::NaiveDate;
use tally_core::ParsedTransaction;
use tracing::debug;

use crate::amount::extract_amount;
use crate::category::classify_category;
use crate::clock::{ReferenceDate, SystemClock};
use crate::date::resolve_date;
use crate::description::extract_description;
use crate::error::ParseError;
use crate::kind::classify_type;
use crate::patterns::PatternTables;

/// Turns one free-text sentence into a [`ParsedTransaction`].
///
/// Holds nothing but read-only tables and a date source, so a single parser
/// can serve any number of threads.
#[derive(Debug, Clone)]
pub struct TransactionParser<C: ReferenceDate = SystemClock> {
    tables: Arc<PatternTables>,
    clock: C,
}

impl TransactionParser<SystemClock> {
    pub fn new() -> Self {
        Self::with_tables(PatternTables::builtin())
    }

    pub fn with_tables(tables: Arc<PatternTables>) -> Self {
        TransactionParser {
            tables,
            clock: SystemClock,
        }
    }
}

impl Default for TransactionParser<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ReferenceDate> TransactionParser<C> {
    /// Swap the source of "today".
    pub fn with_clock<D: ReferenceDate>(self, clock: D) -> TransactionParser<D> {
        TransactionParser {
            tables: self.tables,
            clock,
        }
    }

    pub fn parse(&self, text: &str) -> Result<ParsedTransaction, ParseError> {
        self.parse_with_reference(text, self.clock.today())
    }

    /// Parse with `today` as the anchor for "today", "yesterday" and "N days ago".
    pub fn parse_with_reference(
        &self,
        text: &str,
        today: NaiveDate,
    ) -> Result<ParsedTransaction, ParseError> {
        let normalized = text.trim().to_lowercase();
        if normalized.is_empty() {
            debug!("empty input rejected");
            return Err(ParseError::NoAmountFound);
        }

        let amount = extract_amount(&normalized).inspect_err(|_| {
            debug!(text = %normalized, "no amount pattern matched");
        })?;
        debug!(
            amount = %amount.amount,
            quantity = ?amount.quantity,
            source = amount.source.name(),
            "amount extracted"
        );

        let keywords = self.tables.keywords();
        let kind = classify_type(&normalized, keywords);
        debug!(%kind, "type classified");

        let date = resolve_date(&normalized, today);
        debug!(date = %date.date, source = ?date.source, "date resolved");

        let description = extract_description(text, &amount, &date, &self.tables);
        let category_text = if description.is_empty() { text } else { description.as_str() };
        let category = classify_category(category_text, keywords).map(str::to_string);
        debug!(
            %description,
            category = category.as_deref().unwrap_or("-"),
            "description extracted"
        );

        Ok(ParsedTransaction::new(
            kind,
            amount.amount,
            description,
            category,
            date.date,
        ))
    }
}
