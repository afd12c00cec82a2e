use tally_core::TransactionType;

use crate::patterns::KeywordTables;

/// Income keywords are checked before expense ones; with no hit at all the
/// sentence is taken as spending.
pub fn classify_type(text: &str, tables: &KeywordTables) -> TransactionType {
    if tables.income.iter().any(|kw| text.contains(kw.as_str())) {
        return TransactionType::Income;
    }
    if tables.expense.iter().any(|kw| text.contains(kw.as_str())) {
        return TransactionType::Expense;
    }
    TransactionType::Expense
}
