use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::PatternError;

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static regex::Regex {
            static R: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
            R.get_or_init(|| regex::Regex::new($pat).expect("invalid regex"))
        }
    };
}

pub(crate) use re;

// ── Built-in keyword tables ──────────────────────────────────────────────────

const INCOME_KEYWORDS: &[&str] = &[
    "got",
    "received",
    "added",
    "credited",
    "salary",
    "income",
    "earned",
    "deposit",
    "refund",
    "bonus",
    "payment received",
];

const EXPENSE_KEYWORDS: &[&str] = &[
    "spent",
    "bought",
    "purchased",
    "paid",
    "expense",
    "cost",
    "bill",
    "fee",
    "withdrawal",
    "debit",
    "shopping",
];

/// Order matters: the first category with a hit wins.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("Groceries", &["milk", "vegetable", "vegetables", "fruits", "bread", "grocery"]),
    ("Education", &["book", "textbook", "tuition", "course", "class", "school", "college"]),
    (
        "Utilities",
        &["electricity", "water", "gas", "internet", "wifi", "mobile bill", "phone bill"],
    ),
    (
        "Transport",
        &["bus", "taxi", "cab", "auto", "metro", "train", "fuel", "petrol", "diesel"],
    ),
    ("Entertainment", &["movie", "netflix", "prime", "spotify", "game", "games"]),
    ("Income", &["salary", "stipend", "allowance", "bonus", "refund", "interest"]),
];

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn default_income() -> Vec<String> {
    owned(INCOME_KEYWORDS)
}

fn default_expense() -> Vec<String> {
    owned(EXPENSE_KEYWORDS)
}

fn default_categories() -> Vec<CategoryKeywords> {
    CATEGORY_KEYWORDS
        .iter()
        .map(|(name, keywords)| CategoryKeywords {
            name: name.to_string(),
            keywords: owned(keywords),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryKeywords {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Keyword lists as written by a user. Any list left out of a TOML file keeps
/// its built-in contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTables {
    #[serde(default = "default_income")]
    pub income: Vec<String>,
    #[serde(default = "default_expense")]
    pub expense: Vec<String>,
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryKeywords>,
}

impl Default for KeywordTables {
    fn default() -> Self {
        KeywordTables {
            income: default_income(),
            expense: default_expense(),
            categories: default_categories(),
        }
    }
}

impl KeywordTables {
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    /// Lower-cases every keyword and checks the tables are usable.
    fn normalized(mut self) -> Result<Self, PatternError> {
        for kw in self.income.iter_mut().chain(self.expense.iter_mut()) {
            *kw = kw.trim().to_lowercase();
        }
        if self.income.iter().any(String::is_empty) {
            return Err(PatternError::EmptyKeyword("income".to_string()));
        }
        if self.expense.iter().any(String::is_empty) {
            return Err(PatternError::EmptyKeyword("expense".to_string()));
        }

        let mut seen = HashSet::new();
        for cat in &mut self.categories {
            cat.name = cat.name.trim().to_string();
            if cat.name.is_empty() {
                return Err(PatternError::EmptyCategoryName);
            }
            if !seen.insert(cat.name.clone()) {
                return Err(PatternError::DuplicateCategory(cat.name.clone()));
            }
            for kw in &mut cat.keywords {
                *kw = kw.trim().to_lowercase();
                if kw.is_empty() {
                    return Err(PatternError::EmptyKeyword(format!("category '{}'", cat.name)));
                }
            }
        }
        Ok(self)
    }
}

/// Validated keyword tables plus the regexes derived from them.
///
/// Read-only once built; share it behind an [`Arc`] between parsers.
#[derive(Debug)]
pub struct PatternTables {
    keywords: KeywordTables,
    /// Every income and expense keyword, longest first, word-bounded.
    type_keyword_re: Option<Regex>,
}

impl PatternTables {
    pub fn new(keywords: KeywordTables) -> Result<Self, PatternError> {
        let keywords = keywords.normalized()?;

        let mut terms: Vec<&str> = keywords
            .income
            .iter()
            .chain(keywords.expense.iter())
            .map(String::as_str)
            .collect();
        terms.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        terms.dedup();

        let type_keyword_re = if terms.is_empty() {
            None
        } else {
            let alternation = terms.iter().map(|t| bounded(t)).collect::<Vec<_>>().join("|");
            Some(Regex::new(&alternation)?)
        };

        Ok(PatternTables {
            keywords,
            type_keyword_re,
        })
    }

    pub fn from_toml(toml_content: &str) -> Result<Self, PatternError> {
        let keywords: KeywordTables = toml::from_str(toml_content)?;
        Self::new(keywords)
    }

    /// The built-in tables, compiled once per process.
    pub fn builtin() -> Arc<PatternTables> {
        static BUILTIN: OnceLock<Arc<PatternTables>> = OnceLock::new();
        BUILTIN
            .get_or_init(|| {
                let tables = PatternTables::new(KeywordTables::default());
                Arc::new(tables.expect("invalid built-in keywords"))
            })
            .clone()
    }

    pub fn keywords(&self) -> &KeywordTables {
        &self.keywords
    }

    pub(crate) fn type_keyword_re(&self) -> Option<&Regex> {
        self.type_keyword_re.as_ref()
    }
}

/// Escapes `term` and adds `\b` on each side that starts or ends with a word
/// character, so `rs.` and `₹` still match next to digits.
pub(crate) fn bounded(term: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let mut pattern = String::new();
    if term.chars().next().is_some_and(is_word) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(term));
    if term.chars().last().is_some_and(is_word) {
        pattern.push_str(r"\b");
    }
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_category_order_is_stable() {
        let tables = KeywordTables::default();
        let names: Vec<&str> = tables.category_names().collect();
        assert_eq!(
            names,
            ["Groceries", "Education", "Utilities", "Transport", "Entertainment", "Income"]
        );
    }

    #[test]
    fn from_toml_keeps_missing_lists() {
        let toml = r#"
            income = ["Stipend Credited"]

            [[categories]]
            name = "Pets"
            keywords = ["dog food", "vet"]

            [[categories]]
            name = "Groceries"
            keywords = ["milk"]
        "#;
        let tables = PatternTables::from_toml(toml).unwrap();
        let kw = tables.keywords();
        assert_eq!(kw.income, vec!["stipend credited".to_string()]);
        assert_eq!(kw.expense, default_expense());
        let names: Vec<&str> = kw.category_names().collect();
        assert_eq!(names, ["Pets", "Groceries"]);
    }

    #[test]
    fn from_toml_rejects_duplicate_category() {
        let toml = r#"
            [[categories]]
            name = "Food"
            keywords = ["milk"]

            [[categories]]
            name = "Food"
            keywords = ["bread"]
        "#;
        assert!(matches!(
            PatternTables::from_toml(toml),
            Err(PatternError::DuplicateCategory(name)) if name == "Food"
        ));
    }

    #[test]
    fn from_toml_rejects_blank_keyword() {
        let toml = r#"expense = ["spent", "  "]"#;
        assert!(matches!(PatternTables::from_toml(toml), Err(PatternError::EmptyKeyword(_))));
    }

    #[test]
    fn from_toml_rejects_malformed_input() {
        assert!(matches!(PatternTables::from_toml("income = 3"), Err(PatternError::Toml(_))));
    }

    #[test]
    fn bounded_only_wraps_word_edges() {
        assert_eq!(bounded("got"), r"\bgot\b");
        assert_eq!(bounded("rs."), r"\brs\.");
        assert_eq!(bounded("₹"), "₹");
    }

    #[test]
    fn type_keyword_regex_prefers_longest_phrase() {
        let tables = PatternTables::builtin();
        let re = tables.type_keyword_re().unwrap();
        let m = re.find("payment received yesterday").unwrap();
        assert_eq!(m.as_str(), "payment received");
        assert!(re.find("coffee").is_none());
    }

    #[test]
    fn empty_type_lists_compile_without_regex() {
        let tables = PatternTables::new(KeywordTables {
            income: vec![],
            expense: vec![],
            categories: vec![],
        })
        .unwrap();
        assert!(tables.type_keyword_re().is_none());
    }
}
