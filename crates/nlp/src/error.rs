use thiserror::Error;

/// The only way a sentence can fail to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Could not detect any amount in the text")]
    NoAmountFound,
}

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Failed to parse keyword TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Keyword pattern failed to compile: {0}")]
    Regex(#[from] regex::Error),
    #[error("Category name must not be empty")]
    EmptyCategoryName,
    #[error("Empty keyword in {0}")]
    EmptyKeyword(String),
    #[error("Duplicate category: '{0}'")]
    DuplicateCategory(String),
}
