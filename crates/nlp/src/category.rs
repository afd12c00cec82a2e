use crate::patterns::KeywordTables;

/// First category, in table order, with a keyword inside `text`.
pub fn classify_category<'t>(text: &str, tables: &'t KeywordTables) -> Option<&'t str> {
    let lowered = text.to_lowercase();
    tables
        .categories
        .iter()
        .find(|cat| cat.keywords.iter().any(|kw| lowered.contains(kw.as_str())))
        .map(|cat| cat.name.as_str())
}
