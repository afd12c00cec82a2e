use chrono::{Datelike, Days, NaiveDate};

use crate::patterns::re;

re!(re_days_ago,
    r"(\d+)\s+days?\s+ago");
re!(re_on_marker,
    r"\bon\s+");
re!(re_clause_break,
    r"\b(?:for|rupees?|rs)\b");
re!(re_iso,
    r"^(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})$");
re!(re_numeric,
    r"^(\d{1,2})[-/.](\d{1,2})(?:[-/.](\d{2}|\d{4}))?$");
re!(re_day_token,
    r"^(\d{1,4})(?:st|nd|rd|th)?$");

/// Which rule decided the date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    Today,
    Yesterday,
    DaysAgo,
    /// An explicit calendar date after "on".
    Explicit,
    /// Nothing recognised; the reference date.
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDate {
    pub date: NaiveDate,
    /// The words that named the date, e.g. `dec 5` or `2 days ago`.
    pub phrase: Option<String>,
    pub source: DateSource,
}

impl ResolvedDate {
    fn new(date: NaiveDate, phrase: Option<&str>, source: DateSource) -> Self {
        ResolvedDate {
            date,
            phrase: phrase.map(str::to_string),
            source,
        }
    }
}

/// Resolve the transaction date from lower-cased text. First rule to match
/// wins; falls back to `today`.
pub fn resolve_date(text: &str, today: NaiveDate) -> ResolvedDate {
    if text.contains("today") {
        return ResolvedDate::new(today, Some("today"), DateSource::Today);
    }
    if text.contains("yesterday") {
        if let Some(d) = today.pred_opt() {
            return ResolvedDate::new(d, Some("yesterday"), DateSource::Yesterday);
        }
    }

    if let Some(c) = re_days_ago().captures(text) {
        let days = c.get(1).and_then(|m| m.as_str().parse::<u64>().ok());
        if let Some(d) = days.and_then(|n| today.checked_sub_days(Days::new(n))) {
            let phrase = c.get(0).map(|m| m.as_str());
            return ResolvedDate::new(d, phrase, DateSource::DaysAgo);
        }
    }

    // "spent 50 on milk on dec 5": each "on" gets a turn.
    for marker in re_on_marker().find_iter(text) {
        let rest = &text[marker.end()..];
        let phrase = match re_clause_break().find(rest) {
            Some(m) => &rest[..m.start()],
            None => rest,
        };
        let phrase = phrase.trim().trim_end_matches(['.', ',', ';', '!']).trim_end();
        if let Some(d) = parse_date_phrase(phrase, today) {
            return ResolvedDate::new(d, Some(phrase), DateSource::Explicit);
        }
    }

    ResolvedDate::new(today, None, DateSource::Default)
}

/// Read a short date phrase, day first: `5/12/2024` is 5 December.
///
/// Accepts `2024-12-05`, `5/12`, `05-12-24`, `dec 5`, `5th of december 2024`,
/// `monday, 5 dec` and a bare day number. Missing parts come from `today`.
/// Any word that isn't part of a date rejects the whole phrase.
pub fn parse_date_phrase(phrase: &str, today: NaiveDate) -> Option<NaiveDate> {
    let phrase = phrase.trim();
    if phrase.is_empty() {
        return None;
    }

    if let Some(c) = re_iso().captures(phrase) {
        let y: i32 = c.get(1)?.as_str().parse().ok()?;
        let m: u32 = c.get(2)?.as_str().parse().ok()?;
        let d: u32 = c.get(3)?.as_str().parse().ok()?;
        return NaiveDate::from_ymd_opt(y, m, d);
    }

    if let Some(c) = re_numeric().captures(phrase) {
        let p1: u32 = c.get(1)?.as_str().parse().ok()?;
        let p2: u32 = c.get(2)?.as_str().parse().ok()?;
        let year = match c.get(3) {
            Some(y) => expand_year(y.as_str().parse().ok()?),
            None => today.year(),
        };
        // Day first; month first only when the day-first reading is impossible.
        return NaiveDate::from_ymd_opt(year, p2, p1)
            .or_else(|| NaiveDate::from_ymd_opt(year, p1, p2));
    }

    parse_worded_date(phrase, today)
}

fn parse_worded_date(phrase: &str, today: NaiveDate) -> Option<NaiveDate> {
    let mut day: Option<u32> = None;
    let mut month: Option<u32> = None;
    let mut year: Option<i32> = None;

    let tokens = phrase
        .split(|c: char| c.is_whitespace() || c == ',')
        .map(|t| t.trim_end_matches('.'))
        .filter(|t| !t.is_empty());

    for token in tokens {
        if let Some(m) = month_to_num(token) {
            if month.replace(m).is_some() {
                return None;
            }
            continue;
        }
        if is_weekday(token) || token == "of" || token == "the" {
            continue;
        }

        let c = re_day_token().captures(token)?;
        let digits = c.get(1)?.as_str();
        let n: u32 = digits.parse().ok()?;
        if digits.len() == 4 {
            if year.replace(n as i32).is_some() {
                return None;
            }
        } else if day.is_none() && (1..=31).contains(&n) {
            day = Some(n);
        } else if year.is_none() && digits.len() == 2 {
            year = Some(expand_year(n as i32));
        } else {
            return None;
        }
    }

    if day.is_none() && month.is_none() {
        return None;
    }
    NaiveDate::from_ymd_opt(
        year.unwrap_or_else(|| today.year()),
        month.unwrap_or_else(|| today.month()),
        day.unwrap_or_else(|| today.day()),
    )
}

fn expand_year(y: i32) -> i32 {
    if y < 100 { 2000 + y } else { y }
}

fn month_to_num(name: &str) -> Option<u32> {
    match name {
        "jan" | "january" => Some(1),
        "feb" | "february" => Some(2),
        "mar" | "march" => Some(3),
        "apr" | "april" => Some(4),
        "may" => Some(5),
        "jun" | "june" => Some(6),
        "jul" | "july" => Some(7),
        "aug" | "august" => Some(8),
        "sep" | "sept" | "september" => Some(9),
        "oct" | "october" => Some(10),
        "nov" | "november" => Some(11),
        "dec" | "december" => Some(12),
        _ => None,
    }
}

fn is_weekday(name: &str) -> bool {
    matches!(
        name,
        "mon" | "monday" | "tue" | "tues" | "tuesday" | "wed" | "wednesday" | "thu" | "thur"
            | "thurs" | "thursday" | "fri" | "friday" | "sat" | "saturday" | "sun" | "sunday"
    )
}
