use chrono::{Local, NaiveDate};

/// Source of "today" for relative dates. Injected so parsing is reproducible.
pub trait ReferenceDate: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// The local calendar date of the machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ReferenceDate for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always the same day; used by tests and backfills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDate(pub NaiveDate);

impl ReferenceDate for FixedDate {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_date_returns_preset_day() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(FixedDate(d).today(), d);
    }
}
