//! Calendar helpers: year-month values, month arithmetic and day-count fractions

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Days per year for the actual/365 day count
pub const DAYS_PER_YEAR: f64 = 365.0;

/// A calendar month, as entered in `"YYYY-MM"` form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    /// 1 = January
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Fraction of the calendar year from the start of this month to December
    /// inclusive. July gives 6/12.
    pub fn remaining_year_fraction(&self) -> f64 {
        (13 - self.month) as f64 / 12.0
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseYearMonthError(String);

impl fmt::Display for ParseYearMonthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected YYYY-MM, got {:?}", self.0)
    }
}

impl std::error::Error for ParseYearMonthError {}

impl FromStr for YearMonth {
    type Err = ParseYearMonthError;

    /// Accepts `YYYY-MM`; a trailing `-DD` is tolerated and ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseYearMonthError(s.to_string());
        let mut parts = s.trim().split('-');

        let year: i32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(err)?;
        let month: u32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(err)?;
        if let Some(day) = parts.next() {
            day.parse::<u32>().map_err(|_| err())?;
        }
        if parts.next().is_some() {
            return Err(err());
        }

        YearMonth::new(year, month).ok_or_else(err)
    }
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        Self { year: date.year(), month: date.month() }
    }
}

/// Date `n` months after `date`, clamped to the end of shorter months
/// (Jan 31 + 1 month = Feb 28/29).
pub fn add_months(date: NaiveDate, n: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(n))
}

/// Whole calendar months from `start` to `end`.
///
/// A trailing partial month is not counted: Jan 15 to Mar 14 is 1 month,
/// Jan 15 to Mar 15 is 2. Negative when `end` precedes `start`.
pub fn whole_months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    let mut months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    if months > 0 && end.day() < start.day() && !is_month_end_anchor(start, end) {
        months -= 1;
    } else if months < 0 && end.day() > start.day() {
        months += 1;
    }
    months
}

// Jan 31 -> Feb 28 counts as a full month, same as add_months clamps.
fn is_month_end_anchor(start: NaiveDate, end: NaiveDate) -> bool {
    let end_is_last_day = end.succ_opt().map(|d| d.month() != end.month()).unwrap_or(true);
    end_is_last_day && start.day() > end.day()
}

/// Year fraction between two dates on an actual/365 basis
pub fn year_fraction(base: NaiveDate, date: NaiveDate) -> f64 {
    (date - base).num_days() as f64 / DAYS_PER_YEAR
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_year_month() {
        assert_eq!("2026-01".parse::<YearMonth>().unwrap(), YearMonth { year: 2026, month: 1 });
        assert_eq!("2028-07-15".parse::<YearMonth>().unwrap(), YearMonth { year: 2028, month: 7 });
        assert!("2026".parse::<YearMonth>().is_err());
        assert!("2026-13".parse::<YearMonth>().is_err());
        assert!("2026-00".parse::<YearMonth>().is_err());
        assert!("next year".parse::<YearMonth>().is_err());
        assert!("2026-01-xx".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        let ym = YearMonth::new(2027, 3).unwrap();
        assert_eq!(ym.to_string(), "2027-03");
        assert_eq!(ym.to_string().parse::<YearMonth>().unwrap(), ym);
    }

    #[test]
    fn test_remaining_year_fraction() {
        assert_eq!(YearMonth::new(2026, 1).unwrap().remaining_year_fraction(), 1.0);
        assert_eq!(YearMonth::new(2026, 7).unwrap().remaining_year_fraction(), 0.5);
        assert!((YearMonth::new(2026, 12).unwrap().remaining_year_fraction() - 1.0 / 12.0).abs() < 1e-15);
    }

    #[test]
    fn test_ordering_is_chronological() {
        let a = YearMonth::new(2026, 12).unwrap();
        let b = YearMonth::new(2027, 1).unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_add_months_clamps_month_end() {
        assert_eq!(add_months(date(2026, 1, 31), 1), Some(date(2026, 2, 28)));
        assert_eq!(add_months(date(2026, 1, 15), 5), Some(date(2026, 6, 15)));
    }

    #[test]
    fn test_whole_months_between() {
        assert_eq!(whole_months_between(date(2026, 1, 15), date(2027, 1, 15)), 12);
        assert_eq!(whole_months_between(date(2026, 1, 15), date(2026, 3, 14)), 1);
        assert_eq!(whole_months_between(date(2026, 1, 15), date(2026, 3, 15)), 2);
        assert_eq!(whole_months_between(date(2026, 1, 31), date(2026, 2, 28)), 1);
        assert_eq!(whole_months_between(date(2026, 5, 1), date(2026, 5, 30)), 0);
        assert_eq!(whole_months_between(date(2026, 3, 10), date(2026, 1, 20)), -1);
    }

    #[test]
    fn test_year_fraction_actual_365() {
        assert_eq!(year_fraction(date(2026, 1, 1), date(2027, 1, 1)), 1.0);
        // 2028 is a leap year: 366 days
        assert!((year_fraction(date(2028, 1, 1), date(2029, 1, 1)) - 366.0 / 365.0).abs() < 1e-12);
    }
}
