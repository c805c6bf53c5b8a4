use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;

/// Calendar month used as the grouping key for monthly buckets.
///
/// Ordering is `(year, month)`, so a sorted collection of keys is
/// chronological regardless of how the source dates were written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

/// Parse `"YYYY-MM-DD"` or `"YYYY/MM/DD"` (one- or two-digit day),
/// optionally followed by a time part (`" hh:mm:ss"` or `"Thh:mm:ss"`) that
/// is ignored. A bare `"YYYY-MM"` or `"YYYY/MM"` is the first of the month.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    // minimal length + separator check
    if s.len() < 7 || !s.as_bytes()[..7].is_ascii() {
        return None;
    }
    let sep = &s[4..5];
    if sep != "-" && sep != "/" {
        return None;
    }
    let year_str = &s[0..4];
    let month_str = &s[5..7];
    if !year_str.bytes().all(|b| b.is_ascii_digit())
        || !month_str.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let year: i32 = year_str.parse().ok()?;
    let month: u32 = month_str.parse().ok()?;

    let rest = &s[7..];
    if rest.is_empty() {
        return NaiveDate::from_ymd_opt(year, month, 1);
    }

    // full date: the day must be valid for that month
    let rest = rest.strip_prefix(sep)?;
    let day_str = rest
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or_default();
    if day_str.is_empty() || day_str.len() > 2 || !day_str.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let day: u32 = day_str.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// Month of a date accepted by [`parse_date`].
    pub fn parse(s: &str) -> Option<Self> {
        parse_date(s).map(Self::from_date)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Same month one year earlier.
    pub fn year_before(&self) -> Self {
        Self {
            year: self.year - 1,
            month: self.month,
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
