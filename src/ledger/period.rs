//! Canonical `YYYY-MM` period keys and half-open date windows.
//!
//! Every monthly grouping in the crate derives its bucket through
//! [`PeriodKey::of`], so summaries, breakdowns and budgets always agree on
//! where a month starts and ends.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

const MAX_YEAR: i32 = 9999;

/// Calendar month used as the unit of budget scoping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeriodKey {
    year: i32,
    month: u32,
}

impl PeriodKey {
    pub fn new(year: i32, month: u32) -> Result<Self, LedgerError> {
        if !(0..=MAX_YEAR).contains(&year) || !(1..=12).contains(&month) {
            return Err(LedgerError::InvalidPeriod(format!("{year:04}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    /// Derives the period a calendar date falls into.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Derives the period of a transaction timestamp.
    pub fn of(timestamp: &NaiveDateTime) -> Self {
        Self::from_date(timestamp.date())
    }

    /// Parses the strict `YYYY-MM` textual form.
    pub fn parse(raw: &str) -> Result<Self, LedgerError> {
        let invalid = || LedgerError::InvalidPeriod(raw.to_string());
        let bytes = raw.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(invalid());
        }
        let (year_part, month_part) = (&raw[..4], &raw[5..]);
        if !year_part.bytes().all(|b| b.is_ascii_digit())
            || !month_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let year: i32 = year_part.parse().map_err(|_| invalid())?;
        let month: u32 = month_part.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        // Constructors keep year/month in chrono's representable range.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// Midnight on the first day of the period.
    pub fn start(&self) -> NaiveDateTime {
        self.first_day().and_time(NaiveTime::MIN)
    }

    pub fn contains(&self, timestamp: &NaiveDateTime) -> bool {
        Self::of(timestamp) == *self
    }

    /// Every period from `from` to `to`, both inclusive. Empty when `from > to`.
    pub fn range_inclusive(from: PeriodKey, to: PeriodKey) -> Vec<PeriodKey> {
        let mut periods = Vec::new();
        let mut cursor = from;
        while cursor <= to {
            periods.push(cursor);
            cursor = cursor.next();
        }
        periods
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for PeriodKey {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PeriodKey {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PeriodKey> for String {
    fn from(value: PeriodKey) -> Self {
        value.to_string()
    }
}

/// Half-open `[start, end)` time range used by store queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, LedgerError> {
        if end <= start {
            return Err(LedgerError::Validation(
                "date window end must be after start".into(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn for_period(period: PeriodKey) -> Self {
        Self {
            start: period.start(),
            end: period.next().start(),
        }
    }

    pub fn for_year(year: i32) -> Result<Self, LedgerError> {
        let january = PeriodKey::new(year, 1)?;
        let december = PeriodKey::new(year, 12)?;
        Ok(Self {
            start: january.start(),
            end: december.next().start(),
        })
    }

    pub fn this_month(today: NaiveDate) -> Self {
        Self::for_period(PeriodKey::from_date(today))
    }

    pub fn last_month(today: NaiveDate) -> Self {
        Self::for_period(PeriodKey::from_date(today).previous())
    }

    pub fn this_year(today: NaiveDate) -> Result<Self, LedgerError> {
        Self::for_year(today.year())
    }

    pub fn contains(&self, timestamp: &NaiveDateTime) -> bool {
        *timestamp >= self.start && *timestamp < self.end
    }
}
