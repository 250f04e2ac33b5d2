//! Business-day calendar.
//!
//! The report engine only needs one number: how many business days the
//! reporting month has. [`Calendar`] is the seam; [`WeekdayCalendar`] is the
//! built-in implementation.

use std::collections::BTreeSet;
use std::num::NonZeroU32;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::config::CalendarConfig;
use crate::error::{PulseError, Result};

/// Counts business days in a calendar month.
pub trait Calendar {
    /// Business days in `month` (1–12) of `year`.
    fn business_days_in_month(&self, year: i32, month: u32) -> u32;
}

/// A calendar month, the unit ratios are normalized against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReportMonth {
    pub year: i32,
    pub month: u32,
}

impl ReportMonth {
    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parse `YYYY-MM`.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || PulseError::InvalidDate(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        Ok(Self { year, month })
    }

    /// Every date of the month, in order.
    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        let first = NaiveDate::from_ymd_opt(self.year, self.month, 1);
        first
            .into_iter()
            .flat_map(|d| d.iter_days())
            .take_while(move |d| d.month() == self.month)
    }
}

impl std::fmt::Display for ReportMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Number of business days in the reporting month. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessDays(NonZeroU32);

impl BusinessDays {
    pub fn new(days: u32) -> Option<Self> {
        NonZeroU32::new(days).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

/// Business days of `month` according to `calendar`.
///
/// A calendar that reports zero days is a configuration error: ratios
/// would be undefined.
pub fn business_days_in(calendar: &dyn Calendar, month: ReportMonth) -> Result<BusinessDays> {
    let days = calendar.business_days_in_month(month.year, month.month);
    BusinessDays::new(days).ok_or(PulseError::NoBusinessDays {
        year: month.year,
        month: month.month,
    })
}

/// Business days in the month containing `today`.
pub fn business_days_this_month(calendar: &dyn Calendar, today: NaiveDate) -> Result<BusinessDays> {
    business_days_in(calendar, ReportMonth::containing(today))
}

/// Weekdays minus configured weekend days and holidays.
#[derive(Debug, Clone)]
pub struct WeekdayCalendar {
    weekend: Vec<Weekday>,
    holidays: BTreeSet<NaiveDate>,
}

impl Default for WeekdayCalendar {
    fn default() -> Self {
        Self {
            weekend: vec![Weekday::Sat, Weekday::Sun],
            holidays: BTreeSet::new(),
        }
    }
}

impl WeekdayCalendar {
    pub fn new(weekend: Vec<Weekday>, holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            weekend,
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Build from the `[calendar]` config section.
    pub fn from_config(config: &CalendarConfig) -> Result<Self> {
        let weekend = config
            .weekend
            .iter()
            .map(|name| {
                name.parse::<Weekday>()
                    .map_err(|_| PulseError::InvalidDate(name.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        let holidays = config
            .holidays
            .iter()
            .map(|s| {
                NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                    .map_err(|_| PulseError::InvalidDate(s.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(weekend, holidays))
    }

    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !self.weekend.contains(&date.weekday()) && !self.holidays.contains(&date)
    }
}

impl Calendar for WeekdayCalendar {
    fn business_days_in_month(&self, year: i32, month: u32) -> u32 {
        ReportMonth { year, month }
            .days()
            .filter(|d| self.is_business_day(*d))
            .count() as u32
    }
}
