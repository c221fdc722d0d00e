// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Date-only time windows. Nothing here touches time of day or time zones.

use crate::error::AnalyticsError;
use chrono::{Datelike, Days, Months, NaiveDate};

pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// The calendar month containing the given date.
    Month(NaiveDate),
    Year(i32),
}

impl Period {
    /// Month window for `date`, keyed by its first day so any two dates in
    /// the same month give equal periods.
    pub fn month_of(date: NaiveDate) -> Self {
        Period::Month(month_bounds(date).0)
    }

    pub fn year(year: i32) -> Result<Self, AnalyticsError> {
        Ok(Period::Year(validate_year(year)?))
    }

    /// First and last day of the window, both inclusive.
    pub fn bounds(&self) -> (NaiveDate, NaiveDate) {
        match *self {
            Period::Month(date) => month_bounds(date),
            Period::Year(y) => (
                NaiveDate::from_ymd_opt(y, 1, 1).unwrap_or(NaiveDate::MIN),
                NaiveDate::from_ymd_opt(y, 12, 31).unwrap_or(NaiveDate::MAX),
            ),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Period::Month(_) => {
                let (start, end) = self.bounds();
                start <= date && date <= end
            }
            Period::Year(y) => date.year() == y,
        }
    }

    /// Human label used when two periods are compared, e.g. `Jan 2024` or `2024`.
    pub fn label(&self) -> String {
        match *self {
            Period::Month(date) => date.format("%b %Y").to_string(),
            Period::Year(y) => y.to_string(),
        }
    }
}

pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date - Days::new(date.day0() as u64);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    (first, last)
}

pub fn validate_year(year: i32) -> Result<i32, AnalyticsError> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(year)
    } else {
        Err(AnalyticsError::InvalidYear(year.to_string()))
    }
}

pub fn parse_year(s: &str) -> Result<i32, AnalyticsError> {
    let year = s
        .trim()
        .parse::<i32>()
        .map_err(|_| AnalyticsError::InvalidYear(s.to_string()))?;
    validate_year(year)
}

/// Accepts `YYYY-MM` and returns the first day of that month.
pub fn parse_month(s: &str) -> Result<NaiveDate, AnalyticsError> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .map_err(|_| AnalyticsError::InvalidMonth(s.to_string()))
}

/// Accepts a full `YYYY-MM-DD` date or a bare `YYYY-MM` month.
pub fn parse_reference_date(s: &str) -> Result<NaiveDate, AnalyticsError> {
    let t = s.trim();
    NaiveDate::parse_from_str(t, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", t), "%Y-%m-%d"))
        .map_err(|_| AnalyticsError::InvalidDate(s.to_string()))
}
