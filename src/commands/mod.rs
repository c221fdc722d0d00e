// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod config;
pub mod doctor;
pub mod exporter;
pub mod importer;
pub mod labels;
pub mod reports;
pub mod transactions;

use crate::period::{Period, parse_month, parse_year};
use anyhow::Result;
use chrono::{Datelike, Local};

/// Reads `--month` / `--year`; `None` when neither was given.
pub fn period_arg(sub: &clap::ArgMatches) -> Result<Option<Period>> {
    if let Some(m) = sub.get_one::<String>("month") {
        return Ok(Some(Period::month_of(parse_month(m)?)));
    }
    if let Some(y) = sub.get_one::<String>("year") {
        return Ok(Some(Period::Year(parse_year(y)?)));
    }
    Ok(None)
}

/// Like [`period_arg`] but falls back to the current local month.
pub fn period_or_this_month(sub: &clap::ArgMatches) -> Result<Period> {
    Ok(period_arg(sub)?.unwrap_or_else(|| Period::month_of(Local::now().date_naive())))
}

pub fn this_year() -> i32 {
    Local::now().date_naive().year()
}
