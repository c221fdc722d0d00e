// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Caller-supplied parameters the analytics layer refuses to work with.
///
/// Bad data inside individual transactions never produces one of these;
/// such records are skipped instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Invalid reference date '{0}', expected YYYY-MM-DD or YYYY-MM")]
    InvalidDate(String),
    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),
    #[error("Invalid year '{0}', expected a four-digit year")]
    InvalidYear(String),
}
