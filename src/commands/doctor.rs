// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Transaction, TransactionKind};
use crate::store::{SqliteStore, TransactionStore};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection) -> Result<()> {
    let txs = SqliteStore::new(conn).list()?;
    let rows = find_issues(&txs);
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Transaction", "Detail"], rows));
    }
    Ok(())
}

/// Records the reports will skip or file under a sentinel label.
pub fn find_issues(txs: &[Transaction]) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for t in txs {
        // 1) Skipped by every report
        if t.parsed_date().is_none() {
            rows.push(vec!["malformed_date".into(), t.id.clone(), t.date.clone()]);
        }
        if t.amount.is_sign_negative() && !t.amount.is_zero() {
            rows.push(vec!["negative_amount".into(), t.id.clone(), t.amount.to_string()]);
        }
        // 2) Reported under "Other" / "Unknown"
        match t.kind {
            TransactionKind::Income if t.source.as_ref().is_none_or(|s| s.is_blank()) => {
                rows.push(vec!["missing_source".into(), t.id.clone(), "Other".into()]);
            }
            TransactionKind::Expense => {
                if t.category.as_ref().is_none_or(|c| c.is_blank()) {
                    rows.push(vec!["missing_category".into(), t.id.clone(), "Other".into()]);
                }
                if t.payment_source.as_ref().is_none_or(|p| p.is_blank()) {
                    rows.push(vec![
                        "missing_payment_source".into(),
                        t.id.clone(),
                        "Unknown".into(),
                    ]);
                }
            }
            _ => {}
        }
    }
    rows
}
