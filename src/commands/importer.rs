// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::labels::{ExpenseCategory, IncomeSource, label_from_input};
use crate::models::{Transaction, TransactionKind};
use crate::store::{SqliteStore, TransactionStore};
use crate::utils::{new_id, parse_amount, parse_date, register_category, register_source};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let path = sub.get_one::<String>("path").unwrap().trim();
            let n = import_transactions(conn, path)?;
            println!("Imported {} transactions from {}", n, path);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Loads `date,type,amount,label,payment_source,note` rows in one database transaction.
///
/// `label` is the income source or the expense category depending on `type`.
/// Any bad row aborts the whole import.
pub fn import_transactions(conn: &mut Connection, path: &str) -> Result<usize> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let mut count = 0usize;
    {
        let mut store = SqliteStore::new(&tx);
        for (i, result) in rdr.records().enumerate() {
            let line = i + 2;
            let rec = result?;
            let date_raw = rec.get(0).context("date missing")?.trim();
            let kind_raw = rec.get(1).context("type missing")?;
            let amount_raw = rec.get(2).context("amount missing")?.trim();
            let label = rec.get(3);
            let payment = rec.get(4);
            let note = rec
                .get(5)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string());

            let date = parse_date(date_raw)
                .with_context(|| format!("Line {}: invalid transaction date", line))?;
            let amount = parse_amount(amount_raw)
                .with_context(|| format!("Line {}: invalid amount", line))?;
            let kind: TransactionKind = kind_raw
                .parse()
                .with_context(|| format!("Line {}: invalid type", line))?;

            let mut record = match kind {
                TransactionKind::Income => {
                    let source: Option<IncomeSource> = label_from_input(label);
                    if let Some(s) = &source {
                        register_source(&tx, s)?;
                    }
                    Transaction::income(new_id(), date.to_string(), amount, source)
                }
                TransactionKind::Expense => {
                    let category: Option<ExpenseCategory> = label_from_input(label);
                    let paid_from: Option<IncomeSource> = label_from_input(payment);
                    if let Some(c) = &category {
                        register_category(&tx, c)?;
                    }
                    if let Some(p) = &paid_from {
                        register_source(&tx, p)?;
                    }
                    Transaction::expense(new_id(), date.to_string(), amount, category, paid_from)
                }
            };
            record.note = note;
            store.insert(&record)?;
            count += 1;
        }
    }
    tx.commit()?;
    tracing::info!(path, count, "import committed");
    Ok(count)
}
