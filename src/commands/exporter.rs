// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::TransactionKind;
use crate::store::{SqliteStore, TransactionStore};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }

    // Oldest first so the file reads chronologically and re-imports in order
    let mut txs = SqliteStore::new(conn).list()?;
    txs.reverse();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["date", "type", "amount", "label", "payment_source", "note"])?;
            for t in &txs {
                let label = match t.kind {
                    TransactionKind::Income => t.source.as_ref().map(|s| s.to_string()),
                    TransactionKind::Expense => t.category.as_ref().map(|c| c.to_string()),
                };
                wtr.write_record([
                    t.date.clone(),
                    t.kind.to_string(),
                    t.amount.to_string(),
                    label.unwrap_or_default(),
                    t.payment_source
                        .as_ref()
                        .map(|p| p.to_string())
                        .unwrap_or_default(),
                    t.note.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        _ => {
            std::fs::write(out, serde_json::to_string_pretty(&txs)?)?;
        }
    }
    println!("Exported {} transactions to {}", txs.len(), out);
    Ok(())
}
