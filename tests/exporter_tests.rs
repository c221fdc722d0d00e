// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pocketbook::labels::{ExpenseCategory, IncomeSource};
use pocketbook::models::Transaction;
use pocketbook::store::{SqliteStore, TransactionStore};
use pocketbook::{cli, commands::exporter, commands::importer, db};
use rusqlite::Connection;
use rust_decimal_macros::dec;
use serde_json::json;
use tempfile::tempdir;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn run_export(conn: &Connection, format: &str, out: &str) -> anyhow::Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "pocketbook",
        "export",
        "transactions",
        "--format",
        format,
        "--out",
        out,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(conn, export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_transactions_streams_pretty_json() {
    let conn = base_conn();
    SqliteStore::new(&conn)
        .insert(
            &Transaction::expense(
                "t1",
                "2025-01-02",
                dec!(12.34),
                Some(ExpenseCategory::Grocery),
                Some(IncomeSource::Salary),
            )
            .with_note("Weekly run"),
        )
        .unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    run_export(&conn, "json", &out_path.to_string_lossy()).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "id": "t1",
                "date": "2025-01-02",
                "amount": "12.34",
                "type": "expense",
                "category": "Grocery",
                "paymentSource": "Salary",
                "note": "Weekly run"
            }
        ])
    );
}

#[test]
fn csv_export_reimports_cleanly() {
    let conn = base_conn();
    let mut store = SqliteStore::new(&conn);
    store
        .insert(&Transaction::income("a", "2025-01-01", dec!(900), Some(IncomeSource::Family)))
        .unwrap();
    store
        .insert(&Transaction::expense(
            "b",
            "2025-01-03",
            dec!(40),
            Some(ExpenseCategory::from("Pets")),
            None,
        ))
        .unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    run_export(&conn, "csv", &out_path.to_string_lossy()).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some("date,type,amount,label,payment_source,note"));
    assert_eq!(lines.next(), Some("2025-01-01,income,900,Family,,"));

    let mut other = base_conn();
    let n = importer::import_transactions(&mut other, &out_path.to_string_lossy()).unwrap();
    assert_eq!(n, 2);
    let back = SqliteStore::new(&other).list().unwrap();
    assert_eq!(back[0].category, Some(ExpenseCategory::Custom("Pets".into())));
    assert_eq!(back[1].amount, dec!(900));
}

#[test]
fn export_transactions_rejects_unknown_format() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    assert!(run_export(&conn, "xml", &out_path.to_string_lossy()).is_err());
    assert!(!out_path.exists());
}
