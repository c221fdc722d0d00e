// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::filter_period;
use crate::commands::period_arg;
use crate::labels::{ExpenseCategory, IncomeSource, label_from_input};
use crate::models::{Transaction, TransactionKind};
use crate::store::{Ledger, SqliteStore, TransactionPatch, TransactionStore};
use crate::utils::{
    fmt_money, get_currency, maybe_print_json, new_id, parse_amount, parse_date, pretty_table,
    register_category, register_source,
};
use anyhow::{Result, anyhow};
use regex::Regex;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("income", sub)) => {
            add_income(conn, sub)?;
        }
        Some(("expense", sub)) => {
            add_expense(conn, sub)?;
        }
        Some(("edit", sub)) => {
            edit(conn, sub)?;
        }
        Some(("rm", sub)) => remove(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn note_arg(sub: &clap::ArgMatches) -> Option<String> {
    sub.get_one::<String>("note")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

pub fn add_income(conn: &Connection, sub: &clap::ArgMatches) -> Result<Transaction> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let source: IncomeSource =
        label_from_input(sub.get_one::<String>("source").map(String::as_str))
            .ok_or_else(|| anyhow!("Income source must not be empty"))?;

    register_source(conn, &source)?;
    let mut tx = Transaction::income(new_id(), date.to_string(), amount, Some(source));
    tx.note = note_arg(sub);

    let mut ledger = Ledger::load(SqliteStore::new(conn))?;
    ledger.add(tx.clone())?;
    println!(
        "Recorded income {} on {} from '{}' ({})",
        fmt_money(&amount, &get_currency(conn)?),
        date,
        tx.grouping_label(),
        tx.id
    );
    Ok(tx)
}

pub fn add_expense(conn: &Connection, sub: &clap::ArgMatches) -> Result<Transaction> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let category: ExpenseCategory =
        label_from_input(sub.get_one::<String>("category").map(String::as_str))
            .ok_or_else(|| anyhow!("Expense category must not be empty"))?;
    let payment_source: Option<IncomeSource> =
        label_from_input(sub.get_one::<String>("payment_source").map(String::as_str));

    if register_category(conn, &category)? {
        println!("Added custom category '{}'", category);
    }
    if let Some(ps) = &payment_source {
        register_source(conn, ps)?;
    }
    let mut tx = Transaction::expense(
        new_id(),
        date.to_string(),
        amount,
        Some(category),
        payment_source,
    );
    tx.note = note_arg(sub);

    let mut ledger = Ledger::load(SqliteStore::new(conn))?;
    ledger.add(tx.clone())?;
    println!(
        "Recorded expense {} on {} for '{}' ({})",
        fmt_money(&amount, &get_currency(conn)?),
        date,
        tx.grouping_label(),
        tx.id
    );
    Ok(tx)
}

pub fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<Transaction> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let text = |k: &str| sub.get_one::<String>(k).map(String::as_str);

    let patch = TransactionPatch {
        date: text("date")
            .map(parse_date)
            .transpose()?
            .map(|d| d.to_string()),
        amount: text("amount").map(parse_amount).transpose()?,
        kind: None,
        source: label_from_input(text("source")),
        payment_source: label_from_input(text("payment_source")),
        category: label_from_input(text("category")),
        note: note_arg(sub),
    };
    if patch.is_empty() {
        return Err(anyhow!("Nothing to change for transaction '{}'", id));
    }

    let mut ledger = Ledger::load(SqliteStore::new(conn))?;
    let current = ledger
        .find(id)
        .ok_or_else(|| anyhow!("Transaction '{}' not found", id))?;
    match current.kind {
        TransactionKind::Income if patch.category.is_some() || patch.payment_source.is_some() => {
            return Err(anyhow!("Income transactions take --source, not a category"));
        }
        TransactionKind::Expense if patch.source.is_some() => {
            return Err(anyhow!(
                "Expense transactions take --category and --payment-source, not --source"
            ));
        }
        _ => {}
    }
    if let Some(c) = &patch.category {
        register_category(conn, c)?;
    }
    for s in patch.source.iter().chain(patch.payment_source.iter()) {
        register_source(conn, s)?;
    }

    let saved = ledger.edit(id, &patch)?;
    println!("Updated transaction {}", saved.id);
    Ok(saved)
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let mut ledger = Ledger::load(SqliteStore::new(conn))?;
    let removed = ledger.remove(id)?;
    println!(
        "Removed {} {} on {}",
        removed.kind, removed.amount, removed.date
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let ccy = get_currency(conn)?;
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.date.clone(),
                    t.kind.to_string(),
                    fmt_money(&t.amount, &ccy),
                    t.grouping_label().to_string(),
                    t.payment_source
                        .as_ref()
                        .map(|p| p.to_string())
                        .unwrap_or_default(),
                    t.note.clone().unwrap_or_default(),
                    t.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Type", "Amount", "Source/Category", "Paid From", "Note", "ID"],
                rows,
            )
        );
    }
    Ok(())
}

/// Transaction history, newest first, narrowed by the `tx list` filters.
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let all = SqliteStore::new(conn).list()?;

    let mut data: Vec<&Transaction> = match period_arg(sub)? {
        Some(p) => filter_period(&all, p),
        None => all.iter().collect(),
    };

    if let Some(kind) = sub.get_one::<String>("type") {
        let kind: TransactionKind = kind.parse()?;
        data.retain(|t| t.kind == kind);
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        let cat = cat.trim();
        data.retain(|t| {
            t.kind == TransactionKind::Expense && t.grouping_label().eq_ignore_ascii_case(cat)
        });
    }
    if let Some(src) = sub.get_one::<String>("source") {
        let src = src.trim();
        data.retain(|t| match t.kind {
            TransactionKind::Income => t.grouping_label().eq_ignore_ascii_case(src),
            TransactionKind::Expense => t
                .payment_source
                .as_ref()
                .is_some_and(|p| p.as_str().eq_ignore_ascii_case(src)),
        });
    }
    if let Some(pat) = sub.get_one::<String>("search") {
        let re = Regex::new(pat.trim())
            .map_err(|err| anyhow!("Invalid regex pattern '{}': {}", pat, err))?;
        data.retain(|t| {
            let hay = format!(
                "{} {} {}",
                t.grouping_label(),
                t.payment_label(),
                t.note.as_deref().unwrap_or_default()
            );
            re.is_match(&hay)
        });
    }
    if let Some(limit) = sub.get_one::<usize>("limit") {
        data.truncate(*limit);
    }
    Ok(data.into_iter().cloned().collect())
}
