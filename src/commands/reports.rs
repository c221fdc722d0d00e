// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{
    DEFAULT_TOP_N, category_breakdown_for, compare_periods, monthly_trend, payment_source_breakdown,
    period_summary, source_balances, top_n_with_overflow,
};
use crate::commands::{period_or_this_month, this_year};
use crate::models::{BreakdownEntry, ComparisonRow, Transaction, TransactionKind};
use crate::period::{Period, parse_month, parse_year};
use crate::store::{SqliteStore, TransactionStore};
use crate::utils::{fmt_money, get_currency, maybe_print_json, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("breakdown", sub)) => breakdown(conn, sub)?,
        Some(("payment-sources", sub)) => payment_sources(conn, sub)?,
        Some(("compare", sub)) => compare(conn, sub)?,
        Some(("trend", sub)) => trend(conn, sub)?,
        Some(("sources", sub)) => sources(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn load(conn: &Connection) -> Result<Vec<Transaction>> {
    SqliteStore::new(conn).list()
}

fn share(value: Decimal, total: Decimal) -> String {
    if total.is_zero() {
        return "-".into();
    }
    format!("{:.1}%", (value * Decimal::ONE_HUNDRED / total).round_dp(1))
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let period = period_or_this_month(sub)?;
    let txs = load(conn)?;
    let s = period_summary(&txs, period);
    let recent = sub.get_one::<usize>("recent").map(|n| s.recent(*n));

    let out = json!({
        "period": period.label(),
        "income": s.income,
        "expenses": s.expenses,
        "balance": s.balance,
        "count": s.transactions.len(),
        "recent": &recent,
    });
    if maybe_print_json(json_flag, jsonl_flag, &out)? {
        return Ok(());
    }

    let ccy = get_currency(conn)?;
    if s.is_empty() {
        println!("No transactions in {}", period.label());
    }
    println!(
        "{}",
        pretty_table(
            &["Period", "Income", "Expenses", "Balance", "Transactions"],
            vec![vec![
                period.label(),
                fmt_money(&s.income, &ccy),
                fmt_money(&s.expenses, &ccy),
                fmt_money(&s.balance, &ccy),
                s.transactions.len().to_string(),
            ]],
        )
    );
    if let Some(recent) = recent {
        let rows = recent
            .iter()
            .map(|t| {
                vec![
                    t.date.clone(),
                    t.kind.to_string(),
                    t.grouping_label().to_string(),
                    fmt_money(&t.amount, &ccy),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Type", "Source/Category", "Amount"], rows)
        );
    }
    Ok(())
}

/// Entries for `report breakdown`, folded to `--top` (5 unless `--all`).
pub fn breakdown_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<BreakdownEntry>> {
    let kind: TransactionKind = sub.get_one::<String>("type").unwrap().parse()?;
    let period = period_or_this_month(sub)?;
    let entries = category_breakdown_for(&load(conn)?, kind, period);
    Ok(fold(entries, sub))
}

pub fn payment_source_rows(
    conn: &Connection,
    sub: &clap::ArgMatches,
) -> Result<Vec<BreakdownEntry>> {
    let period = period_or_this_month(sub)?;
    let entries = payment_source_breakdown(&load(conn)?, period);
    Ok(fold(entries, sub))
}

fn fold(entries: Vec<BreakdownEntry>, sub: &clap::ArgMatches) -> Vec<BreakdownEntry> {
    if sub.get_flag("all") {
        return entries;
    }
    let n = sub.get_one::<usize>("top").copied().unwrap_or(DEFAULT_TOP_N);
    top_n_with_overflow(entries, n)
}

fn print_breakdown(
    conn: &Connection,
    sub: &clap::ArgMatches,
    header: &str,
    data: &[BreakdownEntry],
) -> Result<()> {
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    let total: Decimal = data.iter().map(|e| e.value).sum();
    let rows = data
        .iter()
        .map(|e| vec![e.name.clone(), fmt_money(&e.value, &ccy), share(e.value, total)])
        .collect();
    println!("{}", pretty_table(&[header, "Amount", "Share"], rows));
    Ok(())
}

fn breakdown(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = breakdown_rows(conn, sub)?;
    let header = match sub.get_one::<String>("type").map(String::as_str) {
        Some("income") => "Source",
        _ => "Category",
    };
    print_breakdown(conn, sub, header, &data)
}

fn payment_sources(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = payment_source_rows(conn, sub)?;
    print_breakdown(conn, sub, "Paid From", &data)
}

/// Rows for `report compare`; labels are `Jan 2024` style for months, the year otherwise.
pub fn compare_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<ComparisonRow>> {
    let periods: Vec<Period> = if let Some(ms) = sub.get_many::<String>("months") {
        ms.map(|m| -> Result<Period> { Ok(Period::month_of(parse_month(m)?)) })
            .collect::<Result<_>>()?
    } else if let Some(ys) = sub.get_many::<String>("years") {
        ys.map(|y| -> Result<Period> { Ok(Period::Year(parse_year(y)?)) })
            .collect::<Result<_>>()?
    } else {
        return Err(anyhow!("Pass --months A B or --years A B"));
    };
    let &[a, b] = periods.as_slice() else {
        return Err(anyhow!("Exactly two periods are compared"));
    };

    let txs = load(conn)?;
    let sa = period_summary(&txs, a);
    let sb = period_summary(&txs, b);
    Ok(compare_periods(&sa, &a.label(), &sb, &b.label()))
}

fn compare(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let rows = compare_rows(conn, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    let Some(first) = rows.first() else {
        return Ok(());
    };
    let labels: Vec<&str> = first.values.iter().map(|(l, _)| l.as_str()).collect();
    let mut headers = vec!["Metric"];
    headers.extend(labels.iter().copied());
    headers.push("Change");

    let ccy = get_currency(conn)?;
    let data = rows
        .iter()
        .map(|r| {
            let mut row = vec![r.metric.to_string()];
            row.extend(r.values.iter().map(|(_, v)| fmt_money(v, &ccy)));
            let change = match r.values.as_slice() {
                [(_, a), (_, b)] => fmt_money(&(*b - *a), &ccy),
                _ => String::new(),
            };
            row.push(change);
            row
        })
        .collect();
    println!("{}", pretty_table(&headers, data));
    Ok(())
}

fn trend(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let year = match sub.get_one::<String>("year") {
        Some(y) => parse_year(y)?,
        None => this_year(),
    };
    let data = monthly_trend(&load(conn)?, year)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    let rows = data
        .iter()
        .map(|m| {
            vec![
                format!("{} {}", m.month, year),
                fmt_money(&m.income, &ccy),
                fmt_money(&m.expenses, &ccy),
                fmt_money(&m.balance, &ccy),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expenses", "Balance"], rows)
    );
    Ok(())
}

fn sources(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period = if sub.get_flag("all") {
        None
    } else {
        Some(period_or_this_month(sub)?)
    };
    let data = source_balances(&load(conn)?, period);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    let rows = data
        .iter()
        .map(|s| {
            let used = if s.income.is_zero() {
                "-".to_string()
            } else {
                share(s.spent, s.income)
            };
            vec![
                s.source.clone(),
                fmt_money(&s.income, &ccy),
                fmt_money(&s.spent, &ccy),
                fmt_money(&s.remaining, &ccy),
                used,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Source", "Income", "Spent", "Remaining", "Used"], rows)
    );
    Ok(())
}
