// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Summaries and breakdowns derived from a flat transaction log.
//!
//! Every function here is pure: it reads the slice it is given, never
//! mutates it, and keeps nothing between calls. Records whose date does not
//! parse are skipped (and logged) rather than failing the whole call.

use crate::error::AnalyticsError;
use crate::models::{
    BreakdownEntry, ComparisonRow, Metric, MonthTotals, OTHER_LABEL, SourceBalance, Summary,
    Transaction, TransactionKind,
};
use crate::period::{Period, validate_year};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::collections::HashMap;

pub const DEFAULT_TOP_N: usize = 5;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn dated(transactions: &[Transaction]) -> impl Iterator<Item = (NaiveDate, &Transaction)> {
    transactions.iter().filter_map(|t| match t.parsed_date() {
        Some(d) => Some((d, t)),
        None => {
            tracing::warn!(id = %t.id, date = %t.date, "skipping transaction with malformed date");
            None
        }
    })
}

/// Transactions whose date lies inside `period`, in input order.
pub fn filter_period(transactions: &[Transaction], period: Period) -> Vec<&Transaction> {
    dated(transactions)
        .filter(|(d, _)| period.contains(*d))
        .map(|(_, t)| t)
        .collect()
}

fn summarize(transactions: Vec<&Transaction>) -> Summary<'_> {
    let mut income = Decimal::ZERO;
    let mut expenses = Decimal::ZERO;
    for t in &transactions {
        match t.kind {
            TransactionKind::Income => income += t.amount,
            TransactionKind::Expense => expenses += t.amount,
        }
    }
    Summary {
        income,
        expenses,
        balance: income - expenses,
        transactions,
    }
}

pub fn period_summary(transactions: &[Transaction], period: Period) -> Summary<'_> {
    summarize(filter_period(transactions, period))
}

/// Totals for the calendar month containing `reference`, both month ends included.
pub fn monthly_summary(transactions: &[Transaction], reference: NaiveDate) -> Summary<'_> {
    period_summary(transactions, Period::month_of(reference))
}

pub fn yearly_summary(transactions: &[Transaction], year: i32) -> Result<Summary<'_>, AnalyticsError> {
    Ok(period_summary(transactions, Period::year(year)?))
}

/// Sums amounts per label. Entries come back sorted by value, largest
/// first; equal values keep the order in which their label first appeared.
fn group_totals<'a, I, F>(transactions: I, key: F) -> Vec<BreakdownEntry>
where
    I: IntoIterator<Item = &'a Transaction>,
    F: Fn(&'a Transaction) -> &'a str,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut entries: Vec<BreakdownEntry> = Vec::new();
    for t in transactions {
        let name = key(t);
        match index.get(name) {
            Some(&i) => entries[i].value += t.amount,
            None => {
                index.insert(name, entries.len());
                entries.push(BreakdownEntry::new(name, t.amount));
            }
        }
    }
    entries.sort_by(|a, b| b.value.cmp(&a.value));
    entries
}

/// Income by source or expenses by category within the month containing `reference`.
pub fn category_breakdown(
    transactions: &[Transaction],
    kind: TransactionKind,
    reference: NaiveDate,
) -> Vec<BreakdownEntry> {
    category_breakdown_for(transactions, kind, Period::month_of(reference))
}

pub fn category_breakdown_for(
    transactions: &[Transaction],
    kind: TransactionKind,
    period: Period,
) -> Vec<BreakdownEntry> {
    let in_window = filter_period(transactions, period);
    group_totals(
        in_window.into_iter().filter(|t| t.kind == kind),
        Transaction::grouping_label,
    )
}

/// Expenses grouped by the income source that paid for them.
pub fn payment_source_breakdown(transactions: &[Transaction], period: Period) -> Vec<BreakdownEntry> {
    let in_window = filter_period(transactions, period);
    group_totals(
        in_window
            .into_iter()
            .filter(|t| t.kind == TransactionKind::Expense),
        Transaction::payment_label,
    )
}

/// Keeps the `n` largest entries and folds the rest into a single `Other`.
///
/// `entries` must already be sorted descending. The folded entry is left out
/// when it would be zero. If an `Other` entry survives among the first `n`,
/// the overflow is added to it so the name stays unique, and the result is
/// re-sorted (stably) since `Other` may now outrank its neighbours.
pub fn top_n_with_overflow(entries: Vec<BreakdownEntry>, n: usize) -> Vec<BreakdownEntry> {
    if entries.len() <= n {
        return entries;
    }
    let mut kept = entries;
    let overflow: Decimal = kept.split_off(n).iter().map(|e| e.value).sum();
    if overflow.is_zero() {
        return kept;
    }
    match kept.iter().position(|e| e.name == OTHER_LABEL) {
        Some(i) => {
            kept[i].value += overflow;
            kept.sort_by(|a, b| b.value.cmp(&a.value));
        }
        None => kept.push(BreakdownEntry::new(OTHER_LABEL, overflow)),
    }
    kept
}

/// Lays two summaries side by side, one row per metric.
///
/// When both labels are equal the second one is suffixed with ` (2)` so
/// neither value is lost.
pub fn compare_periods(
    a: &Summary<'_>,
    label_a: &str,
    b: &Summary<'_>,
    label_b: &str,
) -> Vec<ComparisonRow> {
    let label_b = if label_a == label_b {
        format!("{} (2)", label_b)
    } else {
        label_b.to_string()
    };
    Metric::ALL
        .iter()
        .map(|m| ComparisonRow {
            metric: *m,
            values: vec![(label_a.to_string(), m.of(a)), (label_b.clone(), m.of(b))],
        })
        .collect()
}

/// Income and expenses for each calendar month of `year`, January first.
pub fn monthly_trend(transactions: &[Transaction], year: i32) -> Result<Vec<MonthTotals>, AnalyticsError> {
    let year = validate_year(year)?;
    let mut totals = [(Decimal::ZERO, Decimal::ZERO); 12];
    for (d, t) in dated(transactions).filter(|(d, _)| d.year() == year) {
        let slot = &mut totals[d.month0() as usize];
        match t.kind {
            TransactionKind::Income => slot.0 += t.amount,
            TransactionKind::Expense => slot.1 += t.amount,
        }
    }
    Ok(MONTH_NAMES
        .iter()
        .zip(totals)
        .map(|(name, (income, expenses))| MonthTotals {
            month: name.to_string(),
            income,
            expenses,
            balance: income - expenses,
        })
        .collect())
}

/// What is left of each income source after the expenses it paid for.
///
/// With `period` set only transactions inside that window count. Sources
/// with no activity are omitted. Income without a source and expenses
/// without a payment source belong to no source and are left out.
pub fn source_balances(transactions: &[Transaction], period: Option<Period>) -> Vec<SourceBalance> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<SourceBalance> = Vec::new();
    let in_window = dated(transactions).filter(|(d, _)| period.is_none_or(|p| p.contains(*d)));
    for (_, t) in in_window {
        let label = match t.kind {
            TransactionKind::Income => match t.source.as_ref() {
                Some(s) if !s.is_blank() => s.as_str(),
                _ => continue,
            },
            TransactionKind::Expense => match t.payment_source.as_ref() {
                Some(s) if !s.is_blank() => s.as_str(),
                _ => continue,
            },
        };
        let i = *index.entry(label).or_insert_with(|| {
            rows.push(SourceBalance {
                source: label.to_string(),
                income: Decimal::ZERO,
                spent: Decimal::ZERO,
                remaining: Decimal::ZERO,
            });
            rows.len() - 1
        });
        let row = &mut rows[i];
        match t.kind {
            TransactionKind::Income => row.income += t.amount,
            TransactionKind::Expense => row.spent += t.amount,
        }
        row.remaining = row.income - row.spent;
    }
    rows.retain(|r| !r.income.is_zero() || !r.spent.is_zero());
    rows.sort_by(|a, b| b.income.cmp(&a.income));
    rows
}
