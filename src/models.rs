// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::labels::{ExpenseCategory, IncomeSource};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const OTHER_LABEL: &str = "Other";
pub const UNKNOWN_LABEL: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(anyhow::anyhow!(
                "Invalid transaction type '{}', expected income|expense",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub date: String, // YYYY-MM-DD, as stored
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<IncomeSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_source: Option<IncomeSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ExpenseCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Transaction {
    pub fn income(
        id: impl Into<String>,
        date: impl Into<String>,
        amount: Decimal,
        source: Option<IncomeSource>,
    ) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            amount,
            kind: TransactionKind::Income,
            source,
            payment_source: None,
            category: None,
            note: None,
        }
    }

    pub fn expense(
        id: impl Into<String>,
        date: impl Into<String>,
        amount: Decimal,
        category: Option<ExpenseCategory>,
        payment_source: Option<IncomeSource>,
    ) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            amount,
            kind: TransactionKind::Expense,
            source: None,
            payment_source,
            category,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Calendar date of the record, or `None` when the stored text is not a valid date.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }

    /// Key used by category breakdowns: source for income, category for expenses.
    pub fn grouping_label(&self) -> &str {
        let label = match self.kind {
            TransactionKind::Income => self.source.as_ref().map(IncomeSource::as_str),
            TransactionKind::Expense => self.category.as_ref().map(ExpenseCategory::as_str),
        };
        non_blank(label).unwrap_or(OTHER_LABEL)
    }

    /// Key used by payment-source breakdowns.
    pub fn payment_label(&self) -> &str {
        non_blank(self.payment_source.as_ref().map(IncomeSource::as_str)).unwrap_or(UNKNOWN_LABEL)
    }
}

fn non_blank(label: Option<&str>) -> Option<&str> {
    label.filter(|s| !s.trim().is_empty())
}

/// Totals over a time window plus the transactions that fell inside it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary<'a> {
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
    pub transactions: Vec<&'a Transaction>,
}

impl<'a> Summary<'a> {
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// The `n` latest transactions in the window, newest first.
    pub fn recent(&self, n: usize) -> Vec<&'a Transaction> {
        let mut txs = self.transactions.clone();
        txs.sort_by(|a, b| b.parsed_date().cmp(&a.parsed_date()));
        txs.truncate(n);
        txs
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub name: String,
    pub value: Decimal,
}

impl BreakdownEntry {
    pub fn new(name: impl Into<String>, value: Decimal) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Metric {
    Income,
    Expenses,
    Balance,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Income, Metric::Expenses, Metric::Balance];

    pub fn of(&self, summary: &Summary<'_>) -> Decimal {
        match self {
            Metric::Income => summary.income,
            Metric::Expenses => summary.expenses,
            Metric::Balance => summary.balance,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Metric::Income => "Income",
            Metric::Expenses => "Expenses",
            Metric::Balance => "Balance",
        };
        f.write_str(s)
    }
}

/// One metric for two periods, keyed by period label.
///
/// Serialises as `{"name": "Income", "<label A>": .., "<label B>": ..}` with
/// labels kept in the order they were given.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub metric: Metric,
    pub values: Vec<(String, Decimal)>,
}

impl ComparisonRow {
    pub fn get(&self, label: &str) -> Option<Decimal> {
        self.values
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| *v)
    }
}

impl Serialize for ComparisonRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry("name", &self.metric.to_string())?;
        for (label, value) in &self.values {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    pub month: String, // Jan..Dec
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
}

/// Money received from a source against what was paid out of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceBalance {
    pub source: String,
    pub income: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
}
