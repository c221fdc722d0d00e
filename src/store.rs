// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::labels::{ExpenseCategory, IncomeSource};
use crate::models::{Transaction, TransactionKind};
use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

/// Durable home of a user's transactions.
pub trait TransactionStore {
    /// All transactions, newest first.
    fn list(&self) -> Result<Vec<Transaction>>;
    fn insert(&mut self, tx: &Transaction) -> Result<()>;
    fn update(&mut self, id: &str, patch: &TransactionPatch) -> Result<Transaction>;
    fn delete(&mut self, id: &str) -> Result<()>;
}

/// Field-wise edit of a transaction; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub date: Option<String>,
    pub amount: Option<Decimal>,
    pub kind: Option<TransactionKind>,
    pub source: Option<IncomeSource>,
    pub payment_source: Option<IncomeSource>,
    pub category: Option<ExpenseCategory>,
    pub note: Option<String>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        *self == TransactionPatch::default()
    }

    pub fn apply(&self, tx: &mut Transaction) {
        if let Some(d) = &self.date {
            tx.date = d.clone();
        }
        if let Some(a) = self.amount {
            tx.amount = a;
        }
        if let Some(k) = self.kind {
            tx.kind = k;
        }
        if let Some(s) = &self.source {
            tx.source = Some(s.clone());
        }
        if let Some(p) = &self.payment_source {
            tx.payment_source = Some(p.clone());
        }
        if let Some(c) = &self.category {
            tx.category = Some(c.clone());
        }
        if let Some(n) = &self.note {
            tx.note = Some(n.clone());
        }
    }
}

pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

const SELECT_COLUMNS: &str =
    "SELECT id, date, amount, type, source, payment_source, category, note FROM transactions";

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn get(&self, id: &str) -> Result<Option<Transaction>> {
        let sql = format!("{} WHERE id=?1", SELECT_COLUMNS);
        let row = self
            .conn
            .query_row(&sql, params![id], row_to_parts)
            .optional()?;
        row.map(parts_to_transaction).transpose()
    }
}

type RowParts = (
    String,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
);

fn row_to_parts(r: &Row<'_>) -> rusqlite::Result<RowParts> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
        r.get(6)?,
        r.get(7)?,
    ))
}

fn parts_to_transaction(p: RowParts) -> Result<Transaction> {
    let (id, date, amount_s, kind_s, source, payment_source, category, note) = p;
    let amount = amount_s
        .parse::<Decimal>()
        .with_context(|| format!("Invalid amount '{}' on transaction {}", amount_s, id))?;
    let kind = kind_s
        .parse::<TransactionKind>()
        .with_context(|| format!("Invalid type on transaction {}", id))?;
    Ok(Transaction {
        id,
        date,
        amount,
        kind,
        source: source.map(IncomeSource::from),
        payment_source: payment_source.map(IncomeSource::from),
        category: category.map(ExpenseCategory::from),
        note,
    })
}

impl TransactionStore for SqliteStore<'_> {
    fn list(&self) -> Result<Vec<Transaction>> {
        let sql = format!("{} ORDER BY date DESC, seq DESC", SELECT_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], row_to_parts)?;
        let mut data = Vec::new();
        for row in rows {
            data.push(parts_to_transaction(row?)?);
        }
        Ok(data)
    }

    fn insert(&mut self, tx: &Transaction) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO transactions(id, date, amount, type, source, payment_source, category, note)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    tx.id,
                    tx.date,
                    tx.amount.to_string(),
                    tx.kind.as_str(),
                    tx.source.as_ref().map(IncomeSource::as_str),
                    tx.payment_source.as_ref().map(IncomeSource::as_str),
                    tx.category.as_ref().map(ExpenseCategory::as_str),
                    tx.note,
                ],
            )
            .with_context(|| format!("Insert transaction {}", tx.id))?;
        tracing::debug!(id = %tx.id, "inserted transaction");
        Ok(())
    }

    fn update(&mut self, id: &str, patch: &TransactionPatch) -> Result<Transaction> {
        let mut tx = self
            .get(id)?
            .ok_or_else(|| anyhow!("Transaction '{}' not found", id))?;
        patch.apply(&mut tx);
        self.conn.execute(
            "UPDATE transactions SET date=?2, amount=?3, type=?4, source=?5, payment_source=?6,
             category=?7, note=?8 WHERE id=?1",
            params![
                tx.id,
                tx.date,
                tx.amount.to_string(),
                tx.kind.as_str(),
                tx.source.as_ref().map(IncomeSource::as_str),
                tx.payment_source.as_ref().map(IncomeSource::as_str),
                tx.category.as_ref().map(ExpenseCategory::as_str),
                tx.note,
            ],
        )?;
        tracing::debug!(id, "updated transaction");
        Ok(tx)
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let n = self
            .conn
            .execute("DELETE FROM transactions WHERE id=?1", params![id])?;
        if n == 0 {
            return Err(anyhow!("Transaction '{}' not found", id));
        }
        tracing::debug!(id, "deleted transaction");
        Ok(())
    }
}

/// In-memory view of a store that applies changes optimistically.
///
/// Each command lands in the local list first and is then confirmed with the
/// store. A failed confirmation rolls the local change back and returns the
/// store's error, so the view never drifts from what was persisted.
pub struct Ledger<S: TransactionStore> {
    store: S,
    transactions: Vec<Transaction>,
}

impl<S: TransactionStore> Ledger<S> {
    pub fn load(store: S) -> Result<Self> {
        let transactions = store.list()?;
        Ok(Self {
            store,
            transactions,
        })
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn find(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn add(&mut self, tx: Transaction) -> Result<()> {
        self.transactions.insert(0, tx.clone());
        if let Err(e) = self.store.insert(&tx) {
            tracing::warn!(id = %tx.id, error = %e, "insert rejected, rolling back");
            // Only the optimistic row; an existing row with the same id stays
            self.transactions.remove(0);
            return Err(e);
        }
        Ok(())
    }

    pub fn edit(&mut self, id: &str, patch: &TransactionPatch) -> Result<Transaction> {
        let pos = self
            .position(id)
            .ok_or_else(|| anyhow!("Transaction '{}' not found", id))?;
        let previous = self.transactions[pos].clone();
        patch.apply(&mut self.transactions[pos]);
        match self.store.update(id, patch) {
            Ok(saved) => {
                self.transactions[pos] = saved.clone();
                Ok(saved)
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "update rejected, rolling back");
                self.transactions[pos] = previous;
                Err(e)
            }
        }
    }

    pub fn remove(&mut self, id: &str) -> Result<Transaction> {
        let pos = self
            .position(id)
            .ok_or_else(|| anyhow!("Transaction '{}' not found", id))?;
        let removed = self.transactions.remove(pos);
        if let Err(e) = self.store.delete(id) {
            tracing::warn!(id, error = %e, "delete rejected, rolling back");
            self.transactions.insert(pos, removed);
            return Err(e);
        }
        Ok(removed)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.transactions.iter().position(|t| t.id == id)
    }
}
