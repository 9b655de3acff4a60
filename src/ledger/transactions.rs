// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

use super::{check_range, date_col, decimal_col, insert_error, positive, push_range, required_text};
use crate::errors::LedgerResult;
use crate::models::{DateRange, TransactionRecord, UserId};

pub fn add_transaction(
    conn: &Connection,
    owner: UserId,
    kind: &str,
    amount: Decimal,
    description: Option<&str>,
    date: NaiveDate,
) -> LedgerResult<i64> {
    let kind = required_text("type", kind)?;
    let amount = positive("amount", amount)?;
    let description = description.map(str::trim).filter(|d| !d.is_empty());
    conn.execute(
        "INSERT INTO transactions(user_id, type, amount, description, date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![owner, kind, amount.to_string(), description, date.to_string()],
    )
    .map_err(|e| insert_error(owner, e))?;
    let id = conn.last_insert_rowid();
    tracing::debug!(user_id = %owner, id, "transaction recorded");
    Ok(id)
}

/// Newest first; ties on date fall back to the most recently inserted row.
pub fn list_transactions(
    conn: &Connection,
    owner: UserId,
    range: &DateRange,
    limit: Option<usize>,
) -> LedgerResult<Vec<TransactionRecord>> {
    check_range(range)?;
    let mut sql = String::from(
        "SELECT id, user_id, type, amount, description, date FROM transactions WHERE user_id=?1",
    );
    let mut args = vec![Value::Integer(owner.0)];
    push_range(&mut sql, &mut args, "date", range);
    sql.push_str(" ORDER BY date DESC, id DESC");
    if let Some(limit) = limit {
        args.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
        sql.push_str(&format!(" LIMIT ?{}", args.len()));
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(args.iter()), |r| {
        Ok(TransactionRecord {
            id: r.get(0)?,
            user_id: r.get(1)?,
            r#type: r.get(2)?,
            amount: decimal_col(r, 3)?,
            description: r.get(4)?,
            date: date_col(r, 5)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}
