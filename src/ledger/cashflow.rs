// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

use super::{
    check_range, date_col, decimal_col, insert_error, non_negative, positive, push_range,
    required_text,
};
use crate::errors::LedgerResult;
use crate::models::{DateRange, ExpenseRecord, IncomeRecord, SavingsRecord, UserId};

pub fn add_income(
    conn: &Connection,
    owner: UserId,
    source: &str,
    amount: Decimal,
    date: NaiveDate,
) -> LedgerResult<i64> {
    let source = required_text("source", source)?;
    let amount = positive("amount", amount)?;
    conn.execute(
        "INSERT INTO income(user_id, source, amount, date) VALUES (?1, ?2, ?3, ?4)",
        params![owner, source, amount.to_string(), date.to_string()],
    )
    .map_err(|e| insert_error(owner, e))?;
    let id = conn.last_insert_rowid();
    tracing::debug!(user_id = %owner, id, "income recorded");
    Ok(id)
}

pub fn list_income(
    conn: &Connection,
    owner: UserId,
    range: &DateRange,
) -> LedgerResult<Vec<IncomeRecord>> {
    check_range(range)?;
    let mut sql = String::from("SELECT id, user_id, source, amount, date FROM income WHERE user_id=?1");
    let mut args = vec![Value::Integer(owner.0)];
    push_range(&mut sql, &mut args, "date", range);
    sql.push_str(" ORDER BY date, id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(args.iter()), |r| {
        Ok(IncomeRecord {
            id: r.get(0)?,
            user_id: r.get(1)?,
            source: r.get(2)?,
            amount: decimal_col(r, 3)?,
            date: date_col(r, 4)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn add_expense(
    conn: &Connection,
    owner: UserId,
    category: &str,
    amount: Decimal,
    date: NaiveDate,
) -> LedgerResult<i64> {
    let category = required_text("category", category)?;
    let amount = positive("amount", amount)?;
    conn.execute(
        "INSERT INTO expenses(user_id, category, amount, date) VALUES (?1, ?2, ?3, ?4)",
        params![owner, category, amount.to_string(), date.to_string()],
    )
    .map_err(|e| insert_error(owner, e))?;
    let id = conn.last_insert_rowid();
    tracing::debug!(user_id = %owner, id, "expense recorded");
    Ok(id)
}

pub fn list_expenses(
    conn: &Connection,
    owner: UserId,
    range: &DateRange,
) -> LedgerResult<Vec<ExpenseRecord>> {
    check_range(range)?;
    let mut sql =
        String::from("SELECT id, user_id, category, amount, date FROM expenses WHERE user_id=?1");
    let mut args = vec![Value::Integer(owner.0)];
    push_range(&mut sql, &mut args, "date", range);
    sql.push_str(" ORDER BY date, id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(args.iter()), |r| {
        Ok(ExpenseRecord {
            id: r.get(0)?,
            user_id: r.get(1)?,
            category: r.get(2)?,
            amount: decimal_col(r, 3)?,
            date: date_col(r, 4)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn add_savings(
    conn: &Connection,
    owner: UserId,
    kind: &str,
    amount: Decimal,
) -> LedgerResult<i64> {
    let kind = required_text("type", kind)?;
    let amount = non_negative("amount", amount)?;
    conn.execute(
        "INSERT INTO savings(user_id, type, amount) VALUES (?1, ?2, ?3)",
        params![owner, kind, amount.to_string()],
    )
    .map_err(|e| insert_error(owner, e))?;
    let id = conn.last_insert_rowid();
    tracing::debug!(user_id = %owner, id, "savings recorded");
    Ok(id)
}

pub fn list_savings(conn: &Connection, owner: UserId) -> LedgerResult<Vec<SavingsRecord>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, user_id, type, amount FROM savings WHERE user_id=?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![owner], |r| {
        Ok(SavingsRecord {
            id: r.get(0)?,
            user_id: r.get(1)?,
            r#type: r.get(2)?,
            amount: decimal_col(r, 3)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}
