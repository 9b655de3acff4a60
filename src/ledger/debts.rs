// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

use super::{date_col, decimal_col, insert_error, non_negative, positive, required_text};
use crate::errors::LedgerResult;
use crate::models::{DebtRecord, UserId};

pub fn add_debt(
    conn: &Connection,
    owner: UserId,
    creditor: &str,
    amount: Decimal,
    interest_rate: Decimal,
    monthly_payment: Decimal,
    due_date: NaiveDate,
) -> LedgerResult<i64> {
    let creditor = required_text("creditor", creditor)?;
    let amount = positive("amount", amount)?;
    let interest_rate = non_negative("interest rate", interest_rate)?;
    let monthly_payment = non_negative("monthly payment", monthly_payment)?;
    conn.execute(
        "INSERT INTO debts(user_id, creditor, amount, interest_rate, monthly_payment, due_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            owner,
            creditor,
            amount.to_string(),
            interest_rate.to_string(),
            monthly_payment.to_string(),
            due_date.to_string()
        ],
    )
    .map_err(|e| insert_error(owner, e))?;
    let id = conn.last_insert_rowid();
    tracing::debug!(user_id = %owner, id, "debt recorded");
    Ok(id)
}

pub fn list_debts(conn: &Connection, owner: UserId) -> LedgerResult<Vec<DebtRecord>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, user_id, creditor, amount, interest_rate, monthly_payment, due_date
         FROM debts WHERE user_id=?1 ORDER BY due_date, id",
    )?;
    let rows = stmt.query_map(params![owner], |r| {
        Ok(DebtRecord {
            id: r.get(0)?,
            user_id: r.get(1)?,
            creditor: r.get(2)?,
            amount: decimal_col(r, 3)?,
            interest_rate: decimal_col(r, 4)?,
            monthly_payment: decimal_col(r, 5)?,
            due_date: date_col(r, 6)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn remove_debt(conn: &Connection, owner: UserId, id: i64) -> LedgerResult<bool> {
    let n = conn.execute(
        "DELETE FROM debts WHERE id=?1 AND user_id=?2",
        params![id, owner],
    )?;
    Ok(n > 0)
}
