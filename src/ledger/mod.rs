// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Owner-scoped ledger storage. Every read and delete filters on `user_id`;
//! amounts travel as decimal text and dates as `YYYY-MM-DD`.

mod cashflow;
mod debts;
mod holdings;
mod transactions;

pub use cashflow::{
    add_expense, add_income, add_savings, list_expenses, list_income, list_savings,
};
pub use debts::{add_debt, list_debts, remove_debt};
pub use holdings::{add_stock, add_watch, list_stocks, list_watchlist, normalize_ticker, remove_watch};
pub use transactions::{add_transaction, list_transactions};

use chrono::NaiveDate;
use rusqlite::types::{Type, Value};
use rust_decimal::Decimal;

use crate::errors::{LedgerError, LedgerResult, is_constraint_violation};
use crate::models::{DateRange, UserId};

pub(crate) fn required_text<'a>(field: &str, value: &'a str) -> LedgerResult<&'a str> {
    let v = value.trim();
    if v.is_empty() {
        return Err(LedgerError::invalid(format!("{} is required", field)));
    }
    Ok(v)
}

pub(crate) fn positive(field: &str, value: Decimal) -> LedgerResult<Decimal> {
    if value <= Decimal::ZERO {
        return Err(LedgerError::invalid(format!(
            "{} must be greater than zero, got {}",
            field, value
        )));
    }
    Ok(value)
}

pub(crate) fn non_negative(field: &str, value: Decimal) -> LedgerResult<Decimal> {
    if value < Decimal::ZERO {
        return Err(LedgerError::invalid(format!(
            "{} must not be negative, got {}",
            field, value
        )));
    }
    Ok(value)
}

/// Maps an insert failure; a foreign-key miss means the owner does not exist.
pub(crate) fn insert_error(owner: UserId, err: rusqlite::Error) -> LedgerError {
    if is_constraint_violation(&err) {
        LedgerError::invalid(format!("user {} does not exist", owner))
    } else {
        LedgerError::Database(err)
    }
}

pub(crate) fn decimal_col(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    Decimal::from_str_exact(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn date_col(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Appends inclusive bounds on `column` for a dated family.
pub(crate) fn push_range(
    sql: &mut String,
    params: &mut Vec<Value>,
    column: &str,
    range: &DateRange,
) {
    if let Some(start) = range.start {
        params.push(Value::Text(start.to_string()));
        sql.push_str(&format!(" AND {}>=?{}", column, params.len()));
    }
    if let Some(end) = range.end {
        params.push(Value::Text(end.to_string()));
        sql.push_str(&format!(" AND {}<=?{}", column, params.len()));
    }
}

pub(crate) fn check_range(range: &DateRange) -> LedgerResult<()> {
    if let (Some(s), Some(e)) = (range.start, range.end) {
        if s > e {
            return Err(LedgerError::invalid(format!(
                "start date {} is after end date {}",
                s, e
            )));
        }
    }
    Ok(())
}
