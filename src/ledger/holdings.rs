// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, params};
use rust_decimal::Decimal;

use super::{decimal_col, insert_error, non_negative, positive, required_text};
use crate::errors::{LedgerError, LedgerResult};
use crate::models::{StockHolding, UserId, WatchlistItem};

/// Upper-cases a ticker and restricts it to the characters exchange symbols
/// use (`BRK.B`, `^GSPC`, `EURUSD=X`, `BF-B`). The result ends up in a URL
/// path when quoting, so anything else is rejected.
pub fn normalize_ticker(ticker: &str) -> LedgerResult<String> {
    let symbol = required_text("ticker", ticker)?.to_uppercase();
    let allowed =
        |c: char| c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, '.' | '^' | '=' | '-');
    if !symbol.chars().all(allowed) {
        return Err(LedgerError::invalid(format!("invalid ticker '{}'", symbol)));
    }
    Ok(symbol)
}

pub fn add_stock(
    conn: &Connection,
    owner: UserId,
    ticker: &str,
    quantity: Decimal,
    purchase_price: Decimal,
) -> LedgerResult<i64> {
    let ticker = normalize_ticker(ticker)?;
    let quantity = positive("quantity", quantity)?;
    let purchase_price = non_negative("purchase price", purchase_price)?;
    conn.execute(
        "INSERT INTO stocks(user_id, ticker, quantity, purchase_price) VALUES (?1, ?2, ?3, ?4)",
        params![owner, ticker, quantity.to_string(), purchase_price.to_string()],
    )
    .map_err(|e| insert_error(owner, e))?;
    let id = conn.last_insert_rowid();
    tracing::debug!(user_id = %owner, id, "holding recorded: {} x {}", quantity, ticker);
    Ok(id)
}

pub fn list_stocks(conn: &Connection, owner: UserId) -> LedgerResult<Vec<StockHolding>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, user_id, ticker, quantity, purchase_price
         FROM stocks WHERE user_id=?1 ORDER BY ticker, id",
    )?;
    let rows = stmt.query_map(params![owner], |r| {
        Ok(StockHolding {
            id: r.get(0)?,
            user_id: r.get(1)?,
            ticker: r.get(2)?,
            quantity: decimal_col(r, 3)?,
            purchase_price: decimal_col(r, 4)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn add_watch(conn: &Connection, owner: UserId, ticker: &str) -> LedgerResult<i64> {
    let ticker = normalize_ticker(ticker)?;
    conn.execute(
        "INSERT INTO watchlist(user_id, ticker) VALUES (?1, ?2)",
        params![owner, ticker],
    )
    .map_err(|e| insert_error(owner, e))?;
    let id = conn.last_insert_rowid();
    tracing::debug!(user_id = %owner, id, "watching {}", ticker);
    Ok(id)
}

pub fn list_watchlist(conn: &Connection, owner: UserId) -> LedgerResult<Vec<WatchlistItem>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, user_id, ticker FROM watchlist WHERE user_id=?1 ORDER BY ticker, id",
    )?;
    let rows = stmt.query_map(params![owner], |r| {
        Ok(WatchlistItem {
            id: r.get(0)?,
            user_id: r.get(1)?,
            ticker: r.get(2)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Deletes only when both owner and id match. `Ok(false)` when nothing was removed.
pub fn remove_watch(conn: &Connection, owner: UserId, id: i64) -> LedgerResult<bool> {
    let n = conn.execute(
        "DELETE FROM watchlist WHERE id=?1 AND user_id=?2",
        params![id, owner],
    )?;
    Ok(n > 0)
}
