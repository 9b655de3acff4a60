// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Session gate. A login issues a random token persisted in `sessions`;
//! every ledger command resolves the caller through [`Session::require`]
//! before touching owner-scoped data.

use chrono::{DateTime, Duration, Utc};
use rand::distributions::{Alphanumeric, DistString};
use rusqlite::{Connection, OptionalExtension, params};

use crate::auth;
use crate::errors::{LedgerError, LedgerResult};
use crate::models::UserId;

const TOKEN_LEN: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    Anonymous,
    Authenticated(UserId),
}

impl Session {
    pub fn require(&self) -> LedgerResult<UserId> {
        match self {
            Session::Authenticated(id) => Ok(*id),
            Session::Anonymous => Err(LedgerError::Unauthenticated),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }
}

/// Checks credentials and opens a session lasting `ttl`. Returns the token.
pub fn login(
    conn: &Connection,
    username: &str,
    password: &str,
    ttl: Duration,
    now: DateTime<Utc>,
) -> LedgerResult<(String, UserId)> {
    let user_id = auth::authenticate(conn, username, password)?;
    let token = Alphanumeric.sample_string(&mut rand::thread_rng(), TOKEN_LEN);
    conn.execute(
        "INSERT INTO sessions(token, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
        params![token, user_id, now.to_rfc3339(), (now + ttl).to_rfc3339()],
    )?;
    tracing::info!(user_id = %user_id, "session opened");
    Ok((token, user_id))
}

/// Resolves a stored token. Unknown and expired tokens yield `Anonymous`.
pub fn resume(conn: &Connection, token: Option<&str>, now: DateTime<Utc>) -> LedgerResult<Session> {
    let Some(token) = token else {
        return Ok(Session::Anonymous);
    };
    let row: Option<(UserId, String)> = conn
        .query_row(
            "SELECT user_id, expires_at FROM sessions WHERE token=?1",
            params![token],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?;
    let Some((user_id, expires_at)) = row else {
        return Ok(Session::Anonymous);
    };
    let live = DateTime::parse_from_rfc3339(&expires_at)
        .map(|exp| exp.with_timezone(&Utc) > now)
        .unwrap_or(false);
    if !live {
        tracing::warn!(user_id = %user_id, "session expired");
        logout(conn, token)?;
        return Ok(Session::Anonymous);
    }
    Ok(Session::Authenticated(user_id))
}

pub fn logout(conn: &Connection, token: &str) -> LedgerResult<()> {
    let removed = conn.execute("DELETE FROM sessions WHERE token=?1", params![token])?;
    if removed > 0 {
        tracing::info!("session closed");
    }
    Ok(())
}

/// Drops every expired session row; returns how many were removed.
pub fn purge_expired(conn: &Connection, now: DateTime<Utc>) -> LedgerResult<usize> {
    let mut stmt = conn.prepare("SELECT token, expires_at FROM sessions")?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?;
    let mut stale = Vec::new();
    for row in rows {
        let (token, expires_at) = row?;
        let expired = DateTime::parse_from_rfc3339(&expires_at)
            .map(|exp| exp.with_timezone(&Utc) <= now)
            .unwrap_or(true);
        if expired {
            stale.push(token);
        }
    }
    for token in &stale {
        conn.execute("DELETE FROM sessions WHERE token=?1", params![token])?;
    }
    Ok(stale.len())
}
