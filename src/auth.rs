// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Credential store: account creation, password verification and renames.
//!
//! Passwords are stored as Argon2id PHC strings with a per-user random salt.
//! Usernames are trimmed, then compared case-sensitively.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::{LedgerError, LedgerResult, is_constraint_violation};
use crate::models::{Profile, User, UserId};

fn hash_password(password: &str) -> LedgerResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| LedgerError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("stored password hash is malformed: {}", e);
            false
        }
    }
}

/// Verified against on an unknown username so a miss costs the same Argon2
/// work as a wrong password.
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| hash_password("fintrack-unknown-user").ok());

fn clean_username(username: &str) -> LedgerResult<&str> {
    let name = username.trim();
    if name.is_empty() {
        return Err(LedgerError::invalid("username is required"));
    }
    Ok(name)
}

pub fn register(conn: &Connection, username: &str, password: &str) -> LedgerResult<UserId> {
    let name = clean_username(username)?;
    if password.is_empty() {
        return Err(LedgerError::invalid("password is required"));
    }
    let exists: Option<i64> = conn
        .query_row(
            "SELECT id FROM users WHERE username=?1",
            params![name],
            |r| r.get(0),
        )
        .optional()?;
    if exists.is_some() {
        return Err(LedgerError::DuplicateUsername(name.to_string()));
    }

    let hash = hash_password(password)?;
    match conn.execute(
        "INSERT INTO users(username, hash) VALUES (?1, ?2)",
        params![name, hash],
    ) {
        Ok(_) => {}
        // Lost a race against a concurrent registration of the same name.
        Err(e) if is_constraint_violation(&e) => {
            return Err(LedgerError::DuplicateUsername(name.to_string()));
        }
        Err(e) => return Err(e.into()),
    }
    let id = UserId(conn.last_insert_rowid());
    tracing::info!(user_id = %id, "registered user '{}'", name);
    Ok(id)
}

pub fn authenticate(conn: &Connection, username: &str, password: &str) -> LedgerResult<UserId> {
    let row: Option<(UserId, String)> = conn
        .query_row(
            "SELECT id, hash FROM users WHERE username=?1",
            params![username.trim()],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?;
    let verified = match row {
        Some((id, hash)) => verify_password(password, &hash).then_some(id),
        None => {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                verify_password(password, dummy);
            }
            None
        }
    };
    match verified {
        Some(id) => Ok(id),
        None => {
            tracing::info!("rejected credentials for '{}'", username.trim());
            Err(LedgerError::InvalidCredentials)
        }
    }
}

pub fn rename(conn: &Connection, user_id: UserId, new_username: &str) -> LedgerResult<()> {
    let name = clean_username(new_username)?;
    let holder: Option<UserId> = conn
        .query_row(
            "SELECT id FROM users WHERE username=?1",
            params![name],
            |r| r.get(0),
        )
        .optional()?;
    match holder {
        Some(id) if id == user_id => return Ok(()),
        Some(_) => return Err(LedgerError::DuplicateUsername(name.to_string())),
        None => {}
    }
    match conn.execute(
        "UPDATE users SET username=?1 WHERE id=?2",
        params![name, user_id],
    ) {
        Ok(_) => {
            tracing::info!(user_id = %user_id, "renamed user to '{}'", name);
            Ok(())
        }
        Err(e) if is_constraint_violation(&e) => {
            Err(LedgerError::DuplicateUsername(name.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

pub fn get_user(conn: &Connection, user_id: UserId) -> LedgerResult<Option<User>> {
    let user = conn
        .query_row(
            "SELECT id, username FROM users WHERE id=?1",
            params![user_id],
            |r| {
                Ok(User {
                    id: r.get(0)?,
                    username: r.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(user)
}

/// Username plus how many records the user owns in each ledger family.
pub fn profile(conn: &Connection, user_id: UserId) -> LedgerResult<Profile> {
    let user = get_user(conn, user_id)?.ok_or(LedgerError::Unauthenticated)?;
    let count = |table: &str| -> LedgerResult<i64> {
        // Table names come from the fixed list below, never from input.
        let sql = format!("SELECT COUNT(*) FROM {} WHERE user_id=?1", table);
        Ok(conn.query_row(&sql, params![user_id], |r| r.get(0))?)
    };
    Ok(Profile {
        id: user.id,
        username: user.username,
        income_entries: count("income")?,
        expense_entries: count("expenses")?,
        savings_entries: count("savings")?,
        stock_holdings: count("stocks")?,
        watchlist_items: count("watchlist")?,
        debts: count("debts")?,
        transactions: count("transactions")?,
    })
}
