// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::{Duration, Utc};
use rusqlite::Connection;

use super::{SESSION_TOKEN_KEY, required};
use crate::session::{self, Session};
use crate::utils::{clear_setting, get_setting, maybe_print_json, pretty_table, set_setting};
use crate::auth;

pub fn register(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let username = required(sub, "username")?;
    let password = sub
        .get_one::<String>("password")
        .map(String::as_str)
        .unwrap_or_default();
    let id = auth::register(conn, username, password)?;
    println!("Registered '{}' (id {}). Please log in.", username, id);
    Ok(())
}

/// Replaces any active session with a fresh one for the given credentials.
pub fn login(conn: &Connection, sub: &clap::ArgMatches, ttl: Duration) -> Result<()> {
    end_current_session(conn)?;
    let username = required(sub, "username")?;
    let password = sub
        .get_one::<String>("password")
        .map(String::as_str)
        .unwrap_or_default();
    let (token, _) = session::login(conn, username, password, ttl, Utc::now())?;
    set_setting(conn, SESSION_TOKEN_KEY, &token)?;
    println!("Logged in as '{}'", username);
    Ok(())
}

pub fn logout(conn: &Connection) -> Result<()> {
    end_current_session(conn)?;
    println!("Logged out");
    Ok(())
}

fn end_current_session(conn: &Connection) -> Result<()> {
    if let Some(token) = get_setting(conn, SESSION_TOKEN_KEY)? {
        session::logout(conn, &token)?;
        clear_setting(conn, SESSION_TOKEN_KEY)?;
    }
    Ok(())
}

/// Session for the token stored by the last `login`, if still live.
pub fn current_session(conn: &Connection) -> Result<Session> {
    let token = get_setting(conn, SESSION_TOKEN_KEY)?;
    let s = session::resume(conn, token.as_deref(), Utc::now())?;
    if token.is_some() && !s.is_authenticated() {
        clear_setting(conn, SESSION_TOKEN_KEY)?;
    }
    Ok(s)
}

pub fn whoami(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let owner = session.require()?;
    let p = auth::profile(conn, owner)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &p)? {
        let rows = vec![
            vec!["Username".to_string(), p.username.clone()],
            vec!["User id".to_string(), p.id.to_string()],
            vec!["Income entries".to_string(), p.income_entries.to_string()],
            vec!["Expense entries".to_string(), p.expense_entries.to_string()],
            vec!["Savings entries".to_string(), p.savings_entries.to_string()],
            vec!["Stock holdings".to_string(), p.stock_holdings.to_string()],
            vec!["Watchlist".to_string(), p.watchlist_items.to_string()],
            vec!["Debts".to_string(), p.debts.to_string()],
            vec!["Transactions".to_string(), p.transactions.to_string()],
        ];
        println!("{}", pretty_table(&["Field", "Value"], rows));
    }
    Ok(())
}

pub fn rename(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let owner = session.require()?;
    let username = required(sub, "username")?;
    auth::rename(conn, owner, username)?;
    println!("Username changed to '{}'", username);
    Ok(())
}
