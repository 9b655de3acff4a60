// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use super::{date_range, optional, required};
use crate::ledger;
use crate::models::TransactionRecord;
use crate::session::Session;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, session, sub)?,
        Some(("list", sub)) => list(conn, session, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let owner = session.require()?;
    let kind = required(sub, "type")?;
    let amount = parse_decimal(required(sub, "amount")?)?;
    let date = parse_date(required(sub, "date")?)?;
    let description = optional(sub, "description");
    ledger::add_transaction(conn, owner, kind, amount, description, date)?;
    println!("Recorded {} {} on {}", kind, fmt_money(&amount), date);
    Ok(())
}

fn list(conn: &Connection, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, session, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .into_iter()
            .map(|t| {
                vec![
                    t.date.to_string(),
                    t.r#type,
                    fmt_money(&t.amount),
                    t.description.unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Type", "Amount", "Description"], rows)
        );
    }
    Ok(())
}

pub fn query_rows(
    conn: &Connection,
    session: &Session,
    sub: &clap::ArgMatches,
) -> Result<Vec<TransactionRecord>> {
    let owner = session.require()?;
    let range = date_range(sub)?;
    let limit = sub.get_one::<usize>("limit").copied();
    Ok(ledger::list_transactions(conn, owner, &range, limit)?)
}
