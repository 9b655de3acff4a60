// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use super::{date_range, required};
use crate::ledger;
use crate::session::Session;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle_income(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    let owner = session.require()?;
    match m.subcommand() {
        Some(("add", sub)) => {
            let source = required(sub, "source")?;
            let amount = parse_decimal(required(sub, "amount")?)?;
            let date = parse_date(required(sub, "date")?)?;
            ledger::add_income(conn, owner, source, amount, date)?;
            println!("Recorded income {} from '{}' on {}", fmt_money(&amount), source, date);
        }
        Some(("list", sub)) => {
            let rows = ledger::list_income(conn, owner, &date_range(sub)?)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
                let data = rows
                    .into_iter()
                    .map(|r| vec![r.id.to_string(), r.date.to_string(), r.source, fmt_money(&r.amount)])
                    .collect();
                println!("{}", pretty_table(&["Id", "Date", "Source", "Amount"], data));
            }
        }
        _ => {}
    }
    Ok(())
}

pub fn handle_expense(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    let owner = session.require()?;
    match m.subcommand() {
        Some(("add", sub)) => {
            let category = required(sub, "category")?;
            let amount = parse_decimal(required(sub, "amount")?)?;
            let date = parse_date(required(sub, "date")?)?;
            ledger::add_expense(conn, owner, category, amount, date)?;
            println!("Recorded expense {} in '{}' on {}", fmt_money(&amount), category, date);
        }
        Some(("list", sub)) => {
            let rows = ledger::list_expenses(conn, owner, &date_range(sub)?)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
                let data = rows
                    .into_iter()
                    .map(|r| {
                        vec![r.id.to_string(), r.date.to_string(), r.category, fmt_money(&r.amount)]
                    })
                    .collect();
                println!("{}", pretty_table(&["Id", "Date", "Category", "Amount"], data));
            }
        }
        _ => {}
    }
    Ok(())
}

pub fn handle_savings(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    let owner = session.require()?;
    match m.subcommand() {
        Some(("add", sub)) => {
            let kind = required(sub, "type")?;
            let amount = parse_decimal(required(sub, "amount")?)?;
            ledger::add_savings(conn, owner, kind, amount)?;
            println!("Recorded savings {} ({})", fmt_money(&amount), kind);
        }
        Some(("list", sub)) => {
            let rows = ledger::list_savings(conn, owner)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
                let data = rows
                    .into_iter()
                    .map(|r| vec![r.id.to_string(), r.r#type, fmt_money(&r.amount)])
                    .collect();
                println!("{}", pretty_table(&["Id", "Type", "Amount"], data));
            }
        }
        _ => {}
    }
    Ok(())
}
