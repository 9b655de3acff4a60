// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use rusqlite::Connection;

use super::required;
use crate::ledger;
use crate::session::Session;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    let owner = session.require()?;
    match m.subcommand() {
        Some(("add", sub)) => {
            let creditor = required(sub, "creditor")?;
            let amount = parse_decimal(required(sub, "amount")?)?;
            let rate = parse_decimal(required(sub, "rate")?)?;
            let payment = parse_decimal(required(sub, "payment")?)?;
            let due = parse_date(required(sub, "due")?)?;
            let id = ledger::add_debt(conn, owner, creditor, amount, rate, payment, due)?;
            println!(
                "Recorded debt {} to '{}' due {} (id {})",
                fmt_money(&amount),
                creditor,
                due,
                id
            );
        }
        Some(("list", sub)) => {
            let rows = ledger::list_debts(conn, owner)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
                let data = rows
                    .into_iter()
                    .map(|d| {
                        vec![
                            d.id.to_string(),
                            d.creditor,
                            fmt_money(&d.amount),
                            format!("{}%", d.interest_rate.normalize()),
                            fmt_money(&d.monthly_payment),
                            d.due_date.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &["Id", "Creditor", "Amount", "Rate", "Monthly", "Due"],
                        data
                    )
                );
            }
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").ok_or_else(|| anyhow!("Missing --id"))?;
            if ledger::remove_debt(conn, owner, id)? {
                println!("Removed debt {}", id);
            } else {
                println!("No debt {} to remove", id);
            }
        }
        _ => {}
    }
    Ok(())
}
