// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashMap;

use super::required;
use crate::ledger;
use crate::prices::{PriceSource, popular_tickers};
use crate::session::Session;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};

pub fn handle_stock(conn: &Connection, session: &Session, m: &clap::ArgMatches) -> Result<()> {
    let owner = session.require()?;
    match m.subcommand() {
        Some(("add", sub)) => {
            let ticker = required(sub, "ticker")?;
            let quantity = parse_decimal(required(sub, "quantity")?)?;
            let price = parse_decimal(required(sub, "price")?)?;
            ledger::add_stock(conn, owner, ticker, quantity, price)?;
            println!(
                "Recorded {} x {} @ {}",
                quantity,
                ticker.to_uppercase(),
                fmt_money(&price)
            );
        }
        Some(("list", sub)) => {
            let rows = ledger::list_stocks(conn, owner)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
                let data = rows
                    .into_iter()
                    .map(|h| {
                        vec![
                            h.id.to_string(),
                            h.ticker,
                            h.quantity.normalize().to_string(),
                            fmt_money(&h.purchase_price),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Ticker", "Qty", "Purchase Price"], data)
                );
            }
        }
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
struct WatchRow {
    id: i64,
    ticker: String,
    price: Option<String>,
}

pub fn handle_watch(
    conn: &Connection,
    session: &Session,
    m: &clap::ArgMatches,
    prices: &dyn PriceSource,
) -> Result<()> {
    let owner = session.require()?;
    match m.subcommand() {
        Some(("add", sub)) => {
            let ticker = required(sub, "ticker")?;
            let id = ledger::add_watch(conn, owner, ticker)?;
            println!("Watching {} (id {})", ticker.to_uppercase(), id);
        }
        Some(("list", sub)) => {
            let live = sub.get_flag("live");
            let items = ledger::list_watchlist(conn, owner)?;
            let mut cache: HashMap<String, Option<String>> = HashMap::new();
            let rows: Vec<WatchRow> = items
                .into_iter()
                .map(|w| {
                    let price = if live {
                        cache
                            .entry(w.ticker.clone())
                            .or_insert_with(|| prices.current_price(&w.ticker).map(|p| fmt_money(&p)))
                            .clone()
                    } else {
                        None
                    };
                    WatchRow {
                        id: w.id,
                        ticker: w.ticker,
                        price,
                    }
                })
                .collect();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
                let data = rows
                    .into_iter()
                    .map(|r| {
                        let shown = match (&r.price, live) {
                            (Some(p), _) => p.clone(),
                            (None, true) => "n/a".to_string(),
                            (None, false) => "-".to_string(),
                        };
                        vec![r.id.to_string(), r.ticker, shown]
                    })
                    .collect();
                println!("{}", pretty_table(&["Id", "Ticker", "Price"], data));
            }
        }
        Some(("rm", sub)) => {
            let id = *sub
                .get_one::<i64>("id")
                .ok_or_else(|| anyhow::anyhow!("Missing --id"))?;
            if ledger::remove_watch(conn, owner, id)? {
                println!("Removed watchlist item {}", id);
            } else {
                println!("No watchlist item {} to remove", id);
            }
        }
        _ => {}
    }
    Ok(())
}

pub fn handle_market(m: &clap::ArgMatches, prices: &dyn PriceSource) -> Result<()> {
    match m.subcommand() {
        Some(("popular", _)) => {
            let data = popular_tickers(prices)
                .into_iter()
                .map(|(sym, name)| vec![sym, name])
                .collect();
            println!("{}", pretty_table(&["Ticker", "Name"], data));
        }
        Some(("price", sub)) => {
            let ticker = ledger::normalize_ticker(required(sub, "ticker")?)?;
            match prices.current_price(&ticker) {
                Some(px) => println!("{} {}", ticker, fmt_money(&px)),
                None => println!("{} price unavailable", ticker),
            }
        }
        _ => {}
    }
    Ok(())
}
