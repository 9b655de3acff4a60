// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use super::date_range;
use crate::dashboard::{self, DashboardView};
use crate::prices::PriceSource;
use crate::session::Session;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

pub fn handle(
    conn: &mut Connection,
    session: &Session,
    sub: &clap::ArgMatches,
    prices: &dyn PriceSource,
) -> Result<()> {
    let owner = session.require()?;
    let view = dashboard::build(conn, owner, &date_range(sub)?, prices)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view)? {
        print_view(&view);
    }
    Ok(())
}

fn print_view(view: &DashboardView) {
    let summary = vec![
        vec!["Total income".to_string(), fmt_money(&view.total_income)],
        vec!["Total expenses".to_string(), fmt_money(&view.total_expense)],
        vec!["Deficit".to_string(), fmt_money(&view.deficit)],
        vec!["Savings".to_string(), fmt_money(&view.total_savings)],
        vec!["Stock value".to_string(), fmt_money(&view.total_stock_value)],
        vec!["Net worth".to_string(), fmt_money(&view.net_worth)],
    ];
    println!("{}", pretty_table(&["Summary", "Amount"], summary));

    if !view.expense_by_category.is_empty() {
        let rows = view
            .expense_by_category
            .iter()
            .map(|(cat, total)| vec![cat.clone(), fmt_money(total)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent"], rows));
    }

    if !view.holdings.is_empty() {
        let rows = view
            .holdings
            .iter()
            .map(|h| {
                vec![
                    h.ticker.clone(),
                    h.quantity.normalize().to_string(),
                    fmt_money(&h.purchase_price),
                    h.current_price
                        .map(|p| fmt_money(&p))
                        .unwrap_or_else(|| "n/a".to_string()),
                    fmt_money(&h.current_value),
                    fmt_money(&h.profit),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Ticker", "Qty", "Bought At", "Price", "Value", "Profit"],
                rows
            )
        );
    }
}
