// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use fintrack::models::{DateRange, UserId};
use fintrack::session::Session;
use fintrack::{auth, cli, commands::transactions, db, ledger};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> (Connection, UserId) {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    let owner = auth::register(&conn, "tess", "pw").unwrap();
    let other = auth::register(&conn, "uma", "pw").unwrap();
    for (date, amt) in [
        ("2023-12-31", 1),
        ("2024-01-01", 2),
        ("2024-01-15", 3),
        ("2024-01-15", 4),
        ("2024-01-31", 5),
        ("2024-02-01", 6),
    ] {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        ledger::add_transaction(&conn, owner, "deposit", Decimal::from(amt), Some("pay"), date)
            .unwrap();
    }
    ledger::add_transaction(
        &conn,
        other,
        "withdrawal",
        Decimal::from(99),
        None,
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
    )
    .unwrap();
    (conn, owner)
}

#[test]
fn january_range_is_inclusive_and_newest_first() {
    let (conn, owner) = setup();
    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2024, 1, 1),
        NaiveDate::from_ymd_opt(2024, 1, 31),
    );
    let rows = ledger::list_transactions(&conn, owner, &range, None).unwrap();
    let dates: Vec<String> = rows.iter().map(|t| t.date.to_string()).collect();
    assert_eq!(
        dates,
        ["2024-01-31", "2024-01-15", "2024-01-15", "2024-01-01"]
    );
    // Same-day rows: latest insert first.
    assert_eq!(rows[1].amount, Decimal::from(4));
    assert_eq!(rows[2].amount, Decimal::from(3));
    assert!(rows.iter().all(|t| t.user_id == owner));
}

#[test]
fn list_via_cli_respects_range_and_limit() {
    let (conn, owner) = setup();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "fintrack", "tx", "list", "--from", " 2024-01-01 ", "--limit", "2",
    ]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows =
                transactions::query_rows(&conn, &Session::Authenticated(owner), list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date.to_string(), "2024-02-01");
            assert_eq!(rows[1].date.to_string(), "2024-01-31");
            assert_eq!(rows[0].description.as_deref(), Some("pay"));
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn unbounded_listing_returns_all_own_rows() {
    let (conn, owner) = setup();
    let rows = ledger::list_transactions(&conn, owner, &DateRange::all(), None).unwrap();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows.last().unwrap().date.to_string(), "2023-12-31");
}
