// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use fintrack::dashboard;
use fintrack::errors::LedgerError;
use fintrack::models::{DateRange, UserId};
use fintrack::prices::FixedPrices;
use fintrack::{auth, db, ledger};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;

fn setup() -> (Connection, UserId) {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    let owner = auth::register(&conn, "vera", "pw").unwrap();
    (conn, owner)
}

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn day(y: i32, m: u32, dd: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, dd).unwrap()
}

#[test]
fn empty_ledger_yields_zeros() {
    let (mut conn, owner) = setup();
    let view = dashboard::build(&mut conn, owner, &DateRange::all(), &FixedPrices::new()).unwrap();
    assert_eq!(view.deficit, Decimal::ZERO);
    assert_eq!(view.total_savings, Decimal::ZERO);
    assert_eq!(view.net_worth, Decimal::ZERO);
    assert_eq!(view.total_stock_value, Decimal::ZERO);
    assert!(view.expense_by_category.is_empty());
    assert!(view.holdings.is_empty());
}

#[test]
fn holding_value_and_profit_use_current_price() {
    let (mut conn, owner) = setup();
    ledger::add_stock(&conn, owner, "AAPL", d("10"), d("100.00")).unwrap();
    let prices = FixedPrices::new().with_price("AAPL", d("150.00"));

    let view = dashboard::build(&mut conn, owner, &DateRange::all(), &prices).unwrap();
    let h = &view.holdings[0];
    assert_eq!(h.current_price, Some(d("150.00")));
    assert_eq!(h.current_value, d("1500.00"));
    assert_eq!(h.profit, d("500.00"));
    assert_eq!(view.total_stock_value, d("1500.00"));
    assert_eq!(view.net_worth, d("1500.00"));
}

#[test]
fn unavailable_price_contributes_zero() {
    let (mut conn, owner) = setup();
    ledger::add_stock(&conn, owner, "AAPL", d("10"), d("100")).unwrap();
    ledger::add_stock(&conn, owner, "DELISTED", d("5"), d("20")).unwrap();
    ledger::add_savings(&conn, owner, "Emergency", d("250.50")).unwrap();
    let prices = FixedPrices::new().with_price("AAPL", d("150"));

    let view = dashboard::build(&mut conn, owner, &DateRange::all(), &prices).unwrap();
    let gone = view.holdings.iter().find(|h| h.ticker == "DELISTED").unwrap();
    assert_eq!(gone.current_price, None);
    assert_eq!(gone.current_value, Decimal::ZERO);
    assert_eq!(gone.profit, d("-100.00"));
    assert_eq!(view.total_stock_value, d("1500"));
    assert_eq!(view.net_worth, d("1750.50"));
}

#[test]
fn each_ticker_is_priced_once_per_call() {
    let (mut conn, owner) = setup();
    ledger::add_stock(&conn, owner, "MSFT", d("1"), d("300")).unwrap();
    ledger::add_stock(&conn, owner, "msft", d("2"), d("310")).unwrap();
    ledger::add_stock(&conn, owner, "NFLX", d("3"), d("400")).unwrap();
    let prices = FixedPrices::new()
        .with_price("MSFT", d("320"))
        .with_price("NFLX", d("390"));

    let view = dashboard::build(&mut conn, owner, &DateRange::all(), &prices).unwrap();
    assert_eq!(prices.lookups(), 2);
    assert_eq!(view.total_stock_value, d("2130"));
    let profits: Decimal = view.holdings.iter().map(|h| h.profit).sum();
    assert_eq!(profits, d("10"));
}

#[test]
fn deficit_and_categories_are_grouped_and_rounded() {
    let (mut conn, owner) = setup();
    ledger::add_income(&conn, owner, "Salary", d("2500.005"), day(2024, 1, 1)).unwrap();
    ledger::add_income(&conn, owner, "Freelance", d("499.995"), day(2024, 1, 9)).unwrap();
    ledger::add_expense(&conn, owner, "Rent", d("1200"), day(2024, 1, 2)).unwrap();
    ledger::add_expense(&conn, owner, "Food", d("45.10"), day(2024, 1, 3)).unwrap();
    ledger::add_expense(&conn, owner, "Food", d("54.904"), day(2024, 1, 4)).unwrap();

    let view = dashboard::build(&mut conn, owner, &DateRange::all(), &FixedPrices::new()).unwrap();
    assert_eq!(view.total_income, d("3000.00"));
    assert_eq!(view.total_expense, d("1300.00"));
    assert_eq!(view.deficit, d("1700.00"));
    assert_eq!(view.expense_by_category.len(), 2);
    assert_eq!(view.expense_by_category["Food"], d("100.00"));
    assert_eq!(view.expense_by_category["Rent"], d("1200"));
    assert!(!view.expense_by_category.contains_key("Travel"));
}

#[test]
fn deficit_is_rounded_once_from_raw_totals() {
    let (mut conn, owner) = setup();
    ledger::add_income(&conn, owner, "Interest", d("0.004"), day(2024, 1, 1)).unwrap();
    ledger::add_expense(&conn, owner, "Fees", d("0.006"), day(2024, 1, 2)).unwrap();

    let view = dashboard::build(&mut conn, owner, &DateRange::all(), &FixedPrices::new()).unwrap();
    assert_eq!(view.total_income, d("0.00"));
    assert_eq!(view.total_expense, d("0.01"));
    assert_eq!(view.deficit, d("0.00"));
}

#[test]
fn oversized_holding_is_invalid_input_not_a_panic() {
    let (mut conn, owner) = setup();
    let huge = d("1000000000000000");
    ledger::add_stock(&conn, owner, "AAPL", huge, huge).unwrap();
    let prices = FixedPrices::new().with_price("AAPL", huge);

    let err = dashboard::build(&mut conn, owner, &DateRange::all(), &prices).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidInput(_)));
}

#[test]
fn overflowing_income_total_is_invalid_input() {
    let (mut conn, owner) = setup();
    ledger::add_income(&conn, owner, "Windfall", Decimal::MAX, day(2024, 1, 1)).unwrap();
    ledger::add_income(&conn, owner, "Windfall", Decimal::MAX, day(2024, 1, 2)).unwrap();

    let err = dashboard::build(&mut conn, owner, &DateRange::all(), &FixedPrices::new()).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidInput(_)));
}

#[test]
fn period_filters_cashflow_but_not_balances() {
    let (mut conn, owner) = setup();
    ledger::add_income(&conn, owner, "Salary", d("1000"), day(2024, 1, 15)).unwrap();
    ledger::add_income(&conn, owner, "Salary", d("1000"), day(2024, 2, 15)).unwrap();
    ledger::add_expense(&conn, owner, "Travel", d("300"), day(2024, 2, 20)).unwrap();
    ledger::add_savings(&conn, owner, "Brokerage cash", d("50")).unwrap();

    let jan = DateRange::new(Some(day(2024, 1, 1)), Some(day(2024, 1, 31)));
    let view = dashboard::build(&mut conn, owner, &jan, &FixedPrices::new()).unwrap();
    assert_eq!(view.deficit, d("1000"));
    assert!(view.expense_by_category.is_empty());
    assert_eq!(view.total_savings, d("50"));
    assert_eq!(view.net_worth, d("50"));
}

#[test]
fn other_users_rows_never_leak_into_the_view() {
    let (mut conn, owner) = setup();
    let other = auth::register(&conn, "walt", "pw").unwrap();
    ledger::add_savings(&conn, other, "Cash", d("999")).unwrap();
    ledger::add_stock(&conn, other, "TSLA", d("1"), d("1")).unwrap();
    ledger::add_expense(&conn, other, "Fun", d("5"), day(2024, 1, 1)).unwrap();

    let prices = FixedPrices::new().with_price("TSLA", d("200"));
    let view = dashboard::build(&mut conn, owner, &DateRange::all(), &prices).unwrap();
    assert_eq!(view.net_worth, Decimal::ZERO);
    assert!(view.expense_by_category.is_empty());
    assert_eq!(prices.lookups(), 0);
}

#[test]
fn view_serializes_unavailable_price_as_null() {
    let (mut conn, owner) = setup();
    ledger::add_stock(&conn, owner, "XYZ", d("1"), d("1")).unwrap();
    let view = dashboard::build(&mut conn, owner, &DateRange::all(), &FixedPrices::new()).unwrap();
    let json = serde_json::to_value(&view).unwrap();
    assert!(json["holdings"][0]["current_price"].is_null());
    assert_eq!(json["owner"], serde_json::json!(owner.0));
}
