// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use fintrack::{auth, db, ledger};
use rust_decimal::Decimal;
use tempfile::TempDir;

#[test]
fn schema_creation_is_idempotent_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("fintrack.sqlite");

    let conn = db::open_or_init(&path).unwrap();
    let owner = auth::register(&conn, "xena", "pw").unwrap();
    ledger::add_income(
        &conn,
        owner,
        "Salary",
        Decimal::new(1000, 0),
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    )
    .unwrap();
    drop(conn);

    let mut conn = db::open_or_init(&path).unwrap();
    db::init_schema(&mut conn).unwrap();
    let p = auth::profile(&conn, owner).unwrap();
    assert_eq!(p.username, "xena");
    assert_eq!(p.income_entries, 1);
}

#[test]
fn demo_seed_runs_once() {
    let dir = TempDir::new().unwrap();
    let conn = db::open_or_init(&dir.path().join("demo.sqlite")).unwrap();
    assert!(db::seed_demo(&conn).unwrap());
    assert!(!db::seed_demo(&conn).unwrap());
    auth::authenticate(&conn, db::DEMO_USERNAME, db::DEMO_PASSWORD).unwrap();
}

#[test]
fn demo_seed_skips_populated_databases() {
    let dir = TempDir::new().unwrap();
    let conn = db::open_or_init(&dir.path().join("users.sqlite")).unwrap();
    auth::register(&conn, "yuri", "pw").unwrap();
    assert!(!db::seed_demo(&conn).unwrap());
    assert!(auth::authenticate(&conn, db::DEMO_USERNAME, db::DEMO_PASSWORD).is_err());
}
