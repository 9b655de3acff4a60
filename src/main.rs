// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use fintrack::config::Config;
use fintrack::prices::{FixedPrices, PriceSource, YahooPrices};
use fintrack::{cli, commands, db, session};

fn init_tracing() {
    let filter = EnvFilter::try_from_env("FINTRACK_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cfg = Config::from_env()?;
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut conn = db::open_or_init(&cfg.db_path)?;
    session::purge_expired(&conn, chrono::Utc::now())?;
    let current = commands::accounts::current_session(&conn)?;

    let prices: Box<dyn PriceSource> = if cfg.offline {
        Box::new(FixedPrices::new())
    } else {
        Box::new(YahooPrices::new(cfg.price_timeout)?)
    };

    match matches.subcommand() {
        Some(("init", sub)) => {
            if sub.get_flag("demo") && db::seed_demo(&conn)? {
                println!(
                    "Seeded demo account '{}' / '{}'",
                    db::DEMO_USERNAME,
                    db::DEMO_PASSWORD
                );
            }
            println!("Database initialized at {}", cfg.db_path.display());
        }
        Some(("register", sub)) => commands::accounts::register(&conn, sub)?,
        Some(("login", sub)) => commands::accounts::login(&conn, sub, cfg.session_ttl)?,
        Some(("logout", _)) => commands::accounts::logout(&conn)?,
        Some(("whoami", sub)) => commands::accounts::whoami(&conn, &current, sub)?,
        Some(("rename", sub)) => commands::accounts::rename(&conn, &current, sub)?,
        Some(("income", sub)) => commands::cashflow::handle_income(&conn, &current, sub)?,
        Some(("expense", sub)) => commands::cashflow::handle_expense(&conn, &current, sub)?,
        Some(("savings", sub)) => commands::cashflow::handle_savings(&conn, &current, sub)?,
        Some(("stock", sub)) => commands::portfolio::handle_stock(&conn, &current, sub)?,
        Some(("watch", sub)) => {
            commands::portfolio::handle_watch(&conn, &current, sub, prices.as_ref())?
        }
        Some(("debt", sub)) => commands::debts::handle(&conn, &current, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&conn, &current, sub)?,
        Some(("dashboard", sub)) => {
            commands::dashboard::handle(&mut conn, &current, sub, prices.as_ref())?
        }
        Some(("market", sub)) => commands::portfolio::handle_market(sub, prices.as_ref())?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
