// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn opt(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

fn req(name: &'static str, help: &'static str) -> Arg {
    opt(name, help).required(true)
}

fn output_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Pretty JSON output"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("One JSON object per line"),
    )
}

fn range_args(cmd: Command) -> Command {
    cmd.arg(opt("from", "Inclusive start date YYYY-MM-DD"))
        .arg(opt("to", "Inclusive end date YYYY-MM-DD"))
}

pub fn build_cli() -> Command {
    Command::new("fintrack")
        .about("Personal finance ledger: income, expenses, savings, debts and stocks")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(
            Command::new("init").about("Create the database").arg(
                Arg::new("demo")
                    .long("demo")
                    .action(ArgAction::SetTrue)
                    .help("Seed a demo/password account when no user exists"),
            ),
        )
        .subcommand(
            Command::new("register")
                .about("Create a user account")
                .arg(req("username", "Login name"))
                .arg(req("password", "Password")),
        )
        .subcommand(
            Command::new("login")
                .about("Start a session")
                .arg(req("username", "Login name"))
                .arg(req("password", "Password")),
        )
        .subcommand(Command::new("logout").about("End the current session"))
        .subcommand(output_flags(
            Command::new("whoami").about("Show the logged-in profile"),
        ))
        .subcommand(
            Command::new("rename")
                .about("Change the logged-in username")
                .arg(req("username", "New login name")),
        )
        .subcommand(
            Command::new("income")
                .about("Income entries")
                .subcommand(
                    Command::new("add")
                        .arg(req("source", "Where the money came from"))
                        .arg(req("amount", "Positive amount"))
                        .arg(req("date", "YYYY-MM-DD")),
                )
                .subcommand(output_flags(range_args(Command::new("list")))),
        )
        .subcommand(
            Command::new("expense")
                .about("Expense entries")
                .subcommand(
                    Command::new("add")
                        .arg(req("category", "Spending category"))
                        .arg(req("amount", "Positive amount"))
                        .arg(req("date", "YYYY-MM-DD")),
                )
                .subcommand(output_flags(range_args(Command::new("list")))),
        )
        .subcommand(
            Command::new("savings")
                .about("Savings balances")
                .subcommand(
                    Command::new("add")
                        .arg(req("type", "Kind of savings, e.g. emergency fund"))
                        .arg(req("amount", "Non-negative amount")),
                )
                .subcommand(output_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("stock")
                .about("Stock holdings")
                .subcommand(
                    Command::new("add")
                        .arg(req("ticker", "Symbol, e.g. AAPL"))
                        .arg(req("quantity", "Positive share count"))
                        .arg(req("price", "Purchase price per share")),
                )
                .subcommand(output_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("watch")
                .about("Watchlist")
                .subcommand(Command::new("add").arg(req("ticker", "Symbol to watch")))
                .subcommand(output_flags(
                    Command::new("list").arg(
                        Arg::new("live")
                            .long("live")
                            .action(ArgAction::SetTrue)
                            .help("Fetch current prices"),
                    ),
                ))
                .subcommand(
                    Command::new("rm").arg(
                        req("id", "Watchlist item id").value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("debt")
                .about("Debts")
                .subcommand(
                    Command::new("add")
                        .arg(req("creditor", "Who is owed"))
                        .arg(req("amount", "Outstanding principal"))
                        .arg(req("rate", "Annual interest rate in percent"))
                        .arg(req("payment", "Monthly payment"))
                        .arg(req("due", "Due date YYYY-MM-DD")),
                )
                .subcommand(output_flags(Command::new("list")))
                .subcommand(
                    Command::new("rm")
                        .arg(req("id", "Debt id").value_parser(value_parser!(i64))),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Transaction log")
                .subcommand(
                    Command::new("add")
                        .arg(req("type", "Kind, e.g. deposit or withdrawal"))
                        .arg(req("amount", "Positive amount"))
                        .arg(req("date", "YYYY-MM-DD"))
                        .arg(opt("description", "Free-form note")),
                )
                .subcommand(output_flags(range_args(
                    Command::new("list")
                        .arg(opt("limit", "Max rows").value_parser(value_parser!(usize))),
                ))),
        )
        .subcommand(output_flags(range_args(
            Command::new("dashboard").about("Net worth, deficit and holdings summary"),
        )))
        .subcommand(
            Command::new("market")
                .about("Market data")
                .subcommand(Command::new("popular").about("Curated tickers"))
                .subcommand(Command::new("price").arg(req("ticker", "Symbol"))),
        )
}
