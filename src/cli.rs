// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Command, arg, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(arg!(--json "Print as pretty JSON"))
        .arg(arg!(--jsonl "Print as JSON lines"))
}

pub fn build_cli() -> Command {
    Command::new("wealthflow")
        .about("WealthFlow: accounts, transactions, stock portfolio, and AI insight from your terminal")
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("auth")
                .about("Register, log in, and inspect the current session")
                .subcommand(
                    Command::new("register")
                        .about("Create a new user")
                        .arg(arg!(--email <EMAIL>).required(true))
                        .arg(arg!(--password <PASSWORD>).required(true))
                        .arg(arg!(--name <NAME> "Display name").required(true)),
                )
                .subcommand(
                    Command::new("login")
                        .about("Log in and open a session")
                        .arg(arg!(--email <EMAIL>).required(true))
                        .arg(arg!(--password <PASSWORD>).required(true)),
                )
                .subcommand(Command::new("logout").about("Close the session"))
                .subcommand(Command::new("whoami").about("Show the logged-in user")),
        )
        .subcommand(
            Command::new("account")
                .about("Manage bank, cash, and investment accounts")
                .subcommand(
                    Command::new("add")
                        .about("Add an account")
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(arg!(--type <TYPE> "bank|cash|investment").required(true))
                        .arg(arg!(--currency <CCY>).required(true))
                        .arg(arg!(--balance <AMOUNT> "Opening balance").required(true))
                        .arg(arg!(--bank <BANK> "Bank name (bank accounts only)").required(false)),
                )
                .subcommand(json_flags(Command::new("list").about("List accounts")))
                .subcommand(
                    Command::new("rm")
                        .about("Delete an account and its transactions")
                        .arg(arg!(--name <NAME>).required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and browse transactions")
                .subcommand(
                    Command::new("add")
                        .about("Post a transaction and adjust the account balance")
                        .arg(arg!(--date <DATE> "YYYY-MM-DD, defaults to today").required(false))
                        .arg(arg!(--account <ACCOUNT>).required(true))
                        .arg(arg!(--amount <AMOUNT> "Positive amount").required(true))
                        .arg(arg!(--type <TYPE> "income|expense").required(true))
                        .arg(arg!(--category <CATEGORY>).required(true))
                        .arg(arg!(--note <NOTE>).required(false)),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions, newest first")
                        .arg(arg!(--month <MONTH> "Filter by YYYY-MM").required(false))
                        .arg(arg!(--account <ACCOUNT>).required(false))
                        .arg(arg!(--category <CATEGORY>).required(false))
                        .arg(
                            arg!(--limit <N>)
                                .required(false)
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction and revert its balance change")
                        .arg(
                            arg!(--id <ID>)
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        ),
                ),
        )
        .subcommand(
            Command::new("stock")
                .about("Track a stock portfolio")
                .subcommand(
                    Command::new("add")
                        .about("Add a position, seeding price/name from the quote source")
                        .arg(arg!(--symbol <SYMBOL> "e.g. 2330.TW, AAPL").required(true))
                        .arg(arg!(--shares <SHARES>).required(true))
                        .arg(arg!(--"avg-cost" <COST> "Average cost per share").required(true)),
                )
                .subcommand(json_flags(Command::new("list").about("List positions with P/L")))
                .subcommand(
                    Command::new("rm")
                        .about("Remove a position")
                        .arg(arg!(--symbol <SYMBOL>).required(true)),
                )
                .subcommand(
                    Command::new("refresh")
                        .about("Refresh prices from the quote source")
                        .arg(arg!(--symbol <SYMBOL> "Refresh one symbol").required(false))
                        .arg(arg!(--all "Refresh every position")),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Aggregate reports")
                .subcommand(json_flags(
                    Command::new("cashflow")
                        .about("Monthly income vs expense with net savings")
                        .arg(
                            arg!(--months <N> "Show only the last N months")
                                .required(false)
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("spend-by-category")
                        .about("Expense breakdown by category")
                        .arg(arg!(--month <MONTH> "Restrict to YYYY-MM").required(false)),
                ))
                .subcommand(json_flags(
                    Command::new("net-worth").about("Account balances plus portfolio market value"),
                )),
        )
        .subcommand(Command::new("advice").about("AI-generated summary of your financial health"))
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .about("Export transactions")
                        .arg(arg!(--format <FORMAT> "csv|json").required(true))
                        .arg(arg!(--out <FILE>).required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check ledger invariants"))
}
