// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::report;
use crate::utils::{maybe_print_json, parse_month, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("cashflow", sub)) => cashflow(conn, sub)?,
        Some(("spend-by-category", sub)) => spend_by_category(conn, sub)?,
        Some(("net-worth", sub)) => net_worth(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn cashflow(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = crate::auth::current_user(conn)?;
    let txs = crate::db::transactions_for(conn, user.id)?;
    let mut flows = report::monthly_cashflow(&txs);
    if let Some(&months) = sub.get_one::<usize>("months") {
        let skip = flows.len().saturating_sub(months);
        flows.drain(..skip);
    }
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &flows)? {
        return Ok(());
    }
    let rows = flows
        .iter()
        .map(|f| {
            vec![
                f.month.clone(),
                format!("{:.2}", f.income),
                format!("{:.2}", f.expense),
                format!("{:.2}", f.net_savings()),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expense", "Net"], rows)
    );
    Ok(())
}

fn spend_by_category(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = crate::auth::current_user(conn)?;
    let mut txs = crate::db::transactions_for(conn, user.id)?;
    if let Some(month) = sub.get_one::<String>("month") {
        let month = parse_month(month)?;
        txs.retain(|t| t.date.format("%Y-%m").to_string() == month);
    }
    let breakdown = report::expense_by_category(&txs);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &breakdown)? {
        return Ok(());
    }
    let rows = breakdown
        .into_iter()
        .map(|(cat, amt)| vec![cat, format!("{:.2}", amt)])
        .collect();
    println!("{}", pretty_table(&["Category", "Spent"], rows));
    Ok(())
}

fn net_worth(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = crate::auth::current_user(conn)?;
    let accounts = crate::db::accounts_for(conn, user.id)?;
    let stocks = crate::db::stocks_for(conn, user.id)?;

    let cash: rust_decimal::Decimal = accounts.iter().map(|a| a.balance).sum();
    let holdings: rust_decimal::Decimal =
        stocks.iter().map(|s| s.shares * s.current_price).sum();
    let total = report::net_worth(&accounts, &stocks);

    if maybe_print_json(
        sub.get_flag("json"),
        sub.get_flag("jsonl"),
        &serde_json::json!({
            "cash": cash.to_string(),
            "holdings": holdings.to_string(),
            "net_worth": total.to_string(),
        }),
    )? {
        return Ok(());
    }
    let rows = vec![
        vec!["Cash balance".to_string(), format!("{:.2}", cash)],
        vec!["Stock value".to_string(), format!("{:.2}", holdings)],
        vec!["Net worth".to_string(), format!("{:.2}", total)],
    ];
    println!("{}", pretty_table(&["", "Amount"], rows));
    Ok(())
}
