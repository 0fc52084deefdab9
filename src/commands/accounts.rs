// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::AccountType;
use crate::utils::{fmt_money, id_for_account, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = crate::auth::current_user(conn)?;
    let name = sub.get_one::<String>("name").unwrap().trim();
    let typ: AccountType = sub.get_one::<String>("type").unwrap().parse()?;
    let ccy = sub.get_one::<String>("currency").unwrap().to_uppercase();
    let balance = parse_decimal(sub.get_one::<String>("balance").unwrap())?;
    let bank = sub.get_one::<String>("bank").map(|s| s.trim().to_string());

    conn.execute(
        "INSERT INTO accounts(user_id, name, type, balance, opening_balance, currency, bank_name)
         VALUES (?1, ?2, ?3, ?4, ?4, ?5, ?6)",
        params![user.id, name, typ.as_str(), balance.to_string(), ccy, bank],
    )?;
    println!("Added account '{}' ({}, {} {})", name, typ, ccy, balance);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = crate::auth::current_user(conn)?;
    let accounts = crate::db::accounts_for(conn, user.id)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &accounts)? {
        return Ok(());
    }
    let rows = accounts
        .into_iter()
        .map(|a| {
            vec![
                a.name,
                a.r#type.to_string(),
                a.bank_name.unwrap_or_default(),
                fmt_money(&a.balance, &a.currency),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Name", "Type", "Bank", "Balance"], rows)
    );
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = crate::auth::current_user(conn)?;
    let name = sub.get_one::<String>("name").unwrap();
    let id = id_for_account(conn, user.id, name)?;
    conn.execute(
        "DELETE FROM accounts WHERE id=?1 AND user_id=?2",
        params![id, user.id],
    )?;
    println!("Removed account '{}'", name);
    Ok(())
}
