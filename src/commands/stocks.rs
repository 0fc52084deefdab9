// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::gemini::GeminiConfig;
use crate::portfolio::{self, RefreshOutcome};
use crate::quote::{GeminiQuotes, QuoteSource};
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Context, Result, bail};
use chrono::Utc;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        Some(("refresh", sub)) => refresh(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn quote_source() -> Result<GeminiQuotes> {
    GeminiQuotes::new(GeminiConfig::from_env()?)
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = crate::auth::current_user(conn)?;
    let symbol = sub.get_one::<String>("symbol").unwrap().trim().to_uppercase();
    let shares = parse_decimal(sub.get_one::<String>("shares").unwrap().trim())?;
    let avg_cost = parse_decimal(sub.get_one::<String>("avg-cost").unwrap().trim())?;
    if shares < rust_decimal::Decimal::ZERO {
        bail!("Share count must not be negative, got {}", shares);
    }

    // Seed price and display name from the quote source when available; a
    // miss (or no configured API key) falls back to avg cost and the symbol.
    let seeded = match quote_source() {
        Ok(source) => match source.fetch_quote(&symbol) {
            Ok(q) => q,
            Err(e) => {
                eprintln!("Could not fetch a quote for {}: {}", symbol, e);
                None
            }
        },
        Err(_) => None,
    };
    let (price, name) = match seeded {
        Some(q) => (q.price, q.name.unwrap_or_else(|| symbol.clone())),
        None => (avg_cost, symbol.clone()),
    };

    conn.execute(
        "INSERT INTO stocks(user_id, symbol, name, shares, avg_cost, current_price, last_updated)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user.id,
            symbol,
            name,
            shares.to_string(),
            avg_cost.to_string(),
            price.to_string(),
            Utc::now().to_rfc3339()
        ],
    )?;
    println!("Added {} ({}) at price {}", symbol, name, price);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = crate::auth::current_user(conn)?;
    let stocks = crate::db::stocks_for(conn, user.id)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &stocks)? {
        return Ok(());
    }
    let rows = stocks
        .into_iter()
        .map(|s| {
            let v = portfolio::value_position(s.shares, s.avg_cost, s.current_price);
            let sign = if v.profit.is_sign_negative() { "" } else { "+" };
            vec![
                s.symbol,
                s.name,
                format!("{}", s.shares),
                format!("{:.2}", s.avg_cost),
                format!("{:.2}", s.current_price),
                format!("{:.2}", v.market_value),
                format!("{}{:.2} ({:.2}%)", sign, v.profit, v.profit_percent),
                s.last_updated,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Symbol", "Name", "Shares", "Avg Cost", "Price", "Value", "P/L", "Updated"],
            rows,
        )
    );
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = crate::auth::current_user(conn)?;
    let symbol = sub.get_one::<String>("symbol").unwrap().trim().to_uppercase();
    let n = conn.execute(
        "DELETE FROM stocks WHERE user_id=?1 AND symbol=?2",
        params![user.id, symbol],
    )?;
    if n == 0 {
        bail!("No position in {}", symbol);
    }
    println!("Removed {}", symbol);
    Ok(())
}

fn refresh(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = crate::auth::current_user(conn)?;
    let symbol = sub.get_one::<String>("symbol");
    let all = sub.get_flag("all");
    if all == symbol.is_some() {
        bail!("Pass exactly one of --symbol or --all");
    }
    let source = quote_source()?;

    if let Some(symbol) = symbol {
        let symbol = symbol.trim().to_uppercase();
        let stock = crate::db::stocks_for(conn, user.id)?
            .into_iter()
            .find(|s| s.symbol == symbol)
            .with_context(|| format!("No position in {}", symbol))?;
        match portfolio::refresh_price(conn, &source, &stock)? {
            RefreshOutcome::Updated => println!("Updated {}", symbol),
            RefreshOutcome::NoQuote => println!("Could not fetch data for {}", symbol),
        }
        return Ok(());
    }

    let summary = portfolio::refresh_all(conn, &source, user.id)?;
    for sym in &summary.updated {
        println!("Updated {}", sym);
    }
    for (sym, reason) in &summary.failed {
        println!("Could not update {}: {}", sym, reason);
    }
    if summary.updated.is_empty() && summary.failed.is_empty() {
        println!("No positions to refresh");
    }
    Ok(())
}
