// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Position valuation and price refresh. Valuation is pure arithmetic over a
//! position; refreshes go through a [`QuoteSource`] and never touch a row
//! unless a quote actually came back.

use anyhow::Result;
use chrono::Utc;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

use crate::models::Stock;
use crate::quote::QuoteSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Valuation {
    pub market_value: Decimal,
    pub cost_basis: Decimal,
    pub profit: Decimal,
    pub profit_percent: Decimal,
}

pub fn value_position(shares: Decimal, avg_cost: Decimal, current_price: Decimal) -> Valuation {
    let market_value = shares * current_price;
    let cost_basis = shares * avg_cost;
    let profit = market_value - cost_basis;
    let profit_percent = if cost_basis.is_zero() {
        Decimal::ZERO
    } else {
        profit / cost_basis * Decimal::ONE_HUNDRED
    };
    Valuation {
        market_value,
        cost_basis,
        profit,
        profit_percent,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Updated,
    NoQuote,
}

/// Ask the quote source for a fresh price. On a quote, replace price,
/// timestamp, and display name (when the source knows a different one); on a
/// lookup miss leave the row untouched and say so.
pub fn refresh_price(
    conn: &Connection,
    source: &dyn QuoteSource,
    stock: &Stock,
) -> Result<RefreshOutcome> {
    let Some(quote) = source.fetch_quote(&stock.symbol)? else {
        return Ok(RefreshOutcome::NoQuote);
    };

    let name = match quote.name {
        Some(n) if n != stock.name => n,
        _ => stock.name.clone(),
    };
    conn.execute(
        "UPDATE stocks SET current_price=?1, last_updated=?2, name=?3 WHERE id=?4 AND user_id=?5",
        params![
            quote.price.to_string(),
            Utc::now().to_rfc3339(),
            name,
            stock.id,
            stock.user_id
        ],
    )?;
    Ok(RefreshOutcome::Updated)
}

#[derive(Debug, Default)]
pub struct RefreshSummary {
    pub updated: Vec<String>,
    /// Symbol and the reason its refresh did not happen.
    pub failed: Vec<(String, String)>,
}

/// Refresh every position for a user, one at a time. A failed lookup is
/// recorded and the batch moves on; it never aborts the remaining symbols.
pub fn refresh_all(
    conn: &Connection,
    source: &dyn QuoteSource,
    user_id: i64,
) -> Result<RefreshSummary> {
    let mut summary = RefreshSummary::default();
    for stock in crate::db::stocks_for(conn, user_id)? {
        match refresh_price(conn, source, &stock) {
            Ok(RefreshOutcome::Updated) => summary.updated.push(stock.symbol),
            Ok(RefreshOutcome::NoQuote) => summary
                .failed
                .push((stock.symbol, "no quote returned".to_string())),
            Err(e) => summary.failed.push((stock.symbol, e.to_string())),
        }
    }
    Ok(summary)
}
