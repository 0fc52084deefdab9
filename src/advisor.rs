// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! AI financial summary: assembles a snapshot of the user's finances into a
//! prompt and returns the model's text verbatim.

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::gemini::GeminiClient;
use crate::models::TxType;

pub fn build_prompt(total_balance: Decimal, expense_summary: &str, portfolio_summary: &str) -> String {
    format!(
        "You are a wise financial advisor.\n\
         My Total Bank Balance: {}\n\
         My Recent Top Expenses: {}\n\
         My Stock Portfolio: {}\n\n\
         Give me a concise, 3-sentence summary of my financial health and 1 specific actionable tip.\n\
         Tone: Professional but encouraging.",
        total_balance.round_dp(2),
        expense_summary,
        portfolio_summary
    )
}

/// Snapshot the user's accounts, latest expenses, and positions, then ask the
/// model for a short health check.
pub fn financial_advice(client: &GeminiClient, conn: &Connection, user_id: i64) -> Result<String> {
    let accounts = crate::db::accounts_for(conn, user_id)?;
    let total_balance: Decimal = accounts.iter().map(|a| a.balance).sum();

    // transactions_for returns newest first
    let expense_summary = crate::db::transactions_for(conn, user_id)?
        .iter()
        .filter(|t| t.r#type == TxType::Expense)
        .take(5)
        .map(|t| format!("{}: ${}", t.category, t.amount))
        .collect::<Vec<_>>()
        .join(", ");

    let portfolio_summary = crate::db::stocks_for(conn, user_id)?
        .iter()
        .map(|s| format!("{} ({} shares)", s.symbol, s.shares))
        .collect::<Vec<_>>()
        .join(", ");

    client.generate(&build_prompt(
        total_balance,
        if expense_summary.is_empty() {
            "none"
        } else {
            &expense_summary
        },
        if portfolio_summary.is_empty() {
            "none"
        } else {
            &portfolio_summary
        },
    ))
}
