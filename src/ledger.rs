// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Ledger consistency rule: an account's stored balance always equals its
//! opening balance plus the signed sum of all posted, undeleted transactions.
//! Posting and the matching balance adjustment commit in one SQLite
//! transaction, so a partial failure leaves neither write behind.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

use crate::models::TxType;

/// Amounts are recorded positive; the transaction type carries the sign.
pub fn validate_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        bail!("Amount must be positive, got {}", amount);
    }
    Ok(())
}

/// The balance delta a posted transaction applies to its account.
///
/// Transfer is a declared type with no dual-account handling yet, so posting
/// one is rejected rather than treated as a single-leg expense.
pub fn signed_amount(kind: TxType, amount: Decimal) -> Result<Decimal> {
    match kind {
        TxType::Income => Ok(amount),
        TxType::Expense => Ok(-amount),
        TxType::Transfer => {
            bail!("Transfer is not supported yet; record the two legs as income and expense")
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewTransaction<'a> {
    pub user_id: i64,
    pub account_id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub kind: TxType,
    pub category: &'a str,
    pub note: Option<&'a str>,
}

fn account_balance(conn: &Connection, user_id: i64, account_id: i64) -> Result<Decimal> {
    let s: String = conn
        .query_row(
            "SELECT balance FROM accounts WHERE id=?1 AND user_id=?2",
            params![account_id, user_id],
            |r| r.get(0),
        )
        .with_context(|| format!("Account {} not found", account_id))?;
    Decimal::from_str_exact(&s).with_context(|| format!("Invalid stored balance '{}'", s))
}

fn write_balance(conn: &Connection, user_id: i64, account_id: i64, balance: Decimal) -> Result<()> {
    conn.execute(
        "UPDATE accounts SET balance=?1 WHERE id=?2 AND user_id=?3",
        params![balance.to_string(), account_id, user_id],
    )?;
    Ok(())
}

/// Insert the transaction row and apply its balance adjustment atomically.
/// Returns the new transaction id.
pub fn post_transaction(conn: &mut Connection, new: &NewTransaction) -> Result<i64> {
    validate_amount(new.amount)?;
    let delta = signed_amount(new.kind, new.amount)?;

    let tx = conn.transaction()?;
    let balance = account_balance(&tx, new.user_id, new.account_id)?;
    tx.execute(
        "INSERT INTO transactions(user_id, account_id, date, amount, type, category, note)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            new.user_id,
            new.account_id,
            new.date.to_string(),
            new.amount.to_string(),
            new.kind.as_str(),
            new.category,
            new.note
        ],
    )?;
    let id = tx.last_insert_rowid();
    write_balance(&tx, new.user_id, new.account_id, balance + delta)?;
    tx.commit()?;
    Ok(id)
}

/// Delete a transaction and apply the exact inverse balance adjustment,
/// atomically. Edits are delete + recreate; there is no update-in-place.
pub fn delete_transaction(conn: &mut Connection, user_id: i64, tx_id: i64) -> Result<()> {
    let tx = conn.transaction()?;

    let (account_id, amount_s, type_s): (i64, String, String) = tx
        .query_row(
            "SELECT account_id, amount, type FROM transactions WHERE id=?1 AND user_id=?2",
            params![tx_id, user_id],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .with_context(|| format!("Transaction {} not found", tx_id))?;
    let amount = Decimal::from_str_exact(&amount_s)
        .with_context(|| format!("Invalid stored amount '{}'", amount_s))?;
    let delta = signed_amount(type_s.parse()?, amount)?;

    tx.execute(
        "DELETE FROM transactions WHERE id=?1 AND user_id=?2",
        params![tx_id, user_id],
    )?;
    let balance = account_balance(&tx, user_id, account_id)?;
    write_balance(&tx, user_id, account_id, balance - delta)?;
    tx.commit()?;
    Ok(())
}

/// Recompute `opening_balance + Σ signed(tx)` for every account of a user and
/// report those whose stored balance has drifted.
pub fn balance_drift(conn: &Connection, user_id: i64) -> Result<Vec<(String, Decimal, Decimal)>> {
    let accounts = crate::db::accounts_for(conn, user_id)?;
    let txs = crate::db::transactions_for(conn, user_id)?;

    let mut drifted = Vec::new();
    for acc in accounts {
        let mut expected = acc.opening_balance;
        for t in txs.iter().filter(|t| t.account_id == acc.id) {
            expected += signed_amount(t.r#type, t.amount)?;
        }
        if expected != acc.balance {
            drifted.push((acc.name, acc.balance, expected));
        }
    }
    Ok(drifted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;
    use std::str::FromStr;

    fn setup_conn() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&mut conn).unwrap();
        conn.execute(
            "INSERT INTO users(id, email, display_name, password_hash) VALUES (1, 'a@b.co', 'A', 'x')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO accounts(id, user_id, name, type, balance, opening_balance, currency)
             VALUES (1, 1, 'Checking', 'bank', '1000', '1000', 'USD')",
            [],
        )
        .unwrap();
        conn
    }

    fn balance(conn: &Connection) -> Decimal {
        account_balance(conn, 1, 1).unwrap()
    }

    fn new_tx(amount: &str, kind: TxType) -> NewTransaction<'static> {
        NewTransaction {
            user_id: 1,
            account_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            amount: Decimal::from_str(amount).unwrap(),
            kind,
            category: "Salary",
            note: None,
        }
    }

    #[test]
    fn income_raises_and_expense_lowers_balance() {
        let mut conn = setup_conn();
        post_transaction(&mut conn, &new_tx("250", TxType::Income)).unwrap();
        assert_eq!(balance(&conn), Decimal::from_str("1250").unwrap());
        post_transaction(&mut conn, &new_tx("50.25", TxType::Expense)).unwrap();
        assert_eq!(balance(&conn), Decimal::from_str("1199.75").unwrap());
    }

    #[test]
    fn delete_restores_exact_prior_balance() {
        let mut conn = setup_conn();
        let id = post_transaction(&mut conn, &new_tx("123.45", TxType::Expense)).unwrap();
        delete_transaction(&mut conn, 1, id).unwrap();
        assert_eq!(balance(&conn), Decimal::from_str("1000").unwrap());
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn non_positive_amounts_rejected_before_any_write() {
        let mut conn = setup_conn();
        for bad in ["0", "-10"] {
            let err =
                post_transaction(&mut conn, &new_tx(bad, TxType::Income)).unwrap_err();
            assert!(err.to_string().contains("must be positive"));
        }
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
        assert_eq!(balance(&conn), Decimal::from_str("1000").unwrap());
    }

    #[test]
    fn transfer_posting_is_rejected() {
        let mut conn = setup_conn();
        let err = post_transaction(&mut conn, &new_tx("10", TxType::Transfer)).unwrap_err();
        assert!(err.to_string().contains("Transfer is not supported"));
    }

    #[test]
    fn posting_to_unknown_account_writes_nothing() {
        let mut conn = setup_conn();
        let mut tx = new_tx("10", TxType::Income);
        tx.account_id = 99;
        assert!(post_transaction(&mut conn, &tx).is_err());
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn mixed_post_and_delete_sequence_stays_consistent() {
        let mut conn = setup_conn();
        let a = post_transaction(&mut conn, &new_tx("25", TxType::Income)).unwrap();
        post_transaction(&mut conn, &new_tx("0.01", TxType::Expense)).unwrap();
        let c = post_transaction(&mut conn, &new_tx("5", TxType::Expense)).unwrap();
        delete_transaction(&mut conn, 1, a).unwrap();
        delete_transaction(&mut conn, 1, c).unwrap();

        assert_eq!(balance(&conn), Decimal::from_str("999.99").unwrap());
        assert!(balance_drift(&conn, 1).unwrap().is_empty());
    }

    #[test]
    fn balance_drift_flags_tampered_accounts() {
        let mut conn = setup_conn();
        post_transaction(&mut conn, &new_tx("100", TxType::Income)).unwrap();
        assert!(balance_drift(&conn, 1).unwrap().is_empty());

        conn.execute("UPDATE accounts SET balance='999' WHERE id=1", [])
            .unwrap();
        let drift = balance_drift(&conn, 1).unwrap();
        assert_eq!(drift.len(), 1);
        assert_eq!(drift[0].0, "Checking");
        assert_eq!(drift[0].2, Decimal::from_str("1100").unwrap());
    }
}
