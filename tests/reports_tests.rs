// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;
use wealthflow::{db, report};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO users(id, email, display_name, password_hash) VALUES (1, 'a@b.co', 'A', 'x')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO accounts(id, user_id, name, type, balance, opening_balance, currency)
         VALUES (1, 1, 'Checking', 'bank', '1000', '1000', 'USD'),
                (2, 1, 'Wallet', 'cash', '500', '500', 'USD')",
        [],
    )
    .unwrap();
    for (date, amount, typ, cat) in [
        ("2024-01-15", "1000", "income", "Salary"),
        ("2024-01-20", "200", "expense", "Food & Dining"),
        ("2024-02-01", "50", "expense", "Shopping"),
    ] {
        conn.execute(
            "INSERT INTO transactions(user_id, account_id, date, amount, type, category)
             VALUES (1, 1, ?1, ?2, ?3, ?4)",
            rusqlite::params![date, amount, typ, cat],
        )
        .unwrap();
    }
    conn.execute(
        "INSERT INTO stocks(user_id, symbol, name, shares, avg_cost, current_price, last_updated)
         VALUES (1, 'XYZ', 'XYZ Corp', '10', '15', '20', '2024-01-01T00:00:00Z')",
        [],
    )
    .unwrap();
    conn
}

#[test]
fn cashflow_over_stored_rows_matches_expected_months() {
    let conn = setup();
    let txs = db::transactions_for(&conn, 1).unwrap();
    let flows = report::monthly_cashflow(&txs);

    assert_eq!(flows.len(), 2);
    assert_eq!(flows[0].month, "2024-01");
    assert_eq!(flows[0].income, Decimal::from_str("1000").unwrap());
    assert_eq!(flows[0].expense, Decimal::from_str("200").unwrap());
    assert_eq!(flows[1].month, "2024-02");
    assert_eq!(flows[1].income, Decimal::ZERO);
    assert_eq!(flows[1].expense, Decimal::from_str("50").unwrap());
}

#[test]
fn net_worth_over_stored_rows() {
    let conn = setup();
    let accounts = db::accounts_for(&conn, 1).unwrap();
    let stocks = db::stocks_for(&conn, 1).unwrap();
    assert_eq!(
        report::net_worth(&accounts, &stocks),
        Decimal::from_str("1700").unwrap()
    );
}
