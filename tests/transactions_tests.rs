// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use wealthflow::commands::transactions;
use wealthflow::{cli, db};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO users(id, email, display_name, password_hash) VALUES (1, 'a@b.co', 'A', 'x')",
        [],
    )
    .unwrap();
    db::set_setting(&conn, "current_user", "1").unwrap();
    conn.execute(
        "INSERT INTO accounts(id, user_id, name, type, balance, opening_balance, currency)
         VALUES (1, 1, 'Checking', 'bank', '1000', '1000', 'USD')",
        [],
    )
    .unwrap();
    conn
}

fn balance(conn: &Connection) -> String {
    conn.query_row("SELECT balance FROM accounts WHERE id=1", [], |r| r.get(0))
        .unwrap()
}

#[test]
fn add_posts_and_rm_reverts_the_balance() {
    let mut conn = setup();

    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "wealthflow",
        "tx",
        "add",
        "--date",
        "2025-01-05",
        "--account",
        "Checking",
        "--amount",
        "250",
        "--type",
        "expense",
        "--category",
        "Food & Dining",
        "--note",
        "Lunch",
    ]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    transactions::handle(&mut conn, tx_m).unwrap();
    assert_eq!(balance(&conn), "750");

    let matches = cli::build_cli().get_matches_from(["wealthflow", "tx", "rm", "--id", "1"]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    transactions::handle(&mut conn, tx_m).unwrap();
    assert_eq!(balance(&conn), "1000");
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    for i in 1..=3 {
        conn.execute(
            "INSERT INTO transactions(user_id, account_id, date, amount, type, category)
             VALUES (1, 1, ?1, '10', 'expense', 'Other')",
            rusqlite::params![format!("2025-01-0{}", i)],
        )
        .unwrap();
    }

    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["wealthflow", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&conn, 1, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date, "2025-01-03");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_is_scoped_to_the_owner() {
    let conn = setup();
    conn.execute(
        "INSERT INTO users(id, email, display_name, password_hash) VALUES (2, 'b@b.co', 'B', 'x')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO accounts(id, user_id, name, type, balance, opening_balance, currency)
         VALUES (2, 2, 'Other Checking', 'bank', '0', '0', 'USD')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO transactions(user_id, account_id, date, amount, type, category)
         VALUES (2, 2, '2025-01-01', '10', 'expense', 'Other')",
        [],
    )
    .unwrap();

    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["wealthflow", "tx", "list"]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    assert!(transactions::query_rows(&conn, 1, list_m).unwrap().is_empty());
    assert_eq!(transactions::query_rows(&conn, 2, list_m).unwrap().len(), 1);
}
