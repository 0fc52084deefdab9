// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use tempfile::tempdir;
use wealthflow::db;

#[test]
fn schema_init_is_idempotent_on_a_file_backed_db() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wealthflow.sqlite");

    let mut conn = Connection::open(&path).unwrap();
    db::init_schema(&mut conn).unwrap();
    db::init_schema(&mut conn).unwrap();

    let tables: Vec<String> = {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap();
        let rows = stmt.query_map([], |r| r.get::<_, String>(0)).unwrap();
        rows.map(|r| r.unwrap())
            .filter(|n| !n.starts_with("sqlite_"))
            .collect()
    };
    for expected in ["accounts", "settings", "stocks", "transactions", "users"] {
        assert!(tables.contains(&expected.to_string()), "missing {}", expected);
    }
}

#[test]
fn settings_roundtrip_and_clear() {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();

    assert_eq!(db::get_setting(&conn, "current_user").unwrap(), None);
    db::set_setting(&conn, "current_user", "7").unwrap();
    assert_eq!(
        db::get_setting(&conn, "current_user").unwrap(),
        Some("7".to_string())
    );
    db::set_setting(&conn, "current_user", "8").unwrap();
    assert_eq!(
        db::get_setting(&conn, "current_user").unwrap(),
        Some("8".to_string())
    );
    db::clear_setting(&conn, "current_user").unwrap();
    assert_eq!(db::get_setting(&conn, "current_user").unwrap(), None);
}
