// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

/// Checks that every account balance still equals opening balance plus the
/// signed sum of its transactions. Drift means a write was lost or the row
/// was edited outside the ledger.
pub fn handle(conn: &Connection) -> Result<()> {
    let user = crate::auth::current_user(conn)?;
    let drifted = crate::ledger::balance_drift(conn, user.id)?;

    if drifted.is_empty() {
        println!("doctor: no issues found");
        return Ok(());
    }
    let rows = drifted
        .into_iter()
        .map(|(name, stored, expected)| {
            vec![name, format!("{}", stored), format!("{}", expected)]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Account", "Stored", "Expected"], rows)
    );
    Ok(())
}
