// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::advisor;
use crate::gemini::{GeminiClient, GeminiConfig};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection) -> Result<()> {
    let user = crate::auth::current_user(conn)?;
    let client = GeminiClient::new(GeminiConfig::from_env()?)?;
    let advice = advisor::financial_advice(&client, conn, user.id)?;
    println!("{}", advice);
    Ok(())
}
