// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::auth;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("register", sub)) => {
            let email = sub.get_one::<String>("email").unwrap();
            let password = sub.get_one::<String>("password").unwrap();
            let name = sub.get_one::<String>("name").unwrap();
            auth::register(conn, email, password, name)?;
            let user = auth::login(conn, email, password)?;
            println!("Registered and logged in as {} <{}>", user.display_name, user.email);
        }
        Some(("login", sub)) => {
            let email = sub.get_one::<String>("email").unwrap();
            let password = sub.get_one::<String>("password").unwrap();
            let user = auth::login(conn, email, password)?;
            println!("Logged in as {} <{}>", user.display_name, user.email);
        }
        Some(("logout", _)) => {
            auth::logout(conn)?;
            println!("Logged out");
        }
        Some(("whoami", _)) => {
            let user = auth::current_user(conn)?;
            println!("{} <{}>", user.display_name, user.email);
        }
        _ => {}
    }
    Ok(())
}
