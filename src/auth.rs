// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Local identity: argon2-hashed credentials in the `users` table and a
//! `current_user` row in `settings` standing in for the interactive session.

use anyhow::{Result, anyhow};
use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

use crate::models::User;

const SESSION_KEY: &str = "current_user";
const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

/// Classified identity errors. Unknown-email and wrong-password deliberately
/// collapse into one message so a caller cannot probe which part was wrong.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("Password should be at least {MIN_PASSWORD_LEN} characters.")]
    WeakPassword,
    #[error("This email is already registered.")]
    EmailTaken,
    #[error("Invalid email or password.")]
    InvalidCredentials,
    #[error("Not logged in. Run 'wealthflow auth login' first")]
    NotLoggedIn,
}

/// Create a user. The caller is not logged in afterwards; follow with `login`.
pub fn register(conn: &Connection, email: &str, password: &str, name: &str) -> Result<i64> {
    let email = email.trim().to_lowercase();
    if !EMAIL_RE.is_match(&email) {
        return Err(AuthError::InvalidEmail(email).into());
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword.into());
    }
    let taken: Option<i64> = conn
        .query_row("SELECT id FROM users WHERE email=?1", params![email], |r| {
            r.get(0)
        })
        .optional()?;
    if taken.is_some() {
        return Err(AuthError::EmailTaken.into());
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Password hashing failed: {}", e))?
        .to_string();

    conn.execute(
        "INSERT INTO users(email, display_name, password_hash) VALUES (?1, ?2, ?3)",
        params![email, name, hash],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Verify credentials and open a session.
pub fn login(conn: &Connection, email: &str, password: &str) -> Result<User> {
    let email = email.trim().to_lowercase();
    let row: Option<(i64, String, String)> = conn
        .query_row(
            "SELECT id, display_name, password_hash FROM users WHERE email=?1",
            params![email],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .optional()?;
    let Some((id, display_name, stored)) = row else {
        return Err(AuthError::InvalidCredentials.into());
    };

    let parsed =
        PasswordHash::new(&stored).map_err(|e| anyhow!("Corrupt password hash: {}", e))?;
    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_err()
    {
        return Err(AuthError::InvalidCredentials.into());
    }

    crate::db::set_setting(conn, SESSION_KEY, &id.to_string())?;
    Ok(User {
        id,
        email,
        display_name,
    })
}

pub fn logout(conn: &Connection) -> Result<()> {
    crate::db::clear_setting(conn, SESSION_KEY)
}

/// The logged-in user, or `AuthError::NotLoggedIn`.
pub fn current_user(conn: &Connection) -> Result<User> {
    let Some(id_s) = crate::db::get_setting(conn, SESSION_KEY)? else {
        return Err(AuthError::NotLoggedIn.into());
    };
    let id: i64 = id_s.parse()?;
    let row: Option<(String, String)> = conn
        .query_row(
            "SELECT email, display_name FROM users WHERE id=?1",
            params![id],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?;
    let Some((email, display_name)) = row else {
        // Stale session pointing at a deleted user
        crate::db::clear_setting(conn, SESSION_KEY)?;
        return Err(AuthError::NotLoggedIn.into());
    };
    Ok(User {
        id,
        email,
        display_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_conn() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&mut conn).unwrap();
        conn
    }

    fn auth_err(e: anyhow::Error) -> AuthError {
        e.downcast::<AuthError>().unwrap()
    }

    #[test]
    fn register_then_login_roundtrip() {
        let conn = setup_conn();
        let id = register(&conn, "Kai@Example.com", "hunter22", "Kai").unwrap();
        let user = login(&conn, "kai@example.com", "hunter22").unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.email, "kai@example.com");
        assert_eq!(user.display_name, "Kai");
        assert_eq!(current_user(&conn).unwrap().id, id);
    }

    #[test]
    fn duplicate_email_rejected() {
        let conn = setup_conn();
        register(&conn, "kai@example.com", "hunter22", "Kai").unwrap();
        let err = register(&conn, "kai@example.com", "other-pass", "K2").unwrap_err();
        assert_eq!(auth_err(err), AuthError::EmailTaken);
    }

    #[test]
    fn weak_password_and_bad_email_rejected() {
        let conn = setup_conn();
        let err = register(&conn, "kai@example.com", "short", "Kai").unwrap_err();
        assert_eq!(auth_err(err), AuthError::WeakPassword);
        let err = register(&conn, "not-an-email", "hunter22", "Kai").unwrap_err();
        assert!(matches!(auth_err(err), AuthError::InvalidEmail(_)));
    }

    #[test]
    fn wrong_password_and_unknown_email_look_identical() {
        let conn = setup_conn();
        register(&conn, "kai@example.com", "hunter22", "Kai").unwrap();
        let wrong_pw = auth_err(login(&conn, "kai@example.com", "nope-nope").unwrap_err());
        let no_user = auth_err(login(&conn, "ghost@example.com", "hunter22").unwrap_err());
        assert_eq!(wrong_pw, AuthError::InvalidCredentials);
        assert_eq!(no_user, AuthError::InvalidCredentials);
        assert_eq!(wrong_pw.to_string(), no_user.to_string());
    }

    #[test]
    fn logout_closes_the_session() {
        let conn = setup_conn();
        register(&conn, "kai@example.com", "hunter22", "Kai").unwrap();
        login(&conn, "kai@example.com", "hunter22").unwrap();
        logout(&conn).unwrap();
        let err = auth_err(current_user(&conn).unwrap_err());
        assert_eq!(err, AuthError::NotLoggedIn);
    }
}
