//! User accounts and the latest screening result per user.

use chrono::{Local, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::DatabaseError;
use crate::crypto::{self, CryptoError, PBKDF2_ITERATIONS};
use crate::models::{PredictionContext, SeverityCode};

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Username and password cannot be empty")]
    EmptyCredentials,

    #[error("This username is already registered: {0}")]
    UsernameTaken(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Password hash error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl From<rusqlite::Error> for AccountError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Database(DatabaseError::Sqlite(e))
    }
}

/// Signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub username: String,
    pub created_at: String,
}

/// A stored screening result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPrediction {
    pub severity: SeverityCode,
    pub class_name: String,
    pub image_path: Option<String>,
    pub created_at: String,
}

/// Account repository over a borrowed connection.
pub struct AccountStore<'c> {
    conn: &'c Connection,
    iterations: u32,
}

impl<'c> AccountStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self::with_iterations(conn, PBKDF2_ITERATIONS)
    }

    /// Override the PBKDF2 work factor for new hashes. Existing hashes keep
    /// the factor they were created with.
    pub fn with_iterations(conn: &'c Connection, iterations: u32) -> Self {
        Self { conn, iterations }
    }

    /// Register a new user.
    pub fn signup(&self, username: &str, password: &str) -> Result<UserAccount, AccountError> {
        check_credentials(username, password)?;

        if self.exists(username)? {
            return Err(AccountError::UsernameTaken(username.to_string()));
        }

        let created_at = Local::now().naive_local().format("%Y-%m-%d %H:%M:%S").to_string();
        let hash = crypto::hash_password(password, self.iterations);
        self.conn.execute(
            "INSERT INTO users (username, password_hash, created_at) VALUES (?1, ?2, ?3)",
            params![username, hash, created_at],
        )?;

        tracing::info!(username, "account created");
        Ok(UserAccount {
            username: username.to_string(),
            created_at,
        })
    }

    /// Verify credentials and return the account.
    pub fn login(&self, username: &str, password: &str) -> Result<UserAccount, AccountError> {
        check_credentials(username, password)?;

        let row = self
            .conn
            .query_row(
                "SELECT password_hash, created_at FROM users WHERE username = ?1",
                params![username],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        let Some((hash, created_at)) = row else {
            return Err(AccountError::InvalidCredentials);
        };
        if !crypto::verify_password(password, &hash)? {
            tracing::info!(username, "login rejected");
            return Err(AccountError::InvalidCredentials);
        }

        Ok(UserAccount {
            username: username.to_string(),
            created_at,
        })
    }

    fn exists(&self, username: &str) -> Result<bool, AccountError> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM users WHERE username = ?1",
                params![username],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Store a prediction as the user's latest result and append it to history.
    pub fn record_prediction(
        &self,
        ctx: &PredictionContext,
        at: NaiveDateTime,
    ) -> Result<(), AccountError> {
        let at = at.format("%Y-%m-%d %H:%M:%S").to_string();
        let image_path = ctx.image_path().map(|p| p.to_string_lossy().into_owned());

        let tx = self.conn.unchecked_transaction()?;

        let changed = tx.execute(
            "UPDATE users SET latest_severity = ?1, latest_class = ?2, predicted_at = ?3
             WHERE username = ?4",
            params![ctx.severity().value(), ctx.class_name(), at, ctx.patient_id()],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                entity_type: "User".into(),
                id: ctx.patient_id().into(),
            }
            .into());
        }

        tx.execute(
            "INSERT INTO predictions (id, username, severity, class_name, image_path, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                Uuid::new_v4().to_string(),
                ctx.patient_id(),
                ctx.severity().value(),
                ctx.class_name(),
                image_path,
                at,
            ],
        )?;

        tx.commit()?;

        tracing::info!(
            username = ctx.patient_id(),
            severity = ctx.severity().value(),
            "prediction recorded"
        );
        Ok(())
    }

    /// Latest result for a user, if any has been recorded.
    pub fn latest_prediction(&self, username: &str) -> Result<Option<StoredPrediction>, AccountError> {
        let mut history = self.query_predictions(username, Some(1))?;
        Ok(history.pop())
    }

    /// All results for a user, newest first.
    pub fn prediction_history(&self, username: &str) -> Result<Vec<StoredPrediction>, AccountError> {
        self.query_predictions(username, None)
    }

    fn query_predictions(
        &self,
        username: &str,
        limit: Option<i64>,
    ) -> Result<Vec<StoredPrediction>, AccountError> {
        let mut stmt = self.conn.prepare(
            "SELECT severity, class_name, image_path, created_at
             FROM predictions WHERE username = ?1
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![username, limit.unwrap_or(-1)], |row| {
            Ok(StoredPrediction {
                severity: SeverityCode(row.get(0)?),
                class_name: row.get(1)?,
                image_path: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn check_credentials(username: &str, password: &str) -> Result<(), AccountError> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(AccountError::EmptyCredentials);
    }
    Ok(())
}
