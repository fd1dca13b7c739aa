//! User Storage
//! Mission: Persist user accounts and look them up by email or id

use crate::auth::models::User;
use crate::db::{is_unique_violation, Database};
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use tracing::info;
use uuid::Uuid;

/// Outcome of an insert into the credential store.
#[derive(Debug)]
pub enum CreateUserError {
    DuplicateEmail,
    Storage(anyhow::Error),
}

impl From<anyhow::Error> for CreateUserError {
    fn from(err: anyhow::Error) -> Self {
        CreateUserError::Storage(err)
    }
}

/// User storage with SQLite backend
#[derive(Clone)]
pub struct UserStore {
    db: Database,
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let id: String = row.get(0)?;
    let id = Uuid::parse_str(&id).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(User {
        id,
        email: row.get(1)?,
        name: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: row.get(4)?,
    })
}

impl UserStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Exact, case-sensitive email match.
    pub fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.db
            .conn()
            .query_row(
                "SELECT id, email, name, password_hash, created_at
                 FROM users WHERE email = ?1",
                params![email],
                user_from_row,
            )
            .optional()
            .context("Failed to look up user by email")
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        self.db
            .conn()
            .query_row(
                "SELECT id, email, name, password_hash, created_at
                 FROM users WHERE id = ?1",
                params![id],
                user_from_row,
            )
            .optional()
            .context("Failed to look up user by id")
    }

    /// Insert a user whose password is already hashed.
    pub fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: String,
    ) -> Result<User, CreateUserError> {
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            password_hash,
            created_at: Utc::now().to_rfc3339(),
        };

        let inserted = self.db.conn().execute(
            "INSERT INTO users (id, email, name, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.id.to_string(),
                user.email,
                user.name,
                user.password_hash,
                user.created_at,
            ],
        );

        match inserted {
            Ok(_) => {
                info!("Created user: {} ({})", user.email, user.id);
                Ok(user)
            }
            Err(e) if is_unique_violation(&e) => Err(CreateUserError::DuplicateEmail),
            Err(e) => Err(CreateUserError::Storage(
                anyhow::Error::new(e).context("Failed to insert user"),
            )),
        }
    }

    pub fn count(&self) -> Result<i64> {
        self.db
            .conn()
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .context("Failed to count users")
    }
}
