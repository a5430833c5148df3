//! User repository
//!
//! - create: single INSERT ... RETURNING; uniqueness is left to the
//!   table constraints
//! - lookups by id, email (indexed) and username

use sqlx::PgConnection;

use crate::error::DbError;
use crate::models::{Email, NewUser, User, Username};

/// `users` table definition.
pub const USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id SERIAL PRIMARY KEY,
    name VARCHAR(150) NOT NULL,
    username VARCHAR(100) NOT NULL UNIQUE,
    email VARCHAR(255) NOT NULL UNIQUE,
    hashed_password VARCHAR(255) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE
)
"#;

/// Lookup index on `users.email`.
pub const USERS_EMAIL_INDEX: &str = "CREATE INDEX IF NOT EXISTS ix_users_email ON users (email)";

const USER_COLUMNS: &str = "id, name, username, email, hashed_password, is_active";

/// User repository
pub struct UserRepo<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> UserRepo<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    /// Insert a user and return the stored record.
    ///
    /// A duplicate username or email surfaces as a `Transaction` error
    /// carrying the unique violation.
    pub async fn create(&mut self, user: &NewUser) -> Result<User, DbError> {
        let query = format!(
            "INSERT INTO users (name, username, email, hashed_password, is_active) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        );
        let created = sqlx::query_as::<_, User>(&query)
            .bind(&user.name)
            .bind(user.username.as_str())
            .bind(user.email.as_str())
            .bind(&user.hashed_password)
            .bind(user.is_active)
            .fetch_one(&mut *self.conn)
            .await?;

        tracing::debug!(user_id = created.id, username = %created.username, "user created");
        Ok(created)
    }

    /// Get a user by id.
    pub async fn get(&mut self, id: i32) -> Result<User, DbError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or_else(|| DbError::NotFound {
                resource: "user",
                id: id.to_string(),
            })
    }

    pub async fn find_by_email(&mut self, email: &Email) -> Result<Option<User>, DbError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email.as_str())
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(user)
    }

    pub async fn find_by_username(&mut self, username: &Username) -> Result<Option<User>, DbError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(username.as_str())
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(user)
    }
}
