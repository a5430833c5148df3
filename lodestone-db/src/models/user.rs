//! User entity
//!
//! Passive record stored in the `users` table. Column limits match the
//! table definition in [`crate::repos::users`].

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use sqlx::FromRow;

use super::validation::{bounded, ValidationError};

pub const MAX_NAME_LEN: usize = 150;
pub const MAX_USERNAME_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 255;
pub const MAX_PASSWORD_HASH_LEN: usize = 255;

/// One `@`, no whitespace, a dot somewhere in the domain
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("invalid email regex"));

/// User record from database
#[derive(Clone, FromRow, Serialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub is_active: bool,
}

// Keep the password hash out of logs.
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Validated username (globally unique in storage)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// # Rules
    /// - Not blank
    /// - Max 100 characters
    /// - No whitespace
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded("username", s, MAX_USERNAME_LEN)?;
        if s.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidFormat {
                field: "username",
                reason: "must not contain whitespace",
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated email address (globally unique in storage)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// # Example
    /// ```
    /// use lodestone_db::models::Email;
    ///
    /// assert!(Email::new("ada@example.com").is_ok());
    /// assert!(Email::new("ada.example.com").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded("email", s, MAX_EMAIL_LEN)?;
        if !EMAIL_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "must look like name@domain.tld",
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Insert payload for a user. `id` is assigned by storage.
#[derive(Clone)]
pub struct NewUser {
    pub name: String,
    pub username: Username,
    pub email: Email,
    pub hashed_password: String,
    pub is_active: bool,
}

impl NewUser {
    /// Validate and build an active user.
    pub fn new(
        name: &str,
        username: &str,
        email: &str,
        hashed_password: &str,
    ) -> Result<Self, ValidationError> {
        bounded("name", name, MAX_NAME_LEN)?;
        bounded("hashed_password", hashed_password, MAX_PASSWORD_HASH_LEN)?;

        Ok(Self {
            name: name.to_owned(),
            username: Username::new(username)?,
            email: Email::new(email)?,
            hashed_password: hashed_password.to_owned(),
            is_active: true,
        })
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("is_active", &self.is_active)
            .finish_non_exhaustive()
    }
}
