//! User and role types for authentication.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::CoreError;

/// Authorization role carried by a user and embedded in issued tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Regular user: read access plus create.
    User,
    /// Administrator: full access including update and delete.
    Admin,
}

impl Role {
    /// Returns the role name as used on the wire.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "User" => Ok(Self::User),
            "Admin" => Ok(Self::Admin),
            other => Err(CoreError::invalid_role(other)),
        }
    }
}

/// A user in the authentication system.
///
/// Usernames are unique case-insensitively. The password hash is stored
/// here for verification but must be cleared before a `User` crosses the
/// auth service boundary in a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Positive numeric identifier, assigned by the user store.
    pub id: u64,

    /// Username for authentication.
    pub username: String,

    /// Argon2-hashed password. Empty once the user leaves the auth service.
    #[serde(default)]
    pub password_hash: String,

    /// The user's role.
    pub role: Role,

    /// When the user was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl User {
    /// Creates a new user with the current UTC timestamp.
    #[must_use]
    pub fn new(id: u64, username: impl Into<String>, password_hash: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            password_hash: password_hash.into(),
            role,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// Returns `true` if the user holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Returns `true` if this user's name matches `username`,
    /// case-insensitively.
    #[must_use]
    pub fn username_matches(&self, username: &str) -> bool {
        self.username.eq_ignore_ascii_case(username)
    }

    /// Returns a copy with the password hash cleared, safe to hand out.
    #[must_use]
    pub fn without_password_hash(mut self) -> Self {
        self.password_hash.clear();
        self
    }
}
