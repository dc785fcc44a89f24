//! Input types consumed by the storage traits.

use serde::{Deserialize, Serialize};
use stash_core::Role;

/// Payload for creating or updating a record.
///
/// The id and creation timestamp are assigned by the backing store, never
/// by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    /// The record value, assumed pre-validated (1..=500 chars).
    pub value: String,
}

impl NewRecord {
    /// Creates a new record payload.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Payload for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Username, unique case-insensitively.
    pub username: String,
    /// Argon2 hash of the password.
    pub password_hash: String,
    /// Role granted to the user.
    pub role: Role,
}
