//! Auth error types.

use stash_storage::StorageError;

/// Errors that can occur during authentication operations.
///
/// Note that failed logins and invalid tokens are not errors: those
/// degrade to absent results. This enum covers construction-time
/// invariants and genuine faults.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The configured signing secret is too short.
    ///
    /// Raised at service construction, before any request is served.
    #[error("Signing secret must be at least {minimum} bytes, got {actual}")]
    WeakSecret {
        /// Required minimum length in bytes.
        minimum: usize,
        /// Length of the configured secret.
        actual: usize,
    },

    /// Registration collided with an existing username.
    #[error("Username already taken: {username}")]
    UsernameTaken {
        /// The conflicting username.
        username: String,
    },

    /// Failed to encode a token.
    #[error("Failed to encode token: {message}")]
    Encoding {
        /// Description of the encoding error.
        message: String,
    },

    /// Password hashing failed.
    #[error("Password hashing error: {message}")]
    Hashing {
        /// Description of the hashing error.
        message: String,
    },

    /// The underlying user store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Creates a new `UsernameTaken` error.
    #[must_use]
    pub fn username_taken(username: impl Into<String>) -> Self {
        Self::UsernameTaken {
            username: username.into(),
        }
    }

    /// Creates a new `Encoding` error.
    #[must_use]
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    /// Creates a new `Hashing` error.
    #[must_use]
    pub fn hashing(message: impl Into<String>) -> Self {
        Self::Hashing {
            message: message.into(),
        }
    }
}

/// Result type for auth operations.
pub type AuthResult<T> = std::result::Result<T, AuthError>;
