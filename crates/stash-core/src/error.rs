use thiserror::Error;

/// Core error types for Stash operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid record value: {message}")]
    InvalidValue { message: String },

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CoreError {
    /// Create a new InvalidValue error
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::InvalidValue {
            message: message.into(),
        }
    }

    /// Create a new InvalidRole error
    pub fn invalid_role(role: impl Into<String>) -> Self {
        Self::InvalidRole(role.into())
    }
}

/// Result type alias using CoreError
pub type Result<T> = std::result::Result<T, CoreError>;
