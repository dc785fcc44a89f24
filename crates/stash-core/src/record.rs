//! The `Record` entity, the single CRUD resource served by Stash.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{CoreError, Result};

/// Maximum allowed length for a record value, in characters.
pub const RECORD_VALUE_MAX_LEN: usize = 500;

/// A stored data item.
///
/// The backing store that holds a record is authoritative for it; copies
/// handed to cache tiers are disposable projections and may be dropped or
/// rebuilt at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Positive numeric identifier, assigned by the backing store at create
    /// time. Never reused within a store's lifetime.
    pub id: u64,

    /// The payload, 1..=500 characters.
    pub value: String,

    /// When the record was created (UTC).
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Record {
    /// Creates a record with the given id and value, stamped with the
    /// current UTC time.
    #[must_use]
    pub fn new(id: u64, value: impl Into<String>) -> Self {
        Self {
            id,
            value: value.into(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// Validates a candidate record value.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidValue` when the value is empty or longer
    /// than [`RECORD_VALUE_MAX_LEN`] characters.
    pub fn validate_value(value: &str) -> Result<()> {
        if value.is_empty() {
            return Err(CoreError::invalid_value("value must not be empty"));
        }
        if value.chars().count() > RECORD_VALUE_MAX_LEN {
            return Err(CoreError::invalid_value(format!(
                "value exceeds {RECORD_VALUE_MAX_LEN} characters"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_new() {
        let record = Record::new(7, "hello");
        assert_eq!(record.id, 7);
        assert_eq!(record.value, "hello");
    }

    #[test]
    fn test_validate_value() {
        assert!(Record::validate_value("x").is_ok());
        assert!(Record::validate_value(&"a".repeat(500)).is_ok());
        assert!(Record::validate_value("").is_err());
        assert!(Record::validate_value(&"a".repeat(501)).is_err());
    }

    #[test]
    fn test_record_serialization_round_trip() {
        let record = Record::new(1, "payload");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"created_at\""));

        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
