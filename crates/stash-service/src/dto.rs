//! Wire request and response shapes.

use serde::{Deserialize, Serialize};
use stash_core::Record;
use time::OffsetDateTime;

/// Payload for creating a record.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecordRequest {
    /// The record value, 1..=500 characters.
    pub value: String,
}

/// Payload for replacing a record's value.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRecordRequest {
    /// The new value, 1..=500 characters.
    pub value: String,
}

/// A record as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordResponse {
    /// Record identifier.
    pub id: u64,
    /// Record value.
    pub value: String,
    /// When the record was created (UTC, RFC 3339 on the wire).
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Record> for RecordResponse {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            value: record.value,
            created_at: record.created_at,
        }
    }
}
