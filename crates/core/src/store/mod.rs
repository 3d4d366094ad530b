//! Build records: one row per accepted payload.

mod sqlite;

pub use sqlite::SqliteBuildStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Timestamp format of [`BuildRecord::date`]
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A persisted payload. Serialized with capitalized keys: `Id`, `Date`, `Data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BuildRecord {
    pub id: i64,
    /// UTC, second precision, `YYYY-MM-DD HH:MM:SS`
    pub date: String,
    /// Compacted JSON payload
    pub data: String,
}

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format(DATE_FORMAT).to_string()
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Fields are empty")]
    EmptyPayload,
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

/// Trait for build record storage
pub trait BuildStore: Send + Sync {
    /// Insert a record for `data`, stamped with the current time.
    /// Empty data is rejected without writing.
    fn insert(&self, data: &str) -> Result<BuildRecord, StoreError>;

    /// Get a record by ID
    fn get(&self, id: i64) -> Result<Option<BuildRecord>, StoreError>;

    /// Number of stored records
    fn count(&self) -> Result<i64, StoreError>;
}
