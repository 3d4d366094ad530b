//! Mock build store for testing.

use chrono::Utc;
use std::sync::Mutex;

use crate::store::{format_timestamp, BuildRecord, BuildStore, StoreError};

/// In-memory implementation of the BuildStore trait.
///
/// Mirrors the SQLite store's rules (empty data is rejected) and can be
/// told to fail the next insert with a database error.
#[derive(Debug, Default)]
pub struct MockBuildStore {
    records: Mutex<Vec<BuildRecord>>,
    next_error: Mutex<Option<String>>,
}

impl MockBuildStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next insert fail with `message`.
    pub fn fail_next(&self, message: impl Into<String>) {
        *self.next_error.lock().unwrap() = Some(message.into());
    }

    /// All stored records, in insertion order.
    pub fn records(&self) -> Vec<BuildRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl BuildStore for MockBuildStore {
    fn insert(&self, data: &str) -> Result<BuildRecord, StoreError> {
        if let Some(message) = self.next_error.lock().unwrap().take() {
            return Err(StoreError::Database(message));
        }
        if data.is_empty() {
            return Err(StoreError::EmptyPayload);
        }

        let mut records = self.records.lock().unwrap();
        let record = BuildRecord {
            id: records.len() as i64 + 1,
            date: format_timestamp(Utc::now()),
            data: data.to_string(),
        };
        records.push(record.clone());
        Ok(record)
    }

    fn get(&self, id: i64) -> Result<Option<BuildRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    fn count(&self) -> Result<i64, StoreError> {
        Ok(self.records.lock().unwrap().len() as i64)
    }
}
