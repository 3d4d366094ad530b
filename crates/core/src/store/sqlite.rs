use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::{format_timestamp, BuildRecord, BuildStore, StoreError};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS build_info (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        data TEXT NOT NULL
    );
"#;

/// SQLite-backed build store.
///
/// Holds only the database path. Every operation opens its own connection,
/// creates the table if needed, and closes the connection when it returns.
pub struct SqliteBuildStore {
    path: PathBuf,
}

impl SqliteBuildStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.path)?;
        conn.execute_batch(CREATE_TABLE)?;
        Ok(conn)
    }
}

impl BuildStore for SqliteBuildStore {
    fn insert(&self, data: &str) -> Result<BuildRecord, StoreError> {
        let conn = self.connect()?;

        if data.is_empty() {
            return Err(StoreError::EmptyPayload);
        }

        let date = format_timestamp(Utc::now());
        conn.execute(
            "INSERT INTO build_info (date, data) VALUES (?1, ?2)",
            params![date, data],
        )?;

        let record = BuildRecord {
            id: conn.last_insert_rowid(),
            date,
            data: data.to_string(),
        };
        debug!(id = record.id, "Inserted build record");

        Ok(record)
    }

    fn get(&self, id: i64) -> Result<Option<BuildRecord>, StoreError> {
        let conn = self.connect()?;

        let record = conn
            .query_row(
                "SELECT id, date, data FROM build_info WHERE id = ?1",
                params![id],
                |row| {
                    Ok(BuildRecord {
                        id: row.get(0)?,
                        date: row.get(1)?,
                        data: row.get(2)?,
                    })
                },
            )
            .optional()?;

        Ok(record)
    }

    fn count(&self) -> Result<i64, StoreError> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM build_info", [], |row| row.get(0))?;
        Ok(count)
    }
}
