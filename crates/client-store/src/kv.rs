//! Key-value entry store.

use rusqlite::OptionalExtension;

use crate::{Database, DbError};

impl Database {
    pub fn get_entry(&self, key: &str) -> Result<Option<String>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT value FROM kv_entries WHERE key = ?1")?;
            let value = stmt
                .query_row([key], |row| row.get::<_, String>(0))
                .optional()?;
            Ok(value)
        })
    }

    pub fn set_entry(&self, key: &str, value: &str) -> Result<(), DbError> {
        if key.is_empty() {
            return Err(DbError::InvalidData("empty key".into()));
        }
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)
                 ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = CURRENT_TIMESTAMP",
                rusqlite::params![key, value],
            )?;
            Ok(())
        })
    }

    pub fn delete_entry(&self, key: &str) -> Result<(), DbError> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM kv_entries WHERE key = ?1", [key])?;
            Ok(())
        })
    }

    /// Keys starting with `prefix`, sorted ascending.
    pub fn list_entry_keys(&self, prefix: &str) -> Result<Vec<String>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT key FROM kv_entries WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key",
            )?;
            let rows = stmt.query_map([prefix], |row| row.get::<_, String>(0))?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
    }

    /// Delete every entry under `prefix` except `keep`. Returns the number removed.
    pub fn purge_entries_with_prefix(&self, prefix: &str, keep: &str) -> Result<usize, DbError> {
        self.with_conn(|conn| {
            let removed = conn.execute(
                "DELETE FROM kv_entries WHERE substr(key, 1, length(?1)) = ?1 AND key != ?2",
                rusqlite::params![prefix, keep],
            )?;
            Ok(removed)
        })
    }
}
