//! Database schema definitions and migrations.

use rusqlite::Connection;

use crate::DbError;

pub fn run_migrations(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(SCHEMA)?;
    migrate_legacy_tables(conn)?;
    Ok(())
}

/// Early builds kept entries in a `local_storage` table without timestamps.
fn migrate_legacy_tables(conn: &Connection) -> Result<(), DbError> {
    if !table_exists(conn, "local_storage")? {
        return Ok(());
    }
    tracing::info!("Migrating local_storage rows into kv_entries");
    conn.execute_batch(
        "INSERT OR IGNORE INTO kv_entries (key, value, updated_at)
             SELECT key, value, CURRENT_TIMESTAMP FROM local_storage;
         DROP TABLE local_storage;",
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool, DbError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS kv_entries (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);
"#;
