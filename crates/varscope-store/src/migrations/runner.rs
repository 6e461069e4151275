//! Migration runner
//!
//! Applies migrations with checksums and idempotency

use crate::errors::{
    checksum_mismatch, from_rusqlite, migration_error, migration_missing, Result,
};
use crate::migrations::checksums::compute_checksum;
use crate::migrations::embedded::get_migrations;
use rusqlite::{Connection, OptionalExtension};

/// Apply all pending migrations to the database
///
/// # Errors
///
/// - `Persistence` if a migration fails to execute, or if an applied
///   migration's recorded checksum no longer matches the embedded SQL
pub fn apply_migrations(conn: &mut Connection) -> Result<()> {
    create_schema_version_table(conn)?;

    for migration in get_migrations() {
        apply_migration(conn, migration.id, migration.sql)?;
    }

    Ok(())
}

/// Ids of the migrations recorded in `schema_version`, in application order
///
/// # Errors
///
/// - `Persistence` if the table cannot be read
pub fn applied_migrations(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT migration_id FROM schema_version ORDER BY id")
        .map_err(from_rusqlite)?;
    let ids = stmt
        .query_map([], |row| row.get(0))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<String>, _>>()
        .map_err(from_rusqlite)?;
    Ok(ids)
}

/// Check that every embedded migration has been applied unchanged, without
/// writing anything.
///
/// # Errors
///
/// - `Persistence` if a migration is missing (including a database that was
///   never initialized) or its recorded checksum differs
pub fn verify_schema(conn: &Connection) -> Result<()> {
    let initialized: bool = conn
        .query_row(
            "SELECT EXISTS (
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'
            )",
            [],
            |row| row.get(0),
        )
        .map_err(from_rusqlite)?;

    for migration in get_migrations() {
        let recorded: Option<Option<String>> = if initialized {
            conn.query_row(
                "SELECT checksum FROM schema_version WHERE migration_id = ?",
                [migration.id],
                |row| row.get(0),
            )
            .optional()
            .map_err(from_rusqlite)?
        } else {
            None
        };

        let checksum = compute_checksum(migration.sql);
        match recorded {
            None => return Err(migration_missing(migration.id)),
            Some(Some(existing)) if existing != checksum => {
                return Err(checksum_mismatch(migration.id, &existing, &checksum));
            }
            Some(_) => {}
        }
    }

    Ok(())
}

/// Create the schema_version table if it doesn't exist
fn create_schema_version_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY,
            migration_id TEXT NOT NULL UNIQUE,
            applied_at INTEGER NOT NULL,
            checksum TEXT
        )",
        [],
    )
    .map_err(from_rusqlite)?;

    Ok(())
}

/// Apply a single migration if not already applied
fn apply_migration(conn: &mut Connection, migration_id: &str, sql: &str) -> Result<()> {
    let checksum = compute_checksum(sql);

    let recorded: Option<Option<String>> = conn
        .query_row(
            "SELECT checksum FROM schema_version WHERE migration_id = ?",
            [migration_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(from_rusqlite)?;

    match recorded {
        Some(Some(existing)) if existing != checksum => {
            return Err(checksum_mismatch(migration_id, &existing, &checksum));
        }
        Some(_) => {
            tracing::debug!(migration_id, "migration already applied");
            return Ok(());
        }
        None => {}
    }

    let tx = conn.transaction().map_err(from_rusqlite)?;

    tx.execute_batch(sql)
        .map_err(|e| migration_error(migration_id, &e.to_string()))?;

    let now = chrono::Utc::now().timestamp();
    tx.execute(
        "INSERT INTO schema_version (migration_id, applied_at, checksum) VALUES (?, ?, ?)",
        rusqlite::params![migration_id, now, checksum],
    )
    .map_err(from_rusqlite)?;

    tx.commit().map_err(from_rusqlite)?;

    tracing::debug!(migration_id, "migration applied");
    Ok(())
}
