//! Recording sessions
//!
//! One session row is written per recorder start. It identifies where the
//! process ran so the viewer can tell recordings apart.

use crate::errors::{from_rusqlite, Result};
use rusqlite::{Connection, OptionalExtension, Row};
use serde::Serialize;
use varscope_core::errors::{VarscopeError, VsError};

/// A row from the `sessions` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionRow {
    pub id: i64,
    /// Creation timestamp, milliseconds since epoch
    pub created_at: i64,
    pub hostname: String,
    /// Working directory of the recording process
    pub path: String,
}

impl SessionRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            created_at: row.get(1)?,
            hostname: row.get(2)?,
            path: row.get(3)?,
        })
    }
}

/// Insert a session for the current host and working directory.
///
/// # Errors
///
/// - `Persistence` if the insert fails
pub fn create_session(conn: &Connection) -> Result<SessionRow> {
    let path = std::env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    insert_session(conn, &current_hostname(), &path)
}

/// Insert a session with explicit host and path.
///
/// # Errors
///
/// - `Persistence` if the insert fails
pub fn insert_session(conn: &Connection, hostname: &str, path: &str) -> Result<SessionRow> {
    let created_at = chrono::Utc::now().timestamp_millis();
    conn.execute(
        "INSERT INTO sessions (created_at, hostname, path) VALUES (?1, ?2, ?3)",
        rusqlite::params![created_at, hostname, path],
    )
    .map_err(from_rusqlite)?;

    Ok(SessionRow {
        id: conn.last_insert_rowid(),
        created_at,
        hostname: hostname.to_string(),
        path: path.to_string(),
    })
}

/// All sessions, newest first.
///
/// # Errors
///
/// - `Persistence` if the query fails
pub fn list_sessions(conn: &Connection) -> Result<Vec<SessionRow>> {
    let mut stmt = conn
        .prepare("SELECT id, created_at, hostname, path FROM sessions ORDER BY id DESC")
        .map_err(from_rusqlite)?;
    let rows = stmt
        .query_map([], SessionRow::from_row)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(rows)
}

/// Fetch one session by id.
///
/// # Errors
///
/// - `NotFound` if no session has this id
/// - `Persistence` if the query fails
pub fn fetch_session(conn: &Connection, session_id: i64) -> Result<SessionRow> {
    conn.query_row(
        "SELECT id, created_at, hostname, path FROM sessions WHERE id = ?1",
        [session_id],
        SessionRow::from_row,
    )
    .optional()
    .map_err(from_rusqlite)?
    .ok_or_else(|| {
        VsError::from(VarscopeError::SessionNotFound { session_id }).with_op("fetch_session")
    })
}

fn current_hostname() -> String {
    let name = gethostname::gethostname();
    let name = name.to_string_lossy();
    let name = name.trim();
    if name.is_empty() {
        "unknown".to_string()
    } else {
        name.to_string()
    }
}
