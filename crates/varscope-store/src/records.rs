//! Snapshot records
//!
//! Each record holds one serialized snapshot tree for a named variable.

use crate::errors::{from_rusqlite, Result};
use rusqlite::{Connection, Row};
use serde::Serialize;

/// Page size the viewer uses when none is given.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A row from the `records` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordRow {
    pub id: i64,
    pub session_id: i64,
    /// Creation timestamp, milliseconds since epoch
    pub created_at: i64,
    /// Variable name the snapshot was taken under
    pub name: String,
    /// Pretty JSON of the snapshot tree; `None` when serialization failed
    pub data: Option<String>,
}

impl RecordRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            session_id: row.get(1)?,
            created_at: row.get(2)?,
            name: row.get(3)?,
            data: row.get(4)?,
        })
    }
}

/// Insert a record and return its id.
///
/// # Errors
///
/// - `Persistence` if the insert fails, including an unknown `session_id`
pub fn insert_record(
    conn: &Connection,
    session_id: i64,
    name: &str,
    data: Option<&str>,
) -> Result<i64> {
    let created_at = chrono::Utc::now().timestamp_millis();
    conn.execute(
        "INSERT INTO records (session_id, created_at, name, data) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![session_id, created_at, name, data],
    )
    .map_err(from_rusqlite)?;
    Ok(conn.last_insert_rowid())
}

/// One page of a session's records: ids greater than `after`, ascending,
/// at most `limit` rows.
///
/// # Errors
///
/// - `Persistence` if the query fails
pub fn list_records(
    conn: &Connection,
    session_id: i64,
    after: i64,
    limit: u32,
) -> Result<Vec<RecordRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, session_id, created_at, name, data FROM records
             WHERE session_id = ?1 AND id > ?2
             ORDER BY id ASC
             LIMIT ?3",
        )
        .map_err(from_rusqlite)?;
    let rows = stmt
        .query_map(
            rusqlite::params![session_id, after, limit],
            RecordRow::from_row,
        )
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::apply_migrations;
    use crate::session::insert_session;

    #[test]
    fn test_pages_are_ascending_after_cursor() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        let session = insert_session(&conn, "h", "/p").unwrap();

        let ids: Vec<i64> = (0..5)
            .map(|i| insert_record(&conn, session.id, &format!("v{}", i), Some("{}")).unwrap())
            .collect();

        let page = list_records(&conn, session.id, ids[1], 2).unwrap();
        assert_eq!(
            page.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![ids[2], ids[3]]
        );
        assert_eq!(page[0].name, "v2");
    }

    #[test]
    fn test_null_data_round_trips() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        let session = insert_session(&conn, "h", "/p").unwrap();
        insert_record(&conn, session.id, "broken", None).unwrap();

        let page = list_records(&conn, session.id, 0, DEFAULT_PAGE_SIZE).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].data, None);
    }
}
