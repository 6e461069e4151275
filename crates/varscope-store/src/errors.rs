//! Error handling for varscope-store
//!
//! Wraps varscope-core VsError with store-specific helpers

use varscope_core::errors::{VsError, VsErrorKind};

/// Result type alias using VsError
pub type Result<T> = std::result::Result<T, VsError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> VsError {
    VsError::new(VsErrorKind::Persistence)
        .with_op("migration")
        .with_entity_id(migration_id)
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error for an already-applied migration
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> VsError {
    VsError::new(VsErrorKind::Persistence)
        .with_op("migration_checksum")
        .with_entity_id(migration_id)
        .with_message(format!(
            "Checksum mismatch for migration {}: recorded {}, embedded {}",
            migration_id, expected, actual
        ))
}

/// Create an error for a migration the database has not applied
pub fn migration_missing(migration_id: &str) -> VsError {
    VsError::new(VsErrorKind::Persistence)
        .with_op("schema_check")
        .with_entity_id(migration_id)
        .with_message(format!("Migration {} has not been applied", migration_id))
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> VsError {
    VsError::new(VsErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> VsError {
    VsError::new(VsErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}
