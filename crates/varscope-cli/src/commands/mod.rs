pub mod records;
pub mod sessions;

use rusqlite::Connection;
use std::path::PathBuf;
use varscope_core::Config;
use varscope_store::db;

/// Open the recording database named on the command line, or the configured one.
///
/// The viewer never creates or migrates the database.
pub(crate) fn open_database(
    requested: Option<PathBuf>,
) -> Result<Connection, Box<dyn std::error::Error>> {
    let path = match requested {
        Some(path) => path,
        None => Config::default().with_env_overrides()?.db_path,
    };
    if !path.exists() {
        return Err(format!("database not found: {}", path.display()).into());
    }

    Ok(db::open_for_viewing(&path)?)
}
