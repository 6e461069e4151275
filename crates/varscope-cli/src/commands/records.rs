//! Record paging command

use clap::Args;
use serde_json::{json, Value};
use std::path::PathBuf;
use varscope_store::{fetch_session, list_records, RecordRow, DEFAULT_PAGE_SIZE};

#[derive(Debug, Args)]
pub struct RecordsArgs {
    /// Session to read
    pub session_id: i64,

    /// Only show records with an id greater than this
    #[arg(long, default_value_t = 0)]
    pub after: i64,

    /// Page size
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub limit: u32,

    /// Recording database (defaults to the configured path)
    #[arg(long)]
    pub db: Option<PathBuf>,
}

pub fn execute(args: RecordsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let conn = super::open_database(args.db)?;
    fetch_session(&conn, args.session_id)?;

    let page: Vec<Value> = list_records(&conn, args.session_id, args.after, args.limit)?
        .into_iter()
        .map(render)
        .collect();
    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}

/// Stored snapshots are embedded as JSON; anything that doesn't parse is shown raw.
fn render(record: RecordRow) -> Value {
    let data = match record.data {
        Some(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
        None => Value::Null,
    };
    json!({
        "id": record.id,
        "session_id": record.session_id,
        "created_at": record.created_at,
        "name": record.name,
        "data": data,
    })
}
