//! Session listing command

use clap::Args;
use std::path::PathBuf;
use varscope_store::list_sessions;

#[derive(Debug, Args)]
pub struct SessionsArgs {
    /// Recording database (defaults to the configured path)
    #[arg(long)]
    pub db: Option<PathBuf>,
}

pub fn execute(args: SessionsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let conn = super::open_database(args.db)?;
    let sessions = list_sessions(&conn)?;
    println!("{}", serde_json::to_string_pretty(&sessions)?);
    Ok(())
}
