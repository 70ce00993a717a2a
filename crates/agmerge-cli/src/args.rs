use crate::types::{LogLevel, OtherEvents, OutputFormat};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agmerge")]
#[command(about = "Merge fragmented session logs into one session file", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory containing session_<id>.jsonl fragments
    pub path: PathBuf,

    #[arg(long, default_value = "plain")]
    pub format: OutputFormat,

    #[arg(long, default_value = "warn")]
    pub log_level: LogLevel,

    /// Config file (default: $AGMERGE_CONFIG, then <config dir>/agmerge/config.toml)
    #[arg(long)]
    pub config: Option<String>,

    /// What to do with records that are neither lifecycle markers nor messages
    #[arg(long)]
    pub other_events: Option<OtherEvents>,

    /// Report what would be merged without writing anything
    #[arg(long)]
    pub dry_run: bool,
}
