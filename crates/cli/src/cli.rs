use clap::Parser;

use taskheap_core::{DuplicatePolicy, TieBreak};

/// Replay a task script against an indexed priority scheduler.
///
/// Each script line is one command: `add <id> <priority>`,
/// `change <id> <priority>`, `get`, `peek`, `remove <id>`, `len`, `stats`
/// or `drain`. One JSON object is printed per command.
#[derive(Parser, Debug)]
#[command(name = "taskheap", version, about = "Replay a task script against a priority scheduler")]
pub struct CliArgs {
    /// Path to config file (default: ~/.config/taskheap/config.toml)
    #[arg(long, env = "TASKHEAP_CONFIG")]
    pub config: Option<String>,

    /// Script to replay (reads stdin when omitted)
    #[arg(long)]
    pub script: Option<String>,

    /// Duplicate identifier policy: reject or replace
    #[arg(long)]
    pub duplicates: Option<DuplicatePolicy>,

    /// Tie-break among equal priorities: fifo or unordered
    #[arg(long)]
    pub tie_break: Option<TieBreak>,

    /// Check heap/index invariants after every command
    #[arg(long)]
    pub verify: bool,
}
