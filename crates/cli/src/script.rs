//! Task script parsing and replay.

use anyhow::{bail, Context, Result};
use serde_json::{json, Value};

use taskheap_scheduler::Scheduler;

pub type TaskId = String;
pub type Priority = i64;

/// One script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { id: TaskId, priority: Priority },
    Change { id: TaskId, priority: Priority },
    Get,
    Peek,
    Remove { id: TaskId },
    Len,
    Stats,
    Drain,
}

/// Parse a single line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>> {
    let line = line.split('#').next().unwrap_or("").trim();
    if line.is_empty() {
        return Ok(None);
    }

    let parts: Vec<&str> = line.split_whitespace().collect();
    let command = match parts.as_slice() {
        ["add", id, priority] => Command::Add {
            id: id.to_string(),
            priority: parse_priority(priority)?,
        },
        ["change", id, priority] => Command::Change {
            id: id.to_string(),
            priority: parse_priority(priority)?,
        },
        ["remove", id] => Command::Remove { id: id.to_string() },
        ["get"] => Command::Get,
        ["peek"] => Command::Peek,
        ["len"] => Command::Len,
        ["stats"] => Command::Stats,
        ["drain"] => Command::Drain,
        [op, ..] => bail!("unknown or malformed command: {}", op),
        [] => return Ok(None),
    };
    Ok(Some(command))
}

fn parse_priority(raw: &str) -> Result<Priority> {
    raw.parse()
        .with_context(|| format!("priority must be an integer, got {:?}", raw))
}

/// Run one command. Scheduler errors are reported in the returned JSON
/// rather than aborting the replay.
pub fn execute(scheduler: &mut Scheduler<TaskId, Priority>, command: Command) -> Value {
    let outcome = match command {
        Command::Add { id, priority } => scheduler
            .add_task(id.clone(), priority)
            .map(|()| json!({ "op": "add", "id": id, "priority": priority })),
        Command::Change { id, priority } => scheduler
            .change_task_priority(id.as_str(), priority)
            .map(|()| json!({ "op": "change", "id": id, "priority": priority })),
        Command::Get => scheduler
            .get_task()
            .map(|task| json!({ "op": "get", "task": task })),
        Command::Remove { id } => scheduler
            .remove_task(id.as_str())
            .map(|task| json!({ "op": "remove", "task": task })),
        Command::Peek => Ok(json!({ "op": "peek", "task": scheduler.peek() })),
        Command::Len => Ok(json!({ "op": "len", "len": scheduler.len() })),
        Command::Stats => Ok(json!({ "op": "stats", "metrics": scheduler.metrics() })),
        Command::Drain => Ok(json!({ "op": "drain", "tasks": scheduler.drain_ordered() })),
    };

    outcome.unwrap_or_else(|err| {
        json!({ "error": { "code": err.code(), "message": err.to_string() } })
    })
}
