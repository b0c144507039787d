mod cli;
mod config;
mod script;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use tracing::{error, info};

use taskheap_scheduler::Scheduler;

use crate::cli::CliArgs;

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries one JSON object per command.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    let config = config::resolve(&args).context("failed to load configuration")?;
    config.log_summary();

    let input: Box<dyn BufRead> = match args.script.as_deref() {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("failed to open script: {}", path))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let mut scheduler: Scheduler<script::TaskId, script::Priority> = Scheduler::with_config(config);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for (number, line) in input.lines().enumerate() {
        let line = line.context("failed to read script")?;
        let Some(command) = script::parse_line(&line)
            .with_context(|| format!("line {}: {:?}", number + 1, line))?
        else {
            continue;
        };

        let result = script::execute(&mut scheduler, command);
        serde_json::to_writer(&mut out, &result)?;
        writeln!(out)?;

        if args.verify {
            if let Err(e) = scheduler.check_invariants() {
                error!(line = number + 1, error = %e, "Invariant check failed");
                return Err(e).context("scheduler invariants violated");
            }
        }
    }

    info!(pending = scheduler.len(), "Script finished");
    Ok(())
}
