use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::debug;

use taskheap_core::config::load_dotenv;
use taskheap_core::SchedulerConfig;

use crate::cli::CliArgs;

/// Return the default config file path: ~/.config/taskheap/config.toml
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("could not determine user config directory")?
        .join("taskheap");
    Ok(config_dir.join("config.toml"))
}

/// Resolve the scheduler config.
/// Priority: CLI flags > env vars (.env included) > config file > defaults.
pub fn resolve(args: &CliArgs) -> Result<SchedulerConfig> {
    load_dotenv();

    let path = match args.config.as_deref() {
        Some(p) => PathBuf::from(p),
        None => default_config_path()?,
    };
    debug!(?path, "Loading config");

    let mut config = SchedulerConfig::load(&path)
        .with_context(|| format!("failed to load config: {}", path.display()))?
        .with_env_overrides()
        .context("invalid TASKHEAP_* environment override")?;

    if let Some(policy) = args.duplicates {
        config.duplicate_policy = policy;
    }
    if let Some(tie_break) = args.tie_break {
        config.tie_break = tie_break;
    }
    Ok(config)
}
