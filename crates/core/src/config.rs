use std::env;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_parse<T>(profile: &str, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
{
    match profiled_env_opt(profile, key) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key: key.to_string(), value: raw }),
        None => Ok(None),
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

// ── Policies ──────────────────────────────────────────────────

/// What `add_task` does when the identifier is already pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Fail with `DuplicateIdentifier`; the pending task is untouched.
    #[default]
    Reject,
    /// Overwrite the pending task's priority in place.
    Replace,
}

impl FromStr for DuplicatePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "replace" => Ok(Self::Replace),
            _ => Err(ConfigError::InvalidValue {
                key: "duplicate_policy".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicatePolicy::Reject => write!(f, "reject"),
            DuplicatePolicy::Replace => write!(f, "replace"),
        }
    }
}

/// How tasks with equal priority are ordered relative to each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    /// Earlier insertion leaves first.
    #[default]
    Fifo,
    /// No guarantee among equal priorities.
    Unordered,
}

impl FromStr for TieBreak {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fifo" => Ok(Self::Fifo),
            "unordered" => Ok(Self::Unordered),
            _ => Err(ConfigError::InvalidValue {
                key: "tie_break".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TieBreak::Fifo => write!(f, "fifo"),
            TieBreak::Unordered => write!(f, "unordered"),
        }
    }
}

// ── Scheduler config ──────────────────────────────────────────

/// Scheduler configuration, typically parsed from TOML and then overridden
/// from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Slots reserved up front in the heap and index.
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
    #[serde(default)]
    pub tie_break: TieBreak,
}

fn default_initial_capacity() -> usize { 16 }

/// Largest `initial_capacity` accepted from a config file or the environment.
/// The value is only a preallocation hint; the queue still grows past it.
pub const MAX_INITIAL_CAPACITY: usize = 1 << 20;

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_capacity: default_initial_capacity(),
            duplicate_policy: DuplicatePolicy::default(),
            tie_break: TieBreak::default(),
        }
    }
}

impl SchedulerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()
    }

    /// Reject values that cannot be honoured, such as an `initial_capacity`
    /// above [`MAX_INITIAL_CAPACITY`].
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.initial_capacity > MAX_INITIAL_CAPACITY {
            return Err(ConfigError::InvalidValue {
                key: "initial_capacity".to_string(),
                value: self.initial_capacity.to_string(),
            });
        }
        Ok(self)
    }

    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Build config from defaults plus environment variables (call
    /// `load_dotenv()` first). Profile is read from `TASKHEAP_PROFILE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Apply `TASKHEAP_*` environment overrides on top of `self`.
    ///
    /// When `TASKHEAP_PROFILE` is set (e.g. `BATCH`), every key is first
    /// looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        let profile = env_opt("TASKHEAP_PROFILE").unwrap_or_default().to_uppercase();
        self.with_profile_overrides(&profile)
    }

    fn with_profile_overrides(mut self, p: &str) -> Result<Self, ConfigError> {
        if let Some(capacity) = profiled_env_parse(p, "TASKHEAP_INITIAL_CAPACITY")? {
            self.initial_capacity = capacity;
        }
        if let Some(policy) = profiled_env_parse(p, "TASKHEAP_DUPLICATE_POLICY")? {
            self.duplicate_policy = policy;
        }
        if let Some(tie_break) = profiled_env_parse(p, "TASKHEAP_TIE_BREAK")? {
            self.tie_break = tie_break;
        }
        self.validate()
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!(
            initial_capacity = self.initial_capacity,
            duplicate_policy = %self.duplicate_policy,
            tie_break = %self.tie_break,
            "Scheduler config loaded"
        );
    }
}
