pub mod config;
pub mod error;
pub mod task;

pub use config::{ConfigError, DuplicatePolicy, SchedulerConfig, TieBreak, MAX_INITIAL_CAPACITY};
pub use error::*;
pub use task::Task;
