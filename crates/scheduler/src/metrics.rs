use serde::Serialize;

use taskheap_core::SchedulerError;

/// Operation counters for a single scheduler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchedulerMetrics {
    /// Tasks accepted by `add_task` / `add_or_update` as new entries.
    pub tasks_added: u64,
    /// Tasks handed out by `get_task`.
    pub tasks_extracted: u64,
    /// Tasks dropped through `remove_task`.
    pub tasks_removed: u64,
    /// Successful priority changes, including duplicate replacements.
    pub priority_changes: u64,
    pub duplicates_rejected: u64,
    pub unknown_task_errors: u64,
    pub empty_queue_errors: u64,
    /// Highest number of simultaneously pending tasks.
    pub peak_pending: usize,
}

impl SchedulerMetrics {
    pub fn record_added(&mut self, pending: usize) {
        self.tasks_added += 1;
        self.peak_pending = self.peak_pending.max(pending);
    }

    pub fn record_error(&mut self, err: &SchedulerError) {
        match err {
            SchedulerError::DuplicateIdentifier(_) => self.duplicates_rejected += 1,
            SchedulerError::UnknownTask(_) => self.unknown_task_errors += 1,
            SchedulerError::EmptyQueue => self.empty_queue_errors += 1,
            _ => {}
        }
    }

    /// Number of tasks that should still be pending according to the counters.
    pub fn outstanding(&self) -> u64 {
        self.tasks_added
            .saturating_sub(self.tasks_extracted)
            .saturating_sub(self.tasks_removed)
    }
}
