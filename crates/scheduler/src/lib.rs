//! Indexed priority task scheduler.
//!
//! [`Scheduler`] composes an array-backed max-[`heap`] with an identifier
//! [`index`] so that any pending task's priority can be changed in
//! O(log n). [`SharedScheduler`] layers locking and blocking waits on top.

pub mod heap;
pub mod index;
pub mod metrics;
pub mod scheduler;
pub mod shared;

pub use heap::{Entry, PriorityHeap, SlotTracker};
pub use index::IdentifierIndex;
pub use metrics::SchedulerMetrics;
pub use scheduler::Scheduler;
pub use shared::SharedScheduler;

pub use taskheap_core::{
    DuplicatePolicy, Result, SchedulerConfig, SchedulerError, Task, TieBreak,
};
