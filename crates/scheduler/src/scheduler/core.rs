use std::borrow::Borrow;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::{debug, warn};

use taskheap_core::{
    DuplicatePolicy, Result, SchedulerConfig, SchedulerError, Task, MAX_INITIAL_CAPACITY,
};

use crate::heap::{Entry, PriorityHeap};
use crate::index::IdentifierIndex;
use crate::metrics::SchedulerMetrics;

/// Priority scheduler: always yields the highest-priority pending task and
/// supports O(log n) priority changes for any pending identifier.
///
/// The heap owns every task; the index only maps identifiers to the slot the
/// heap last reported. Both are mutated together inside each `&mut self`
/// method, so they agree whenever a method returns, including on error.
#[derive(Debug)]
pub struct Scheduler<K, P> {
    pub(super) heap: PriorityHeap<K, P>,
    pub(super) index: IdentifierIndex<K>,
    pub(super) config: SchedulerConfig,
    pub(super) metrics: SchedulerMetrics,
    /// Next insertion sequence number.
    pub(super) next_seq: u64,
}

impl<K, P> Default for Scheduler<K, P>
where
    K: Hash + Eq + Clone + Debug,
    P: Ord + Debug,
{
    fn default() -> Self {
        Self::with_config(SchedulerConfig::default())
    }
}

impl<K, P> Scheduler<K, P>
where
    K: Hash + Eq + Clone + Debug,
    P: Ord + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(SchedulerConfig {
            initial_capacity: capacity,
            ..SchedulerConfig::default()
        })
    }

    /// Build from `config`. `initial_capacity` is a preallocation hint and is
    /// capped at [`MAX_INITIAL_CAPACITY`].
    pub fn with_config(config: SchedulerConfig) -> Self {
        let capacity = config.initial_capacity.min(MAX_INITIAL_CAPACITY);
        if capacity < config.initial_capacity {
            warn!(
                requested = config.initial_capacity,
                reserved = capacity,
                "Initial capacity capped"
            );
        }
        Self {
            heap: PriorityHeap::with_capacity(capacity, config.tie_break),
            index: IdentifierIndex::with_capacity(capacity),
            config,
            metrics: SchedulerMetrics::default(),
            next_seq: 0,
        }
    }

    /// Add a new pending task.
    ///
    /// If `id` is already pending, the configured [`DuplicatePolicy`] applies:
    /// `Reject` fails with `DuplicateIdentifier` and leaves the pending task
    /// untouched, `Replace` overwrites its priority.
    pub fn add_task(&mut self, id: K, priority: P) -> Result<()> {
        if self.index.contains(&id) {
            return match self.config.duplicate_policy {
                DuplicatePolicy::Reject => {
                    warn!(id = ?id, "Rejected duplicate task identifier");
                    Err(self.fail(SchedulerError::duplicate(&id)))
                }
                DuplicatePolicy::Replace => self.change_task_priority(&id, priority),
            };
        }
        self.insert(id, priority);
        Ok(())
    }

    /// Insert `id`, or overwrite its priority if it is already pending,
    /// regardless of the duplicate policy. Returns `true` if a new task was
    /// created.
    pub fn add_or_update(&mut self, id: K, priority: P) -> bool {
        match self.index.slot_of(&id) {
            Some(slot) => {
                self.reprioritize(slot, priority);
                false
            }
            None => {
                self.insert(id, priority);
                true
            }
        }
    }

    /// Change the priority of a pending task, restoring heap order from its
    /// slot only. Fails with `UnknownTask` (and changes nothing) if `id` is
    /// not pending.
    pub fn change_task_priority<Q>(&mut self, id: &Q, priority: P) -> Result<()>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let Some(slot) = self.index.slot_of(id) else {
            return Err(self.fail(SchedulerError::unknown_task(&id)));
        };
        self.reprioritize(slot, priority);
        Ok(())
    }

    /// Remove and return the highest-priority pending task.
    ///
    /// Fails with `EmptyQueue` when nothing is pending; the scheduler stays
    /// usable.
    pub fn get_task(&mut self) -> Result<Task<K, P>> {
        let Some(entry) = self.heap.pop(&mut self.index) else {
            return Err(self.fail(SchedulerError::EmptyQueue));
        };
        self.metrics.tasks_extracted += 1;
        debug!(id = ?entry.task.id(), priority = ?entry.task.priority(), "Task extracted");
        Ok(entry.task)
    }

    /// Remove a specific pending task regardless of its priority.
    pub fn remove_task<Q>(&mut self, id: &Q) -> Result<Task<K, P>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let Some(slot) = self.index.slot_of(id) else {
            return Err(self.fail(SchedulerError::unknown_task(&id)));
        };
        let entry = self.heap.remove_at(slot, &mut self.index);
        self.metrics.tasks_removed += 1;
        debug!(id = ?entry.task.id(), "Task removed");
        Ok(entry.task)
    }

    /// Drop every pending task; they count as removed.
    pub fn clear(&mut self) {
        self.metrics.tasks_removed += self.heap.len() as u64;
        self.heap.clear(&mut self.index);
        debug!("Scheduler cleared");
    }

    fn insert(&mut self, id: K, priority: P) {
        let seq = self.next_seq;
        self.next_seq += 1;

        debug!(id = ?id, priority = ?priority, seq, "Task added");
        self.heap.push(Entry::new(Task::new(id, priority), seq), &mut self.index);
        self.metrics.record_added(self.heap.len());
    }

    fn reprioritize(&mut self, slot: usize, priority: P) {
        let (previous, new_slot) = self.heap.set_priority_at(slot, priority, &mut self.index);
        self.metrics.priority_changes += 1;
        if let Some(entry) = self.heap.get(new_slot) {
            debug!(
                id = ?entry.task.id(),
                from = ?previous,
                to = ?entry.task.priority(),
                slot = new_slot,
                "Task priority changed"
            );
        }
    }

    fn fail(&mut self, err: SchedulerError) -> SchedulerError {
        self.metrics.record_error(&err);
        err
    }
}
