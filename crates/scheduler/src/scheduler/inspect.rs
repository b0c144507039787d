use std::borrow::Borrow;
use std::fmt::Debug;
use std::hash::Hash;

use taskheap_core::{Result, SchedulerConfig, SchedulerError, Task};

use crate::metrics::SchedulerMetrics;

use super::Scheduler;

impl<K, P> Scheduler<K, P>
where
    K: Hash + Eq + Clone + Debug,
    P: Ord + Debug,
{
    /// The task `get_task` would return next, without removing it.
    pub fn peek(&self) -> Option<&Task<K, P>> {
        self.heap.peek().map(|entry| &entry.task)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains<Q>(&self, id: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains(id)
    }

    /// Current priority of a pending task.
    pub fn priority_of<Q>(&self, id: &Q) -> Option<&P>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.index.slot_of(id)?;
        self.heap.get(slot).map(|entry| entry.task.priority())
    }

    /// Pending tasks in heap slot order, which is not priority order.
    pub fn iter(&self) -> impl Iterator<Item = &Task<K, P>> + '_ {
        self.heap.iter().map(|entry| &entry.task)
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn metrics(&self) -> &SchedulerMetrics {
        &self.metrics
    }

    /// Extract every pending task, highest priority first.
    pub fn drain_ordered(&mut self) -> Vec<Task<K, P>> {
        let mut out = Vec::with_capacity(self.len());
        while let Some(entry) = self.heap.pop(&mut self.index) {
            self.metrics.tasks_extracted += 1;
            out.push(entry.task);
        }
        out
    }

    /// Verify the max-heap property and that the heap and index describe the
    /// same set of pending tasks.
    pub fn check_invariants(&self) -> Result<()> {
        if self.heap.len() != self.index.len() {
            return Err(SchedulerError::InvariantViolation(format!(
                "heap holds {} tasks but index holds {}",
                self.heap.len(),
                self.index.len()
            )));
        }

        for (slot, entry) in self.heap.iter().enumerate() {
            let id = entry.task.id();
            match self.index.slot_of(id) {
                Some(indexed) if indexed == slot => {}
                other => {
                    return Err(SchedulerError::InvariantViolation(format!(
                        "task {:?} sits at slot {} but index says {:?}",
                        id, slot, other
                    )));
                }
            }
        }

        if let Some(slot) = self.heap.first_violation() {
            return Err(SchedulerError::InvariantViolation(format!(
                "slot {} outranks its parent slot {}",
                slot,
                (slot - 1) / 2
            )));
        }
        Ok(())
    }
}
