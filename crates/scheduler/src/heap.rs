//! Array-backed binary max-heap with slot tracking.
//!
//! Every time an entry lands in a new slot (push, swap during a sift,
//! swap-with-last on removal) the heap reports it to a [`SlotTracker`], so an
//! external index can resolve identifiers to slots without scanning.
//!
//! ```text
//!            slot 0 (max)
//!           /            \
//!       slot 1          slot 2
//!       /    \          /    \
//!   slot 3  slot 4  slot 5  slot 6      parent(i) = (i-1)/2
//! ```
//!
//! # Invariants
//!
//! - For every slot `i > 0`: `entry(parent(i))` is not lower than `entry(i)`.
//! - Valid slots are exactly `[0, len)`.
//! - After any public mutation, the tracker has been told the final slot of
//!   every entry that moved, and told about every entry that left.

use std::cmp::Ordering;

use taskheap_core::{Task, TieBreak};

/// Receives slot movements from the heap.
pub trait SlotTracker<K> {
    /// `id` now lives at `slot`.
    fn placed(&mut self, id: &K, slot: usize);

    /// `id` left the heap.
    fn evicted(&mut self, id: &K);
}

/// No-op tracker for a heap used without an index.
impl<K> SlotTracker<K> for () {
    fn placed(&mut self, _id: &K, _slot: usize) {}
    fn evicted(&mut self, _id: &K) {}
}

/// A heap slot: the task plus its insertion sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, P> {
    pub task: Task<K, P>,
    /// Monotonic insertion counter, used for FIFO tie-breaking.
    pub seq: u64,
}

impl<K, P> Entry<K, P> {
    pub fn new(task: Task<K, P>, seq: u64) -> Self {
        Self { task, seq }
    }
}

#[derive(Debug)]
pub struct PriorityHeap<K, P> {
    entries: Vec<Entry<K, P>>,
    tie_break: TieBreak,
}

impl<K, P: Ord> PriorityHeap<K, P> {
    pub fn new(tie_break: TieBreak) -> Self {
        Self::with_capacity(0, tie_break)
    }

    pub fn with_capacity(capacity: usize, tie_break: TieBreak) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            tie_break,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// The maximum entry, without removing it.
    pub fn peek(&self) -> Option<&Entry<K, P>> {
        self.entries.first()
    }

    pub fn get(&self, slot: usize) -> Option<&Entry<K, P>> {
        self.entries.get(slot)
    }

    /// Entries in slot order (not priority order).
    pub fn iter(&self) -> std::slice::Iter<'_, Entry<K, P>> {
        self.entries.iter()
    }

    /// Appends `entry` and sifts it up. Returns its final slot.
    pub fn push(&mut self, entry: Entry<K, P>, tracker: &mut impl SlotTracker<K>) -> usize {
        let slot = self.entries.len();
        tracker.placed(entry.task.id(), slot);
        self.entries.push(entry);
        self.sift_up(slot, tracker)
    }

    /// Removes and returns the maximum entry, or `None` when empty.
    pub fn pop(&mut self, tracker: &mut impl SlotTracker<K>) -> Option<Entry<K, P>> {
        if self.entries.is_empty() {
            return None;
        }
        Some(self.remove_at(0, tracker))
    }

    /// Removes the entry at `slot` by swapping in the last entry and sifting
    /// that one up or down.
    ///
    /// # Panics
    ///
    /// Panics if `slot >= len`. Callers resolve slots through the tracker, so
    /// an out-of-range slot means the index and heap disagree.
    pub fn remove_at(&mut self, slot: usize, tracker: &mut impl SlotTracker<K>) -> Entry<K, P> {
        let removed = self.entries.swap_remove(slot);
        tracker.evicted(removed.task.id());

        if slot < self.entries.len() {
            tracker.placed(self.entries[slot].task.id(), slot);
            self.restore(slot, tracker);
        }
        removed
    }

    /// Overwrites the priority at `slot` and restores order from that slot
    /// only. Returns the previous priority and the entry's final slot.
    pub fn set_priority_at(
        &mut self,
        slot: usize,
        priority: P,
        tracker: &mut impl SlotTracker<K>,
    ) -> (P, usize) {
        let previous = self.entries[slot].task.set_priority(priority);
        let slot = self.restore(slot, tracker);
        (previous, slot)
    }

    /// One sift up, or if the entry did not move, one sift down.
    pub fn restore(&mut self, slot: usize, tracker: &mut impl SlotTracker<K>) -> usize {
        let moved = self.sift_up(slot, tracker);
        if moved != slot {
            return moved;
        }
        self.sift_down(slot, tracker)
    }

    /// Sifts the entry at `pos` toward the root. Returns the final slot.
    pub fn sift_up(&mut self, mut pos: usize, tracker: &mut impl SlotTracker<K>) -> usize {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.higher(pos, parent) {
                break;
            }
            self.swap_slots(pos, parent, tracker);
            pos = parent;
        }
        pos
    }

    /// Sifts the entry at `pos` toward the leaves. Returns the final slot.
    pub fn sift_down(&mut self, mut pos: usize, tracker: &mut impl SlotTracker<K>) -> usize {
        let len = self.entries.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut largest = pos;

            if left < len && self.higher(left, largest) {
                largest = left;
            }
            if right < len && self.higher(right, largest) {
                largest = right;
            }
            if largest == pos {
                return pos;
            }

            self.swap_slots(pos, largest, tracker);
            pos = largest;
        }
    }

    /// Drops every entry, reporting each one as evicted.
    pub fn clear(&mut self, tracker: &mut impl SlotTracker<K>) {
        for entry in self.entries.drain(..) {
            tracker.evicted(entry.task.id());
        }
    }

    /// First slot whose entry outranks its parent, if any.
    pub fn first_violation(&self) -> Option<usize> {
        (1..self.entries.len()).find(|&i| self.higher(i, (i - 1) / 2))
    }

    /// Total order used by the heap: priority, then (for FIFO) the earlier
    /// sequence number.
    pub fn compare(&self, a: &Entry<K, P>, b: &Entry<K, P>) -> Ordering {
        let by_priority = a.task.priority().cmp(b.task.priority());
        match self.tie_break {
            TieBreak::Fifo => by_priority.then_with(|| b.seq.cmp(&a.seq)),
            TieBreak::Unordered => by_priority,
        }
    }

    /// `true` if the entry at slot `a` strictly outranks the one at `b`.
    fn higher(&self, a: usize, b: usize) -> bool {
        self.compare(&self.entries[a], &self.entries[b]) == Ordering::Greater
    }

    fn swap_slots(&mut self, a: usize, b: usize, tracker: &mut impl SlotTracker<K>) {
        self.entries.swap(a, b);
        tracker.placed(self.entries[a].task.id(), a);
        tracker.placed(self.entries[b].task.id(), b);
    }
}
