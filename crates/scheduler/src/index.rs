//! Identifier → heap slot lookup.
//!
//! The index never owns task records; it holds the slot number the heap last
//! reported for each identifier. The heap rewrites those numbers on every swap
//! through [`SlotTracker`], so a lookup is a single hash probe.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use crate::heap::SlotTracker;

#[derive(Debug)]
pub struct IdentifierIndex<K> {
    slots: HashMap<K, usize>,
}

impl<K> Default for IdentifierIndex<K> {
    fn default() -> Self {
        Self { slots: HashMap::new() }
    }
}

impl<K: Hash + Eq + Clone> IdentifierIndex<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: HashMap::with_capacity(capacity),
        }
    }

    /// Records `id` at `slot`, overwriting any previous slot.
    pub fn register(&mut self, id: &K, slot: usize) {
        match self.slots.get_mut(id) {
            Some(current) => *current = slot,
            None => {
                self.slots.insert(id.clone(), slot);
            }
        }
    }

    pub fn unregister<Q>(&mut self, id: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.slots.remove(id)
    }

    pub fn slot_of<Q>(&self, id: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.slots.get(id).copied()
    }

    pub fn contains<Q>(&self, id: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.slots.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> + '_ {
        self.slots.iter().map(|(id, &slot)| (id, slot))
    }
}

impl<K: Hash + Eq + Clone> SlotTracker<K> for IdentifierIndex<K> {
    fn placed(&mut self, id: &K, slot: usize) {
        self.register(id, slot);
    }

    fn evicted(&mut self, id: &K) {
        self.unregister(id);
    }
}
