use serde::{Deserialize, Serialize};

/// A pending unit of work: a stable identifier plus a mutable priority.
///
/// Higher priority values are more urgent. The identifier never changes for
/// the lifetime of the task; the priority is only changed through the
/// scheduler so that heap order can be restored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Task<K, P> {
    id: K,
    priority: P,
}

impl<K, P> Task<K, P> {
    pub fn new(id: K, priority: P) -> Self {
        Self { id, priority }
    }

    pub fn id(&self) -> &K {
        &self.id
    }

    pub fn priority(&self) -> &P {
        &self.priority
    }

    /// Replace the priority, returning the previous value.
    pub fn set_priority(&mut self, priority: P) -> P {
        std::mem::replace(&mut self.priority, priority)
    }

    pub fn into_parts(self) -> (K, P) {
        (self.id, self.priority)
    }
}
