//! Thread-safe scheduler handle with blocking consumers.
//!
//! Every operation takes the one mutex guarding the whole heap+index pair,
//! so an add, a priority change and an extraction never interleave. Waiting
//! for work lives only here; the core [`Scheduler`] never blocks.

use std::borrow::Borrow;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use taskheap_core::{Result, SchedulerConfig, SchedulerError, Task};

use crate::scheduler::Scheduler;

struct State<K, P> {
    scheduler: Scheduler<K, P>,
    closed: bool,
}

struct Inner<K, P> {
    state: Mutex<State<K, P>>,
    available: Condvar,
}

/// Cloneable handle to a scheduler shared between producers and consumers.
pub struct SharedScheduler<K, P> {
    inner: Arc<Inner<K, P>>,
}

impl<K, P> Clone for SharedScheduler<K, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, P> SharedScheduler<K, P>
where
    K: Hash + Eq + Clone + Debug,
    P: Ord + Debug,
{
    pub fn new(scheduler: Scheduler<K, P>) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    scheduler,
                    closed: false,
                }),
                available: Condvar::new(),
            }),
        }
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        Self::new(Scheduler::with_config(config))
    }

    // A poison means a priority type's `Ord` panicked mid-operation. The
    // guard is only handed back if the heap and index still agree; otherwise
    // the lock stays poisoned and every checked call reports the violation.
    fn lock(&self) -> Result<MutexGuard<'_, State<K, P>>> {
        match self.inner.state.lock() {
            Ok(guard) => Ok(guard),
            Err(poisoned) => self.recover(poisoned.into_inner()),
        }
    }

    fn recover<'a>(
        &'a self,
        guard: MutexGuard<'a, State<K, P>>,
    ) -> Result<MutexGuard<'a, State<K, P>>> {
        if let Err(err) = guard.scheduler.check_invariants() {
            warn!(error = %err, "Poisoned scheduler is inconsistent");
            return Err(err);
        }
        self.inner.state.clear_poison();
        warn!(pending = guard.scheduler.len(), "Recovered poisoned scheduler lock");
        Ok(guard)
    }

    // Flag and length reads stay available on a poisoned lock.
    fn lock_unchecked(&self) -> MutexGuard<'_, State<K, P>> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a task and wake one waiting consumer. Fails with `Closed` after
    /// [`close`](Self::close).
    pub fn add_task(&self, id: K, priority: P) -> Result<()> {
        let mut state = self.lock()?;
        if state.closed {
            return Err(SchedulerError::Closed);
        }
        state.scheduler.add_task(id, priority)?;
        self.inner.available.notify_one();
        Ok(())
    }

    pub fn add_or_update(&self, id: K, priority: P) -> Result<bool> {
        let mut state = self.lock()?;
        if state.closed {
            return Err(SchedulerError::Closed);
        }
        let created = state.scheduler.add_or_update(id, priority);
        if created {
            self.inner.available.notify_one();
        }
        Ok(created)
    }

    pub fn change_task_priority<Q>(&self, id: &Q, priority: P) -> Result<()>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        self.lock()?.scheduler.change_task_priority(id, priority)
    }

    pub fn remove_task<Q>(&self, id: &Q) -> Result<Task<K, P>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        self.lock()?.scheduler.remove_task(id)
    }

    /// Non-blocking extraction; `EmptyQueue` when nothing is pending.
    pub fn try_get_task(&self) -> Result<Task<K, P>> {
        self.lock()?.scheduler.get_task()
    }

    /// Block until a task is available. Once the handle is closed, remaining
    /// tasks are still handed out; after that this returns `Closed`.
    pub fn wait_task(&self) -> Result<Task<K, P>> {
        let mut state = self.lock()?;
        loop {
            if !state.scheduler.is_empty() {
                return state.scheduler.get_task();
            }
            if state.closed {
                return Err(SchedulerError::Closed);
            }
            state = match self.inner.available.wait(state) {
                Ok(guard) => guard,
                Err(poisoned) => self.recover(poisoned.into_inner())?,
            };
        }
    }

    /// Like [`wait_task`](Self::wait_task) but gives up with `Timeout` once
    /// `timeout` has elapsed. A timeout too large to express as a deadline
    /// waits without one.
    pub fn wait_task_timeout(&self, timeout: Duration) -> Result<Task<K, P>> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.wait_task();
        };
        let mut state = self.lock()?;
        loop {
            if !state.scheduler.is_empty() {
                return state.scheduler.get_task();
            }
            if state.closed {
                return Err(SchedulerError::Closed);
            }
            let now = Instant::now();
            if now >= deadline {
                debug!(timeout_ms = timeout.as_millis() as u64, "Wait for task timed out");
                return Err(SchedulerError::Timeout(timeout.as_millis() as u64));
            }
            state = match self.inner.available.wait_timeout(state, deadline - now) {
                Ok((guard, _)) => guard,
                Err(poisoned) => self.recover(poisoned.into_inner().0)?,
            };
        }
    }

    /// Stop accepting tasks and wake every blocked consumer.
    pub fn close(&self) {
        let mut state = self.lock_unchecked();
        if !state.closed {
            state.closed = true;
            info!(pending = state.scheduler.len(), "Shared scheduler closed");
        }
        self.inner.available.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock_unchecked().closed
    }

    pub fn len(&self) -> usize {
        self.lock_unchecked().scheduler.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_unchecked().scheduler.is_empty()
    }

    /// Run `f` against the scheduler under the lock, for read-only inspection.
    /// A poisoned scheduler is passed through as-is so `f` can call
    /// [`Scheduler::check_invariants`].
    pub fn with_scheduler<R>(&self, f: impl FnOnce(&Scheduler<K, P>) -> R) -> R {
        f(&self.lock_unchecked().scheduler)
    }
}
