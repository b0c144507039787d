#[cfg(test)]
mod tests {
    use taskheap_core::{DuplicatePolicy, SchedulerConfig, SchedulerError, Task, TieBreak};

    use crate::scheduler::Scheduler;

    fn scheduler_with(policy: DuplicatePolicy) -> Scheduler<u64, i64> {
        Scheduler::with_config(SchedulerConfig {
            duplicate_policy: policy,
            ..SchedulerConfig::default()
        })
    }

    fn ids(tasks: &[Task<u64, i64>]) -> Vec<u64> {
        tasks.iter().map(|t| *t.id()).collect()
    }

    #[test]
    fn trace_with_priority_bump() {
        let mut scheduler: Scheduler<u64, i64> = Scheduler::new();
        for (id, p) in [(1, 10), (2, 20), (3, 30), (4, 40), (5, 50)] {
            scheduler.add_task(id, p).unwrap();
        }

        assert_eq!(scheduler.get_task().unwrap(), Task::new(5, 50));
        assert_eq!(scheduler.get_task().unwrap(), Task::new(4, 40));

        scheduler.change_task_priority(&1, 100).unwrap();

        assert_eq!(scheduler.get_task().unwrap(), Task::new(1, 100));
        assert_eq!(scheduler.get_task().unwrap(), Task::new(3, 30));
        scheduler.check_invariants().unwrap();
    }

    #[test]
    fn empty_queue_is_recoverable() {
        let mut scheduler: Scheduler<u64, i64> = Scheduler::new();
        assert_eq!(scheduler.get_task(), Err(SchedulerError::EmptyQueue));

        scheduler.add_task(9, 1).unwrap();
        assert_eq!(scheduler.get_task().unwrap(), Task::new(9, 1));
        assert_eq!(scheduler.metrics().empty_queue_errors, 1);
    }

    #[test]
    fn unknown_task_leaves_heap_alone() {
        let mut scheduler: Scheduler<u64, i64> = Scheduler::new();
        scheduler.add_task(1, 10).unwrap();
        scheduler.add_task(2, 20).unwrap();
        let before: Vec<_> = scheduler.iter().cloned().collect();

        let err = scheduler.change_task_priority(&42, 1000).unwrap_err();
        assert_eq!(err, SchedulerError::UnknownTask("42".to_string()));

        let after: Vec<_> = scheduler.iter().cloned().collect();
        assert_eq!(before, after);
        assert_eq!(scheduler.metrics().unknown_task_errors, 1);
        scheduler.check_invariants().unwrap();
    }

    #[test]
    fn duplicate_rejected_by_default() {
        let mut scheduler = scheduler_with(DuplicatePolicy::Reject);
        scheduler.add_task(1, 10).unwrap();

        let err = scheduler.add_task(1, 99).unwrap_err();
        assert!(matches!(err, SchedulerError::DuplicateIdentifier(_)));
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.priority_of(&1), Some(&10));
        assert_eq!(scheduler.metrics().duplicates_rejected, 1);
    }

    #[test]
    fn duplicate_replaced_when_configured() {
        let mut scheduler = scheduler_with(DuplicatePolicy::Replace);
        scheduler.add_task(1, 10).unwrap();
        scheduler.add_task(2, 20).unwrap();

        scheduler.add_task(1, 99).unwrap();
        assert_eq!(scheduler.len(), 2);
        assert_eq!(scheduler.peek().map(|t| *t.id()), Some(1));
        assert_eq!(scheduler.metrics().tasks_added, 2);
        assert_eq!(scheduler.metrics().priority_changes, 1);
        scheduler.check_invariants().unwrap();
    }

    #[test]
    fn add_or_update_ignores_policy() {
        let mut scheduler = scheduler_with(DuplicatePolicy::Reject);
        assert!(scheduler.add_or_update(1, 10));
        assert!(!scheduler.add_or_update(1, 5));
        assert_eq!(scheduler.priority_of(&1), Some(&5));
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn lowering_priority_demotes() {
        let mut scheduler: Scheduler<u64, i64> = Scheduler::new();
        for (id, p) in [(1, 50), (2, 40), (3, 30)] {
            scheduler.add_task(id, p).unwrap();
        }
        scheduler.change_task_priority(&1, 0).unwrap();
        assert_eq!(ids(&scheduler.drain_ordered()), vec![2, 3, 1]);
    }

    #[test]
    fn repeated_change_is_idempotent() {
        let mut scheduler: Scheduler<u64, i64> = Scheduler::new();
        for (id, p) in [(1, 5), (2, 8), (3, 1), (4, 8), (5, 3)] {
            scheduler.add_task(id, p).unwrap();
        }

        scheduler.change_task_priority(&3, 7).unwrap();
        let once: Vec<_> = scheduler.iter().cloned().collect();
        scheduler.change_task_priority(&3, 7).unwrap();
        let twice: Vec<_> = scheduler.iter().cloned().collect();

        assert_eq!(once, twice);
    }

    #[test]
    fn fifo_survives_priority_change() {
        let mut scheduler: Scheduler<u64, i64> = Scheduler::new();
        scheduler.add_task(1, 5).unwrap();
        scheduler.add_task(2, 1).unwrap();
        scheduler.add_task(3, 5).unwrap();

        // Task 2 keeps its original sequence number, so it sits between 1 and 3.
        scheduler.change_task_priority(&2, 5).unwrap();
        assert_eq!(ids(&scheduler.drain_ordered()), vec![1, 2, 3]);
    }

    #[test]
    fn unordered_tie_break_still_orders_by_priority() {
        let mut scheduler: Scheduler<u64, i64> = Scheduler::with_config(SchedulerConfig {
            tie_break: TieBreak::Unordered,
            ..SchedulerConfig::default()
        });
        for (id, p) in [(1, 5), (2, 9), (3, 5), (4, 1)] {
            scheduler.add_task(id, p).unwrap();
        }
        let priorities: Vec<i64> = scheduler
            .drain_ordered()
            .iter()
            .map(|t| *t.priority())
            .collect();
        assert_eq!(priorities, vec![9, 5, 5, 1]);
    }

    #[test]
    fn remove_arbitrary_task() {
        let mut scheduler: Scheduler<u64, i64> = Scheduler::new();
        for id in 1..=7 {
            scheduler.add_task(id, (id * 10) as i64).unwrap();
        }

        assert_eq!(scheduler.remove_task(&3).unwrap(), Task::new(3, 30));
        assert!(!scheduler.contains(&3));
        assert!(matches!(scheduler.remove_task(&3), Err(SchedulerError::UnknownTask(_))));
        scheduler.check_invariants().unwrap();

        assert_eq!(ids(&scheduler.drain_ordered()), vec![7, 6, 5, 4, 2, 1]);
        assert_eq!(scheduler.metrics().tasks_removed, 1);
    }

    #[test]
    fn string_identifiers_borrow_as_str() {
        let mut scheduler: Scheduler<String, u32> = Scheduler::new();
        scheduler.add_task("build".to_string(), 1).unwrap();
        scheduler.add_task("deploy".to_string(), 2).unwrap();

        scheduler.change_task_priority("build", 10).unwrap();
        assert_eq!(scheduler.priority_of("build"), Some(&10));
        assert_eq!(scheduler.get_task().unwrap().id(), "build");
    }

    #[test]
    fn clear_resets_pending_but_keeps_metrics() {
        let mut scheduler: Scheduler<u64, i64> = Scheduler::with_capacity(4);
        for id in 0..10 {
            scheduler.add_task(id, 0).unwrap();
        }
        scheduler.clear();

        assert!(scheduler.is_empty());
        assert!(scheduler.peek().is_none());
        assert_eq!(scheduler.metrics().tasks_added, 10);
        assert_eq!(scheduler.metrics().peak_pending, 10);
        assert_eq!(scheduler.metrics().tasks_removed, 10);
        scheduler.check_invariants().unwrap();

        // Identifiers are free again after a clear.
        scheduler.add_task(0, 1).unwrap();
    }

    #[test]
    fn huge_initial_capacity_is_capped() {
        let mut scheduler: Scheduler<u64, i64> = Scheduler::with_config(SchedulerConfig {
            initial_capacity: usize::MAX,
            ..SchedulerConfig::default()
        });
        scheduler.add_task(1, 10).unwrap();
        scheduler.add_task(2, 20).unwrap();

        assert_eq!(scheduler.config().initial_capacity, usize::MAX);
        assert_eq!(scheduler.get_task().unwrap(), Task::new(2, 20));
        scheduler.check_invariants().unwrap();

        let mut sized: Scheduler<u64, i64> = Scheduler::with_capacity(usize::MAX);
        sized.add_task(3, 30).unwrap();
        assert_eq!(sized.len(), 1);
    }

    #[test]
    fn metrics_balance_after_mixed_operations() {
        let mut scheduler: Scheduler<u64, i64> = Scheduler::new();
        for id in 0..6 {
            scheduler.add_task(id, id as i64).unwrap();
        }
        scheduler.get_task().unwrap();
        scheduler.remove_task(&0).unwrap();
        scheduler.change_task_priority(&1, 100).unwrap();

        let m = scheduler.metrics();
        assert_eq!(m.outstanding(), scheduler.len() as u64);
        assert_eq!(m.priority_changes, 1);
    }
}
