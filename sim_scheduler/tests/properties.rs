//! Invariants that must hold for any workload

use core_types::{ProcessDescriptor, ProcessId, Tick};
use proptest::prelude::*;
use sim_scheduler::{EventKind, Scheduler, SchedulerConfig, SliceExpiry, TraceEvent};
use std::collections::HashMap;

const PROPTEST_CASES: u32 = 200;

/// Up to eight processes: (priority, arrival, total CPU, burst)
fn workload_strategy() -> impl Strategy<Value = Vec<ProcessDescriptor>> {
    prop::collection::vec((0u32..4, 0u64..31, 1u64..41, 1u64..13), 1..9).prop_map(|records| {
        records
            .into_iter()
            .enumerate()
            .map(|(index, (priority, arrival, total, burst))| {
                ProcessDescriptor::new(format!("P{}", index), priority, arrival, total, burst)
            })
            .collect()
    })
}

fn config_strategy() -> impl Strategy<Value = SchedulerConfig> {
    (1u64..9, 0u64..11, any::<bool>()).prop_map(|(time_slice, block_duration, requeue)| {
        let expiry = if requeue {
            SliceExpiry::Requeue
        } else {
            SliceExpiry::Retain
        };
        SchedulerConfig::new(time_slice, block_duration)
            .with_slice_expiry(expiry)
            .with_max_steps(100_000)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(PROPTEST_CASES))]

    /// Each process sits in exactly the collection its state names.
    #[test]
    fn membership_holds_after_each_step(
        config in config_strategy(),
        workload in workload_strategy(),
    ) {
        let mut scheduler = Scheduler::new(config, workload).unwrap();
        prop_assert!(scheduler.membership_consistent());
        while !scheduler.is_complete() {
            scheduler.step().unwrap();
            prop_assert!(scheduler.membership_consistent());
        }
    }

    #[test]
    fn admission_and_reconciliation_are_idempotent(
        config in config_strategy(),
        workload in workload_strategy(),
    ) {
        let mut scheduler = Scheduler::new(config, workload).unwrap();
        while !scheduler.is_complete() {
            scheduler.admit_arrivals();
            scheduler.reconcile_blocked();
            let ready = scheduler.ready_ids();
            let blocked = scheduler.blocked_ids();
            let pending = scheduler.pending_ids();

            prop_assert_eq!(scheduler.admit_arrivals(), 0);
            prop_assert_eq!(scheduler.reconcile_blocked(), 0);
            prop_assert_eq!(scheduler.ready_ids(), ready);
            prop_assert_eq!(scheduler.blocked_ids(), blocked);
            prop_assert_eq!(scheduler.pending_ids(), pending);

            scheduler.step().unwrap();
        }
    }

    #[test]
    fn clock_never_moves_backwards(
        config in config_strategy(),
        workload in workload_strategy(),
    ) {
        let report = Scheduler::new(config, workload).unwrap().run().unwrap();
        let times: Vec<Tick> = report.trace.iter().map(TraceEvent::time).collect();
        prop_assert!(times.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    /// Every event starts where the previous one ended.
    #[test]
    fn events_tile_the_timeline(
        config in config_strategy(),
        workload in workload_strategy(),
    ) {
        let report = Scheduler::new(config, workload).unwrap().run().unwrap();
        for pair in report.trace.events().windows(2) {
            let (current, next) = (&pair[0], &pair[1]);
            let duration = current.duration().unwrap();
            prop_assert_eq!(current.time() + duration, next.time());
        }
        let last = report.trace.last().unwrap();
        prop_assert_eq!(last.kind(), EventKind::End);
        prop_assert_eq!(last.time(), report.end_time);
    }

    #[test]
    fn idle_events_are_never_zero_length(
        config in config_strategy(),
        workload in workload_strategy(),
    ) {
        let report = Scheduler::new(config, workload).unwrap().run().unwrap();
        for event in &report.trace {
            if let TraceEvent::Idle { duration, .. } = event {
                prop_assert!(*duration > 0);
            }
        }
    }

    #[test]
    fn cpu_time_is_conserved_per_process(
        config in config_strategy(),
        workload in workload_strategy(),
    ) {
        let report = Scheduler::new(config, workload.clone())
            .unwrap()
            .run()
            .unwrap();
        for descriptor in &workload {
            prop_assert_eq!(
                report.trace.cpu_time_of(&descriptor.id),
                descriptor.total_cpu_time,
                "process {}",
                descriptor.id
            );
        }
    }

    #[test]
    fn turnaround_bounds(
        config in config_strategy(),
        workload in workload_strategy(),
    ) {
        let report = Scheduler::new(config, workload.clone())
            .unwrap()
            .run()
            .unwrap();
        let by_id: HashMap<&ProcessId, &ProcessDescriptor> =
            workload.iter().map(|d| (&d.id, d)).collect();

        prop_assert_eq!(report.completions.len(), workload.len());
        for completion in &report.completions {
            let descriptor = by_id[&completion.id];
            prop_assert!(completion.finish_time >= descriptor.arrival_time);
            prop_assert_eq!(
                completion.turnaround,
                completion.finish_time - descriptor.arrival_time
            );
            prop_assert!(completion.turnaround >= descriptor.total_cpu_time);
        }

        let mean = report
            .completions
            .iter()
            .map(|c| c.turnaround as f64)
            .sum::<f64>()
            / report.completions.len() as f64;
        prop_assert_eq!(report.average_turnaround, mean);
    }

    #[test]
    fn terminate_events_match_completion_order(
        config in config_strategy(),
        workload in workload_strategy(),
    ) {
        let report = Scheduler::new(config, workload).unwrap().run().unwrap();
        let terminated: Vec<&ProcessId> = report
            .trace
            .iter()
            .filter(|event| event.kind() == EventKind::Terminate)
            .filter_map(TraceEvent::process)
            .collect();
        let completed: Vec<&ProcessId> = report.completions.iter().map(|c| &c.id).collect();
        prop_assert_eq!(terminated, completed);
    }

    #[test]
    fn runs_are_deterministic(
        config in config_strategy(),
        workload in workload_strategy(),
    ) {
        let first = Scheduler::new(config.clone(), workload.clone())
            .unwrap()
            .run()
            .unwrap();
        let second = Scheduler::new(config, workload).unwrap().run().unwrap();
        prop_assert_eq!(first.trace.digest(), second.trace.digest());
        prop_assert_eq!(first, second);
    }

    /// Highest ready priority wins; ties go to the earliest queued.
    #[test]
    fn selected_process_has_top_ready_priority(
        config in config_strategy(),
        workload in workload_strategy(),
    ) {
        let priorities: HashMap<ProcessId, u32> = workload
            .iter()
            .map(|d| (d.id.clone(), d.priority))
            .collect();
        let mut scheduler = Scheduler::new(config, workload).unwrap();
        while !scheduler.is_complete() {
            scheduler.admit_arrivals();
            scheduler.reconcile_blocked();
            if let Some(selected) = scheduler.select().unwrap() {
                let ready = scheduler.ready_ids();
                let top = ready.iter().map(|id| priorities[id]).max().unwrap();
                prop_assert_eq!(priorities[&selected], top);
                let first_at_top = ready.iter().find(|id| priorities[*id] == top).unwrap();
                prop_assert_eq!(&selected, first_at_top);
            }
            scheduler.step().unwrap();
        }
    }
}
