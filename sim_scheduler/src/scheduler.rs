//! Priority Round-Robin Scheduling Engine
//!
//! This module owns the simulation clock and the process collections, and
//! drives every process from arrival to completion.
//!
//! ## Phase order
//!
//! Each loop iteration applies, for the current clock value:
//!
//! 1. **Admission**: processes whose arrival time has been reached join the
//!    tail of the ready queue, in workload order.
//! 2. **Unblock reconciliation**: blocked processes whose I/O has completed
//!    rejoin the tail of the ready queue, in blocked-queue order.
//! 3. **Selection**: the highest-priority ready process, earliest queued
//!    first on ties.
//! 4. **Dispatch**: the selected process runs a full slice, runs until it
//!    blocks, or runs to completion.
//!
//! When nothing is ready the clock jumps to the next unblock or arrival and
//! an idle interval is recorded instead of steps 3 and 4.
//!
//! ## Determinism
//!
//! There is no wall clock and no randomness. The same workload and
//! configuration always yield the same trace.

use crate::config::{SchedulerConfig, SliceExpiry};
use crate::error::SimulationError;
use crate::queue::ReadyQueue;
use crate::trace::{Trace, TraceEvent};
use core_types::{ProcessDescriptor, ProcessId, Tick};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Lifecycle state of a simulated process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessState {
    /// Arrival time not reached yet
    NotArrived,
    /// Waiting in the ready queue
    Ready,
    /// On the CPU; only observable inside a dispatch
    Running,
    /// Waiting for I/O to complete
    Blocked,
    /// Ran to completion
    Finished,
}

impl ProcessState {
    fn name(self) -> &'static str {
        match self {
            ProcessState::NotArrived => "NotArrived",
            ProcessState::Ready => "Ready",
            ProcessState::Running => "Running",
            ProcessState::Blocked => "Blocked",
            ProcessState::Finished => "Finished",
        }
    }
}

/// How a dispatch resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dispatch {
    /// Ran a full time slice and stays ready
    Slice,
    /// Ran out its burst and blocked on I/O
    Block,
    /// Ran its remaining CPU time and finished
    Terminate,
}

impl Dispatch {
    /// Decides which boundary a dispatch hits first
    ///
    /// Blocking wins over finishing when the burst boundary is strictly
    /// tighter than the remaining CPU time.
    pub fn decide(remaining_cpu_time: Tick, remaining_burst: Tick, time_slice: Tick) -> Self {
        if remaining_cpu_time > time_slice {
            if remaining_burst > time_slice {
                Dispatch::Slice
            } else {
                Dispatch::Block
            }
        } else if remaining_cpu_time > remaining_burst {
            Dispatch::Block
        } else {
            Dispatch::Terminate
        }
    }
}

/// Turnaround record for a finished process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub id: ProcessId,
    pub arrival_time: Tick,
    pub finish_time: Tick,
    pub turnaround: Tick,
}

/// Result of a completed simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Every event in emission order, ending with the summary event
    pub trace: Trace,
    /// Finished processes in termination order
    pub completions: Vec<Completion>,
    /// Mean turnaround over all processes
    pub average_turnaround: f64,
    /// Clock value when the last process finished
    pub end_time: Tick,
}

/// Runtime bookkeeping for one process
#[derive(Debug)]
struct ProcessEntry {
    descriptor: ProcessDescriptor,
    state: ProcessState,
    remaining_cpu_time: Tick,
    /// Counts down to zero within the current burst
    remaining_burst: Tick,
    /// Present only while blocked
    unblock_at: Option<Tick>,
}

impl ProcessEntry {
    fn new(descriptor: ProcessDescriptor) -> Self {
        Self {
            state: ProcessState::NotArrived,
            remaining_cpu_time: descriptor.total_cpu_time,
            remaining_burst: descriptor.burst_before_block,
            unblock_at: None,
            descriptor,
        }
    }

    fn make_ready(&mut self) {
        self.state = ProcessState::Ready;
        self.remaining_burst = self.descriptor.burst_before_block;
        self.unblock_at = None;
    }
}

/// Priority Round-Robin scheduler
///
/// Owns the clock and all four process collections. Nothing outside the
/// scheduler mutates them.
pub struct Scheduler {
    config: SchedulerConfig,
    processes: HashMap<ProcessId, ProcessEntry>,
    /// Not yet admitted, in workload order
    not_arrived: Vec<ProcessId>,
    ready: ReadyQueue,
    blocked: VecDeque<ProcessId>,
    finished: Vec<ProcessId>,
    completions: Vec<Completion>,
    now: Tick,
    steps: u64,
    trace: Trace,
}

impl Scheduler {
    /// Creates a scheduler for the given processes
    ///
    /// Descriptors keep their order; it decides admission order among
    /// processes arriving at the same time.
    pub fn new(
        config: SchedulerConfig,
        descriptors: impl IntoIterator<Item = ProcessDescriptor>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;

        let mut processes = HashMap::new();
        let mut not_arrived = Vec::new();
        for descriptor in descriptors {
            if descriptor.total_cpu_time == 0 {
                return Err(SimulationError::InvalidDescriptor {
                    id: descriptor.id,
                    reason: "total CPU time must be greater than zero",
                });
            }
            if descriptor.burst_before_block == 0 {
                return Err(SimulationError::InvalidDescriptor {
                    id: descriptor.id,
                    reason: "burst before block must be greater than zero",
                });
            }
            let id = descriptor.id.clone();
            if processes.contains_key(&id) {
                return Err(SimulationError::DuplicateProcess(id));
            }
            processes.insert(id.clone(), ProcessEntry::new(descriptor));
            not_arrived.push(id);
        }

        log::debug!(
            "scheduler created: {} process(es), time_slice={}, block_duration={}, slice_expiry={:?}",
            processes.len(),
            config.time_slice,
            config.block_duration,
            config.slice_expiry
        );

        Ok(Self {
            config,
            processes,
            not_arrived,
            ready: ReadyQueue::new(),
            blocked: VecDeque::new(),
            finished: Vec::new(),
            completions: Vec::new(),
            now: 0,
            steps: 0,
            trace: Trace::new(),
        })
    }

    /// Admits every process whose arrival time has been reached
    ///
    /// Admitted processes join the ready tail in workload order. Calling
    /// this again without advancing the clock admits nothing. Returns the
    /// number of processes admitted.
    pub fn admit_arrivals(&mut self) -> usize {
        let now = self.now;
        let pending = std::mem::take(&mut self.not_arrived);
        let mut admitted = 0;

        for id in pending {
            let Some(entry) = self.processes.get_mut(&id) else {
                continue;
            };
            if entry.descriptor.arrival_time <= now {
                entry.make_ready();
                log::trace!("t={} admit {}", now, id);
                self.ready.enqueue(id);
                admitted += 1;
            } else {
                self.not_arrived.push(id);
            }
        }

        admitted
    }

    /// Moves blocked processes whose I/O has completed back to ready
    ///
    /// They join the ready tail in blocked-queue order with a fresh burst.
    /// Returns the number of processes unblocked.
    pub fn reconcile_blocked(&mut self) -> usize {
        let now = self.now;
        let blocked = std::mem::take(&mut self.blocked);
        let mut unblocked = 0;

        for id in blocked {
            let Some(entry) = self.processes.get_mut(&id) else {
                continue;
            };
            if entry.unblock_at.is_some_and(|at| at <= now) {
                entry.make_ready();
                log::trace!("t={} unblock {}", now, id);
                self.ready.enqueue(id);
                unblocked += 1;
            } else {
                self.blocked.push_back(id);
            }
        }

        unblocked
    }

    /// Selects the process to dispatch next
    ///
    /// Returns `Ok(None)` if nothing is ready.
    pub fn select(&self) -> Result<Option<ProcessId>, SimulationError> {
        if self.ready.is_empty() {
            return Ok(None);
        }
        self.ready
            .select(|id| self.processes.get(id).map(|entry| entry.descriptor.priority))
            .cloned()
            .map(Some)
            .ok_or(SimulationError::EmptySelection { now: self.now })
    }

    /// Runs a ready process until it hits its next boundary
    ///
    /// Applies the resulting transition and records the trace event.
    pub fn dispatch(&mut self, id: &ProcessId) -> Result<Dispatch, SimulationError> {
        let time_slice = self.config.time_slice;
        let now = self.now;

        let entry = self
            .processes
            .get_mut(id)
            .ok_or_else(|| SimulationError::UnknownProcess(id.clone()))?;
        if entry.state != ProcessState::Ready || !self.ready.contains(id) {
            return Err(SimulationError::NotReady {
                id: id.clone(),
                state: entry.state.name(),
            });
        }

        let decision = Dispatch::decide(entry.remaining_cpu_time, entry.remaining_burst, time_slice);
        let ran = match decision {
            Dispatch::Slice => time_slice,
            Dispatch::Block => entry.remaining_burst,
            Dispatch::Terminate => entry.remaining_cpu_time,
        };
        // Nothing is mutated until the clock arithmetic has succeeded.
        let end = checked_add(now, ran)?;
        let unblock_at = match decision {
            Dispatch::Block => checked_add(end, self.config.block_duration)?,
            _ => end,
        };
        entry.state = ProcessState::Running;

        match decision {
            Dispatch::Slice => {
                entry.remaining_cpu_time -= time_slice;
                entry.remaining_burst -= time_slice;
                entry.state = ProcessState::Ready;
                log::debug!(
                    "t={} {} ran slice of {} ({} left)",
                    now,
                    id,
                    time_slice,
                    entry.remaining_cpu_time
                );
                self.trace.push(TraceEvent::Slice {
                    time: now,
                    process: id.clone(),
                    duration: time_slice,
                });
                self.now = end;
                if self.config.slice_expiry == SliceExpiry::Requeue {
                    self.ready.requeue(id);
                }
            }
            Dispatch::Block => {
                entry.remaining_cpu_time -= ran;
                entry.remaining_burst = entry.descriptor.burst_before_block;
                entry.unblock_at = Some(unblock_at);
                entry.state = ProcessState::Blocked;
                log::debug!(
                    "t={} {} ran {} then blocked until t={}",
                    now,
                    id,
                    ran,
                    unblock_at
                );
                self.trace.push(TraceEvent::Block {
                    time: now,
                    process: id.clone(),
                    duration: ran,
                });
                self.now = end;
                self.ready.remove(id);
                self.blocked.push_back(id.clone());
            }
            Dispatch::Terminate => {
                let finish_time = end;
                let arrival_time = entry.descriptor.arrival_time;
                let turnaround = finish_time - arrival_time;
                entry.remaining_cpu_time = 0;
                entry.state = ProcessState::Finished;
                log::debug!(
                    "t={} {} ran {} and finished (turnaround {})",
                    now,
                    id,
                    ran,
                    turnaround
                );
                self.trace.push(TraceEvent::Terminate {
                    time: now,
                    process: id.clone(),
                    duration: ran,
                });
                self.now = finish_time;
                self.ready.remove(id);
                self.finished.push(id.clone());
                self.completions.push(Completion {
                    id: id.clone(),
                    arrival_time,
                    finish_time,
                    turnaround,
                });
            }
        }

        Ok(decision)
    }

    /// Fast-forwards the clock to the next unblock or arrival
    ///
    /// Only meaningful while the ready queue is empty. A zero-length idle
    /// interval advances nothing and records nothing.
    pub fn idle(&mut self) -> Result<(), SimulationError> {
        let next_unblock = self
            .blocked
            .iter()
            .filter_map(|id| self.processes.get(id).and_then(|entry| entry.unblock_at))
            .min();
        let next_arrival = self
            .not_arrived
            .iter()
            .filter_map(|id| {
                self.processes
                    .get(id)
                    .map(|entry| entry.descriptor.arrival_time)
            })
            .min();

        let target = match (next_unblock, next_arrival) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => return Err(SimulationError::NoRunnableProcess { now: self.now }),
        };

        if target > self.now {
            let duration = target - self.now;
            log::debug!("t={} idle for {}", self.now, duration);
            self.trace.push(TraceEvent::Idle {
                time: self.now,
                duration,
            });
            self.now = target;
        }
        Ok(())
    }

    /// Runs one loop iteration
    ///
    /// Returns the dispatch outcome, or `None` if the iteration idled.
    pub fn step(&mut self) -> Result<Option<Dispatch>, SimulationError> {
        if let Some(limit) = self.config.max_steps {
            if self.steps >= limit {
                return Err(SimulationError::StepLimitExceeded { limit });
            }
        }
        self.steps += 1;

        self.admit_arrivals();
        self.reconcile_blocked();

        match self.select()? {
            Some(id) => self.dispatch(&id).map(Some),
            None => {
                self.idle()?;
                Ok(None)
            }
        }
    }

    /// Runs the simulation until every process has finished
    ///
    /// Appends the summary event and returns the full report. Fails with
    /// [`SimulationError::NoProcesses`] for an empty workload.
    pub fn run(mut self) -> Result<SimulationReport, SimulationError> {
        while !self.is_complete() {
            self.step()?;
        }

        if self.completions.is_empty() {
            return Err(SimulationError::NoProcesses);
        }

        let total: f64 = self
            .completions
            .iter()
            .map(|completion| completion.turnaround as f64)
            .sum();
        let average_turnaround = total / self.completions.len() as f64;

        self.trace.push(TraceEvent::End {
            time: self.now,
            average_turnaround,
        });
        log::info!(
            "simulation finished at t={} after {} step(s): {} process(es), average turnaround {}",
            self.now,
            self.steps,
            self.completions.len(),
            average_turnaround
        );

        Ok(SimulationReport {
            trace: self.trace,
            completions: self.completions,
            average_turnaround,
            end_time: self.now,
        })
    }

    /// Returns true once every process has finished
    pub fn is_complete(&self) -> bool {
        self.finished.len() == self.processes.len()
    }

    /// Returns the current clock value
    pub fn now(&self) -> Tick {
        self.now
    }

    /// Returns the number of loop iterations run so far
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Returns the configuration
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Returns the lifecycle state of a process
    pub fn state_of(&self, id: &ProcessId) -> Option<ProcessState> {
        self.processes.get(id).map(|entry| entry.state)
    }

    /// Returns the CPU time a process still needs
    pub fn remaining_cpu_time(&self, id: &ProcessId) -> Option<Tick> {
        self.processes.get(id).map(|entry| entry.remaining_cpu_time)
    }

    /// Returns the CPU time a process may still use before it blocks
    pub fn remaining_burst(&self, id: &ProcessId) -> Option<Tick> {
        self.processes.get(id).map(|entry| entry.remaining_burst)
    }

    /// Returns when a blocked process becomes ready again
    pub fn unblock_at(&self, id: &ProcessId) -> Option<Tick> {
        self.processes.get(id).and_then(|entry| entry.unblock_at)
    }

    /// Returns the not-yet-arrived processes in workload order
    pub fn pending_ids(&self) -> Vec<ProcessId> {
        self.not_arrived.clone()
    }

    /// Returns the ready queue, head first
    pub fn ready_ids(&self) -> Vec<ProcessId> {
        self.ready.iter().cloned().collect()
    }

    /// Returns the blocked queue, head first
    pub fn blocked_ids(&self) -> Vec<ProcessId> {
        self.blocked.iter().cloned().collect()
    }

    /// Returns finished processes in termination order
    pub fn finished_ids(&self) -> Vec<ProcessId> {
        self.finished.clone()
    }

    /// Returns the events recorded so far
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Returns the turnaround records so far
    pub fn completions(&self) -> &[Completion] {
        &self.completions
    }

    /// Checks that every process sits in exactly the collection its
    /// state names
    pub fn membership_consistent(&self) -> bool {
        let ready_len = self.ready.len();
        let held = self.not_arrived.len() + ready_len + self.blocked.len() + self.finished.len();
        if held != self.processes.len() {
            return false;
        }

        self.processes.iter().all(|(id, entry)| {
            let in_pending = self.not_arrived.contains(id);
            let in_ready = self.ready.contains(id);
            let in_blocked = self.blocked.contains(id);
            let in_finished = self.finished.contains(id);
            let memberships = [in_pending, in_ready, in_blocked, in_finished]
                .iter()
                .filter(|member| **member)
                .count();
            let matches_state = match entry.state {
                ProcessState::NotArrived => in_pending,
                ProcessState::Ready => in_ready,
                ProcessState::Blocked => in_blocked && entry.unblock_at.is_some(),
                ProcessState::Finished => in_finished,
                ProcessState::Running => false,
            };
            memberships == 1 && matches_state
        })
    }
}

fn checked_add(now: Tick, delta: Tick) -> Result<Tick, SimulationError> {
    now.checked_add(delta)
        .ok_or(SimulationError::ClockOverflow { now, delta })
}
