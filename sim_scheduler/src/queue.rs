//! Ready queue
//!
//! A single FIFO of process handles. Selection never reorders the queue:
//! it scans for the highest priority and keeps the earliest-enqueued
//! candidate on ties, so the queue behaves as one FIFO per priority level.

use core_types::ProcessId;
use std::collections::VecDeque;

/// Ready queue for processes
#[derive(Debug, Default)]
pub(crate) struct ReadyQueue {
    queue: VecDeque<ProcessId>,
}

impl ReadyQueue {
    pub(crate) fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Appends a process to the tail
    pub(crate) fn enqueue(&mut self, id: ProcessId) {
        self.queue.push_back(id);
    }

    /// Picks the highest-priority process, earliest position winning ties
    ///
    /// `priority_of` returns `None` for ids it does not know; those are
    /// skipped.
    pub(crate) fn select<F>(&self, priority_of: F) -> Option<&ProcessId>
    where
        F: Fn(&ProcessId) -> Option<u32>,
    {
        select_highest_priority(
            self.queue
                .iter()
                .filter_map(|id| priority_of(id).map(|priority| (id, priority))),
        )
    }

    /// Moves a process to the tail, keeping everyone else in place
    pub(crate) fn requeue(&mut self, id: &ProcessId) {
        if let Some(index) = self.position(id) {
            if let Some(existing) = self.queue.remove(index) {
                self.queue.push_back(existing);
            }
        }
    }

    /// Removes a process, returning true if it was queued
    pub(crate) fn remove(&mut self, id: &ProcessId) -> bool {
        match self.position(id) {
            Some(index) => self.queue.remove(index).is_some(),
            None => false,
        }
    }

    pub(crate) fn contains(&self, id: &ProcessId) -> bool {
        self.queue.contains(id)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &ProcessId> {
        self.queue.iter()
    }

    fn position(&self, id: &ProcessId) -> Option<usize> {
        self.queue.iter().position(|queued| queued == id)
    }
}

/// Selection rule over a snapshot of `(id, priority)` pairs in queue order
///
/// Returns the first item carrying the numerically highest priority.
pub fn select_highest_priority<'a, I>(candidates: I) -> Option<&'a ProcessId>
where
    I: IntoIterator<Item = (&'a ProcessId, u32)>,
{
    let mut best: Option<(&ProcessId, u32)> = None;
    for (id, priority) in candidates {
        match best {
            // Strictly greater: an equal priority later in the queue never wins.
            Some((_, best_priority)) if priority <= best_priority => {}
            _ => best = Some((id, priority)),
        }
    }
    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn queue_of(names: &[&str]) -> ReadyQueue {
        let mut queue = ReadyQueue::new();
        for name in names {
            queue.enqueue(ProcessId::new(*name));
        }
        queue
    }

    fn names(queue: &ReadyQueue) -> Vec<&str> {
        queue.iter().map(ProcessId::as_str).collect()
    }

    #[test]
    fn test_fifo_order() {
        let queue = queue_of(&["A", "B", "C"]);
        assert_eq!(names(&queue), vec!["A", "B", "C"]);
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn test_select_highest_priority() {
        let queue = queue_of(&["A", "B", "C"]);
        let priorities: HashMap<&str, u32> = [("A", 1), ("B", 3), ("C", 2)].into_iter().collect();
        let selected = queue.select(|id| priorities.get(id.as_str()).copied());
        assert_eq!(selected, Some(&ProcessId::new("B")));
    }

    #[test]
    fn test_select_tie_prefers_earliest() {
        let queue = queue_of(&["A", "B", "C", "D"]);
        let priorities: HashMap<&str, u32> =
            [("A", 1), ("B", 2), ("C", 2), ("D", 2)].into_iter().collect();
        let selected = queue.select(|id| priorities.get(id.as_str()).copied());
        assert_eq!(selected, Some(&ProcessId::new("B")));
    }

    #[test]
    fn test_select_does_not_reorder() {
        let queue = queue_of(&["A", "B"]);
        let _ = queue.select(|_| Some(0));
        assert_eq!(names(&queue), vec!["A", "B"]);
    }

    #[test]
    fn test_select_zero_priority_only() {
        let queue = queue_of(&["A", "B"]);
        assert_eq!(queue.select(|_| Some(0)), Some(&ProcessId::new("A")));
    }

    #[test]
    fn test_select_empty() {
        let queue = ReadyQueue::new();
        assert_eq!(queue.select(|_| Some(1)), None);
    }

    #[test]
    fn test_select_skips_unknown() {
        let queue = queue_of(&["ghost"]);
        assert_eq!(queue.select(|_| None), None);
    }

    #[test]
    fn test_requeue_moves_to_tail() {
        let mut queue = queue_of(&["A", "B", "C"]);
        queue.requeue(&ProcessId::new("A"));
        assert_eq!(names(&queue), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_remove() {
        let mut queue = queue_of(&["A", "B", "C"]);
        assert!(queue.remove(&ProcessId::new("B")));
        assert!(!queue.remove(&ProcessId::new("B")));
        assert_eq!(names(&queue), vec!["A", "C"]);
        assert!(!queue.contains(&ProcessId::new("B")));
    }

    #[test]
    fn test_pure_selection_rule() {
        let a = ProcessId::new("A");
        let b = ProcessId::new("B");
        let c = ProcessId::new("C");
        assert_eq!(
            select_highest_priority(vec![(&a, 5), (&b, 7), (&c, 7)]),
            Some(&b)
        );
        assert_eq!(select_highest_priority(Vec::new()), None);
    }
}
