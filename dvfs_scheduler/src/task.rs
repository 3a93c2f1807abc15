//! Queued task instances

use core_types::{Priority, TaskId, TaskSpec};
use std::cmp::Ordering;

/// A task waiting in (or just popped from) the ready queue
///
/// `remaining_ms` starts at `burst_ms` and only ever decreases. `sequence`
/// is restamped on every enqueue and exists only to break priority ties.
#[derive(Debug, Clone)]
pub struct TaskInstance {
    id: TaskId,
    burst_ms: u64,
    remaining_ms: u64,
    priority: Priority,
    sequence: u64,
}

impl TaskInstance {
    /// Creates a fresh instance with all of its work outstanding
    pub fn new(spec: TaskSpec, sequence: u64) -> Self {
        Self {
            id: spec.id,
            burst_ms: spec.burst_ms,
            remaining_ms: spec.burst_ms,
            priority: spec.priority,
            sequence,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn burst_ms(&self) -> u64 {
        self.burst_ms
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns true once all work has been executed
    pub fn is_finished(&self) -> bool {
        self.remaining_ms == 0
    }

    /// Executes up to `quantum_ms` of work and returns the slice length
    ///
    /// The slice never exceeds the remaining work, so `remaining_ms` stops
    /// at exactly zero.
    pub fn execute(&mut self, quantum_ms: u64) -> u64 {
        let slice = quantum_ms.min(self.remaining_ms);
        self.remaining_ms -= slice;
        slice
    }

    /// Restamps the tie-break sequence before re-insertion
    pub(crate) fn restamp(&mut self, sequence: u64) {
        self.sequence = sequence;
    }
}

// BinaryHeap is a max-heap: higher priority wins, then the earlier sequence.
impl Ord for TaskInstance {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for TaskInstance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for TaskInstance {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TaskInstance {}
