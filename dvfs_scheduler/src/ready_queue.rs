//! Ready queue for pending task instances
//!
//! Ordering is strict and total: priority descending, then sequence
//! ascending. Sequence values are unique per scheduler, so no two queued
//! instances ever compare equal and extraction order is deterministic.

use crate::error::EmptyQueueError;
use crate::task::TaskInstance;
use std::collections::BinaryHeap;

/// Priority-ordered ready queue
///
/// Backed by a binary max-heap. Capacity is unbounded.
#[derive(Debug, Default, Clone)]
pub struct ReadyQueue {
    heap: BinaryHeap<TaskInstance>,
}

impl ReadyQueue {
    /// Creates an empty ready queue
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    /// Adds a task instance
    ///
    /// The caller is responsible for stamping a fresh sequence first.
    pub fn insert(&mut self, task: TaskInstance) {
        debug_assert!(!task.is_finished(), "finished task {} queued", task.id());
        self.heap.push(task);
    }

    /// Removes and returns the most urgent task
    pub fn extract_max(&mut self) -> Result<TaskInstance, EmptyQueueError> {
        self.heap.pop().ok_or(EmptyQueueError)
    }

    /// Returns the number of queued tasks
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true if no tasks are queued
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Yields every queued task in extraction order without mutating the queue
    ///
    /// Can be called any number of times; identical queue state yields an
    /// identical sequence.
    pub fn peek_all_in_order(&self) -> impl Iterator<Item = &TaskInstance> + '_ {
        let mut order: BinaryHeap<&TaskInstance> = self.heap.iter().collect();
        std::iter::from_fn(move || order.pop())
    }
}
