//! Turns completions that arrive in any order into an in-order stream.

use log::{trace, warn};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

struct Pending<T> {
    index: usize,
    item: T,
}

impl<T> PartialEq for Pending<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Pending<T> {}

impl<T> PartialOrd for Pending<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Pending<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

/// Holds `(index, item)` completions until every lower index was released
///
/// Items come out strictly by index, starting at zero, with no gaps.
pub struct ReorderBuffer<T> {
    heap: BinaryHeap<Reverse<Pending<T>>>,
    next: usize,
}

impl<T> ReorderBuffer<T> {
    /// Create an empty buffer expecting index 0 first
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next: 0,
        }
    }

    /// Hold a completed item
    ///
    /// Indices that were already released are dropped.
    pub fn push(&mut self, index: usize, item: T) {
        if index < self.next {
            warn!("dropping completion {index}, already released up to {}", self.next);
            return;
        }
        trace!("buffered completion {index}, waiting for {}", self.next);
        self.heap.push(Reverse(Pending { index, item }));
    }

    /// Release the next item if it has arrived
    pub fn pop_ready(&mut self) -> Option<(usize, T)> {
        match self.heap.peek() {
            Some(Reverse(pending)) if pending.index == self.next => {}
            _ => return None,
        }
        let Reverse(pending) = self.heap.pop()?;
        self.next += 1;
        Some((pending.index, pending.item))
    }

    /// Release every item that is now in sequence
    pub fn drain_ready(&mut self) -> Vec<(usize, T)> {
        std::iter::from_fn(|| self.pop_ready()).collect()
    }

    /// Number of items waiting for an earlier index
    pub fn pending(&self) -> usize {
        self.heap.len()
    }

    /// Index the buffer releases next
    pub fn next_index(&self) -> usize {
        self.next
    }
}

impl<T> Default for ReorderBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}
