//! Buffer slots ranked by key.
//!
//! Samplers keep their items in a [`crate::SampleBuffer`] and need the slot
//! holding the minimum key (lowest priority, oldest timestamp) without
//! scanning the buffer on every offer. [`SlotQueue`] indexes slots in a
//! `DoublePriorityQueue` whose priority is `(key, slot)`, so equal keys
//! resolve to the lowest slot.

use std::cmp::Ordering;

use priority_queue::DoublePriorityQueue;

/// `f64` under the IEEE total order, usable as a queue priority.
#[derive(Debug, Clone, Copy)]
pub struct OrdKey(pub f64);

impl PartialEq for OrdKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrdKey {}

impl PartialOrd for OrdKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrdKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Min-queue over buffer slots.
#[derive(Debug, Clone)]
pub struct SlotQueue<K: Ord> {
    queue: DoublePriorityQueue<usize, (K, usize)>,
}

impl<K: Ord + Copy> SlotQueue<K> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: DoublePriorityQueue::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Key currently tracked for `slot`.
    pub fn key(&self, slot: usize) -> Option<K> {
        self.queue.get_priority(&slot).map(|&(key, _)| key)
    }

    /// Slot with the smallest `(key, slot)` pair.
    pub fn peek(&self) -> Option<(usize, K)> {
        self.queue.peek_min().map(|(&slot, &(key, _))| (slot, key))
    }

    /// Track `slot` with `key`, replacing any key it already had.
    pub fn push(&mut self, slot: usize, key: K) {
        self.queue.push(slot, (key, slot));
    }

    /// Stop tracking `slot`, returning its key.
    pub fn remove(&mut self, slot: usize) -> Option<K> {
        self.queue.remove(&slot).map(|(_, (key, _))| key)
    }

    /// Re-address a slot after the buffer moved its item from `from` to `to`.
    pub fn relabel(&mut self, from: usize, to: usize) {
        if from == to {
            return;
        }
        if let Some(key) = self.remove(from) {
            self.push(to, key);
        }
    }
}
