//! Fixed-capacity sample storage.
//!
//! [`SampleBuffer`] is the slot array every sampler owns. Slots are addressed
//! by index `0..len()`; once the buffer is full any slot may be overwritten, so
//! slot order carries no meaning beyond being stable between two mutations.
//! [`Snapshot`] is a detached deep copy handed to downstream consumers.

use serde::{Deserialize, Serialize};

use crate::error::SamplingError;

/// Arrival time of a stream element (logical ticks or epoch milliseconds).
pub type Timestamp = i64;

/// An element together with its sampling metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimestampedItem<T> {
    pub element: T,
    pub timestamp: Timestamp,
    /// Weight at admission time (1.0 where the sampler is unweighted).
    pub weight: f64,
    /// Randomized ordering key in log scale, for samplers that rank by one.
    pub key: Option<f64>,
}

impl<T> TimestampedItem<T> {
    /// An unweighted item (`weight = 1.0`, no key).
    pub fn new(element: T, timestamp: Timestamp) -> Self {
        Self {
            element,
            timestamp,
            weight: 1.0,
            key: None,
        }
    }

    /// An item carrying a weight and a randomized key.
    pub fn keyed(element: T, timestamp: Timestamp, weight: f64, key: f64) -> Self {
        Self {
            element,
            timestamp,
            weight,
            key: Some(key),
        }
    }
}

/// Ordered container of at most `capacity` items.
#[derive(Debug, Clone)]
pub struct SampleBuffer<T> {
    capacity: usize,
    slots: Vec<TimestampedItem<T>>,
}

impl<T> SampleBuffer<T> {
    /// Create an empty buffer. `capacity` must be at least 1.
    pub fn new(capacity: usize) -> Result<Self, SamplingError> {
        if capacity == 0 {
            return Err(SamplingError::InvalidCapacity(capacity));
        }
        Ok(Self {
            capacity,
            slots: Vec::with_capacity(capacity),
        })
    }

    /// Append an item. Fails with [`SamplingError::CapacityExceeded`] when full.
    pub fn insert(&mut self, item: TimestampedItem<T>) -> Result<usize, SamplingError> {
        if self.is_full() {
            return Err(SamplingError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.slots.push(item);
        Ok(self.slots.len() - 1)
    }

    /// Overwrite slot `index` in place, returning the previous occupant.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn replace_at(&mut self, index: usize, item: TimestampedItem<T>) -> TimestampedItem<T> {
        assert!(
            index < self.slots.len(),
            "replace_at: index {index} out of bounds (len {})",
            self.slots.len()
        );
        std::mem::replace(&mut self.slots[index], item)
    }

    /// Remove slot `index`, moving the last slot into the hole.
    ///
    /// Returns the removed item; the moved slot (if any) was previously at
    /// `len()` (after removal).
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn swap_remove(&mut self, index: usize) -> TimestampedItem<T> {
        self.slots.swap_remove(index)
    }

    /// Item in slot `index`, if occupied.
    pub fn get(&self, index: usize) -> Option<&TimestampedItem<T>> {
        self.slots.get(index)
    }

    /// Occupied slots in slot order.
    pub fn iter(&self) -> std::slice::Iter<'_, TimestampedItem<T>> {
        self.slots.iter()
    }

    /// Mutable access to the occupied slots, for in-place metadata updates.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, TimestampedItem<T>> {
        self.slots.iter_mut()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// True once every slot is occupied; later admissions must replace.
    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    /// Maximum number of items the buffer holds.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Clone> SampleBuffer<T> {
    /// Deep copy of the current contents, preserving slot order.
    pub fn snapshot(&self, seen: u64) -> Snapshot<T> {
        Snapshot {
            capacity: self.capacity,
            seen,
            items: self.slots.clone(),
        }
    }
}

/// Immutable point-in-time copy of a sample.
///
/// Owns its items; later offers to the sampler never affect it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<T> {
    capacity: usize,
    seen: u64,
    items: Vec<TimestampedItem<T>>,
}

impl<T> Snapshot<T> {
    /// Items with their metadata, in slot order.
    pub fn items(&self) -> &[TimestampedItem<T>] {
        &self.items
    }

    /// Iterate over the bare elements.
    pub fn elements(&self) -> impl Iterator<Item = &T> + '_ {
        self.items.iter().map(|item| &item.element)
    }

    /// Strip metadata and return the bare elements.
    pub fn into_elements(self) -> Vec<T> {
        self.items.into_iter().map(|item| item.element).collect()
    }

    /// Number of sampled items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the sampler held nothing at snapshot time.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Capacity of the sampler the snapshot was taken from.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Stream elements observed when the snapshot was taken.
    pub fn seen(&self) -> u64 {
        self.seen
    }

    /// Oldest timestamp in the sample.
    pub fn min_timestamp(&self) -> Option<Timestamp> {
        self.items.iter().map(|item| item.timestamp).min()
    }
}
