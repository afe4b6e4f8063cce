//! FIFO "sampler": the `capacity` most recent offers.
//!
//! Not a random sample. Useful as a deterministic baseline next to the
//! reservoir samplers when comparing how well each tracks a drifting stream.

use tracing::debug;

use crate::buffer::{SampleBuffer, Snapshot, Timestamp, TimestampedItem};
use crate::error::SamplingError;
use crate::sampler::Sampler;

/// Ring of the last `capacity` elements, stored in a [`SampleBuffer`].
#[derive(Debug, Clone)]
pub struct FifoSampler<T> {
    buffer: SampleBuffer<T>,
    /// Slot the next offer overwrites once the buffer is full.
    cursor: usize,
    seen: u64,
}

impl<T> FifoSampler<T> {
    /// Create a sampler holding the last `capacity` offers.
    pub fn new(capacity: usize) -> Result<Self, SamplingError> {
        let buffer = SampleBuffer::new(capacity)?;
        debug!(capacity, "fifo sampler created");
        Ok(Self {
            buffer,
            cursor: 0,
            seen: 0,
        })
    }

    /// Elements in arrival order, oldest first.
    pub fn ordered(&self) -> impl Iterator<Item = &TimestampedItem<T>> + '_ {
        let split = if self.buffer.is_full() { self.cursor } else { 0 };
        (split..self.buffer.len())
            .chain(0..split)
            .filter_map(|i| self.buffer.get(i))
    }
}

impl<T: Clone> Sampler<T> for FifoSampler<T> {
    fn offer(&mut self, element: T, timestamp: Timestamp) {
        self.seen += 1;
        let item = TimestampedItem::new(element, timestamp);
        if !self.buffer.is_full() {
            let slot = self.buffer.insert(item);
            debug_assert!(slot.is_ok(), "insert into non-full buffer failed");
            return;
        }
        self.buffer.replace_at(self.cursor, item);
        self.cursor = (self.cursor + 1) % self.buffer.capacity();
    }

    fn snapshot(&self) -> Snapshot<T> {
        self.buffer.snapshot(self.seen)
    }

    fn seen(&self) -> u64 {
        self.seen
    }

    fn len(&self) -> usize {
        self.buffer.len()
    }

    fn capacity(&self) -> usize {
        self.buffer.capacity()
    }
}
