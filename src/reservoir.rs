//! Uniform reservoir sampling.
//!
//! Maintains a uniform sample of size `k` from a stream of unknown length
//! using **Algorithm R** (Vitter, 1985):
//!
//! 1. The first `k` elements fill the reservoir.
//! 2. Element `n` (1-indexed, `n > k`) draws `j ~ Uniform{1..=n}`; if `j <= k`
//!    it replaces slot `j - 1`, otherwise it is discarded.
//!
//! After `n >= k` offers every size-`k` subset of the stream is equally likely
//! to be the current sample, so each element is held with probability `k / n`.
//!
//! ## References
//!
//! - Vitter (1985): *Random Sampling with a Reservoir*.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::buffer::{SampleBuffer, Snapshot, Timestamp, TimestampedItem};
use crate::error::SamplingError;
use crate::sampler::Sampler;

/// A reservoir sampler using Algorithm R.
#[derive(Debug, Clone)]
pub struct UniformReservoirSampler<T, R = ChaCha8Rng> {
    buffer: SampleBuffer<T>,
    seen: u64,
    rng: R,
}

impl<T> UniformReservoirSampler<T, ChaCha8Rng> {
    /// Create a sampler that keeps at most `capacity` elements, seeded from the thread RNG.
    pub fn new(capacity: usize) -> Result<Self, SamplingError> {
        Self::with_rng(capacity, ChaCha8Rng::from_rng(&mut rand::rng()))
    }

    /// Create a sampler with a fixed seed (reproducible runs).
    pub fn with_seed(capacity: usize, seed: u64) -> Result<Self, SamplingError> {
        Self::with_rng(capacity, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<T, R: Rng> UniformReservoirSampler<T, R> {
    /// Create a sampler driven by a caller-supplied RNG.
    pub fn with_rng(capacity: usize, rng: R) -> Result<Self, SamplingError> {
        let buffer = SampleBuffer::new(capacity)?;
        debug!(capacity, "uniform reservoir sampler created");
        Ok(Self {
            buffer,
            seen: 0,
            rng,
        })
    }

    /// Probability that any given element seen so far is in the sample.
    pub fn inclusion_probability(&self) -> f64 {
        if self.seen == 0 {
            0.0
        } else {
            (self.buffer.capacity() as f64 / self.seen as f64).min(1.0)
        }
    }

    /// Read access to the underlying slots.
    pub fn buffer(&self) -> &SampleBuffer<T> {
        &self.buffer
    }
}

impl<T: Clone, R: Rng> Sampler<T> for UniformReservoirSampler<T, R> {
    fn offer(&mut self, element: T, timestamp: Timestamp) {
        self.seen += 1;
        let item = TimestampedItem::new(element, timestamp);

        // Phase 1: filling the reservoir.
        if !self.buffer.is_full() {
            let slot = self.buffer.insert(item);
            debug_assert!(slot.is_ok(), "insert into non-full buffer failed");
            return;
        }

        // Phase 2: replace with probability k / n, uniformly over slots.
        let j = self.rng.random_range(1..=self.seen);
        if j <= self.buffer.capacity() as u64 {
            let slot = (j - 1) as usize;
            self.buffer.replace_at(slot, item);
            trace!(slot, seen = self.seen, "reservoir slot replaced");
        }
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
