//! The interface shared by every sampler.

use serde::{Deserialize, Serialize};

use crate::buffer::{Snapshot, Timestamp};

/// A single-writer, single-pass stream sampler.
///
/// `offer` is called once per stream element in arrival order. It either
/// admits, replaces, or discards; it never fails.
pub trait Sampler<T: Clone> {
    /// Observe one element with its arrival timestamp.
    fn offer(&mut self, element: T, timestamp: Timestamp);

    /// Detached copy of the current sample. Empty before the first offer.
    fn snapshot(&self) -> Snapshot<T>;

    /// Number of elements offered so far, admitted or not.
    fn seen(&self) -> u64;

    /// Current sample size.
    fn len(&self) -> usize;

    /// Maximum sample size, fixed at construction.
    fn capacity(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn stats(&self) -> SamplerStats {
        SamplerStats::new(self.capacity(), self.len(), self.seen())
    }
}

/// Point-in-time counters for a sampler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplerStats {
    pub capacity: usize,
    pub current_size: usize,
    pub total_seen: u64,
    /// Fraction of the observed stream currently held (1.0 before any offer).
    pub sampling_rate: f64,
}

impl SamplerStats {
    /// Derive the sampling rate from the counts.
    pub fn new(capacity: usize, current_size: usize, total_seen: u64) -> Self {
        let sampling_rate = if total_seen == 0 {
            1.0
        } else {
            (current_size as f64 / total_seen as f64).min(1.0)
        };
        Self {
            capacity,
            current_size,
            total_seen,
            sampling_rate,
        }
    }
}
