//! Priority sampling over a sliding time window.
//!
//! Each offer draws `u ~ Uniform(0, 1]` and gets the priority `w / u`
//! (larger weight, stochastically larger priority). Priorities are held in log
//! scale, `ln w − ln u`, which orders identically and stays finite for every
//! finite weight. The sampler keeps the `capacity` largest keys among elements
//! that are still inside the window:
//!
//! 1. `max_timestamp ← max(max_timestamp, t)`.
//! 2. Every held element with `timestamp < max_timestamp − window` is evicted,
//!    regardless of key. Expiry runs before admission.
//! 3. With room left the newcomer is inserted; otherwise it replaces the
//!    minimum-key element if its key is strictly larger, else it is discarded.
//!
//! An element that is already outside the window when it arrives counts as
//! seen and as expired; it never displaces a live element.
//!
//! Keys and timestamps are both tracked in slot-indexed min-queues, so each
//! offer costs `O(log k)` plus `O(log k)` per expired element.
//!
//! ## References
//!
//! - Duffield, Lund, Thorup (2007): *Priority sampling for estimation of arbitrary subset sums*.
//! - Babcock, Datar, Motwani (2002): *Sampling from a moving window over streaming data*.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::buffer::{SampleBuffer, Snapshot, Timestamp, TimestampedItem};
use crate::error::SamplingError;
use crate::sampler::Sampler;
use crate::slots::{OrdKey, SlotQueue};

/// Extent of the sliding window, in timestamp units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowSize {
    /// No expiry: plain priority sampling.
    #[default]
    Unbounded,
    /// Keep elements with `timestamp >= max_timestamp - ticks`.
    Ticks(i64),
}

impl WindowSize {
    /// Reject negative window extents.
    pub fn validate(self) -> Result<Self, SamplingError> {
        match self {
            WindowSize::Ticks(w) if w < 0 => Err(SamplingError::InvalidWindowSize(w)),
            _ => Ok(self),
        }
    }

    /// Oldest timestamp still inside the window, given the newest one seen.
    pub fn horizon(self, max_timestamp: Timestamp) -> Option<Timestamp> {
        match self {
            WindowSize::Unbounded => None,
            WindowSize::Ticks(w) => Some(max_timestamp.saturating_sub(w)),
        }
    }
}

/// Windowed priority sampler.
#[derive(Debug, Clone)]
pub struct PrioritySampler<T, R = ChaCha8Rng> {
    buffer: SampleBuffer<T>,
    by_key: SlotQueue<OrdKey>,
    by_time: SlotQueue<Timestamp>,
    window: WindowSize,
    max_timestamp: Option<Timestamp>,
    seen: u64,
    expired: u64,
    rng: R,
}

impl<T> PrioritySampler<T, ChaCha8Rng> {
    /// Create a sampler seeded from the thread RNG.
    pub fn new(capacity: usize, window: WindowSize) -> Result<Self, SamplingError> {
        Self::with_rng(capacity, window, ChaCha8Rng::from_rng(&mut rand::rng()))
    }

    /// Create a sampler with a fixed seed (reproducible runs).
    pub fn with_seed(capacity: usize, window: WindowSize, seed: u64) -> Result<Self, SamplingError> {
        Self::with_rng(capacity, window, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<T, R: Rng> PrioritySampler<T, R> {
    /// Create a sampler driven by a caller-supplied RNG.
    pub fn with_rng(capacity: usize, window: WindowSize, rng: R) -> Result<Self, SamplingError> {
        let window = window.validate()?;
        let buffer = SampleBuffer::new(capacity)?;
        debug!(capacity, ?window, "priority sampler created");
        Ok(Self {
            buffer,
            by_key: SlotQueue::with_capacity(capacity),
            by_time: SlotQueue::with_capacity(capacity),
            window,
            max_timestamp: None,
            seen: 0,
            expired: 0,
            rng,
        })
    }

    /// Offer an element with an explicit weight (must be finite and `> 0`).
    pub fn offer_weighted(
        &mut self,
        element: T,
        timestamp: Timestamp,
        weight: f64,
    ) -> Result<(), SamplingError> {
        if !weight.is_finite() {
            return Err(SamplingError::NonFiniteWeight(weight));
        }
        if weight <= 0.0 {
            return Err(SamplingError::NonPositiveWeight(weight));
        }
        self.admit(element, timestamp, weight);
        Ok(())
    }

    /// Configured window extent.
    pub fn window(&self) -> WindowSize {
        self.window
    }

    /// Newest timestamp observed so far.
    pub fn max_timestamp(&self) -> Option<Timestamp> {
        self.max_timestamp
    }

    /// Elements dropped because they fell out of the window (including on arrival).
    pub fn expired(&self) -> u64 {
        self.expired
    }

    /// Read access to the underlying slots.
    pub fn buffer(&self) -> &SampleBuffer<T> {
        &self.buffer
    }

    fn admit(&mut self, element: T, timestamp: Timestamp, weight: f64) {
        self.seen += 1;
        let max = self.max_timestamp.map_or(timestamp, |m| m.max(timestamp));
        self.max_timestamp = Some(max);
        self.evict_expired(max);

        // u in (0, 1].
        let u = 1.0 - self.rng.random::<f64>();
        let key = weight.ln() - u.ln();

        if self.window.horizon(max).is_some_and(|h| timestamp < h) {
            self.expired += 1;
            trace!(timestamp, max, "priority offer expired on arrival");
            return;
        }

        let item = TimestampedItem::keyed(element, timestamp, weight, key);
        if !self.buffer.is_full() {
            match self.buffer.insert(item) {
                Ok(slot) => {
                    self.by_key.push(slot, OrdKey(key));
                    self.by_time.push(slot, timestamp);
                }
                Err(err) => debug_assert!(false, "insert into non-full buffer: {err}"),
            }
            return;
        }

        let Some((slot, OrdKey(min_key))) = self.by_key.peek() else {
            return;
        };
        if key > min_key {
            self.buffer.replace_at(slot, item);
            self.by_key.push(slot, OrdKey(key));
            self.by_time.push(slot, timestamp);
            trace!(slot, key, min_key, "priority slot replaced");
        } else {
            trace!(key, min_key, "priority offer discarded");
        }
    }

    fn evict_expired(&mut self, max_timestamp: Timestamp) {
        let Some(horizon) = self.window.horizon(max_timestamp) else {
            return;
        };
        while let Some((slot, ts)) = self.by_time.peek() {
            if ts >= horizon {
                break;
            }
            self.remove_slot(slot);
            self.expired += 1;
            trace!(slot, timestamp = ts, horizon, "priority element expired");
        }
    }

    fn remove_slot(&mut self, slot: usize) {
        self.by_key.remove(slot);
        self.by_time.remove(slot);
        let last = self.buffer.len() - 1;
        self.buffer.swap_remove(slot);
        if slot != last {
            self.by_key.relabel(last, slot);
            self.by_time.relabel(last, slot);
        }
    }
}

impl<T: Clone, R: Rng> Sampler<T> for PrioritySampler<T, R> {
    fn offer(&mut self, element: T, timestamp: Timestamp) {
        self.admit(element, timestamp, 1.0);
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
