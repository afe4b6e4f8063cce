//! Time-biased (recency-weighted) reservoir sampling.
//!
//! Element `i` arriving at `t_i` carries the decay weight
//!
//! \[
//! w(t_{now}, t_i) = e^{-\lambda (t_{now} - t_i)}, \quad \lambda \ge 0
//! \]
//!
//! and the reservoir approximates sampling without replacement proportional to
//! that weight.
//!
//! ## Weight convention
//!
//! Weights are fixed at admission. Since `e^{-λ t_now}` is a factor common to
//! every element, comparing weights "as of now" is the same as comparing
//! `ln w_i = λ (t_i − t_0)` with `t_0` the key origin, initially the first
//! timestamp seen. No `exp` is ever taken, so long streams cannot overflow.
//! Once `λ (t − t_0)` grows past a threshold the origin moves to `t` and every
//! held key is shifted down by the same amount. Order is unchanged; keys whose
//! weight underflows relative to the newcomer become `-inf`. Keys of new
//! arrivals therefore stay finite for any finite `λ` and any `i64` timestamps.
//!
//! Admission uses the Efraimidis–Spirakis randomized key in log space:
//!
//! \[
//! key_i = \lambda (t_i - t_0) - \ln E_i, \quad E_i = -\ln U_i,\ U_i \sim U(0, 1)
//! \]
//!
//! which orders elements exactly like `U_i^{1/w_i}`. A full reservoir compares
//! the newcomer's key with the current minimum (one draw, one comparison) and
//! replaces the minimum slot when the newcomer is larger. Equal minimum keys
//! resolve to the lowest slot.
//!
//! With `λ = 0` all keys are i.i.d., so the sample is exactly uniform. For a
//! fixed random sequence, raising `λ` only raises the newest element's key
//! relative to older ones, so its retention probability is non-decreasing in `λ`.
//!
//! ## References
//!
//! - Aggarwal (2006): *On Biased Reservoir Sampling in the Presence of Stream Evolution*.
//! - Efraimidis & Spirakis (2006): *Weighted random sampling with a reservoir*.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::buffer::{SampleBuffer, Snapshot, Timestamp, TimestampedItem};
use crate::error::SamplingError;
use crate::sampler::Sampler;
use crate::slots::{OrdKey, SlotQueue};

/// Log weights above this trigger a rebase of the key origin.
const REBASE_LOG_WEIGHT: f64 = 1e9;

/// Decay weight of an element admitted at `then`, observed at `now`.
pub fn decay_weight(decay_rate: f64, now: Timestamp, then: Timestamp) -> f64 {
    (-decay_rate * now.saturating_sub(then) as f64).exp()
}

/// A reservoir sampler biased toward recent elements.
#[derive(Debug, Clone)]
pub struct BiasedReservoirSampler<T, R = ChaCha8Rng> {
    buffer: SampleBuffer<T>,
    keys: SlotQueue<OrdKey>,
    decay_rate: f64,
    origin: Option<Timestamp>,
    seen: u64,
    rng: R,
}

impl<T> BiasedReservoirSampler<T, ChaCha8Rng> {
    /// Create a sampler seeded from the thread RNG.
    pub fn new(capacity: usize, decay_rate: f64) -> Result<Self, SamplingError> {
        Self::with_rng(capacity, decay_rate, ChaCha8Rng::from_rng(&mut rand::rng()))
    }

    /// Create a sampler with a fixed seed (reproducible runs).
    pub fn with_seed(capacity: usize, decay_rate: f64, seed: u64) -> Result<Self, SamplingError> {
        Self::with_rng(capacity, decay_rate, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<T, R: Rng> BiasedReservoirSampler<T, R> {
    /// Create a sampler driven by a caller-supplied RNG.
    ///
    /// `decay_rate` is λ per timestamp unit; it must be finite and `>= 0`.
    pub fn with_rng(capacity: usize, decay_rate: f64, rng: R) -> Result<Self, SamplingError> {
        if !decay_rate.is_finite() || decay_rate < 0.0 {
            return Err(SamplingError::InvalidDecayRate(decay_rate));
        }
        let buffer = SampleBuffer::new(capacity)?;
        debug!(capacity, decay_rate, "biased reservoir sampler created");
        Ok(Self {
            buffer,
            keys: SlotQueue::with_capacity(capacity),
            decay_rate,
            origin: None,
            seen: 0,
            rng,
        })
    }

    /// Decay rate λ per timestamp unit.
    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    /// Decayed weight of a sampled item as of `now`.
    pub fn weight_at(&self, item: &TimestampedItem<T>, now: Timestamp) -> f64 {
        decay_weight(self.decay_rate, now, item.timestamp)
    }

    /// Read access to the underlying slots.
    pub fn buffer(&self) -> &SampleBuffer<T> {
        &self.buffer
    }

    fn key_for(&mut self, timestamp: Timestamp) -> f64 {
        let origin = *self.origin.get_or_insert(timestamp);
        let mut log_weight = self.decay_rate * timestamp.saturating_sub(origin) as f64;
        if log_weight > REBASE_LOG_WEIGHT {
            self.rebase(timestamp, log_weight);
            log_weight = 0.0;
        }
        // U in (0, 1) so that E = -ln U is strictly positive.
        let u = self.rng.random::<f64>().max(f64::MIN_POSITIVE);
        let e = -u.ln();
        log_weight - e.ln()
    }

    /// Move the key origin to `origin`, lowering every held key by `shift`.
    fn rebase(&mut self, origin: Timestamp, shift: f64) {
        for (slot, item) in self.buffer.iter_mut().enumerate() {
            let key = item.key.map_or(f64::NEG_INFINITY, |k| k - shift);
            item.key = Some(key);
            self.keys.push(slot, OrdKey(key));
        }
        self.origin = Some(origin);
        debug!(origin, shift, "biased reservoir key origin rebased");
    }
}

impl<T: Clone, R: Rng> Sampler<T> for BiasedReservoirSampler<T, R> {
    fn offer(&mut self, element: T, timestamp: Timestamp) {
        self.seen += 1;
        let key = self.key_for(timestamp);
        // Weight at admission is w(t, t) = 1.
        let item = TimestampedItem::keyed(element, timestamp, 1.0, key);

        if !self.buffer.is_full() {
            match self.buffer.insert(item) {
                Ok(slot) => self.keys.push(slot, OrdKey(key)),
                Err(err) => debug_assert!(false, "insert into non-full buffer: {err}"),
            }
            return;
        }

        let Some((slot, OrdKey(min_key))) = self.keys.peek() else {
            return;
        };
        if key > min_key {
            self.buffer.replace_at(slot, item);
            self.keys.push(slot, OrdKey(key));
            trace!(slot, key, min_key, "biased reservoir slot replaced");
        } else {
            trace!(key, min_key, "biased reservoir offer discarded");
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
