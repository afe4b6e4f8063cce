//! Sampler configuration.
//!
//! Plain serde types so a host can embed them in its own config files; this
//! crate never reads files itself.
//!
//! ```
//! use stream_sampler::prelude::*;
//!
//! let config = SamplerConfig::priority(64, WindowSize::Ticks(10_000)).with_seed(7);
//! let mut sampler = config.build::<f64>().unwrap();
//! sampler.offer(1.5, 0);
//! assert_eq!(sampler.len(), 1);
//! ```

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::biased::BiasedReservoirSampler;
use crate::buffer::{Snapshot, Timestamp};
use crate::error::SamplingError;
use crate::fifo::FifoSampler;
use crate::priority::{PrioritySampler, WindowSize};
use crate::reservoir::UniformReservoirSampler;
use crate::sampler::Sampler;

/// Which algorithm to run, with its algorithm-specific parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SamplerKind {
    Uniform,
    Biased {
        decay_rate: f64,
    },
    Priority {
        #[serde(default)]
        window: WindowSize,
    },
    Fifo,
}

/// Everything needed to construct a sampler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    pub capacity: usize,
    /// Fixed seed for reproducible runs; `None` seeds from the thread RNG.
    #[serde(default)]
    pub random_seed: Option<u64>,
    pub kind: SamplerKind,
}

impl SamplerConfig {
    /// Uniform reservoir of `capacity` elements.
    #[must_use]
    pub const fn uniform(capacity: usize) -> Self {
        Self {
            capacity,
            random_seed: None,
            kind: SamplerKind::Uniform,
        }
    }

    /// Time-biased reservoir with decay rate λ per timestamp unit.
    #[must_use]
    pub const fn biased(capacity: usize, decay_rate: f64) -> Self {
        Self {
            capacity,
            random_seed: None,
            kind: SamplerKind::Biased { decay_rate },
        }
    }

    /// Priority sampler over a sliding `window`.
    #[must_use]
    pub const fn priority(capacity: usize, window: WindowSize) -> Self {
        Self {
            capacity,
            random_seed: None,
            kind: SamplerKind::Priority { window },
        }
    }

    /// The last `capacity` offers.
    #[must_use]
    pub const fn fifo(capacity: usize) -> Self {
        Self {
            capacity,
            random_seed: None,
            kind: SamplerKind::Fifo,
        }
    }

    /// Fix the RNG seed for reproducible runs.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Check the configuration without building anything.
    pub fn validate(&self) -> Result<(), SamplingError> {
        if self.capacity == 0 {
            return Err(SamplingError::InvalidCapacity(self.capacity));
        }
        match self.kind {
            SamplerKind::Biased { decay_rate } if !decay_rate.is_finite() || decay_rate < 0.0 => {
                Err(SamplingError::InvalidDecayRate(decay_rate))
            }
            SamplerKind::Priority { window } => window.validate().map(|_| ()),
            _ => Ok(()),
        }
    }

    /// Construct the configured sampler.
    pub fn build<T>(&self) -> Result<AnySampler<T>, SamplingError> {
        let rng = match self.random_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };
        let sampler = match self.kind {
            SamplerKind::Uniform => {
                AnySampler::Uniform(UniformReservoirSampler::with_rng(self.capacity, rng)?)
            }
            SamplerKind::Biased { decay_rate } => AnySampler::Biased(
                BiasedReservoirSampler::with_rng(self.capacity, decay_rate, rng)?,
            ),
            SamplerKind::Priority { window } => {
                AnySampler::Priority(PrioritySampler::with_rng(self.capacity, window, rng)?)
            }
            SamplerKind::Fifo => AnySampler::Fifo(FifoSampler::new(self.capacity)?),
        };
        Ok(sampler)
    }
}

/// A sampler chosen at runtime from a [`SamplerConfig`].
#[derive(Debug, Clone)]
pub enum AnySampler<T> {
    Uniform(UniformReservoirSampler<T>),
    Biased(BiasedReservoirSampler<T>),
    Priority(PrioritySampler<T>),
    Fifo(FifoSampler<T>),
}

impl<T: Clone> Sampler<T> for AnySampler<T> {
    fn offer(&mut self, element: T, timestamp: Timestamp) {
        match self {
            AnySampler::Uniform(s) => s.offer(element, timestamp),
            AnySampler::Biased(s) => s.offer(element, timestamp),
            AnySampler::Priority(s) => s.offer(element, timestamp),
            AnySampler::Fifo(s) => s.offer(element, timestamp),
        }
    }

    fn snapshot(&self) -> Snapshot<T> {
        match self {
            AnySampler::Uniform(s) => s.snapshot(),
            AnySampler::Biased(s) => s.snapshot(),
            AnySampler::Priority(s) => s.snapshot(),
            AnySampler::Fifo(s) => s.snapshot(),
        }
    }

    fn seen(&self) -> u64 {
        match self {
            AnySampler::Uniform(s) => s.seen(),
            AnySampler::Biased(s) => s.seen(),
            AnySampler::Priority(s) => s.seen(),
            AnySampler::Fifo(s) => s.seen(),
        }
    }

    fn len(&self) -> usize {
        match self {
            AnySampler::Uniform(s) => s.len(),
            AnySampler::Biased(s) => s.len(),
            AnySampler::Priority(s) => s.len(),
            AnySampler::Fifo(s) => s.len(),
        }
    }

    fn capacity(&self) -> usize {
        match self {
            AnySampler::Uniform(s) => s.capacity(),
            AnySampler::Biased(s) => s.capacity(),
            AnySampler::Priority(s) => s.capacity(),
            AnySampler::Fifo(s) => s.capacity(),
        }
    }
}
