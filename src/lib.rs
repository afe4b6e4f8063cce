//! `stream-sampler`: bounded-memory samples of unbounded streams.
//!
//! Every sampler observes each element once, in arrival order, and keeps at
//! most `capacity` of them plus O(capacity) bookkeeping.
//!
//! Exposed modules:
//! - `reservoir`: uniform reservoir sampling (Algorithm R).
//! - `biased`: recency-weighted reservoir with exponential time decay.
//! - `priority`: randomized priority sampling over a sliding time window.
//! - `fifo`: the most recent `capacity` elements (deterministic baseline).
//! - `buffer`: the slot storage samplers share, and detached snapshots.
//! - `stage`: source → sampler → sink orchestration.
//! - `config`, `logging`: serde configuration and `tracing` setup.
//!
//! ```
//! use stream_sampler::prelude::*;
//!
//! let mut sampler = UniformReservoirSampler::with_seed(10, 42)?;
//! for i in 0..10_000u32 {
//!     sampler.offer(i, i64::from(i));
//! }
//! assert_eq!(sampler.snapshot().len(), 10);
//! # Ok::<(), stream_sampler::SamplingError>(())
//! ```

#![forbid(unsafe_code)]

pub mod biased;
pub mod buffer;
pub mod config;
pub mod error;
pub mod fifo;
pub mod logging;
pub mod priority;
pub mod reservoir;
pub mod sampler;
pub mod slots;
pub mod stage;

#[cfg(test)]
mod test_rng;

pub use biased::{decay_weight, BiasedReservoirSampler};
pub use buffer::{SampleBuffer, Snapshot, Timestamp, TimestampedItem};
pub use config::{AnySampler, SamplerConfig, SamplerKind};
pub use error::{SamplingError, StageError};
pub use fifo::FifoSampler;
pub use priority::{PrioritySampler, WindowSize};
pub use reservoir::UniformReservoirSampler;
pub use sampler::{Sampler, SamplerStats};
pub use stage::{Cadence, FnSink, IterSource, SamplingStage, Sink, Source, StageConfig, StageSummary};

pub mod prelude {
    pub use crate::{
        AnySampler, BiasedReservoirSampler, FifoSampler, PrioritySampler, Sampler, SamplerConfig,
        SamplerKind, SamplingError, Snapshot, Timestamp, UniformReservoirSampler, WindowSize,
    };
}
