//! Error types.
//!
//! Configuration problems surface at construction time and are fatal to the
//! instance. Per-element offers never fail (with the single exception of
//! caller-supplied weights, see [`crate::PrioritySampler::offer_weighted`]).

use thiserror::Error;

/// Boxed collaborator error (source or sink side).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by samplers and the buffer they own.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplingError {
    /// Capacity must be at least 1.
    #[error("invalid capacity: must be >= 1 (got {0})")]
    InvalidCapacity(usize),
    /// Decay rate must be finite and >= 0.
    #[error("invalid decay rate: must be finite and >= 0 (got {0})")]
    InvalidDecayRate(f64),
    /// Window size must be >= 0.
    #[error("invalid window size: must be >= 0 (got {0})")]
    InvalidWindowSize(i64),
    /// Weight is not finite (NaN/inf).
    #[error("weight must be finite (got {0})")]
    NonFiniteWeight(f64),
    /// Weight is non-positive.
    #[error("weight must be > 0 (got {0})")]
    NonPositiveWeight(f64),
    /// Low-level insert into a full buffer. Samplers never surface this.
    #[error("sample buffer is full (capacity {capacity})")]
    CapacityExceeded { capacity: usize },
}

/// Errors surfaced by [`crate::SamplingStage`]; only collaborator failures.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("stream source failed")]
    Source(#[source] BoxError),
    #[error("snapshot sink failed")]
    Sink(#[source] BoxError),
}
