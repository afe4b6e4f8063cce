//! Orchestration: pull elements from a source, feed a sampler, push snapshots.
//!
//! [`SamplingStage`] holds no sampling logic. It forwards each
//! `(element, timestamp)` pair to its sampler and, on the configured
//! [`Cadence`], hands a [`Snapshot`] to a [`Sink`]. Failures only come from the
//! collaborators and surface as [`StageError`].

use std::convert::Infallible;
use std::marker::PhantomData;
use std::num::NonZeroU64;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::buffer::{Snapshot, Timestamp};
use crate::error::StageError;
use crate::sampler::Sampler;

/// Pull-based stream of timestamped elements. `Ok(None)` is end of stream.
pub trait Source<T> {
    type Error: std::error::Error + Send + Sync + 'static;

    fn next_element(&mut self) -> Result<Option<(T, Timestamp)>, Self::Error>;
}

/// Consumer of sample snapshots (reporting, serialization, evaluation).
pub trait Sink<T> {
    type Error: std::error::Error + Send + Sync + 'static;

    fn emit(&mut self, snapshot: Snapshot<T>) -> Result<(), Self::Error>;
}

/// Adapts any iterator of `(element, timestamp)` pairs into a [`Source`].
#[derive(Debug, Clone)]
pub struct IterSource<I> {
    inner: I,
}

impl<I: Iterator> IterSource<I> {
    /// Wrap anything iterable over `(element, timestamp)` pairs.
    pub fn new(inner: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            inner: inner.into_iter(),
        }
    }
}

impl<T, I: Iterator<Item = (T, Timestamp)>> Source<T> for IterSource<I> {
    type Error = Infallible;

    fn next_element(&mut self) -> Result<Option<(T, Timestamp)>, Self::Error> {
        Ok(self.inner.next())
    }
}

/// Collects every snapshot.
impl<T> Sink<T> for Vec<Snapshot<T>> {
    type Error = Infallible;

    fn emit(&mut self, snapshot: Snapshot<T>) -> Result<(), Self::Error> {
        self.push(snapshot);
        Ok(())
    }
}

/// Wraps a closure as a [`Sink`].
pub struct FnSink<F>(pub F);

impl<T, F, E> Sink<T> for FnSink<F>
where
    F: FnMut(Snapshot<T>) -> Result<(), E>,
    E: std::error::Error + Send + Sync + 'static,
{
    type Error = E;

    fn emit(&mut self, snapshot: Snapshot<T>) -> Result<(), Self::Error> {
        (self.0)(snapshot)
    }
}

/// When the stage emits a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    /// After every `n`-th offer.
    EveryOffers(NonZeroU64),
    /// After the first offer at least this long since the previous emission.
    Interval(Duration),
}

impl Default for Cadence {
    fn default() -> Self {
        Cadence::Interval(Duration::from_secs(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub cadence: Cadence,
    /// Emit a final snapshot when the source is exhausted.
    pub emit_on_end: bool,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            cadence: Cadence::default(),
            emit_on_end: true,
        }
    }
}

impl StageConfig {
    /// Emit after every offer.
    #[must_use]
    pub fn every_offer() -> Self {
        Self {
            cadence: Cadence::EveryOffers(NonZeroU64::MIN),
            emit_on_end: false,
        }
    }
}

/// Totals for one [`SamplingStage::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StageSummary {
    /// Elements offered to the sampler.
    pub offered: u64,
    /// Snapshots delivered to the sink.
    pub snapshots: u64,
}

/// Drives one sampler from a source to a sink.
pub struct SamplingStage<T, S> {
    sampler: S,
    config: StageConfig,
    since_emit: u64,
    last_emit: Instant,
    summary: StageSummary,
    _element: PhantomData<fn(T)>,
}

impl<T: Clone, S: Sampler<T>> SamplingStage<T, S> {
    /// Wrap `sampler`. Under [`Cadence::Interval`] the clock starts here for
    /// push-style use and restarts when [`SamplingStage::run`] begins.
    pub fn new(sampler: S, config: StageConfig) -> Self {
        Self {
            sampler,
            config,
            since_emit: 0,
            last_emit: Instant::now(),
            summary: StageSummary::default(),
            _element: PhantomData,
        }
    }

    /// The wrapped sampler.
    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    /// Consume the stage, returning the sampler with its current sample.
    pub fn into_sampler(self) -> S {
        self.sampler
    }

    /// Running totals, including offers made through `on_element`.
    pub fn summary(&self) -> StageSummary {
        self.summary
    }

    /// Push one element. Returns whether a snapshot was emitted.
    pub fn on_element<K: Sink<T>>(
        &mut self,
        element: T,
        timestamp: Timestamp,
        sink: &mut K,
    ) -> Result<bool, StageError> {
        self.sampler.offer(element, timestamp);
        self.summary.offered += 1;
        self.since_emit += 1;

        if self.due() {
            self.flush(sink)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Emit a snapshot now, regardless of cadence.
    pub fn flush<K: Sink<T>>(&mut self, sink: &mut K) -> Result<(), StageError> {
        let snapshot = self.sampler.snapshot();
        debug!(
            size = snapshot.len(),
            seen = snapshot.seen(),
            "emitting sample snapshot"
        );
        sink.emit(snapshot)
            .map_err(|e| StageError::Sink(Box::new(e)))?;
        self.summary.snapshots += 1;
        self.since_emit = 0;
        self.last_emit = Instant::now();
        Ok(())
    }

    /// Drain `source` into the sampler until end of stream.
    pub fn run<Src: Source<T>, K: Sink<T>>(
        &mut self,
        source: &mut Src,
        sink: &mut K,
    ) -> Result<StageSummary, StageError> {
        info!(
            capacity = self.sampler.capacity(),
            cadence = ?self.config.cadence,
            "sampling stage started"
        );
        self.last_emit = Instant::now();
        while let Some((element, timestamp)) = source
            .next_element()
            .map_err(|e| StageError::Source(Box::new(e)))?
        {
            self.on_element(element, timestamp, sink)?;
        }
        if self.config.emit_on_end && self.since_emit > 0 {
            self.flush(sink)?;
        }
        info!(
            offered = self.summary.offered,
            snapshots = self.summary.snapshots,
            "sampling stage finished"
        );
        Ok(self.summary)
    }

    fn due(&self) -> bool {
        match self.config.cadence {
            Cadence::EveryOffers(n) => self.since_emit >= n.get(),
            Cadence::Interval(every) => self.last_emit.elapsed() >= every,
        }
    }
}

impl<T, S: std::fmt::Debug> std::fmt::Debug for SamplingStage<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SamplingStage")
            .field("sampler", &self.sampler)
            .field("config", &self.config)
            .field("summary", &self.summary)
            .finish()
    }
}
