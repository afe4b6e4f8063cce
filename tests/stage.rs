use std::error::Error as _;
use std::fmt;
use std::num::NonZeroU64;

use stream_sampler::prelude::*;
use stream_sampler::{
    Cadence, FnSink, IterSource, SamplingStage, Source, StageConfig, StageError, StageSummary,
};

#[derive(Debug)]
struct Broken(&'static str);

impl fmt::Display for Broken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for Broken {}

/// Yields `ok` elements, then fails.
struct FlakySource {
    ok: u32,
    next: u32,
}

impl Source<u32> for FlakySource {
    type Error = Broken;

    fn next_element(&mut self) -> Result<Option<(u32, Timestamp)>, Self::Error> {
        if self.next == self.ok {
            return Err(Broken("source went away"));
        }
        self.next += 1;
        Ok(Some((self.next, i64::from(self.next))))
    }
}

fn every(n: u64) -> StageConfig {
    StageConfig {
        cadence: Cadence::EveryOffers(NonZeroU64::new(n).expect("non-zero")),
        emit_on_end: true,
    }
}

#[test]
fn windowed_priority_stage_end_to_end() {
    let sampler = SamplerConfig::priority(8, WindowSize::Ticks(100))
        .with_seed(5)
        .build::<u32>()
        .expect("valid config");
    let mut stage = SamplingStage::new(sampler, every(250));
    let mut sink: Vec<Snapshot<u32>> = Vec::new();
    let mut source = IterSource::new((0..1_000u32).map(|i| (i, i64::from(i))));

    let summary = stage.run(&mut source, &mut sink).expect("infallible collaborators");
    assert_eq!(
        summary,
        StageSummary {
            offered: 1_000,
            snapshots: 4
        }
    );
    for snap in &sink {
        let newest = snap.seen() as i64 - 1;
        assert_eq!(snap.len(), 8);
        assert!(snap.items().iter().all(|it| it.timestamp >= newest - 100));
    }
}

#[test]
fn source_failure_is_surfaced() {
    let sampler = UniformReservoirSampler::with_seed(3, 1).expect("capacity ok");
    let mut stage = SamplingStage::new(sampler, every(2));
    let mut sink: Vec<Snapshot<u32>> = Vec::new();
    let mut source = FlakySource { ok: 5, next: 0 };

    let err = stage.run(&mut source, &mut sink).expect_err("source fails");
    assert!(matches!(err, StageError::Source(_)));
    assert_eq!(
        err.source().map(|e| e.to_string()).as_deref(),
        Some("source went away")
    );
    // Offers before the failure were processed.
    assert_eq!(stage.summary().offered, 5);
    assert_eq!(sink.len(), 2);
}

#[test]
fn sink_failure_is_surfaced() {
    let sampler = FifoSampler::new(2).expect("capacity ok");
    let mut stage = SamplingStage::new(sampler, every(3));
    let mut calls = 0;
    let mut sink = FnSink(|_snapshot: Snapshot<u32>| {
        calls += 1;
        if calls == 2 {
            Err(Broken("disk full"))
        } else {
            Ok(())
        }
    });
    let mut source = IterSource::new((0..20u32).map(|i| (i, 0)));

    let err = stage.run(&mut source, &mut sink).expect_err("sink fails");
    assert!(matches!(err, StageError::Sink(_)));
    assert_eq!(stage.summary().offered, 6);
    assert_eq!(stage.summary().snapshots, 1);
}

#[test]
fn push_style_stage_reports_emissions() {
    let sampler = BiasedReservoirSampler::with_seed(4, 0.1, 9).expect("valid config");
    let mut stage = SamplingStage::new(sampler, StageConfig::every_offer());
    let mut sink: Vec<Snapshot<&str>> = Vec::new();

    for (i, word) in ["a", "b", "c"].into_iter().enumerate() {
        let emitted = stage
            .on_element(word, i as i64, &mut sink)
            .expect("infallible sink");
        assert!(emitted);
    }
    assert_eq!(sink.len(), 3);
    assert_eq!(sink[2].len(), 3);
    let sampler = stage.into_sampler();
    assert_eq!(sampler.seen(), 3);
}
