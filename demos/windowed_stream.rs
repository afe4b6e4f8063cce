//! Sample a drifting stream three ways and compare the sample means.
//!
//! The stream's mean jumps from 0 to 10 halfway through. The uniform reservoir
//! lags behind, the biased reservoir and the windowed priority sampler follow
//! the shift.
//!
//! Run with `RUST_LOG=stream_sampler=debug` to see stage events.

use std::convert::Infallible;
use std::num::NonZeroU64;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use stream_sampler::logging::{init_logging, LogConfig};
use stream_sampler::prelude::*;
use stream_sampler::{Cadence, FnSink, IterSource, SamplingStage, StageConfig};

const STREAM_LEN: u32 = 20_000;

fn drifting_stream(seed: u64) -> impl Iterator<Item = (f64, Timestamp)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..STREAM_LEN).map(move |i| {
        let center = if i < STREAM_LEN / 2 { 0.0 } else { 10.0 };
        let noise: f64 = rng.random_range(-1.0..1.0);
        (center + noise, i64::from(i))
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LogConfig::default())?;

    let configs = [
        ("uniform", SamplerConfig::uniform(200)),
        ("biased", SamplerConfig::biased(200, 0.001)),
        ("priority", SamplerConfig::priority(200, WindowSize::Ticks(2_000))),
    ];

    for (name, config) in configs {
        let sampler = config.with_seed(7).build::<f64>()?;
        let stage_config = StageConfig {
            cadence: Cadence::EveryOffers(NonZeroU64::new(5_000).ok_or("zero cadence")?),
            emit_on_end: true,
        };
        let mut stage = SamplingStage::new(sampler, stage_config);
        let mut sink = FnSink(|snapshot: Snapshot<f64>| {
            let mean = snapshot.elements().sum::<f64>() / snapshot.len().max(1) as f64;
            println!(
                "{name:>8}  seen={:>6}  size={:>3}  mean={mean:>6.2}",
                snapshot.seen(),
                snapshot.len()
            );
            Ok::<(), Infallible>(())
        });
        let summary = stage.run(&mut IterSource::new(drifting_stream(1)), &mut sink)?;
        println!("{name:>8}  done: {summary:?}");
        println!();
    }

    Ok(())
}
