//! Statistical guarantees, checked over many seeded trials.
//!
//! Every test is deterministic (seeds `0..trials`), so a pass is stable.

use stream_sampler::prelude::*;

const TRIALS: u64 = 10_000;

/// Per-id inclusion counts over `TRIALS` runs of `n` offers.
fn inclusion_counts(n: usize, build: impl Fn(u64) -> AnySampler<usize>) -> Vec<u64> {
    let mut counts = vec![0u64; n];
    for seed in 0..TRIALS {
        let mut s = build(seed);
        for i in 0..n {
            s.offer(i, i as i64);
        }
        for &id in s.snapshot().elements() {
            counts[id] += 1;
        }
    }
    counts
}

fn assert_converges_to(counts: &[u64], expected_rate: f64) {
    let expected = expected_rate * TRIALS as f64;
    for (id, &c) in counts.iter().enumerate() {
        let rel = (c as f64 - expected).abs() / expected;
        assert!(
            rel < 0.05,
            "id {id}: count={c}, expected~{expected:.0}, relative error {rel:.4}"
        );
    }
}

#[test]
fn uniform_inclusion_converges_to_k_over_n() {
    let (k, n) = (5, 10);
    let counts = inclusion_counts(n, |seed| {
        SamplerConfig::uniform(k)
            .with_seed(seed)
            .build()
            .expect("valid config")
    });
    assert_converges_to(&counts, k as f64 / n as f64);
}

#[test]
fn biased_without_decay_is_uniform() {
    let (k, n) = (5, 10);
    let counts = inclusion_counts(n, |seed| {
        SamplerConfig::biased(k, 0.0)
            .with_seed(seed)
            .build()
            .expect("valid config")
    });
    assert_converges_to(&counts, k as f64 / n as f64);
}

#[test]
fn unweighted_unbounded_priority_is_uniform() {
    let (k, n) = (5, 10);
    let counts = inclusion_counts(n, |seed| {
        SamplerConfig::priority(k, WindowSize::Unbounded)
            .with_seed(seed)
            .build()
            .expect("valid config")
    });
    assert_converges_to(&counts, k as f64 / n as f64);
}

#[test]
fn newest_retention_is_monotone_in_decay_rate() {
    let (k, n) = (5, 50);
    let rates = [0.0, 0.01, 0.05, 0.2, 1.0];
    let trials = 2_000;

    let retained: Vec<u64> = rates
        .iter()
        .map(|&rate| {
            (0..trials)
                .filter(|&seed| {
                    let mut s =
                        BiasedReservoirSampler::with_seed(k, rate, seed).expect("valid config");
                    for i in 0..n {
                        s.offer(i, i as i64);
                    }
                    s.snapshot().elements().any(|&e| e == n - 1)
                })
                .count() as u64
        })
        .collect();

    for pair in retained.windows(2) {
        assert!(pair[0] <= pair[1], "retention not monotone: {retained:?}");
    }
    // λ = 0 keeps the newest at rate k/n = 10%; strong decay keeps it almost always.
    assert!(retained[0] < trials * 15 / 100, "{retained:?}");
    assert!(retained[4] > trials * 95 / 100, "{retained:?}");
}

#[test]
fn decay_shifts_sample_toward_recent_elements() {
    let (k, n) = (10, 200);
    let mean_age = |rate: f64| -> f64 {
        let mut total = 0.0;
        for seed in 0..500 {
            let mut s = BiasedReservoirSampler::with_seed(k, rate, seed).expect("valid config");
            for i in 0..n {
                s.offer(i, i as i64);
            }
            let snap = s.snapshot();
            total += snap.elements().map(|&e| (n - 1 - e) as f64).sum::<f64>() / snap.len() as f64;
        }
        total / 500.0
    };
    let uniform_age = mean_age(0.0);
    let biased_age = mean_age(0.05);
    assert!(
        biased_age < uniform_age / 2.0,
        "uniform mean age {uniform_age:.1}, biased {biased_age:.1}"
    );
}
