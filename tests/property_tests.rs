use proptest::prelude::*;
use stream_sampler::prelude::*;
use stream_sampler::SampleBuffer;

fn configs(capacity: usize, seed: u64) -> Vec<SamplerConfig> {
    vec![
        SamplerConfig::uniform(capacity).with_seed(seed),
        SamplerConfig::biased(capacity, 0.0).with_seed(seed),
        SamplerConfig::biased(capacity, 0.3).with_seed(seed),
        SamplerConfig::priority(capacity, WindowSize::Unbounded).with_seed(seed),
        SamplerConfig::fifo(capacity),
    ]
}

proptest! {
    #[test]
    fn prop_size_invariant(
        k in 1usize..20,
        seed in any::<u64>(),
        items in prop::collection::vec(0u32..1000, 0..60)
    ) {
        for config in configs(k, seed) {
            let mut s = config.build::<u32>().expect("valid config");
            for (i, &item) in items.iter().enumerate() {
                s.offer(item, i as i64);
                prop_assert!(s.len() <= k);
            }
            let n = items.len();
            prop_assert_eq!(s.len(), std::cmp::min(n, k));
            prop_assert_eq!(s.seen(), n as u64);
        }
    }

    #[test]
    fn prop_underfilled_keeps_every_element(
        k in 1usize..30,
        seed in any::<u64>(),
        n in 0usize..30
    ) {
        let n = n.min(k);
        for config in configs(k, seed) {
            let mut s = config.build::<usize>().expect("valid config");
            for i in 0..n {
                s.offer(i, i as i64);
            }
            let mut got = s.snapshot().into_elements();
            got.sort_unstable();
            prop_assert_eq!(got, (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn prop_sample_is_subset_of_stream(
        k in 1usize..10,
        seed in any::<u64>(),
        n in 0usize..200
    ) {
        for config in configs(k, seed) {
            let mut s = config.build::<usize>().expect("valid config");
            for i in 0..n {
                s.offer(i, i as i64);
            }
            let snap = s.snapshot();
            let mut got: Vec<usize> = snap.elements().copied().collect();
            got.sort_unstable();
            got.dedup();
            prop_assert_eq!(got.len(), snap.len());
            prop_assert!(got.iter().all(|&e| e < n));
            for item in snap.items() {
                prop_assert_eq!(item.timestamp, item.element as i64);
            }
        }
    }

    #[test]
    fn prop_snapshot_read_is_idempotent(
        k in 1usize..10,
        seed in any::<u64>(),
        n in 0usize..100
    ) {
        for config in configs(k, seed) {
            let mut s = config.build::<usize>().expect("valid config");
            for i in 0..n {
                s.offer(i, i as i64);
            }
            prop_assert_eq!(s.snapshot(), s.snapshot());
        }
    }

    #[test]
    fn prop_window_never_holds_stale_items(
        k in 1usize..12,
        window in 0i64..50,
        seed in any::<u64>(),
        timestamps in prop::collection::vec(0i64..500, 1..150)
    ) {
        let mut s = PrioritySampler::with_seed(k, WindowSize::Ticks(window), seed)
            .expect("valid config");
        let mut max = i64::MIN;
        for (i, &ts) in timestamps.iter().enumerate() {
            max = max.max(ts);
            s.offer(i, ts);
            let snap = s.snapshot();
            prop_assert!(snap.len() <= k);
            prop_assert!(snap.items().iter().all(|it| it.timestamp >= max - window));
        }
        prop_assert_eq!(s.max_timestamp(), Some(max));
        prop_assert_eq!(s.seen(), timestamps.len() as u64);
    }

    #[test]
    fn prop_weighted_priority_size_invariant(
        k in 1usize..10,
        seed in any::<u64>(),
        weights in prop::collection::vec(1e-3f64..1e3, 0..80)
    ) {
        let mut s = PrioritySampler::with_seed(k, WindowSize::Unbounded, seed)
            .expect("valid config");
        for (i, &w) in weights.iter().enumerate() {
            s.offer_weighted(i, i as i64, w).expect("weight ok");
        }
        prop_assert_eq!(s.len(), std::cmp::min(weights.len(), k));
        for item in s.snapshot().items() {
            let key = item.key.expect("priority items carry keys");
            prop_assert!(key.is_finite());
            prop_assert!(key >= item.weight.ln());
        }
    }

    #[test]
    fn prop_buffer_never_exceeds_capacity(
        k in 1usize..10,
        ops in prop::collection::vec(any::<bool>(), 0..40)
    ) {
        let mut buf = SampleBuffer::new(k).expect("capacity ok");
        for (i, insert) in ops.into_iter().enumerate() {
            let item = stream_sampler::TimestampedItem::new(i, i as i64);
            if insert {
                let was_full = buf.is_full();
                prop_assert_eq!(buf.insert(item).is_err(), was_full);
            } else if !buf.is_empty() {
                buf.replace_at(i % buf.len(), item);
            }
            prop_assert!(buf.len() <= buf.capacity());
        }
    }
}
