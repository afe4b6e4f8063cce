//! Scripted RNG for golden-value tests.

use rand::RngCore;

/// Replays a fixed cycle of `f64` draws in `[0, 1)`.
///
/// `rng.random::<f64>()` keeps the top 53 bits of `next_u64`, so each scripted
/// fraction comes back unchanged up to 2^-53.
pub(crate) struct ScriptedRng {
    draws: Vec<f64>,
    next: usize,
}

impl ScriptedRng {
    pub(crate) fn new(draws: &[f64]) -> Self {
        assert!(!draws.is_empty(), "ScriptedRng needs at least one draw");
        assert!(draws.iter().all(|d| (0.0..1.0).contains(d)));
        Self {
            draws: draws.to_vec(),
            next: 0,
        }
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let frac = self.draws[self.next % self.draws.len()];
        self.next += 1;
        ((frac * (1u64 << 53) as f64) as u64) << 11
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

#[test]
fn replays_fractions() {
    use rand::Rng;
    let mut rng = ScriptedRng::new(&[0.25, 0.5]);
    assert_eq!(rng.random::<f64>(), 0.25);
    assert_eq!(rng.random::<f64>(), 0.5);
    assert_eq!(rng.random::<f64>(), 0.25);
}
