use rand::{Rng, RngCore};

use crate::errors::{PipelineError, Result};

/// Small deterministic RNG (SplitMix64) used for reproducible row sampling.
#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64_internal(&mut self) -> u64 {
        let mut z = self.state.wrapping_add(0x9E3779B97F4A7C15);
        self.state = z;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }
}

impl RngCore for DeterministicRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64_internal() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_u64_internal()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut offset = 0;
        while offset < dest.len() {
            let value = self.next_u64_internal();
            let bytes = value.to_le_bytes();
            let remaining = dest.len() - offset;
            let copy_len = remaining.min(bytes.len());
            dest[offset..offset + copy_len].copy_from_slice(&bytes[..copy_len]);
            offset += copy_len;
        }
    }
}

/// Deterministic row-level subsampling plus the global accepted-record cap.
///
/// One gate is constructed per run and owns the seeded generator for that
/// run; per-row draws share it across all input files, so decisions depend
/// only on the seed and the row's position in the overall pull order.
#[derive(Debug)]
pub struct SamplingGate {
    probability: f64,
    limit: u64,
    rng: DeterministicRng,
}

impl SamplingGate {
    /// Create a gate keeping each row with probability `probability`
    /// (in `(0, 1]`) and capping accepted records at `limit` (`0` =
    /// unlimited).
    pub fn new(probability: f64, seed: u64, limit: u64) -> Result<Self> {
        if !(probability > 0.0 && probability <= 1.0) {
            return Err(PipelineError::Configuration(format!(
                "sample probability must be in (0, 1], got {probability}"
            )));
        }
        Ok(Self {
            probability,
            limit,
            rng: DeterministicRng::new(seed),
        })
    }

    /// Decide whether the next pulled row passes the gate.
    ///
    /// A probability of exactly 1.0 admits every row without consuming
    /// randomness, so full-corpus runs stay deterministic and draw-free.
    pub fn admit(&mut self) -> bool {
        if self.probability >= 1.0 {
            return true;
        }
        self.rng.random::<f64>() < self.probability
    }

    /// Whether the global accepted-record cap has been reached.
    pub fn limit_reached(&self, accepted: u64) -> bool {
        self.limit > 0 && accepted >= self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decisions(probability: f64, seed: u64, rows: usize) -> Vec<bool> {
        let mut gate = SamplingGate::new(probability, seed, 0).expect("gate");
        (0..rows).map(|_| gate.admit()).collect()
    }

    #[test]
    fn full_probability_admits_every_row() {
        assert!(decisions(1.0, 7, 200).iter().all(|kept| *kept));
    }

    #[test]
    fn full_probability_consumes_no_randomness() {
        let mut gate = SamplingGate::new(1.0, 7, 0).expect("gate");
        let state_before = gate.rng.state;
        for _ in 0..100 {
            gate.admit();
        }
        assert_eq!(gate.rng.state, state_before);
    }

    #[test]
    fn same_seed_reproduces_identical_decisions() {
        let first = decisions(0.5, 1234, 500);
        let second = decisions(0.5, 1234, 500);
        assert_eq!(first, second);
    }

    #[test]
    fn different_seeds_diverge() {
        let first = decisions(0.5, 1, 500);
        let second = decisions(0.5, 2, 500);
        assert_ne!(first, second);
    }

    #[test]
    fn keep_rate_tracks_probability() {
        let kept = decisions(0.25, 99, 10_000).iter().filter(|k| **k).count();
        let rate = kept as f64 / 10_000.0;
        assert!((rate - 0.25).abs() < 0.05, "keep rate was {rate}");
    }

    #[test]
    fn limit_gates_on_accepted_count() {
        let gate = SamplingGate::new(1.0, 0, 3).expect("gate");
        assert!(!gate.limit_reached(2));
        assert!(gate.limit_reached(3));
        assert!(gate.limit_reached(4));

        let unlimited = SamplingGate::new(1.0, 0, 0).expect("gate");
        assert!(!unlimited.limit_reached(u64::MAX));
    }

    #[test]
    fn invalid_probability_is_rejected() {
        assert!(SamplingGate::new(0.0, 0, 0).is_err());
        assert!(SamplingGate::new(-0.5, 0, 0).is_err());
        assert!(SamplingGate::new(1.01, 0, 0).is_err());
    }
}
