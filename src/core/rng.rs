//! Deterministic random number plumbing.
//!
//! Every decision-maker in a match (the moderator and each agent) owns its
//! own `GameRng` stream so that a fixed global seed reproduces the same
//! match on the cooperative backend. Seed `0` requests OS entropy.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Mixing constant for deriving per-agent seeds from the global seed.
const SEED_MIX: u64 = 0x9E37_79B9;

/// Seed for agent `index` derived from the global seed.
///
/// Returns `0` (= OS entropy) when the global seed itself is 0, so an
/// entropy-seeded match gets independent entropy per agent.
pub fn agent_seed(global: u64, index: usize) -> u64 {
    if global == 0 {
        return 0;
    }
    global ^ SEED_MIX.wrapping_mul(index as u64 + 1)
}

/// Single-stream uniform RNG. Not thread-safe; one instance per owner.
#[derive(Debug, Clone)]
pub struct GameRng {
    inner: ChaCha8Rng,
}

impl GameRng {
    /// Seeded stream; seed `0` draws the stream seed from OS entropy.
    pub fn seeded(seed: u64) -> Self {
        let inner = if seed == 0 {
            ChaCha8Rng::from_entropy()
        } else {
            ChaCha8Rng::seed_from_u64(seed)
        };
        Self { inner }
    }

    /// Uniform integer in the closed range `[lo, hi]`.
    pub fn uniform(&mut self, lo: usize, hi: usize) -> usize {
        debug_assert!(lo <= hi);
        self.inner.gen_range(lo..=hi)
    }

    /// Fair coin flip.
    pub fn coin(&mut self) -> bool {
        self.inner.gen_bool(0.5)
    }

    /// Uniform pick from a slice; `None` on an empty slice.
    pub fn pick<T: Copy>(&mut self, xs: &[T]) -> Option<T> {
        xs.choose(&mut self.inner).copied()
    }

    /// In-place Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, xs: &mut [T]) {
        xs.shuffle(&mut self.inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = GameRng::seeded(1234);
        let mut b = GameRng::seeded(1234);
        for _ in 0..64 {
            assert_eq!(a.uniform(0, 1000), b.uniform(0, 1000));
        }
    }

    #[test]
    fn agent_seeds_are_distinct() {
        let s0 = agent_seed(42, 0);
        let s1 = agent_seed(42, 1);
        let s2 = agent_seed(42, 2);
        assert_ne!(s0, s1);
        assert_ne!(s1, s2);
        assert_ne!(s0, s2);
    }

    #[test]
    fn entropy_seed_propagates_to_agents() {
        assert_eq!(agent_seed(0, 7), 0);
    }

    #[test]
    fn pick_respects_bounds() {
        let mut rng = GameRng::seeded(7);
        let xs = [10usize, 20, 30];
        for _ in 0..32 {
            let v = rng.pick(&xs).unwrap();
            assert!(xs.contains(&v));
        }
        let empty: [usize; 0] = [];
        assert!(rng.pick(&empty).is_none());
    }
}
