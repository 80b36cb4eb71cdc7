//! Injectable entropy.
//!
//! Every stochastic choice in the cognition layer (jitter, exploration rolls,
//! parameter generation) draws from a [`RandomSource`] so that callers can
//! substitute a seeded or scripted source in tests.

/// Source of uniformly distributed values in `[0, 1)`.
pub trait RandomSource: Send {
    /// Next uniform sample in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// `true` with probability `p` (clamped to `[0, 1]`).
    fn gen_bool(&mut self, p: f64) -> bool {
        self.next_f64() < p.clamp(0.0, 1.0)
    }

    /// Uniform index in `0..len`. Returns 0 when `len` is 0.
    fn gen_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let idx = (self.next_f64() * len as f64) as usize;
        idx.min(len - 1)
    }

    /// Uniform value in `[min, max]`. Interpolates rather than subtracting,
    /// so bounds near `f64::MAX` never produce an infinite span.
    fn gen_range_f64(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        let t = self.next_f64();
        (min * (1.0 - t) + max * t).clamp(min, max)
    }
}

/// Replays a fixed sequence of samples, cycling when exhausted.
///
/// Useful for pinning exploration rolls in tests.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// A source that always returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        value.clamp(0.0, 0.999_999_999)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::RandomSource;

    /// Seeded standard RNG for statistical tests.
    pub struct StdRandom(StdRng);

    impl StdRandom {
        pub fn seeded(seed: u64) -> Self {
            Self(StdRng::seed_from_u64(seed))
        }
    }

    impl RandomSource for StdRandom {
        fn next_f64(&mut self) -> f64 {
            self.0.gen::<f64>()
        }
    }
}
