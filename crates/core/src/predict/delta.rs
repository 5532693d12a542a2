use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use std::sync::Mutex;

/// Source of the per-row perturbation. Swapped for a fixed source in tests.
pub trait DeltaSource: Send + Sync {
    fn draw(&self, range: RangeInclusive<i64>) -> i64;
}

/// Draws from the calling thread's generator, so concurrent requests never share state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngDelta;

impl DeltaSource for ThreadRngDelta {
    fn draw(&self, range: RangeInclusive<i64>) -> i64 {
        rand::thread_rng().gen_range(range)
    }
}

/// Reproducible draws for offline runs.
#[derive(Debug)]
pub struct SeededDelta {
    rng: Mutex<StdRng>,
}

impl SeededDelta {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl DeltaSource for SeededDelta {
    fn draw(&self, range: RangeInclusive<i64>) -> i64 {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        rng.gen_range(range)
    }
}
