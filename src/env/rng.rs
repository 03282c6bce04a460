//! Shared random source for probability gates.
//!
//! Drop resolution draws one uniform value per roll. The source is injected
//! so tests can seed it (or script it outright) while production uses
//! entropy.

use std::sync::Mutex;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Thread-safe uniform random source.
pub trait RandomSource: Send + Sync {
    /// Uniform value in `[0, 1)`.
    fn next_f32(&self) -> f32;
}

/// ChaCha8-backed source shared behind a lock.
#[derive(Debug)]
pub struct ChaChaSource {
    rng: Mutex<ChaCha8Rng>,
}

impl ChaChaSource {
    /// Deterministic source for replays and tests
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::from_entropy()),
        }
    }
}

impl RandomSource for ChaChaSource {
    fn next_f32(&self) -> f32 {
        // A poisoned lock still holds a usable generator
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen::<f32>()
    }
}
