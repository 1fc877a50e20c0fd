//! Shared random source for the turn engine and enemy selection

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{Mutex, MutexGuard};

pub struct Dice {
    rng: Mutex<StdRng>,
}

impl Dice {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic dice, for tests and replays
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().await
    }
}
