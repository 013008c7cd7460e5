//! Simulated time: arrival, cooking and eating delays

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Minimum cooking time; the random part is added on top
const MIN_COOK_MS: u64 = 100;

/// Source of the random delays a role or group sleeps for
pub trait DelaySource: Send + Sync {
    fn arrival(&self) -> Duration;
    fn cook(&self) -> Duration;
    fn eat(&self) -> Duration;
}

/// Upper bounds (exclusive) of the random delays, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayBounds {
    pub max_arrival_ms: u64,
    pub max_cook_ms: u64,
    pub max_eat_ms: u64,
}

impl Default for DelayBounds {
    fn default() -> Self {
        Self {
            max_arrival_ms: 500,
            max_cook_ms: 200,
            max_eat_ms: 400,
        }
    }
}

pub struct RandomDelay {
    bounds: DelayBounds,
    rng: Mutex<StdRng>,
}

impl RandomDelay {
    pub fn new(bounds: DelayBounds) -> Self {
        Self {
            bounds,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible delays for a given seed
    pub fn seeded(bounds: DelayBounds, seed: u64) -> Self {
        Self {
            bounds,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn below(&self, max_ms: u64) -> u64 {
        if max_ms == 0 {
            return 0;
        }
        self.rng.lock().gen_range(0..max_ms)
    }
}

impl DelaySource for RandomDelay {
    fn arrival(&self) -> Duration {
        Duration::from_millis(self.below(self.bounds.max_arrival_ms))
    }

    fn cook(&self) -> Duration {
        Duration::from_millis(self.below(self.bounds.max_cook_ms) + MIN_COOK_MS)
    }

    fn eat(&self) -> Duration {
        Duration::from_millis(self.below(self.bounds.max_eat_ms))
    }
}

/// Constant delays, for tests and for fully deterministic runs
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedDelay(pub Duration);

impl FixedDelay {
    pub fn zero() -> Self {
        Self(Duration::ZERO)
    }
}

impl DelaySource for FixedDelay {
    fn arrival(&self) -> Duration {
        self.0
    }

    fn cook(&self) -> Duration {
        self.0
    }

    fn eat(&self) -> Duration {
        self.0
    }
}

/// Sleeps for `delay`, skipping the timer entirely for zero
pub async fn pause(delay: Duration) {
    if delay.is_zero() {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(delay).await;
    }
}
