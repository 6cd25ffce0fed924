//! Time source abstraction.
//!
//! Every timestamp, cooldown, window, and recency boost the engine computes
//! goes through a [`Clock`], so tests can drive time deterministically.

use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};

pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> {
    Utc::now()
  }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
  current: RwLock<DateTime<Utc>>,
}

impl ManualClock {
  pub fn starting_at(at: DateTime<Utc>) -> Self {
    Self { current: RwLock::new(at) }
  }

  pub fn advance(&self, by: Duration) {
    let mut current = self.current.write().expect("clock poisoned");
    *current = *current + by;
  }

  pub fn set(&self, to: DateTime<Utc>) {
    *self.current.write().expect("clock poisoned") = to;
  }
}

impl Clock for ManualClock {
  fn now(&self) -> DateTime<Utc> {
    *self.current.read().expect("clock poisoned")
  }
}
