/*!
 * Pacing Policies
 * How long students program between requests and how long help takes
 */

use crate::core::errors::ConfigError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;

/// Source of think / service durations
///
/// The office never interprets these durations; it only sleeps for them.
pub trait Pacing: Send + Sync {
    /// Next duration to spend
    fn delay(&self) -> Duration;

    /// Sleep for the next duration and return it
    fn pause(&self) -> Duration {
        let delay = self.delay();
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        delay
    }
}

/// Built-in delay policies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayPolicy {
    /// No delay at all
    #[default]
    None,
    /// Always the same duration
    Fixed(Duration),
    /// Uniformly random in `[min, max]`
    Uniform { min: Duration, max: Duration },
}

impl DelayPolicy {
    pub fn uniform(min: Duration, max: Duration) -> Self {
        DelayPolicy::Uniform { min, max }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            DelayPolicy::Uniform { min, max } if min > max => Err(ConfigError::InvalidDelayRange {
                min_ms: min.as_millis() as u64,
                max_ms: max.as_millis() as u64,
            }),
            _ => Ok(()),
        }
    }
}

impl Pacing for DelayPolicy {
    fn delay(&self) -> Duration {
        match *self {
            DelayPolicy::None => Duration::ZERO,
            DelayPolicy::Fixed(delay) => delay,
            DelayPolicy::Uniform { min, max } if min >= max => min,
            DelayPolicy::Uniform { min, max } => rand::thread_rng().gen_range(min..=max),
        }
    }
}
