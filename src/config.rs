use crate::{ConfigError, SpawnPolicy};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The parameters of a run, fixed before the first tick.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// The population the spawner fills the ring up to.
    pub target_population: usize,
    /// The probability of attempting a spawn on a tick with room to spare.
    pub spawn_probability: f64,
    /// The half-extent `L` of the ring.
    pub half_extent: i32,
    /// The number of ticks in a run.
    pub total_steps: usize,
    /// The number of leading ticks excluded from the measurement.
    pub warmup_steps: usize,
    /// The random seed.
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_population: 10,
            spawn_probability: 0.35,
            half_extent: 25,
            total_steps: 300,
            warmup_steps: 200,
            seed: 1,
        }
    }
}

impl Config {
    /// The number of ticks sampled after the warmup.
    pub fn measure_steps(&self) -> usize {
        self.total_steps.saturating_sub(self.warmup_steps)
    }

    /// Checks that the configuration describes a runnable simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.half_extent <= 0 {
            return Err(ConfigError::HalfExtent(self.half_extent));
        }
        SpawnPolicy::new(self.target_population, self.spawn_probability)?;
        if self.warmup_steps > self.total_steps {
            return Err(ConfigError::WarmupExceedsTotal {
                warmup: self.warmup_steps,
                total: self.total_steps,
            });
        }
        Ok(())
    }
}
