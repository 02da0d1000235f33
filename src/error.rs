//! Configuration errors.

use thiserror::Error;

/// A run configuration that cannot be simulated.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("ring half-extent must be positive, got {0}")]
    HalfExtent(i32),

    #[error("spawn probability must lie in [0, 1], got {0}")]
    SpawnProbability(f64),

    #[error("warmup of {warmup} ticks exceeds the total of {total} ticks")]
    WarmupExceedsTotal { warmup: usize, total: usize },
}
