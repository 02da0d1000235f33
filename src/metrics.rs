//! Density and flow measurements, and the runs that produce them.

use crate::observer::{NoopObserver, PositionHistory, SampleCollector};
use crate::topology::Coord;
use crate::{Config, ConfigError, Simulation};
use log::info;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The raw counts of the measured segment over one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickMetrics {
    /// The number of vehicles in the segment at the start of the tick.
    pub occupied: usize,
    /// The number of those vehicles that moved during the tick.
    pub moved: usize,
}

impl TickMetrics {
    /// The fraction of segment vehicles that moved, or zero for an empty segment.
    pub fn velocity(&self) -> f64 {
        if self.occupied > 0 {
            self.moved as f64 / self.occupied as f64
        } else {
            0.0
        }
    }

    /// Converts the counts into a sample for a segment of `segment_length` cells.
    pub fn sample(&self, segment_length: usize) -> Sample {
        let density = self.occupied as f64 / segment_length as f64;
        Sample {
            density,
            flow: density * self.velocity(),
        }
    }
}

/// A point on the fundamental diagram.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sample {
    /// Vehicles per cell, `ρ`.
    pub density: f64,
    /// Vehicles passing per tick, `j = ρ⟨v⟩`.
    pub flow: f64,
}

impl Sample {
    /// The mean velocity `⟨v⟩` implied by the sample.
    pub fn velocity(&self) -> f64 {
        if self.density > 0.0 {
            self.flow / self.density
        } else {
            0.0
        }
    }
}

/// The flow of the triangular reference diagram through `(0, 0)`,
/// `(0.5, 0.5)` and `(1, 0)`. Zero outside `[0, 1]`.
pub fn reference_flow(density: f64) -> f64 {
    if (0.0..=1.0).contains(&density) {
        density.min(1.0 - density)
    } else {
        0.0
    }
}

/// The outputs of a full run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunOutput {
    /// The vehicle cells after each tick of the history run.
    pub history: Vec<Vec<Coord>>,
    /// One sample per tick after the warmup of the measurement run.
    pub samples: Vec<Sample>,
}

/// Runs `total_steps` ticks from an empty ring and records every tick's
/// vehicle cells.
pub fn record_history(config: &Config) -> Result<Vec<Vec<Coord>>, ConfigError> {
    let mut sim = Simulation::new(config)?;
    let mut history = PositionHistory::new();
    info!("recording {} ticks of history", config.total_steps);
    sim.run_ticks(config.total_steps, &mut history);
    Ok(history.into_frames())
}

/// Runs `warmup_steps` discarded ticks from an empty ring, then samples
/// density and flow for the remaining ticks.
pub fn measure(config: &Config) -> Result<Vec<Sample>, ConfigError> {
    let mut sim = Simulation::new(config)?;
    info!("warming up for {} ticks", config.warmup_steps);
    sim.run_ticks(config.warmup_steps, &mut NoopObserver);

    let mut collector = SampleCollector::new();
    info!("measuring {} ticks", config.measure_steps());
    sim.run_ticks(config.measure_steps(), &mut collector);
    Ok(collector.into_samples())
}

/// Performs the history run and, separately, the measurement run.
///
/// Both start from an empty ring with the same seed, so the measured ticks
/// replay the tail of the history run exactly.
pub fn run(config: &Config) -> Result<RunOutput, ConfigError> {
    let history = record_history(config)?;
    let samples = measure(config)?;
    info!(
        "run complete: {} frames, {} samples",
        history.len(),
        samples.len()
    );
    Ok(RunOutput { history, samples })
}
