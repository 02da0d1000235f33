//! Callbacks for collecting data while a simulation runs.

use crate::metrics::{Sample, TickMetrics};
use crate::topology::Coord;
use crate::Simulation;

/// Callbacks invoked by [Simulation::run_ticks] around each tick.
///
/// Every method has a no-op default, so implementors only override what
/// they need.
pub trait SimObserver {
    /// Called before the tick numbered `tick` is simulated.
    fn on_tick_start(&mut self, _tick: usize) {}

    /// Called after the tick numbered `tick` is simulated, with read-only
    /// access to the resulting state and the tick's counts.
    fn on_tick_end(&mut self, _tick: usize, _sim: &Simulation, _metrics: TickMetrics) {}

    /// Called once after the last tick, with the simulation's tick counter.
    fn on_run_end(&mut self, _tick: usize) {}
}

/// An observer that does nothing, used to run ticks whose output is discarded.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Records the cells of every vehicle after each tick.
#[derive(Default)]
pub struct PositionHistory {
    frames: Vec<Vec<Coord>>,
}

impl PositionHistory {
    pub fn new() -> Self {
        Default::default()
    }

    /// The recorded frames, one per tick.
    pub fn frames(&self) -> &[Vec<Coord>] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<Vec<Coord>> {
        self.frames
    }
}

impl SimObserver for PositionHistory {
    fn on_tick_end(&mut self, _tick: usize, sim: &Simulation, _metrics: TickMetrics) {
        self.frames.push(sim.positions());
    }
}

/// Converts each tick's counts into a density/flow sample.
#[derive(Default)]
pub struct SampleCollector {
    samples: Vec<Sample>,
}

impl SampleCollector {
    pub fn new() -> Self {
        Default::default()
    }

    /// The samples collected so far, one per tick.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }
}

impl SimObserver for SampleCollector {
    fn on_tick_end(&mut self, _tick: usize, sim: &Simulation, metrics: TickMetrics) {
        let segment_length = sim.ring().segment_length();
        self.samples.push(metrics.sample(segment_length));
    }
}
