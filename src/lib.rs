//! A lattice model of traffic on a single-lane ring which folds through a
//! small intersection, used to measure the fundamental diagram of traffic flow.
//!
//! Vehicles enter at the edges of the ring, drive one cell per tick, turn once
//! on each pass through the intersection and wrap around the edges of the
//! lattice. A vehicle whose next cell is taken waits where it is.

pub use config::Config;
pub use error::ConfigError;
pub use metrics::{measure, record_history, reference_flow, run, RunOutput, Sample, TickMetrics};
pub use observer::{NoopObserver, PositionHistory, SampleCollector, SimObserver};
pub use simulation::Simulation;
pub use slotmap::{Key, KeyData};
pub use spawn::{Side, SpawnPolicy};
pub use topology::{Coord, Direction, Ring};
pub use vehicle::Vehicle;
use slotmap::{new_key_type, SlotMap};
use std::collections::HashMap;

mod config;
#[cfg(feature = "debug")]
mod debug;
mod error;
mod metrics;
mod observer;
mod simulation;
mod spawn;
mod topology;
mod vehicle;

new_key_type! {
    /// Unique ID of a [Vehicle].
    pub struct VehicleId;
}

type VehicleSet = SlotMap<VehicleId, Vehicle>;

/// The vehicle occupying each taken cell.
type Occupancy = HashMap<Coord, VehicleId>;
