#[cfg(feature = "debug")]
use crate::debug::DebugFrame;
use crate::metrics::TickMetrics;
use crate::observer::SimObserver;
use crate::spawn::SpawnPolicy;
use crate::topology::{Coord, Direction, Ring};
use crate::vehicle::Vehicle;
use crate::{Config, ConfigError, Occupancy, VehicleId, VehicleSet};
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A traffic simulation on a ring.
pub struct Simulation {
    /// The lattice.
    ring: Ring,
    /// Decides when new vehicles enter.
    spawner: SpawnPolicy,
    /// The vehicles being simulated. Vehicles are never removed,
    /// so slot order is spawn order.
    vehicles: VehicleSet,
    /// The vehicle in each taken cell.
    occupancy: Occupancy,
    /// The number of ticks simulated so far.
    tick: usize,
    /// The source of randomness for spawning.
    rng: StdRng,
    /// Debugging information from the previously simulated tick.
    #[cfg(feature = "debug")]
    debug: DebugFrame,
}

impl Simulation {
    /// Creates an empty simulation from a validated configuration.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            ring: Ring::new(config.half_extent),
            spawner: SpawnPolicy::new(config.target_population, config.spawn_probability)?,
            vehicles: VehicleSet::with_key(),
            occupancy: Occupancy::new(),
            tick: 0,
            rng: StdRng::seed_from_u64(config.seed),
            #[cfg(feature = "debug")]
            debug: DebugFrame::default(),
        })
    }

    /// Places a vehicle directly onto the ring, behind all existing vehicles
    /// in processing order.
    ///
    /// Returns `None` if the cell is taken or the ring is already at its
    /// target population.
    pub fn place_vehicle(&mut self, pos: Coord, dir: Direction) -> Option<VehicleId> {
        if self.vehicles.len() >= self.spawner.target() || self.occupancy.contains_key(&pos) {
            return None;
        }
        Some(self.insert_vehicle(pos, dir))
    }

    /// Advances the simulation by one tick and returns the measured segment's
    /// counts for the tick.
    pub fn step(&mut self) -> TickMetrics {
        #[cfg(feature = "debug")]
        self.debug.clear();

        self.rebuild_occupancy();
        self.spawn();

        // Vehicles spawned this tick are already counted here.
        let ring = self.ring;
        let occupied = self
            .vehicles
            .values()
            .filter(|vehicle| ring.in_measured_segment(vehicle.pos()))
            .count();

        let moved = self.move_vehicles();
        self.tick += 1;

        let metrics = TickMetrics { occupied, moved };
        trace!("tick {}: {:?}", self.tick, metrics);
        metrics
    }

    /// Runs `n` ticks, reporting each one to `observer`.
    pub fn run_ticks<O: SimObserver>(&mut self, n: usize, observer: &mut O) {
        for _ in 0..n {
            let now = self.tick;
            observer.on_tick_start(now);
            let metrics = self.step();
            observer.on_tick_end(now, self, metrics);
        }
        observer.on_run_end(self.tick);
    }

    /// Gets the number of ticks simulated so far.
    pub fn tick(&self) -> usize {
        self.tick
    }

    /// Gets the lattice the simulation runs on.
    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    /// Gets the number of vehicles on the ring.
    pub fn population(&self) -> usize {
        self.vehicles.len()
    }

    /// Returns an iterator over all the vehicles in spawn order.
    pub fn iter_vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    /// Gets a reference to the vehicle with the given ID.
    pub fn get_vehicle(&self, vehicle_id: VehicleId) -> &Vehicle {
        &self.vehicles[vehicle_id]
    }

    /// Gets the cells of all the vehicles in spawn order.
    pub fn positions(&self) -> Vec<Coord> {
        self.vehicles.values().map(Vehicle::pos).collect()
    }

    /// Gets the debugging information for the previously simulated tick as a JSON array.
    #[cfg(feature = "debug")]
    pub fn debug(&self) -> serde_json::Value {
        self.debug.to_json()
    }

    fn insert_vehicle(&mut self, pos: Coord, dir: Direction) -> VehicleId {
        let id = self
            .vehicles
            .insert_with_key(|id| Vehicle::new(id, pos, dir));
        self.occupancy.insert(pos, id);
        id
    }

    /// Derives the occupancy from the current vehicle positions.
    fn rebuild_occupancy(&mut self) {
        self.occupancy.clear();
        self.occupancy
            .extend(self.vehicles.iter().map(|(id, vehicle)| (vehicle.pos(), id)));
    }

    /// Lets the spawn policy add at most one vehicle.
    fn spawn(&mut self) {
        let entry = self.spawner.pick(
            self.vehicles.len(),
            &self.occupancy,
            self.ring.half_extent(),
            &mut self.rng,
        );
        if let Some((pos, dir)) = entry {
            let id = self.insert_vehicle(pos, dir);
            debug!("spawned {:?} at {:?} heading {:?}", id, pos, dir);
            #[cfg(feature = "debug")]
            self.debug.spawn(id, pos);
        }
    }

    /// Moves every vehicle in spawn order, so earlier vehicles claim contested
    /// cells first. Returns how many vehicles left a measured cell.
    fn move_vehicles(&mut self) -> usize {
        let ring = self.ring;
        let mut moved = 0;

        for (id, vehicle) in &mut self.vehicles {
            if vehicle.apply_turn() {
                debug!("{:?} turned {:?} at {:?}", id, vehicle.dir(), vehicle.pos());
                #[cfg(feature = "debug")]
                self.debug.turn(id, vehicle.pos());
            }

            let from = vehicle.pos();
            let to = vehicle.next_pos(&ring);
            match self.occupancy.get(&to) {
                None => {
                    self.occupancy.remove(&from);
                    self.occupancy.insert(to, id);
                    vehicle.move_to(to);
                    if ring.in_measured_segment(from) && to != from {
                        moved += 1;
                    }
                }
                Some(&_blocker) => {
                    trace!("{:?} blocked at {:?}", id, from);
                    #[cfg(feature = "debug")]
                    self.debug.blocked(id, from, _blocker);
                }
            }

            vehicle.rearm(&ring);
        }

        moved
    }
}
