use crate::topology::{Coord, Direction};
use crate::{ConfigError, Occupancy};
use log::debug;
use rand::Rng;
use rand_distr::{Bernoulli, Distribution};

/// The number of entry points tried before a spawn is abandoned for the tick.
const MAX_SPAWN_TRIES: usize = 8;

/// A side of the ring where vehicles enter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    South,
    West,
    North,
    East,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::South, Side::West, Side::North, Side::East];

    /// The entry cell and initial heading for vehicles spawned on this side
    /// of a ring with half-extent `l`.
    pub fn entry(self, l: i32) -> (Coord, Direction) {
        match self {
            Side::South => (Coord::new(0, -l), Direction::Up),
            Side::West => (Coord::new(-l, -1), Direction::Right),
            Side::North => (Coord::new(-1, l), Direction::Down),
            Side::East => (Coord::new(l, 0), Direction::Left),
        }
    }
}

/// Decides when and where new vehicles enter the ring.
#[derive(Clone, Debug)]
pub struct SpawnPolicy {
    /// The population at which spawning stops.
    target: usize,
    /// Whether a spawn is attempted on a given tick.
    chance: Bernoulli,
}

impl SpawnPolicy {
    /// Creates a spawn policy which fills the ring up to `target` vehicles,
    /// attempting a spawn on each tick with the given probability.
    pub fn new(target: usize, probability: f64) -> Result<Self, ConfigError> {
        let chance =
            Bernoulli::new(probability).map_err(|_| ConfigError::SpawnProbability(probability))?;
        Ok(Self { target, chance })
    }

    /// The population at which spawning stops.
    pub fn target(&self) -> usize {
        self.target
    }

    /// Picks the entry cell and heading of a vehicle to spawn this tick, if any.
    ///
    /// Nothing is drawn from `rng` once the population has reached the target.
    /// Otherwise, up to [MAX_SPAWN_TRIES] random sides are tried and the first
    /// one with a free entry cell wins.
    pub fn pick<R: Rng + ?Sized>(
        &self,
        population: usize,
        occupancy: &Occupancy,
        half_extent: i32,
        rng: &mut R,
    ) -> Option<(Coord, Direction)> {
        if population >= self.target || !self.chance.sample(rng) {
            return None;
        }
        let found = (0..MAX_SPAWN_TRIES)
            .map(|_| Side::ALL[rng.gen_range(0..Side::ALL.len())])
            .map(|side| side.entry(half_extent))
            .find(|(pos, _)| !occupancy.contains_key(pos));
        if found.is_none() {
            debug!("all {} spawn tries collided", MAX_SPAWN_TRIES);
        }
        found
    }
}
