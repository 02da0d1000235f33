use crate::topology::{Coord, Direction, Ring};
use crate::VehicleId;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The cells in the intersection where a vehicle arriving with a given heading
/// turns, and the heading it leaves with.
const TURNS: [(Coord, Direction, Direction); 4] = [
    (Coord { x: 0, y: 0 }, Direction::Up, Direction::Left),
    (Coord { x: 0, y: -1 }, Direction::Right, Direction::Up),
    (Coord { x: -1, y: -1 }, Direction::Down, Direction::Right),
    (Coord { x: -1, y: 0 }, Direction::Left, Direction::Down),
];

/// A simulated vehicle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vehicle {
    /// The vehicle's ID.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) id: VehicleId,
    /// The cell the vehicle occupies.
    pos: Coord,
    /// The vehicle's heading.
    dir: Direction,
    /// Whether the vehicle has already turned on its current pass
    /// through the intersection.
    turned: bool,
}

impl Vehicle {
    /// Creates a new vehicle which has not yet turned.
    pub(crate) fn new(id: VehicleId, pos: Coord, dir: Direction) -> Self {
        Self {
            id,
            pos,
            dir,
            turned: false,
        }
    }

    /// Gets the vehicle's ID.
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// The cell the vehicle occupies.
    pub fn pos(&self) -> Coord {
        self.pos
    }

    /// The vehicle's heading.
    pub fn dir(&self) -> Direction {
        self.dir
    }

    /// Whether the vehicle has used its turn on the current pass.
    pub fn turned(&self) -> bool {
        self.turned
    }

    /// Turns the vehicle if it sits on a turning cell with the matching heading
    /// and has not yet turned on this pass. Returns whether it turned.
    pub(crate) fn apply_turn(&mut self) -> bool {
        if self.turned {
            return false;
        }
        let turn = TURNS
            .iter()
            .find(|(pos, dir, _)| *pos == self.pos && *dir == self.dir);
        match turn {
            Some(&(_, _, new_dir)) => {
                self.dir = new_dir;
                self.turned = true;
                true
            }
            None => false,
        }
    }

    /// The cell the vehicle would move into this tick.
    pub(crate) fn next_pos(&self, ring: &Ring) -> Coord {
        ring.advance(self.pos, self.dir)
    }

    /// Moves the vehicle to a new cell.
    pub(crate) fn move_to(&mut self, pos: Coord) {
        self.pos = pos;
    }

    /// Re-arms the turn once the vehicle is clear of the intersection.
    pub(crate) fn rearm(&mut self, ring: &Ring) {
        if !ring.in_intersection(self.pos) {
            self.turned = false;
        }
    }
}
