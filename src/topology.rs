//! The lattice the vehicles drive on.

use cgmath::{Point2, Vector2};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A lattice cell.
pub type Coord = Point2<i32>;

/// A heading along one of the lattice axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The unit step taken when moving in this direction.
    pub fn delta(self) -> Vector2<i32> {
        match self {
            Direction::Up => Vector2::new(0, 1),
            Direction::Down => Vector2::new(0, -1),
            Direction::Left => Vector2::new(-1, 0),
            Direction::Right => Vector2::new(1, 0),
        }
    }
}

/// A square ring of cells spanning `[-L, L]` on each axis,
/// where `L` is the half-extent.
///
/// Vehicles leaving the ring through one edge re-enter through the opposite
/// edge of the axis they travel along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ring {
    half_extent: i32,
}

impl Ring {
    /// Creates a ring with the given half-extent.
    pub(crate) const fn new(half_extent: i32) -> Self {
        Self { half_extent }
    }

    /// The half-extent `L` of the ring.
    pub fn half_extent(&self) -> i32 {
        self.half_extent
    }

    /// The number of cells in the measured segment, which is also `L`.
    pub fn segment_length(&self) -> usize {
        self.half_extent as usize
    }

    /// Returns the cell one step from `pos` in direction `dir`,
    /// wrapped around the ring if the step crosses the boundary.
    pub fn advance(&self, pos: Coord, dir: Direction) -> Coord {
        let delta = dir.delta();
        match (pos.x.checked_add(delta.x), pos.y.checked_add(delta.y)) {
            (Some(x), Some(y)) => self.wrap(Coord::new(x, y), dir),
            // Overflow can only happen past the edge being crossed.
            _ => self.opposite_edge(pos, dir),
        }
    }

    /// Applies the wrap rule to a tentative position reached by moving in `dir`.
    /// Only the axis of travel is checked; the other axis is left alone.
    pub fn wrap(&self, pos: Coord, dir: Direction) -> Coord {
        let l = self.half_extent;
        match dir {
            Direction::Up if pos.y > l => self.opposite_edge(pos, dir),
            Direction::Down if pos.y < -l => self.opposite_edge(pos, dir),
            Direction::Right if pos.x > l => self.opposite_edge(pos, dir),
            Direction::Left if pos.x < -l => self.opposite_edge(pos, dir),
            _ => pos,
        }
    }

    /// Moves `pos` to the edge it re-enters from after leaving in `dir`.
    fn opposite_edge(&self, mut pos: Coord, dir: Direction) -> Coord {
        let l = self.half_extent;
        match dir {
            Direction::Up => pos.y = -l,
            Direction::Down => pos.y = l,
            Direction::Right => pos.x = -l,
            Direction::Left => pos.x = l,
        }
        pos
    }

    /// Whether a cell lies on the sampled lane, `x = 0` and `1 <= y <= L`,
    /// which approaches the intersection from the south.
    pub fn in_measured_segment(&self, pos: Coord) -> bool {
        pos.x == 0 && (1..=self.half_extent).contains(&pos.y)
    }

    /// Whether a cell lies inside the 2x2 intersection box `{-1, 0} x {-1, 0}`.
    pub fn in_intersection(&self, pos: Coord) -> bool {
        (-1..=0).contains(&pos.x) && (-1..=0).contains(&pos.y)
    }
}
