use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Slope ratio `|d_row| / |d_col|` at or above which a displacement counts as diagonal
pub const DIAGONAL_SLOPE: f64 = 0.5;
/// Slope ratio above which a displacement counts as vertical
pub const VERTICAL_SLOPE: f64 = 2.0;

/// Compass direction of recent travel. North is towards row 0.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Heading {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

/// Angular band a non-axis displacement falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sector {
    Horizontal,
    Diagonal,
    Vertical,
}

impl Sector {
    /// Classify by slope; both deltas must be non-zero
    pub fn of(d_row: isize, d_col: isize) -> Self {
        let ratio = d_row.unsigned_abs() as f64 / d_col.unsigned_abs() as f64;
        if ratio > VERTICAL_SLOPE {
            Sector::Vertical
        } else if ratio >= DIAGONAL_SLOPE {
            Sector::Diagonal
        } else {
            Sector::Horizontal
        }
    }
}

impl Heading {
    /// Classify a `(d_row, d_col)` displacement into one of the 8 headings.
    ///
    /// A displacement with no horizontal component is North when it moves
    /// up and South otherwise, including the zero displacement.
    pub fn from_displacement(d_row: isize, d_col: isize) -> Self {
        use Heading::*;

        if d_col == 0 {
            return if d_row < 0 { North } else { South };
        }
        if d_row == 0 {
            return if d_col > 0 { East } else { West };
        }

        let (vertical, diagonal, horizontal) = match (d_row < 0, d_col > 0) {
            (true, true) => (North, NorthEast, East),
            (false, true) => (South, SouthEast, East),
            (false, false) => (South, SouthWest, West),
            (true, false) => (North, NorthWest, West),
        };
        match Sector::of(d_row, d_col) {
            Sector::Vertical => vertical,
            Sector::Diagonal => diagonal,
            Sector::Horizontal => horizontal,
        }
    }

    /// Unit `(d_row, d_col)` step in this direction
    pub const fn step(self) -> (isize, isize) {
        match self {
            Heading::North => (-1, 0),
            Heading::NorthEast => (-1, 1),
            Heading::East => (0, 1),
            Heading::SouthEast => (1, 1),
            Heading::South => (1, 0),
            Heading::SouthWest => (1, -1),
            Heading::West => (0, -1),
            Heading::NorthWest => (-1, -1),
        }
    }

    /// The three neighbour offsets that lie ahead of this heading, in scan order
    pub const fn candidate_offsets(self) -> [(isize, isize); 3] {
        match self {
            Heading::North => [(-1, -1), (-1, 0), (-1, 1)],
            Heading::NorthEast => [(-1, 0), (-1, 1), (0, 1)],
            Heading::East => [(-1, 1), (0, 1), (1, 1)],
            Heading::SouthEast => [(0, 1), (1, 1), (1, 0)],
            Heading::South => [(1, 1), (1, 0), (1, -1)],
            Heading::SouthWest => [(1, 0), (1, -1), (0, -1)],
            Heading::West => [(1, -1), (0, -1), (-1, -1)],
            Heading::NorthWest => [(0, -1), (-1, -1), (-1, 0)],
        }
    }

    /// Rotate by `eighths` of a turn, positive is clockwise
    pub fn turned(self, eighths: i32) -> Self {
        use strum::IntoEnumIterator;

        let all: Vec<Heading> = Heading::iter().collect();
        let index = all.iter().position(|h| *h == self).unwrap_or(0) as i32;
        all[(index + eighths).rem_euclid(8) as usize]
    }
}
