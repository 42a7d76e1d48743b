use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};
use tracing::debug;

use crate::{
    algorithms::heading::Heading,
    error::{PathfinderError, Result},
    field::IntensityField,
    types::PixelCoordinate,
};

/// The four rays scanned outward from the seed
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
    EnumIter,
    VariantNames,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StartDirection {
    North,
    East,
    South,
    #[default]
    West,
}

impl StartDirection {
    /// Heading used until the walk is long enough to estimate its own
    pub const fn default_heading(self) -> Heading {
        match self {
            StartDirection::North => Heading::East,
            StartDirection::East => Heading::South,
            StartDirection::South => Heading::West,
            StartDirection::West => Heading::North,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartCandidate {
    pub point: PixelCoordinate,
    /// Raw field value at `point`, 0 if the ray held nothing brighter than zero
    pub weight: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartCandidates {
    pub north: StartCandidate,
    pub east: StartCandidate,
    pub south: StartCandidate,
    pub west: StartCandidate,
}

impl StartCandidates {
    pub fn get(&self, direction: StartDirection) -> StartCandidate {
        match direction {
            StartDirection::North => self.north,
            StartDirection::East => self.east,
            StartDirection::South => self.south,
            StartDirection::West => self.west,
        }
    }
}

/// Pixels visited when scanning from `seed` toward the edge, stopping `margin` pixels short of it
fn ray(field: &IntensityField, seed: PixelCoordinate, direction: StartDirection, margin: usize) -> Vec<PixelCoordinate> {
    let PixelCoordinate { row, col } = seed;
    match direction {
        StartDirection::North => (margin..=row)
            .rev()
            .map(|r| PixelCoordinate::new(r, col))
            .collect(),
        StartDirection::South => (row..field.height().saturating_sub(margin))
            .map(|r| PixelCoordinate::new(r, col))
            .collect(),
        StartDirection::West => (margin..=col)
            .rev()
            .map(|c| PixelCoordinate::new(row, c))
            .collect(),
        StartDirection::East => (col..field.width().saturating_sub(margin))
            .map(|c| PixelCoordinate::new(row, c))
            .collect(),
    }
}

/// Brightest pixel along one ray. Ties keep the first maximum.
fn brightest(field: &IntensityField, seed: PixelCoordinate, points: &[PixelCoordinate]) -> StartCandidate {
    points.iter().fold(
        StartCandidate {
            point: seed,
            weight: 0.0,
        },
        |best, &point| {
            let weight = field.get(point.row, point.col);
            if weight > best.weight {
                StartCandidate { point, weight }
            } else {
                best
            }
        },
    )
}

/// Scan the four axis rays from `seed` and keep the brightest pixel on each.
pub fn locate_start_candidates(
    field: &IntensityField,
    seed: PixelCoordinate,
    margin: usize,
) -> Result<StartCandidates> {
    if !field.contains(seed) {
        return Err(PathfinderError::InvalidCoordinate {
            row: seed.row,
            col: seed.col,
            height: field.height(),
            width: field.width(),
        });
    }

    let pick = |direction| brightest(field, seed, &ray(field, seed, direction, margin));
    let candidates = StartCandidates {
        north: pick(StartDirection::North),
        east: pick(StartDirection::East),
        south: pick(StartDirection::South),
        west: pick(StartDirection::West),
    };
    debug!(?seed, ?candidates, "located start candidates");
    Ok(candidates)
}
