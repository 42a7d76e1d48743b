//! Directional greedy boundary walk.
//!
//! The walker keeps a heading estimated from its recent displacement, looks only
//! at the three neighbours ahead of it and steps onto the whitest one. A walk
//! ends once it closes on its start, revisits one of its own pixels, leaves the
//! scoreable region or runs out of steps. A self-intersecting forward walk gets
//! a single repair attempt: the same walk is run backward from the start until
//! it meets the forward path, and the two halves are spliced together.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    algorithms::{
        heading::Heading,
        scoring::{WeightKernel, score_whiteness},
        start::{StartCandidates, StartDirection},
    },
    config::PathfinderConfig,
    error::{PathfinderError, Result},
    field::IntensityField,
    traits::ContourTracer,
    types::{ContourPath, PixelCoordinate},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceState {
    Tracing,
    Closed,
    SelfIntersecting,
    OutOfBounds { row: isize, col: isize },
    IterationExhausted,
}

impl TraceState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TraceState::Tracing)
    }
}

/// Where a single walk stopped and why
#[derive(Debug, Clone, PartialEq)]
pub struct WalkOutcome {
    pub path: Vec<PixelCoordinate>,
    pub state: TraceState,
    pub steps: usize,
}

struct Walker<'a> {
    field: &'a IntensityField,
    kernel: &'a WeightKernel,
    window: usize,
    default_heading: Heading,
    max_iterations: usize,
    min_closure_length: usize,
}

impl Walker<'_> {
    fn heading(&self, path: &[PixelCoordinate]) -> Heading {
        if path.len() < self.window {
            return self.default_heading;
        }
        let from = path[path.len() - self.window];
        let to = path[path.len() - 1];
        let (d_row, d_col) = from.displacement_to(&to);
        Heading::from_displacement(d_row, d_col)
    }

    fn scored(&self, from: PixelCoordinate, offset: (isize, isize)) -> Result<(PixelCoordinate, f32)> {
        let (d_row, d_col) = offset;
        let point = from
            .offset(d_row, d_col)
            .ok_or(PathfinderError::OutOfBoundary {
                row: from.row as isize + d_row,
                col: from.col as isize + d_col,
            })?;
        Ok((point, score_whiteness(self.field, self.kernel, point)?))
    }

    /// Whitest of the three neighbours ahead; the first one wins a tie
    fn next_point(&self, path: &[PixelCoordinate]) -> Result<PixelCoordinate> {
        let current = path[path.len() - 1];
        let [first, rest @ ..] = self.heading(path).candidate_offsets();
        let mut best = self.scored(current, first)?;
        for offset in rest {
            let candidate = self.scored(current, offset)?;
            if candidate.1 > best.1 {
                best = candidate;
            }
        }
        Ok(best.0)
    }

    /// Extend `seed` until a terminal state. `visited` holds the pixels that count
    /// as a revisit; `goal` decides closure for a fresh pixel.
    fn walk<G>(
        &self,
        seed: Vec<PixelCoordinate>,
        mut visited: HashSet<PixelCoordinate>,
        goal: G,
    ) -> Result<WalkOutcome>
    where
        G: Fn(PixelCoordinate) -> bool,
    {
        let mut path = seed;
        let mut steps = 0;
        let mut state = TraceState::Tracing;

        while !state.is_terminal() {
            let next = match self.next_point(&path) {
                Ok(point) => point,
                Err(PathfinderError::OutOfBoundary { row, col }) => {
                    state = TraceState::OutOfBounds { row, col };
                    break;
                }
                Err(err) => return Err(err),
            };

            let fresh = visited.insert(next);
            path.push(next);
            steps += 1;

            if steps > self.max_iterations {
                state = TraceState::IterationExhausted;
            } else if path.len() > self.min_closure_length {
                if !fresh {
                    state = TraceState::SelfIntersecting;
                } else if goal(next) {
                    state = TraceState::Closed;
                }
            }
        }

        Ok(WalkOutcome { path, state, steps })
    }
}

/// `forward[..join]` followed by the reverse walk's new points, last first
pub fn splice(
    forward: &[PixelCoordinate],
    join: usize,
    reverse_tail: &[PixelCoordinate],
) -> Vec<PixelCoordinate> {
    forward[..join.min(forward.len())]
        .iter()
        .chain(reverse_tail.iter().rev())
        .copied()
        .collect()
}

/// Accept only a closed path without repeated pixels
fn finalize(points: Vec<PixelCoordinate>) -> Result<ContourPath> {
    let path = ContourPath::new(points)?;
    if path.is_closed() && path.is_simple() {
        Ok(path)
    } else {
        Err(PathfinderError::NoClosedPathFound)
    }
}

/// Greedy heading-constrained walk with a single backward repair attempt.
#[derive(Debug, Clone)]
pub struct DirectionalTracer {
    max_iterations: usize,
    inflexibility: usize,
    min_closure_length: usize,
    start_direction: StartDirection,
}

impl Default for DirectionalTracer {
    fn default() -> Self {
        let config = PathfinderConfig::default();
        Self {
            max_iterations: config.max_iterations,
            inflexibility: config.inflexibility,
            min_closure_length: config.min_closure_length,
            start_direction: config.start_direction,
        }
    }
}

impl DirectionalTracer {
    pub fn from_config(config: &PathfinderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            max_iterations: config.max_iterations,
            inflexibility: config.inflexibility,
            min_closure_length: config.min_closure_length,
            start_direction: config.start_direction,
        })
    }

    pub fn start_direction(&self) -> StartDirection {
        self.start_direction
    }

    fn walker<'a>(&self, field: &'a IntensityField, kernel: &'a WeightKernel) -> Walker<'a> {
        Walker {
            field,
            kernel,
            window: self.inflexibility,
            default_heading: self.start_direction.default_heading(),
            max_iterations: self.max_iterations,
            min_closure_length: self.min_closure_length,
        }
    }

    /// Walk from `start` until it closes on itself or fails, without repair
    pub fn forward_walk(
        &self,
        field: &IntensityField,
        kernel: &WeightKernel,
        start: PixelCoordinate,
    ) -> Result<WalkOutcome> {
        let outcome = self.walker(field, kernel).walk(
            vec![start],
            HashSet::from([start]),
            |point| point.is_adjacent(&start),
        )?;
        debug!(
            state = ?outcome.state,
            steps = outcome.steps,
            length = outcome.path.len(),
            "forward walk finished"
        );
        Ok(outcome)
    }

    /// Re-run the walk backward from the start and splice it onto `forward`
    /// where the two meet.
    fn repair(
        &self,
        field: &IntensityField,
        kernel: &WeightKernel,
        forward: &[PixelCoordinate],
    ) -> Result<ContourPath> {
        if forward.len() <= self.inflexibility {
            return Err(PathfinderError::NoClosedPathFound);
        }

        let mut first_seen: HashMap<PixelCoordinate, usize> = HashMap::with_capacity(forward.len());
        for (index, point) in forward.iter().enumerate() {
            first_seen.entry(*point).or_insert(index);
        }

        let seed: Vec<PixelCoordinate> = forward[..self.inflexibility].iter().rev().copied().collect();
        let seed_len = seed.len();
        let reverse = self.walker(field, kernel).walk(seed, HashSet::new(), |point| {
            first_seen.contains_key(&point)
        })?;
        debug!(
            state = ?reverse.state,
            steps = reverse.steps,
            "reverse walk finished"
        );

        if reverse.state != TraceState::Closed {
            return Err(PathfinderError::NoClosedPathFound);
        }
        let join = reverse
            .path
            .last()
            .and_then(|point| first_seen.get(point))
            .copied()
            .ok_or(PathfinderError::NoClosedPathFound)?;

        finalize(splice(forward, join, &reverse.path[seed_len..]))
    }
}

impl ContourTracer for DirectionalTracer {
    fn trace(
        &self,
        field: &IntensityField,
        kernel: &WeightKernel,
        candidates: &StartCandidates,
    ) -> Result<ContourPath> {
        let start = candidates.get(self.start_direction).point;
        let forward = self.forward_walk(field, kernel, start)?;

        match forward.state {
            TraceState::Closed => finalize(forward.path),
            TraceState::SelfIntersecting => {
                warn!(
                    length = forward.path.len(),
                    at = ?forward.path.last(),
                    "walk intersected itself, attempting repair"
                );
                self.repair(field, kernel, &forward.path)
            }
            TraceState::OutOfBounds { row, col } => Err(PathfinderError::OutOfBoundary { row, col }),
            TraceState::IterationExhausted => Err(PathfinderError::MaxIterationReached(self.max_iterations)),
            TraceState::Tracing => Err(PathfinderError::NoClosedPathFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::start::locate_start_candidates;

    fn bump(distance: f64, radius: f64, width: f64) -> f64 {
        (1.0 - ((distance - radius) / width).powi(2)).max(0.0)
    }

    /// Bright annulus of radius 30 centred in a 128×128 field
    fn ring_field() -> IntensityField {
        IntensityField::from_fn(128, 128, |row, col| {
            let d = (row as f64 - 64.0).hypot(col as f64 - 64.0);
            bump(d, 30.0, 5.0) as f32
        })
        .unwrap()
    }

    /// Annulus of radius 26 with a vertical chord along column 35
    fn ring_with_chord() -> IntensityField {
        let chord_top = 48.0 - 26.0 * 60f64.to_radians().sin();
        let chord_bottom = 48.0 + 26.0 * 60f64.to_radians().sin();
        IntensityField::from_fn(96, 96, |row, col| {
            let (r, c) = (row as f64, col as f64);
            let ring = bump((r - 48.0).hypot(c - 48.0), 26.0, 4.0);
            let nearest = r.clamp(chord_top, chord_bottom);
            let chord = bump((r - nearest).hypot(c - 35.0), 0.0, 3.0);
            ring.max(chord) as f32
        })
        .unwrap()
    }

    /// Annulus of radius 20 with a stem hanging from it down to the bottom edge
    fn ring_on_a_stem() -> IntensityField {
        IntensityField::from_fn(96, 96, |row, col| {
            let (r, c) = (row as f64, col as f64);
            let ring = bump((r - 40.0).hypot(c - 50.0), 20.0, 4.0);
            let stem = if r >= 60.0 { bump((c - 44.0).abs(), 0.0, 3.0) } else { 0.0 };
            ring.max(stem) as f32
        })
        .unwrap()
    }

    fn trace_from_centre(field: &IntensityField, tracer: &DirectionalTracer) -> Result<ContourPath> {
        let seed = PixelCoordinate::new(field.height() / 2, field.width() / 2);
        let candidates = locate_start_candidates(field, seed, 2)?;
        tracer.trace(field, &WeightKernel::default(), &candidates)
    }

    #[test]
    fn test_splice_joins_reverse_tail() {
        let p = |row, col| PixelCoordinate::new(row, col);
        let forward = vec![p(0, 0), p(0, 1), p(0, 2), p(1, 3), p(2, 3), p(1, 2)];
        let reverse_tail = vec![p(1, 0), p(2, 1), p(2, 2)];
        let spliced = splice(&forward, 4, &reverse_tail);
        assert_eq!(
            spliced,
            vec![p(0, 0), p(0, 1), p(0, 2), p(1, 3), p(2, 2), p(2, 1), p(1, 0)]
        );
        assert!(splice(&forward, 0, &[]).is_empty());
    }

    #[test]
    fn test_finalize_requires_closed_simple_path() {
        let p = |row, col| PixelCoordinate::new(row, col);
        assert!(finalize(vec![p(0, 0), p(0, 1), p(1, 1), p(1, 0)]).is_ok());
        assert!(matches!(
            finalize(vec![p(0, 0), p(0, 1), p(0, 2), p(0, 3)]),
            Err(PathfinderError::NoClosedPathFound)
        ));
        assert!(matches!(
            finalize(vec![p(0, 0), p(0, 1), p(1, 1), p(0, 1), p(1, 0)]),
            Err(PathfinderError::NoClosedPathFound)
        ));
    }

    #[test]
    fn test_ring_closes() {
        let field = ring_field();
        let path = trace_from_centre(&field, &DirectionalTracer::default()).unwrap();

        assert_eq!(path.points()[0], PixelCoordinate::new(64, 34));
        assert!(path.is_closed());
        assert!(path.is_simple());
        assert!(path.len() > 150 && path.len() < 200, "{}", path.len());
        // The walk starts west heading north, so it runs clockwise
        assert_eq!(path.points()[1], PixelCoordinate::new(63, 34));
    }

    #[test]
    fn test_forward_walk_reports_closure() {
        let field = ring_field();
        let tracer = DirectionalTracer::default();
        let outcome = tracer
            .forward_walk(&field, &WeightKernel::default(), PixelCoordinate::new(64, 34))
            .unwrap();
        assert_eq!(outcome.state, TraceState::Closed);
        assert_eq!(outcome.steps + 1, outcome.path.len());
        assert!(outcome.path.last().unwrap().is_adjacent(&outcome.path[0]));
    }

    #[test]
    fn test_iteration_budget() {
        let config = PathfinderConfig {
            max_iterations: 20,
            ..Default::default()
        };
        let tracer = DirectionalTracer::from_config(&config).unwrap();
        assert!(matches!(
            trace_from_centre(&ring_field(), &tracer),
            Err(PathfinderError::MaxIterationReached(20))
        ));
    }

    #[test]
    fn test_uniform_field_walks_off_the_edge() {
        let field = IntensityField::from_fn(20, 20, |_, _| 1.0).unwrap();
        let tracer = DirectionalTracer::default();
        let outcome = tracer
            .forward_walk(&field, &WeightKernel::default(), PixelCoordinate::new(10, 10))
            .unwrap();
        assert!(matches!(outcome.state, TraceState::OutOfBounds { .. }));
        assert!(matches!(
            trace_from_centre(&field, &tracer),
            Err(PathfinderError::OutOfBoundary { .. })
        ));
    }

    #[test]
    fn test_start_at_origin_is_out_of_bounds() {
        let field = ring_field();
        let tracer = DirectionalTracer::default();
        let outcome = tracer
            .forward_walk(&field, &WeightKernel::default(), PixelCoordinate::new(0, 0))
            .unwrap();
        assert_eq!(outcome.state, TraceState::OutOfBounds { row: -1, col: -1 });
        assert_eq!(outcome.steps, 0);
    }

    #[test]
    fn test_chord_forces_repair() {
        let field = ring_with_chord();
        let tracer = DirectionalTracer::default();
        let start = PixelCoordinate::new(48, 35);

        let forward = tracer
            .forward_walk(&field, &WeightKernel::default(), start)
            .unwrap();
        assert_eq!(forward.state, TraceState::SelfIntersecting);

        let path = trace_from_centre(&field, &tracer).unwrap();
        assert_eq!(path.points()[0], start);
        assert!(path.is_closed());
        assert!(path.is_simple());
        assert!(path.len() < forward.path.len());
    }

    #[test]
    fn test_failed_repair_keeps_the_intersection_error() {
        let field = ring_on_a_stem();
        let tracer = DirectionalTracer::default();
        let candidates = locate_start_candidates(&field, PixelCoordinate::new(80, 60), 2).unwrap();
        let start = candidates.west.point;
        assert_eq!(start, PixelCoordinate::new(80, 44));

        // Up the stem, around the ring and back onto the junction
        let forward = tracer
            .forward_walk(&field, &WeightKernel::default(), start)
            .unwrap();
        assert_eq!(forward.state, TraceState::SelfIntersecting);

        // Backward from the start there is only the stem, which runs off the field
        assert!(matches!(
            tracer.trace(&field, &WeightKernel::default(), &candidates),
            Err(PathfinderError::NoClosedPathFound)
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = PathfinderConfig {
            inflexibility: 0,
            ..Default::default()
        };
        assert!(matches!(
            DirectionalTracer::from_config(&config),
            Err(PathfinderError::InvalidConfig(_))
        ));
    }
}
