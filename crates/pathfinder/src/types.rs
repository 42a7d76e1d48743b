use std::collections::HashSet;
use std::sync::OnceLock;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    algorithms::descriptors::{self, FourierDescriptor, RadialPoint, ShapeSummary},
    error::{PathfinderError, Result},
};

/// Integer pixel position, row-major with the origin at the top-left.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub struct PixelCoordinate {
    pub row: usize,
    pub col: usize,
}

impl PixelCoordinate {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// 8-connectivity, a pixel counts as adjacent to itself
    pub fn is_adjacent(&self, other: &Self) -> bool {
        self.row.abs_diff(other.row) <= 1 && self.col.abs_diff(other.col) <= 1
    }

    /// Step by a signed offset, `None` if the result would leave the non-negative range
    pub fn offset(&self, d_row: isize, d_col: isize) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }

    /// Signed `(d_row, d_col)` displacement from `self` to `other`
    pub fn displacement_to(&self, other: &Self) -> (isize, isize) {
        (
            other.row as isize - self.row as isize,
            other.col as isize - self.col as isize,
        )
    }

    /// `(x, y)` order, as callers outside the tracer expect it
    pub fn xy(&self) -> [f64; 2] {
        [self.col as f64, self.row as f64]
    }
}

/// Real-valued centre of a contour in `(row, col)` space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Centroid {
    pub row: f64,
    pub col: f64,
}

impl Centroid {
    pub fn xy(&self) -> [f64; 2] {
        [self.col, self.row]
    }
}

/// An ordered boundary walk. Once handed out by a tracer the point list is frozen;
/// the centroid is derived on first request and kept for the lifetime of the path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContourPath {
    points: Vec<PixelCoordinate>,
    #[serde(skip)]
    centroid: OnceLock<Centroid>,
}

impl PartialEq for ContourPath {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points
    }
}

impl ContourPath {
    pub fn new(points: Vec<PixelCoordinate>) -> Result<Self> {
        if points.is_empty() {
            return Err(PathfinderError::InvalidShape(
                "a contour needs at least one point".to_string(),
            ));
        }
        Ok(Self {
            points,
            centroid: OnceLock::new(),
        })
    }

    pub fn points(&self) -> &[PixelCoordinate] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Check if the last point touches the first one
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => last.is_adjacent(first),
            _ => false,
        }
    }

    /// Check that no pixel is visited twice
    pub fn is_simple(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.points.len());
        self.points.iter().all(|p| seen.insert(*p))
    }

    /// Arc-length weighted centroid, computed once per path
    pub fn centroid(&self) -> Centroid {
        *self.centroid.get_or_init(|| {
            let row_col: Vec<[f64; 2]> = self
                .points
                .iter()
                .map(|p| [p.row as f64, p.col as f64])
                .collect();
            let [row, col] = descriptors::arc_length_centroid(&row_col);
            Centroid { row, col }
        })
    }

    /// Points in `(x, y)` order
    pub fn xy(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(PixelCoordinate::xy).collect()
    }

    /// Points in `(x, y)` order relative to the centroid
    pub fn centered_xy(&self) -> Vec<[f64; 2]> {
        let [cx, cy] = self.centroid().xy();
        self.points
            .iter()
            .map(|p| {
                let [x, y] = p.xy();
                [x - cx, y - cy]
            })
            .collect()
    }

    pub fn radial_profile(&self) -> Vec<RadialPoint> {
        let row_col: Vec<[f64; 2]> = self
            .points
            .iter()
            .map(|p| [p.row as f64, p.col as f64])
            .collect();
        let c = self.centroid();
        descriptors::radial_profile(&row_col, [c.row, c.col])
    }

    pub fn fourier_descriptor(&self) -> FourierDescriptor {
        descriptors::fourier_descriptor(&self.radial_profile())
    }

    pub fn summary(&self) -> ShapeSummary {
        descriptors::summarize(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_path(side: usize) -> ContourPath {
        let mut points = Vec::new();
        for col in 0..side {
            points.push(PixelCoordinate::new(0, col));
        }
        for row in 0..side {
            points.push(PixelCoordinate::new(row, side));
        }
        for col in (1..=side).rev() {
            points.push(PixelCoordinate::new(side, col));
        }
        for row in (1..=side).rev() {
            points.push(PixelCoordinate::new(row, 0));
        }
        ContourPath::new(points).unwrap()
    }

    #[test]
    fn test_adjacency_includes_self_and_diagonals() {
        let p = PixelCoordinate::new(5, 5);
        assert!(p.is_adjacent(&p));
        assert!(p.is_adjacent(&PixelCoordinate::new(4, 6)));
        assert!(p.is_adjacent(&PixelCoordinate::new(6, 4)));
        assert!(!p.is_adjacent(&PixelCoordinate::new(7, 5)));
        assert!(!p.is_adjacent(&PixelCoordinate::new(5, 3)));
    }

    #[test]
    fn test_offset_rejects_negative_coordinates() {
        let p = PixelCoordinate::new(0, 3);
        assert_eq!(p.offset(-1, 0), None);
        assert_eq!(p.offset(1, -1), Some(PixelCoordinate::new(1, 2)));
        assert_eq!(p.displacement_to(&PixelCoordinate::new(2, 0)), (2, -3));
    }

    #[test]
    fn test_empty_path_is_rejected() {
        assert!(matches!(
            ContourPath::new(Vec::new()),
            Err(PathfinderError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_square_path_is_closed_and_simple() {
        let path = square_path(100);
        assert_eq!(path.len(), 400);
        assert!(path.is_closed());
        assert!(path.is_simple());
    }

    #[test]
    fn test_square_centroid() {
        let path = square_path(100);
        let c = path.centroid();
        assert!((c.row - 50.0).abs() <= 1.0);
        assert!((c.col - 50.0).abs() <= 1.0);
    }

    #[test]
    fn test_centroid_is_cached() {
        let path = square_path(20);
        let first = path.centroid();
        let second = path.centroid();
        assert_eq!(first.row.to_bits(), second.row.to_bits());
        assert_eq!(first.col.to_bits(), second.col.to_bits());
    }

    #[test]
    fn test_centered_points_subtract_centroid() {
        let path = square_path(10);
        let [cx, cy] = path.centroid().xy();
        for (plain, centered) in path.xy().iter().zip(path.centered_xy()) {
            assert_eq!(centered, [plain[0] - cx, plain[1] - cy]);
        }
    }

    #[test]
    fn test_duplicate_point_is_not_simple() {
        let points = vec![
            PixelCoordinate::new(1, 1),
            PixelCoordinate::new(1, 2),
            PixelCoordinate::new(1, 1),
        ];
        let path = ContourPath::new(points).unwrap();
        assert!(!path.is_simple());
        assert!(path.is_closed());
    }
}
