//! Geometric descriptors derived from a traced contour: arc-length centroid,
//! radial profile around that centroid and the radial Fourier shape signature.

use geo_types::{Coord, LineString, Polygon};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{PathfinderError, Result},
    types::ContourPath,
};

/// A contour point re-expressed around the centroid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RadialPoint {
    pub radius: f64,
    /// Degrees in `[0, 360)`
    pub angle: f64,
}

/// Harmonic amplitudes and phases of a radial profile, indexed by order `0..N/2`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FourierDescriptor {
    pub amplitudes: Vec<f64>,
    pub phases: Vec<f64>,
}

impl FourierDescriptor {
    pub fn harmonics(&self) -> usize {
        self.amplitudes.len()
    }

    /// Mean radius recovered from the zeroth harmonic (`c_0 / 2`)
    pub fn mean_radius(&self) -> Option<f64> {
        self.amplitudes.first().map(|c0| c0 / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngleUnit {
    #[default]
    Degrees,
    Radians,
}

/// Scalar summary of a closed contour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ShapeSummary {
    pub point_count: usize,
    /// Length of the closed ring through all points
    pub perimeter: f64,
    pub area: f64,
    /// `(x, y)`
    pub centroid: [f64; 2],
    pub mean_radius: f64,
}

fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - b[0]).hypot(a[1] - b[1])
}

/// Perimeter centroid of a closed polygon.
///
/// Every vertex is weighted by half the length of its two adjacent segments, and
/// the weighted sum is divided by the total ring length, so sparse stretches of
/// the walk count as much as dense ones. A ring of zero length falls back to the
/// plain vertex mean.
pub fn arc_length_centroid(points: &[[f64; 2]]) -> [f64; 2] {
    let n = points.len();
    if n == 0 {
        return [0.0, 0.0];
    }

    let mut weighted = [0.0f64; 2];
    let mut length = 0.0f64;
    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let current = points[i];
        let next = points[(i + 1) % n];
        let dm = distance(prev, current);
        let di = distance(current, next);
        let weight = 0.5 * (dm + di);
        weighted[0] += current[0] * weight;
        weighted[1] += current[1] * weight;
        length += di;
    }

    if length > 0.0 {
        [weighted[0] / length, weighted[1] / length]
    } else {
        let (sum0, sum1) = points
            .iter()
            .fold((0.0f64, 0.0f64), |(a, b), p| (a + p[0], b + p[1]));
        [sum0 / n as f64, sum1 / n as f64]
    }
}

/// Polar reprojection of `(row, col)` points around `centre`.
///
/// The angle is `atan2(d_col, d_row)` in degrees, negated and shifted by 180 so
/// it lands in `[0, 360)`.
pub fn radial_profile(points: &[[f64; 2]], centre: [f64; 2]) -> Vec<RadialPoint> {
    points
        .iter()
        .map(|p| {
            let d_row = p[0] - centre[0];
            let d_col = p[1] - centre[1];
            let mut angle = 180.0 - d_col.atan2(d_row).to_degrees();
            if angle >= 360.0 {
                angle -= 360.0;
            }
            RadialPoint {
                radius: d_row.hypot(d_col),
                angle,
            }
        })
        .collect()
}

/// Discrete radial Fourier analysis.
///
/// For each order `j < N/2`: `a_j = 2/N Σ r cos(jφ)`, `b_j = 2/N Σ r sin(jφ)`,
/// amplitude `sqrt(a_j² + b_j²)` and phase `atan2(b_j, a_j)`.
pub fn radial_fourier(radii: &[f64], angles: &[f64], unit: AngleUnit) -> Result<FourierDescriptor> {
    if radii.len() != angles.len() {
        return Err(PathfinderError::MismatchedProfile {
            radii: radii.len(),
            angles: angles.len(),
        });
    }

    let phi: Vec<f64> = match unit {
        AngleUnit::Degrees => angles.iter().map(|a| a.to_radians()).collect(),
        AngleUnit::Radians => angles.to_vec(),
    };
    Ok(harmonics(radii, &phi))
}

/// Fourier descriptor of a radial profile as produced by [`radial_profile`]
pub fn fourier_descriptor(profile: &[RadialPoint]) -> FourierDescriptor {
    let radii: Vec<f64> = profile.iter().map(|p| p.radius).collect();
    let phi: Vec<f64> = profile.iter().map(|p| p.angle.to_radians()).collect();
    harmonics(&radii, &phi)
}

/// `radii` and `phi` (radians) have equal length
fn harmonics(radii: &[f64], phi: &[f64]) -> FourierDescriptor {
    let n = radii.len();
    let k_max = n / 2;
    let mut amplitudes = Vec::with_capacity(k_max);
    let mut phases = Vec::with_capacity(k_max);
    for j in 0..k_max {
        let order = j as f64;
        let (sum_cos, sum_sin) = radii
            .iter()
            .zip(phi)
            .fold((0.0f64, 0.0f64), |(c, s), (r, p)| {
                (c + r * (order * p).cos(), s + r * (order * p).sin())
            });
        let a = 2.0 / n as f64 * sum_cos;
        let b = 2.0 / n as f64 * sum_sin;
        amplitudes.push(a.hypot(b));
        phases.push(b.atan2(a));
    }
    FourierDescriptor { amplitudes, phases }
}

/// Perimeter, enclosed area and radial statistics of a contour
pub fn summarize(path: &ContourPath) -> ShapeSummary {
    use geo::{Area, EuclideanLength};

    let coords: Vec<Coord<f64>> = path
        .points()
        .iter()
        .map(|p| Coord {
            x: p.col as f64,
            y: p.row as f64,
        })
        .collect();
    let polygon = Polygon::new(LineString::new(coords), vec![]);

    let profile = path.radial_profile();
    let mean_radius = if profile.is_empty() {
        0.0
    } else {
        profile.iter().map(|p| p.radius).sum::<f64>() / profile.len() as f64
    };

    ShapeSummary {
        point_count: path.len(),
        perimeter: polygon.exterior().euclidean_length(),
        area: polygon.unsigned_area(),
        centroid: path.centroid().xy(),
        mean_radius,
    }
}
