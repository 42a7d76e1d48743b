use tracing::debug;

use crate::{
    error::{PathfinderError, Result},
    field::IntensityField,
    traits::FieldPreprocessor,
};

/// Values at or below this fraction of the normalized range are cleared
pub const DEFAULT_GRADIENT_THRESHOLD: f32 = 0.02;

/// Mirror an out-of-range index back inside `0..len` without repeating the edge sample
fn reflect_101(index: isize, len: usize) -> usize {
    let len = len as isize;
    if len == 1 {
        return 0;
    }
    let period = 2 * (len - 1);
    let mut i = index.rem_euclid(period);
    if i >= len {
        i = period - i;
    }
    i as usize
}

/// `|∂x| + |∂y|` of the 3×3 Sobel operator
pub fn sobel_l1(field: &IntensityField) -> Result<IntensityField> {
    let (width, height) = (field.width(), field.height());
    let at = |row: usize, col: usize, dr: isize, dc: isize| {
        let r = reflect_101(row as isize + dr, height);
        let c = reflect_101(col as isize + dc, width);
        field.get(r, c)
    };

    IntensityField::from_fn(width, height, |row, col| {
        let p = |dr, dc| at(row, col, dr, dc);
        let gx = (p(-1, 1) + 2.0 * p(0, 1) + p(1, 1)) - (p(-1, -1) + 2.0 * p(0, -1) + p(1, -1));
        let gy = (p(1, -1) + 2.0 * p(1, 0) + p(1, 1)) - (p(-1, -1) + 2.0 * p(-1, 0) + p(-1, 1));
        gx.abs() + gy.abs()
    })
}

/// Shift by the global minimum and scale by the shifted maximum into `[0, 1]`
pub fn normalize(field: &IntensityField) -> Result<IntensityField> {
    let (min, max) = field.min_max();
    let range = max - min;
    debug!(min, max, "normalizing field");
    if !range.is_finite() || range <= 0.0 {
        return Err(PathfinderError::DegenerateInput);
    }
    Ok(field.map(|v| (v - min) / range))
}

/// One-sided clip: samples not above `threshold` become 0, the rest pass through
pub fn clip_below(field: &IntensityField, threshold: f32) -> IntensityField {
    field.map(|v| if v > threshold { v } else { 0.0 })
}

/// Edge-gradient whiteness: Sobel magnitude, min-max normalization, threshold clip
#[derive(Debug, Clone)]
pub struct GradientPreprocessor {
    pub threshold: f32,
}

impl Default for GradientPreprocessor {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_GRADIENT_THRESHOLD,
        }
    }
}

impl FieldPreprocessor for GradientPreprocessor {
    fn preprocess(&self, field: &IntensityField) -> Result<IntensityField> {
        let gradient = sobel_l1(field)?;
        let normalized = normalize(&gradient)?;
        let clipped = clip_below(&normalized, self.threshold);
        debug!(
            threshold = self.threshold,
            cleared = clipped.samples().iter().filter(|v| **v == 0.0).count(),
            "built gradient field"
        );
        Ok(clipped)
    }
}

/// Rescale into `[0, 1]` without taking a gradient
#[derive(Debug, Clone, Default)]
pub struct NormalizePreprocessor;

impl FieldPreprocessor for NormalizePreprocessor {
    fn preprocess(&self, field: &IntensityField) -> Result<IntensityField> {
        normalize(field)
    }
}
