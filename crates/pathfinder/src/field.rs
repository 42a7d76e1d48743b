use image::{GrayImage, ImageBuffer, Luma};

use crate::{
    error::{PathfinderError, Result},
    types::PixelCoordinate,
};

/// Single-channel floating point raster backing an [`IntensityField`].
pub type FieldBuffer = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Immutable 2-D grid of real-valued samples, row = y, column = x.
#[derive(Debug, Clone)]
pub struct IntensityField {
    buffer: FieldBuffer,
}

impl IntensityField {
    /// Wrap a row-major sample buffer of exactly `width * height` values
    pub fn from_raw(width: usize, height: usize, samples: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PathfinderError::InvalidShape(format!(
                "image has to be a non-empty 2-dimensional grid, got {width}x{height}"
            )));
        }
        if samples.len() != width * height {
            return Err(PathfinderError::InvalidShape(format!(
                "expected {} samples for a {width}x{height} grid, got {}",
                width * height,
                samples.len()
            )));
        }
        let too_large = || PathfinderError::InvalidShape(format!("{width}x{height} grid is too large"));
        let w = u32::try_from(width).map_err(|_| too_large())?;
        let h = u32::try_from(height).map_err(|_| too_large())?;
        let buffer = FieldBuffer::from_raw(w, h, samples).ok_or_else(too_large)?;
        Ok(Self { buffer })
    }

    /// Build from nested rows; ragged or empty input is rejected
    pub fn from_rows<T>(rows: &[Vec<T>]) -> Result<Self>
    where
        T: Copy + Into<f64>,
    {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(PathfinderError::InvalidShape(format!(
                "row {index} has {} samples, expected {width}",
                row.len()
            )));
        }
        let samples = rows
            .iter()
            .flatten()
            .map(|&v| Into::<f64>::into(v) as f32)
            .collect();
        Self::from_raw(width, height, samples)
    }

    /// Evaluate `f(row, col)` for every pixel
    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Result<Self>
    where
        F: Fn(usize, usize) -> f32,
    {
        let mut samples = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                samples.push(f(row, col));
            }
        }
        Self::from_raw(width, height, samples)
    }

    pub fn from_luma(image: &GrayImage) -> Result<Self> {
        let samples = image.as_raw().iter().map(|&v| f32::from(v)).collect();
        Self::from_raw(image.width() as usize, image.height() as usize, samples)
    }

    pub fn width(&self) -> usize {
        self.buffer.width() as usize
    }

    pub fn height(&self) -> usize {
        self.buffer.height() as usize
    }

    /// Sample at `(row, col)`. Callers are responsible for bounds.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.buffer.get_pixel(col as u32, row as u32).0[0]
    }

    pub fn contains(&self, point: PixelCoordinate) -> bool {
        point.row < self.height() && point.col < self.width()
    }

    /// Row-major samples
    pub fn samples(&self) -> &[f32] {
        self.buffer.as_raw()
    }

    pub fn min_max(&self) -> (f32, f32) {
        self.samples()
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Apply `f` to every sample, producing a new field of the same size
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f32) -> f32,
    {
        let mut buffer = self.buffer.clone();
        for pixel in buffer.pixels_mut() {
            pixel.0[0] = f(pixel.0[0]);
        }
        Self { buffer }
    }

    /// 8-bit rendering scaled so the field maximum maps to 255
    pub fn to_luma8(&self) -> GrayImage {
        let (_, max) = self.min_max();
        let scale = if max > 0.0 { 255.0 / max } else { 0.0 };
        GrayImage::from_fn(self.buffer.width(), self.buffer.height(), |x, y| {
            let v = self.buffer.get_pixel(x, y).0[0];
            Luma([(v * scale).clamp(0.0, 255.0) as u8])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_row_major() {
        let field = IntensityField::from_rows(&[vec![1u8, 2, 3], vec![4, 5, 6]]).unwrap();
        assert_eq!(field.width(), 3);
        assert_eq!(field.height(), 2);
        assert_eq!(field.get(0, 2), 3.0);
        assert_eq!(field.get(1, 0), 4.0);
        assert_eq!(field.samples(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_ragged_rows_are_invalid() {
        let rows = vec![vec![0.0f64, 1.0], vec![2.0]];
        assert!(matches!(
            IntensityField::from_rows(&rows),
            Err(PathfinderError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_empty_input_is_invalid() {
        let rows: Vec<Vec<f32>> = Vec::new();
        assert!(matches!(
            IntensityField::from_rows(&rows),
            Err(PathfinderError::InvalidShape(_))
        ));
        assert!(matches!(
            IntensityField::from_rows(&[Vec::<f32>::new()]),
            Err(PathfinderError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_raw_length_must_match() {
        assert!(IntensityField::from_raw(2, 2, vec![0.0; 5]).is_err());
        assert!(IntensityField::from_raw(2, 2, vec![0.0; 4]).is_ok());
    }

    #[test]
    fn test_from_luma_keeps_dimensions() {
        let image = GrayImage::from_fn(7, 3, |x, _| Luma([x as u8 * 10]));
        let field = IntensityField::from_luma(&image).unwrap();
        assert_eq!((field.width(), field.height()), (7, 3));
        assert_eq!(field.get(2, 6), 60.0);
    }

    #[test]
    fn test_luma8_rendering_scales_to_maximum() {
        let field = IntensityField::from_rows(&[vec![0.0f32, 0.25], vec![0.5, 1.0]]).unwrap();
        let image = field.to_luma8();
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(image.get_pixel(1, 1).0[0], 255);
        assert_eq!(image.get_pixel(0, 1).0[0], 127);
        assert_eq!(image.get_pixel(0, 0).0[0], 0);

        let dark = IntensityField::from_fn(3, 3, |_, _| 0.0).unwrap().to_luma8();
        assert!(dark.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn test_map_and_min_max() {
        let field = IntensityField::from_fn(4, 4, |row, col| (row * 4 + col) as f32).unwrap();
        assert_eq!(field.min_max(), (0.0, 15.0));
        let doubled = field.map(|v| v * 2.0);
        assert_eq!(doubled.min_max(), (0.0, 30.0));
        assert_eq!(doubled.get(3, 3), 30.0);
    }
}
