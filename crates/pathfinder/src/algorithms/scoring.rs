use crate::{
    error::{PathfinderError, Result},
    field::IntensityField,
    types::PixelCoordinate,
};

/// Square, odd-sided neighbourhood weights used to score a pixel's whiteness.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightKernel {
    side: usize,
    weights: Vec<f32>,
    positive_count: usize,
}

impl Default for WeightKernel {
    fn default() -> Self {
        Self {
            side: 3,
            weights: vec![1.0; 9],
            positive_count: 9,
        }
    }
}

impl WeightKernel {
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self> {
        let side = rows.len();
        if side == 0 {
            return Err(PathfinderError::InvalidKernel("kernel is empty".to_string()));
        }
        if rows.iter().any(|row| row.len() != side) {
            return Err(PathfinderError::InvalidKernel(format!(
                "kernel must be square, got {side} rows of lengths {:?}",
                rows.iter().map(Vec::len).collect::<Vec<_>>()
            )));
        }
        if side % 2 == 0 {
            return Err(PathfinderError::InvalidKernel(format!(
                "kernel side length must be odd, got {side}"
            )));
        }

        let weights: Vec<f32> = rows.iter().flatten().copied().collect();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(PathfinderError::InvalidKernel(
                "weights must be finite and non-negative".to_string(),
            ));
        }
        let positive_count = weights.iter().filter(|w| **w > 0.0).count();
        if positive_count == 0 {
            return Err(PathfinderError::InvalidKernel(
                "kernel needs at least one positive weight".to_string(),
            ));
        }

        Ok(Self {
            side,
            weights,
            positive_count,
        })
    }

    /// All-ones kernel of the given side length
    pub fn ones(side: usize) -> Result<Self> {
        Self::from_rows(&vec![vec![1.0; side]; side])
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Number of pixels the kernel reaches on each side of its centre
    pub fn half_extent(&self) -> usize {
        self.side / 2
    }

    /// Count of strictly positive weights, the normalising divisor of a score
    pub fn positive_count(&self) -> usize {
        self.positive_count
    }

    pub fn weight(&self, row: usize, col: usize) -> f32 {
        self.weights[row * self.side + col]
    }

    pub fn rows(&self) -> Vec<Vec<f32>> {
        self.weights.chunks(self.side).map(<[f32]>::to_vec).collect()
    }
}

/// Weighted whiteness of the neighbourhood centred on `point`.
///
/// Pixels closer to the border than the kernel reaches (plus one extra pixel at
/// the bottom and right edges) are `OutOfBoundary`. A neighbourhood that
/// contains any exact zero scores 0.
pub fn score_whiteness(
    field: &IntensityField,
    kernel: &WeightKernel,
    point: PixelCoordinate,
) -> Result<f32> {
    let half = kernel.half_extent();
    if point.row < half
        || point.row + half + 1 >= field.height()
        || point.col < half
        || point.col + half + 1 >= field.width()
    {
        return Err(PathfinderError::OutOfBoundary {
            row: point.row as isize,
            col: point.col as isize,
        });
    }

    let top = point.row - half;
    let left = point.col - half;
    let mut sum = 0.0f32;
    for kr in 0..kernel.side() {
        for kc in 0..kernel.side() {
            let sample = field.get(top + kr, left + kc);
            if sample == 0.0 {
                return Ok(0.0);
            }
            sum += sample * kernel.weight(kr, kc);
        }
    }
    Ok(sum / kernel.positive_count() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(value: f32) -> IntensityField {
        IntensityField::from_fn(10, 10, |_, _| value).unwrap()
    }

    #[test]
    fn test_kernel_validation() {
        assert!(matches!(
            WeightKernel::from_rows(&[vec![1.0, 1.0], vec![1.0, 1.0]]),
            Err(PathfinderError::InvalidKernel(_))
        ));
        assert!(matches!(
            WeightKernel::from_rows(&[vec![1.0, 1.0, 1.0], vec![1.0, 1.0, 1.0]]),
            Err(PathfinderError::InvalidKernel(_))
        ));
        assert!(matches!(
            WeightKernel::from_rows(&[vec![0.0]]),
            Err(PathfinderError::InvalidKernel(_))
        ));
        assert!(matches!(
            WeightKernel::from_rows(&[]),
            Err(PathfinderError::InvalidKernel(_))
        ));
        assert!(WeightKernel::from_rows(&[vec![2.0]]).is_ok());
    }

    #[test]
    fn test_default_kernel_is_ones() {
        assert_eq!(WeightKernel::default(), WeightKernel::ones(3).unwrap());
        assert_eq!(WeightKernel::default().positive_count(), 9);
    }

    #[test]
    fn test_positive_count_ignores_zero_weights() {
        let cross = WeightKernel::from_rows(&[
            vec![0.0, 1.0, 0.0],
            vec![1.0, 1.0, 1.0],
            vec![0.0, 1.0, 0.0],
        ])
        .unwrap();
        assert_eq!(cross.positive_count(), 5);
        assert_eq!(cross.rows()[1], vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_uniform_field_scores_its_value() {
        let score = score_whiteness(&uniform(0.5), &WeightKernel::default(), PixelCoordinate::new(4, 4))
            .unwrap();
        assert!((score - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_weighted_score_divides_by_positive_count() {
        let field = IntensityField::from_fn(10, 10, |row, _| row as f32).unwrap();
        let cross = WeightKernel::from_rows(&[
            vec![0.0, 1.0, 0.0],
            vec![1.0, 1.0, 1.0],
            vec![0.0, 1.0, 0.0],
        ])
        .unwrap();
        // rows 3, 4, 4, 4, 5 under the cross
        let score = score_whiteness(&field, &cross, PixelCoordinate::new(4, 4)).unwrap();
        assert!((score - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_in_neighbourhood_scores_zero() {
        let field = IntensityField::from_fn(10, 10, |row, col| {
            if row == 3 && col == 5 { 0.0 } else { 1.0 }
        })
        .unwrap();
        let kernel = WeightKernel::default();
        assert_eq!(score_whiteness(&field, &kernel, PixelCoordinate::new(4, 4)).unwrap(), 0.0);
        assert_eq!(score_whiteness(&field, &kernel, PixelCoordinate::new(6, 6)).unwrap(), 1.0);
    }

    #[test]
    fn test_border_is_out_of_boundary() {
        let field = uniform(1.0);
        let kernel = WeightKernel::default();
        for (row, col) in [(0, 4), (4, 0), (8, 4), (4, 8), (9, 9)] {
            assert!(matches!(
                score_whiteness(&field, &kernel, PixelCoordinate::new(row, col)),
                Err(PathfinderError::OutOfBoundary { .. })
            ));
        }
        assert!(score_whiteness(&field, &kernel, PixelCoordinate::new(1, 1)).is_ok());
        assert!(score_whiteness(&field, &kernel, PixelCoordinate::new(7, 7)).is_ok());
    }

    #[test]
    fn test_larger_kernel_needs_wider_margin() {
        let field = uniform(1.0);
        let kernel = WeightKernel::ones(5).unwrap();
        assert!(score_whiteness(&field, &kernel, PixelCoordinate::new(1, 4)).is_err());
        assert!(score_whiteness(&field, &kernel, PixelCoordinate::new(2, 6)).is_ok());
        assert!(score_whiteness(&field, &kernel, PixelCoordinate::new(2, 7)).is_err());
    }
}
