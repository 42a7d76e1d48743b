use crate::{
    algorithms::{scoring::WeightKernel, start::StartCandidates},
    error::Result,
    field::IntensityField,
    types::ContourPath,
};

/// Trait for field preprocessing steps (e.g. edge gradient, smoothing)
pub trait FieldPreprocessor: Send + Sync {
    /// Produce a new field from the input
    fn preprocess(&self, field: &IntensityField) -> Result<IntensityField>;
}

/// Trait for contour tracing algorithms
pub trait ContourTracer: Send + Sync {
    /// Trace a closed contour through the field, starting from one of the candidates
    fn trace(
        &self,
        field: &IntensityField,
        kernel: &WeightKernel,
        candidates: &StartCandidates,
    ) -> Result<ContourPath>;
}
