pub mod builder;

use std::sync::OnceLock;

use geojson::FeatureCollection;
use tracing::info;

use crate::{
    algorithms::{
        descriptors::{self, FourierDescriptor, RadialPoint, ShapeSummary},
        preprocessing::GradientPreprocessor,
        scoring::WeightKernel,
        start::{StartCandidates, locate_start_candidates},
        tracer::DirectionalTracer,
    },
    command::{AnalysisCommand, AnalysisOutput},
    config::PathfinderConfig,
    error::{PathfinderError, Result},
    field::IntensityField,
    traits::{ContourTracer, FieldPreprocessor},
    types::{ContourPath, PixelCoordinate},
};

/// Traces one contour through an intensity field and answers descriptor queries
/// about it. The traced path is computed on first use and kept until the field,
/// kernel, seed or configuration changes.
pub struct Pathfinder {
    field: IntensityField,
    kernel: WeightKernel,
    seed: Option<PixelCoordinate>,
    config: PathfinderConfig,
    tracer: Option<Box<dyn ContourTracer>>,
    path: OnceLock<ContourPath>,
}

impl Pathfinder {
    pub fn builder() -> builder::PathfinderBuilder {
        builder::PathfinderBuilder::new()
    }

    pub fn new(field: IntensityField, apply_gradient: bool) -> Result<Self> {
        Self::builder().with_gradient(apply_gradient).build(field)
    }

    /// Build from nested rows; anything but a non-empty rectangular grid is `InvalidShape`
    pub fn from_rows<T>(rows: &[Vec<T>], apply_gradient: bool) -> Result<Self>
    where
        T: Copy + Into<f64>,
    {
        Self::new(IntensityField::from_rows(rows)?, apply_gradient)
    }

    pub fn width(&self) -> usize {
        self.field.width()
    }

    pub fn height(&self) -> usize {
        self.field.height()
    }

    /// The field the tracer walks on
    pub fn field(&self) -> &IntensityField {
        &self.field
    }

    pub fn config(&self) -> &PathfinderConfig {
        &self.config
    }

    pub fn weight_kernel(&self) -> &WeightKernel {
        &self.kernel
    }

    fn reset(&mut self) {
        self.path = OnceLock::new();
    }

    /// Turn the current field into its gradient field
    pub fn apply_gradient(&mut self) -> Result<()> {
        let gradient = GradientPreprocessor {
            threshold: self.config.gradient_threshold,
        };
        self.field = gradient.preprocess(&self.field)?;
        self.reset();
        Ok(())
    }

    /// Replace the tunables. The field is left as is; call [`Self::apply_gradient`]
    /// to re-run preprocessing.
    pub fn set_config(&mut self, config: PathfinderConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        self.reset();
        Ok(())
    }

    pub fn set_weight_kernel(&mut self, kernel: WeightKernel) {
        self.kernel = kernel;
        self.reset();
    }

    pub fn set_weight_rows(&mut self, rows: &[Vec<f32>]) -> Result<()> {
        self.set_weight_kernel(WeightKernel::from_rows(rows)?);
        Ok(())
    }

    pub fn set_default_weight(&mut self) {
        self.set_weight_kernel(WeightKernel::default());
    }

    pub fn set_start_seed(&mut self, row: usize, col: usize) -> Result<()> {
        let seed = PixelCoordinate::new(row, col);
        if !self.field.contains(seed) {
            return Err(PathfinderError::InvalidCoordinate {
                row,
                col,
                height: self.height(),
                width: self.width(),
            });
        }
        self.seed = Some(seed);
        self.reset();
        Ok(())
    }

    /// Explicit seed, or the image centre
    pub fn start_seed(&self) -> PixelCoordinate {
        self.seed
            .unwrap_or_else(|| PixelCoordinate::new(self.height() / 2, self.width() / 2))
    }

    pub fn start_candidates(&self) -> Result<StartCandidates> {
        locate_start_candidates(&self.field, self.start_seed(), self.config.boundary_margin)
    }

    /// Trace on first call, afterwards return the cached path
    pub fn contour_path(&self) -> Result<&ContourPath> {
        if let Some(path) = self.path.get() {
            return Ok(path);
        }

        let candidates = self.start_candidates()?;
        let path = match &self.tracer {
            Some(tracer) => tracer.trace(&self.field, &self.kernel, &candidates)?,
            None => DirectionalTracer::from_config(&self.config)?.trace(
                &self.field,
                &self.kernel,
                &candidates,
            )?,
        };
        info!(
            points = path.len(),
            start = ?path.points().first(),
            "contour traced"
        );
        Ok(self.path.get_or_init(|| path))
    }

    /// Contour in `(x, y)` order, optionally relative to the centroid
    pub fn contour(&self, centered: bool) -> Result<Vec<[f64; 2]>> {
        let path = self.contour_path()?;
        Ok(if centered {
            path.centered_xy()
        } else {
            path.xy()
        })
    }

    /// Contour as integer `(x, y)` pixel pairs
    pub fn contour_pixels(&self) -> Result<Vec<[usize; 2]>> {
        Ok(self
            .contour_path()?
            .points()
            .iter()
            .map(|p| [p.col, p.row])
            .collect())
    }

    /// Centroid in `(x, y)` order
    pub fn centroid(&self) -> Result<[f64; 2]> {
        Ok(self.contour_path()?.centroid().xy())
    }

    pub fn radial_profile(&self) -> Result<Vec<RadialPoint>> {
        Ok(self.contour_path()?.radial_profile())
    }

    pub fn fourier_descriptor(&self, profile: &[RadialPoint]) -> FourierDescriptor {
        descriptors::fourier_descriptor(profile)
    }

    pub fn summary(&self) -> Result<ShapeSummary> {
        Ok(self.contour_path()?.summary())
    }

    pub fn execute(&self, command: AnalysisCommand) -> Result<AnalysisOutput> {
        let output = match command {
            AnalysisCommand::Contour => AnalysisOutput::Contour(self.contour(false)?),
            AnalysisCommand::CenteredContour => AnalysisOutput::CenteredContour(self.contour(true)?),
            AnalysisCommand::Centroid => AnalysisOutput::Centroid(self.centroid()?),
            AnalysisCommand::RadialProfile => AnalysisOutput::RadialProfile(self.radial_profile()?),
            AnalysisCommand::FourierDescriptor => {
                let profile = self.radial_profile()?;
                AnalysisOutput::FourierDescriptor(self.fourier_descriptor(&profile))
            }
            AnalysisCommand::Summary => AnalysisOutput::Summary(self.summary()?),
        };
        Ok(output)
    }

    pub fn to_geojson(&self) -> Result<FeatureCollection> {
        self.contour_path()?.to_geojson(self.width(), self.height())
    }
}

impl std::fmt::Debug for Pathfinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pathfinder")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("seed", &self.start_seed())
            .field("config", &self.config)
            .field("custom_tracer", &self.tracer.is_some())
            .field("traced", &self.path.get().is_some())
            .finish()
    }
}
