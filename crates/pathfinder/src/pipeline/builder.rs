use std::sync::OnceLock;

use crate::{
    algorithms::{preprocessing::GradientPreprocessor, scoring::WeightKernel},
    config::PathfinderConfig,
    error::Result,
    field::IntensityField,
    pipeline::Pathfinder,
    traits::{ContourTracer, FieldPreprocessor},
    types::PixelCoordinate,
};

/// Builder for a [`Pathfinder`] with a fluent API
#[derive(Default)]
pub struct PathfinderBuilder {
    config: PathfinderConfig,
    kernel: Option<WeightKernel>,
    seed: Option<PixelCoordinate>,
    preprocessors: Vec<Box<dyn FieldPreprocessor>>,
    tracer: Option<Box<dyn ContourTracer>>,
}

impl PathfinderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: PathfinderConfig) -> Self {
        self.config = config;
        self
    }

    /// Toggle the gradient step (on by default)
    pub fn with_gradient(mut self, apply: bool) -> Self {
        self.config.apply_gradient = apply;
        self
    }

    pub fn weight_kernel(mut self, kernel: WeightKernel) -> Self {
        self.kernel = Some(kernel);
        self
    }

    pub fn start_seed(mut self, row: usize, col: usize) -> Self {
        self.seed = Some(PixelCoordinate::new(row, col));
        self
    }

    /// Add a preprocessor; these run in order before the gradient step
    pub fn add_preprocessor<P>(mut self, preprocessor: P) -> Self
    where
        P: FieldPreprocessor + 'static,
    {
        self.preprocessors.push(Box::new(preprocessor));
        self
    }

    /// Set the tracer (replaces the configured directional tracer)
    pub fn set_tracer<T>(mut self, tracer: T) -> Self
    where
        T: ContourTracer + 'static,
    {
        self.tracer = Some(Box::new(tracer));
        self
    }

    /// Run the preprocessing chain over `field` and assemble the pathfinder
    pub fn build(self, field: IntensityField) -> Result<Pathfinder> {
        self.config.validate()?;

        let mut field = field;
        for preprocessor in &self.preprocessors {
            field = preprocessor.preprocess(&field)?;
        }
        if self.config.apply_gradient {
            field = GradientPreprocessor {
                threshold: self.config.gradient_threshold,
            }
            .preprocess(&field)?;
        }

        let mut pathfinder = Pathfinder {
            field,
            kernel: self.kernel.unwrap_or_default(),
            seed: None,
            config: self.config,
            tracer: self.tracer,
            path: OnceLock::new(),
        };
        if let Some(seed) = self.seed {
            pathfinder.set_start_seed(seed.row, seed.col)?;
        }
        Ok(pathfinder)
    }
}
