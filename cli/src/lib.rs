use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_cross_mut, draw_line_segment_mut};
use pathfinder::{ContourPath, IntensityField, Pathfinder, PathfinderConfig, PathfinderError, WeightKernel};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    ImageError(#[from] image::ImageError),
    #[error(transparent)]
    PathfinderError(#[from] PathfinderError),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// Everything needed to trace one image, loadable from TOML or JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct TraceSettings {
    /// Seed `[row, col]` for the start-point search, image centre when absent
    pub seed: Option<[usize; 2]>,
    /// Gaussian blur applied to the decoded image before tracing
    pub blur_sigma: Option<f32>,
    /// Square, odd-sided neighbourhood weights, 3×3 ones when absent
    pub weights: Option<Vec<Vec<f32>>>,
    pub pathfinder: PathfinderConfig,
}

impl TraceSettings {
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load settings
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(CliError::UnsupportedFileFormat),
        }
    }

    pub fn to_toml(&self) -> Result<String, CliError> {
        Ok(toml::to_string_pretty(&self)?)
    }

    pub fn to_json(&self) -> Result<String, CliError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    /// Save in the format given by the file extension
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CliError> {
        let path_ref = path.as_ref();
        let content = match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => self.to_toml()?,
            Some("json") => self.to_json()?,
            _ => return Err(CliError::UnsupportedFileFormat),
        };
        fs::write(path_ref, content)?;
        Ok(())
    }

    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(TraceSettings)
    }

    /// Blur if requested and convert to a floating point field
    pub fn prepare_field(&self, image: &GrayImage) -> Result<IntensityField, CliError> {
        let field = match self.blur_sigma {
            Some(sigma) if sigma > 0.0 => {
                debug!(sigma, "blurring input");
                IntensityField::from_luma(&imageproc::filter::gaussian_blur_f32(image, sigma))?
            }
            _ => IntensityField::from_luma(image)?,
        };
        Ok(field)
    }

    pub fn build(&self, image: &GrayImage) -> Result<Pathfinder, CliError> {
        let mut builder = Pathfinder::builder().config(self.pathfinder.clone());
        if let Some(rows) = &self.weights {
            builder = builder.weight_kernel(WeightKernel::from_rows(rows)?);
        }
        if let Some([row, col]) = self.seed {
            builder = builder.start_seed(row, col);
        }
        Ok(builder.build(self.prepare_field(image)?)?)
    }
}

pub fn load_image<P: AsRef<Path>>(path: P) -> Result<GrayImage, CliError> {
    Ok(image::open(path)?.to_luma8())
}

/// The input in gray with the contour in red and a green cross on the centroid
pub fn render_overlay(image: &GrayImage, path: &ContourPath) -> RgbImage {
    let mut canvas = RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let v = image.get_pixel(x, y).0[0];
        Rgb([v, v, v])
    });

    let red = Rgb([255u8, 0, 0]);
    let points = path.xy();
    for (i, &[x, y]) in points.iter().enumerate() {
        let [nx, ny] = points[(i + 1) % points.len()];
        draw_line_segment_mut(&mut canvas, (x as f32, y as f32), (nx as f32, ny as f32), red);
    }

    let [cx, cy] = path.centroid().xy();
    draw_cross_mut(&mut canvas, Rgb([0u8, 255, 0]), cx.round() as i32, cy.round() as i32);
    canvas
}
