//! # Pathfinder
//!
//! Traces the boundary of a roughly closed, bright-on-dark shape through a
//! grayscale intensity field and derives shape descriptors from it.
//!
//! ## Stages
//!
//! - **Gradient field**: Sobel edge magnitude, min-max normalized and clipped
//! - **Start candidates**: brightest pixel on each axis ray from a seed
//! - **Whiteness scoring**: weighted neighbourhood mean under an odd kernel
//! - **Directional tracing**: greedy heading-constrained walk with closure,
//!   self-intersection detection and a single backward repair
//! - **Descriptors**: arc-length centroid, radial profile, radial Fourier coefficients
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pathfinder::{IntensityField, Pathfinder};
//!
//! let field = IntensityField::from_fn(128, 128, |row, col| {
//!     let d = (row as f32 - 64.0).hypot(col as f32 - 64.0);
//!     if d < 30.0 { 200.0 } else { 10.0 }
//! })?;
//! let pathfinder = Pathfinder::new(field, true)?;
//!
//! let contour = pathfinder.contour(false)?;
//! let [cx, cy] = pathfinder.centroid()?;
//! let profile = pathfinder.radial_profile()?;
//! let descriptor = pathfinder.fourier_descriptor(&profile);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Custom Setup
//!
//! ```rust,no_run
//! use pathfinder::{Pathfinder, PathfinderConfig, NormalizePreprocessor, WeightKernel, IntensityField};
//!
//! # let field = IntensityField::from_fn(64, 64, |_, _| 0.0)?;
//! let pathfinder = Pathfinder::builder()
//!     .config(PathfinderConfig { max_iterations: 5000, ..Default::default() })
//!     .add_preprocessor(NormalizePreprocessor)
//!     .weight_kernel(WeightKernel::ones(5)?)
//!     .start_seed(40, 32)
//!     .build(field)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod algorithms;
pub mod command;
pub mod config;
pub mod error;
pub mod field;
pub mod io;
pub mod pipeline;
pub mod traits;
pub mod types;

pub use algorithms::*;
pub use command::{AnalysisCommand, AnalysisOutput};
pub use config::PathfinderConfig;
pub use error::{PathfinderError, Result};
pub use field::IntensityField;
pub use pipeline::{Pathfinder, builder::PathfinderBuilder};
pub use traits::*;
pub use types::{Centroid, ContourPath, PixelCoordinate};
