use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathfinderError {
    #[error("Invalid input shape: {0}")]
    InvalidShape(String),

    #[error("Invalid weight kernel: {0}")]
    InvalidKernel(String),

    #[error("Coordinate ({row}, {col}) lies outside the {height}x{width} image")]
    InvalidCoordinate {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Gradient field has no dynamic range")]
    DegenerateInput,

    #[error("Out of boundary: ({row}, {col})")]
    OutOfBoundary { row: isize, col: isize },

    #[error("No closed path found")]
    NoClosedPathFound,

    #[error("Maximum of {0} iterations reached")]
    MaxIterationReached(usize),

    #[error("Radial profile mismatch: {radii} radii but {angles} angles")]
    MismatchedProfile { radii: usize, angles: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),
}

pub type Result<T> = std::result::Result<T, PathfinderError>;
