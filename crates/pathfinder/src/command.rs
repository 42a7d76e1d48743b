use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};

use crate::algorithms::descriptors::{FourierDescriptor, RadialPoint, ShapeSummary};

#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
    EnumIter,
    VariantNames,
    IntoStaticStr,
    PartialEq,
    Eq,
)]
#[serde(tag = "type", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnalysisCommand {
    /// Traced boundary in (x, y) order
    Contour,

    /// Traced boundary relative to its centroid
    CenteredContour,

    /// Arc-length weighted centroid
    Centroid,

    /// (radius, angle) of every boundary point around the centroid
    RadialProfile,

    /// Harmonic amplitudes and phases of the radial profile
    FourierDescriptor,

    /// Point count, perimeter, area, centroid and mean radius
    Summary,
}

impl AnalysisCommand {
    /// Get the JSON schema for all commands
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(AnalysisCommand)
    }

    pub fn command_names() -> &'static [&'static str] {
        <Self as VariantNames>::VARIANTS
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Contour => "Ordered boundary pixels of the traced shape as (x, y) pairs",
            Self::CenteredContour => "Boundary pixels with the centroid subtracted from every point",
            Self::Centroid => "Arc-length weighted centroid of the boundary as (x, y)",
            Self::RadialProfile => "Radius and angle in degrees of each boundary point around the centroid",
            Self::FourierDescriptor => "Radial Fourier amplitudes and phases, one pair per harmonic order",
            Self::Summary => "Point count, perimeter, enclosed area, centroid and mean radius",
        }
    }
}

/// Result of an [`AnalysisCommand`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum AnalysisOutput {
    Contour(Vec<[f64; 2]>),
    CenteredContour(Vec<[f64; 2]>),
    Centroid([f64; 2]),
    RadialProfile(Vec<RadialPoint>),
    FourierDescriptor(FourierDescriptor),
    Summary(ShapeSummary),
}
