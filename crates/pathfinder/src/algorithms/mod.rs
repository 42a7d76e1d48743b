pub mod descriptors;
pub mod heading;
pub mod preprocessing;
pub mod scoring;
pub mod start;
pub mod tracer;

pub use descriptors::{
    AngleUnit, FourierDescriptor, RadialPoint, ShapeSummary, arc_length_centroid, radial_fourier,
    radial_profile,
};
pub use heading::{Heading, Sector};
pub use preprocessing::{GradientPreprocessor, NormalizePreprocessor};
pub use scoring::{WeightKernel, score_whiteness};
pub use start::{StartCandidate, StartCandidates, StartDirection, locate_start_candidates};
pub use tracer::{DirectionalTracer, TraceState, WalkOutcome};
