use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    algorithms::{preprocessing::DEFAULT_GRADIENT_THRESHOLD, start::StartDirection},
    error::{PathfinderError, Result},
};

/// Tunables shared by the gradient builder, the start locator and the tracer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PathfinderConfig {
    /// Upper bound on walk steps before the trace gives up
    #[schemars(range(min = 1))]
    pub max_iterations: usize,

    /// Lookback used both for heading estimation and as the repair seed length
    #[schemars(range(min = 2))]
    pub inflexibility: usize,

    /// Normalized gradient values at or below this are cleared
    #[schemars(range(min = 0.0, max = 1.0))]
    pub gradient_threshold: f32,

    /// Pixels kept clear of the image edge when scanning for a start point
    pub boundary_margin: usize,

    /// Path length that must be exceeded before closure and revisits are checked
    pub min_closure_length: usize,

    /// Whether the input is turned into a gradient field before tracing
    pub apply_gradient: bool,

    /// Which start candidate the tracer begins from
    pub start_direction: StartDirection,
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            inflexibility: 5,
            gradient_threshold: DEFAULT_GRADIENT_THRESHOLD,
            boundary_margin: 2,
            min_closure_length: 10,
            apply_gradient: true,
            start_direction: StartDirection::West,
        }
    }
}

impl PathfinderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(PathfinderError::InvalidConfig(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if self.inflexibility < 2 {
            return Err(PathfinderError::InvalidConfig(format!(
                "inflexibility must be at least 2, got {}",
                self.inflexibility
            )));
        }
        if self.min_closure_length < self.inflexibility {
            return Err(PathfinderError::InvalidConfig(format!(
                "min_closure_length ({}) must not be below inflexibility ({})",
                self.min_closure_length, self.inflexibility
            )));
        }
        if !(0.0..1.0).contains(&self.gradient_threshold) {
            return Err(PathfinderError::InvalidConfig(format!(
                "gradient_threshold must lie in [0, 1), got {}",
                self.gradient_threshold
            )));
        }
        Ok(())
    }

    /// JSON schema of the configuration
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(PathfinderConfig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PathfinderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_iterations, 1000);
        assert_eq!(config.inflexibility, 5);
        assert_eq!(config.boundary_margin, 2);
        assert_eq!(config.start_direction, StartDirection::West);
    }

    #[test]
    fn test_rejects_bad_values() {
        let cases = [
            PathfinderConfig { max_iterations: 0, ..Default::default() },
            PathfinderConfig { inflexibility: 1, ..Default::default() },
            PathfinderConfig { gradient_threshold: 1.0, ..Default::default() },
            PathfinderConfig { gradient_threshold: -0.1, ..Default::default() },
            PathfinderConfig { min_closure_length: 3, ..Default::default() },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(PathfinderError::InvalidConfig(_))),
                "{config:?}"
            );
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PathfinderConfig =
            serde_json::from_str(r#"{"max_iterations": 50, "start_direction": "north"}"#).unwrap();
        assert_eq!(config.max_iterations, 50);
        assert_eq!(config.start_direction, StartDirection::North);
        assert_eq!(config.inflexibility, 5);
        assert!(config.apply_gradient);
    }

    #[test]
    fn test_schema_lists_fields() {
        let schema = serde_json::to_value(PathfinderConfig::schema()).unwrap();
        let properties = &schema["properties"];
        assert!(properties.get("max_iterations").is_some());
        assert!(properties.get("start_direction").is_some());
    }
}
