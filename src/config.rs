//! Physics configuration.
//!
//! Global step sizes and per-collider layering. Both load from JSON and
//! fall back to the engine defaults.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::fixed::{FixedSingle, DEFAULT_TRUNC_BITS, FIXED_SCALE};
use crate::error::ConfigError;
use crate::world::MAP_SIZE;

/// Engine-wide physics constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Pixel-walk increment used by sweeps and probes
    pub step_size: FixedSingle,
    /// Thickness of the landing mask below the feet
    pub mask_size: FixedSingle,
    /// Default bound for floor/ladder adjustment queries
    pub query_max_distance: FixedSingle,
    /// Fractional bits kept when truncating sub-pixel displacements
    pub trunc_frac_bits: u32,
    /// Sub-step used by coarse tracer sweeps
    pub coarse_sweep_step: FixedSingle,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            step_size: FixedSingle::ONE,
            mask_size: FixedSingle::ONE,
            query_max_distance: FixedSingle::from_int(8),
            trunc_frac_bits: DEFAULT_TRUNC_BITS,
            coarse_sweep_step: FixedSingle::from_int(MAP_SIZE),
        }
    }
}

impl PhysicsConfig {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        debug!(?config, "physics config loaded");
        Ok(config)
    }

    /// Reject configurations the checkers cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.step_size <= FixedSingle::ZERO {
            return Err(ConfigError::Invalid("step_size must be positive".into()));
        }
        if self.mask_size <= FixedSingle::ZERO {
            return Err(ConfigError::Invalid("mask_size must be positive".into()));
        }
        if self.query_max_distance < FixedSingle::ZERO {
            return Err(ConfigError::Invalid("query_max_distance must not be negative".into()));
        }
        if self.trunc_frac_bits > FIXED_SCALE {
            return Err(ConfigError::Invalid(format!(
                "trunc_frac_bits must be at most {FIXED_SCALE}"
            )));
        }
        if self.coarse_sweep_step < self.step_size {
            return Err(ConfigError::Invalid(
                "coarse_sweep_step must not be smaller than step_size".into(),
            ));
        }
        Ok(())
    }
}

/// Per-collider layering and query switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColliderConfig {
    /// Rows at the top of the box excluded from the side columns
    pub head_height: FixedSingle,
    /// Rows at the bottom of the box excluded from the side columns
    pub legs_height: FixedSingle,
    /// Record which cells/actors produced each flag
    pub use_placements: bool,
    /// Query the tile grid
    pub check_world: bool,
    /// Query other actors
    pub check_actors: bool,
}

impl Default for ColliderConfig {
    fn default() -> Self {
        Self {
            head_height: FixedSingle::ZERO,
            legs_height: FixedSingle::ZERO,
            use_placements: false,
            check_world: true,
            check_actors: false,
        }
    }
}

impl ColliderConfig {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.head_height < FixedSingle::ZERO || config.legs_height < FixedSingle::ZERO {
            return Err(ConfigError::Invalid("head/legs heights must not be negative".into()));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PhysicsConfig::default().validate().is_ok());
        assert_eq!(PhysicsConfig::default().coarse_sweep_step, FixedSingle::from_int(16));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = PhysicsConfig::from_json_str(r#"{ "trunc_frac_bits": 4 }"#).unwrap();
        assert_eq!(config.trunc_frac_bits, 4);
        assert_eq!(config.step_size, FixedSingle::ONE);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = PhysicsConfig::from_json_str(r#"{ "step_size": 0 }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = PhysicsConfig::from_json_str(r#"{ "trunc_frac_bits": 17 }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let result = PhysicsConfig::from_json_str("{ step_size: ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_collider_config_json() {
        let config = ColliderConfig::from_json_str(
            r#"{ "head_height": 262144, "use_placements": true }"#,
        )
        .unwrap();
        assert_eq!(config.head_height, FixedSingle::from_int(4));
        assert!(config.use_placements);
        assert!(config.check_world);
    }
}
