//! Viewer configuration
//!
//! Every field has a default, so an empty TOML document is a valid config.
//!
//! ```toml
//! asset_cache_capacity = 8
//!
//! [animation]
//! mount_delay_ms = 500
//! motion_start_delay_ms = 1000
//! entrance_spring = { tension = 120.0, friction = 14.0, mass = 1.2 }
//!
//! [pointer]
//! tilt_gain = 0.15
//! yaw_gain = 0.2
//! ```

use badge_animation::SpringConfig;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use crate::error::{Result, ViewerError};

/// Top-level viewer configuration
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ViewerConfig {
    /// Number of post-processed badge scenes kept in memory
    #[serde(default = "default_cache_capacity")]
    pub asset_cache_capacity: usize,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub pointer: PointerConfig,
    #[serde(default)]
    pub transform: TransformConfig,
}

fn default_cache_capacity() -> usize {
    8
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            asset_cache_capacity: default_cache_capacity(),
            animation: AnimationConfig::default(),
            pointer: PointerConfig::default(),
            transform: TransformConfig::default(),
        }
    }
}

/// Entrance timing and spring parameters
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Mount to phase flip (entrance target change, pointer activation)
    pub mount_delay_ms: u64,
    /// Phase flip to the entrance spring starting to move
    pub motion_start_delay_ms: u64,
    /// Entrance rotation at mount (radians)
    pub initial_angle: f32,
    /// Entrance rotation at rest (radians)
    pub rest_angle: f32,
    pub entrance_spring: SpringConfig,
    pub pointer_spring: SpringConfig,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            mount_delay_ms: 500,
            motion_start_delay_ms: 1000,
            initial_angle: PI,
            rest_angle: 0.0,
            entrance_spring: SpringConfig::new(120.0, 14.0, 1.2),
            pointer_spring: SpringConfig::new(100.0, 25.0, 0.5),
        }
    }
}

/// Pointer-to-rotation gains
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PointerConfig {
    /// Radians of tilt per unit of normalized vertical pointer offset
    pub tilt_gain: f32,
    /// Radians of yaw per unit of normalized horizontal pointer offset
    pub yaw_gain: f32,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            tilt_gain: 0.15,
            yaw_gain: 0.20,
        }
    }
}

/// Fixed parts of the badge transform
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Uniform scale on all axes
    pub scale: f32,
    /// World position
    pub position: [f32; 3],
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            scale: 0.5,
            position: [0.0, 0.0, 0.0],
        }
    }
}

impl ViewerConfig {
    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ViewerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the animation cannot run with
    pub fn validate(&self) -> Result<()> {
        let animation = &self.animation;
        for (name, spring) in [
            ("entrance_spring", animation.entrance_spring),
            ("pointer_spring", animation.pointer_spring),
        ] {
            if !spring.is_valid() {
                return Err(ViewerError::InvalidConfig(format!(
                    "{name} needs positive tension and mass and non-negative friction, got {spring:?}"
                )));
            }
        }

        let finite = [
            ("initial_angle", animation.initial_angle),
            ("rest_angle", animation.rest_angle),
            ("tilt_gain", self.pointer.tilt_gain),
            ("yaw_gain", self.pointer.yaw_gain),
            ("scale", self.transform.scale),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ViewerError::InvalidConfig(format!("{name} must be finite, got {value}")));
        }
        if self.transform.position.iter().any(|v| !v.is_finite()) {
            return Err(ViewerError::InvalidConfig("position must be finite".to_string()));
        }

        if self.asset_cache_capacity == 0 {
            return Err(ViewerError::InvalidConfig(
                "asset_cache_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = ViewerConfig::from_toml_str("").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.animation.mount_delay_ms, 500);
        assert_eq!(config.animation.motion_start_delay_ms, 1000);
        assert_eq!(config.pointer.tilt_gain, 0.15);
        assert_eq!(config.pointer.yaw_gain, 0.20);
        assert_eq!(config.transform.scale, 0.5);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = ViewerConfig::from_toml_str(
            r#"
            [animation]
            motion_start_delay_ms = 0
            entrance_spring = { tension = 200.0, friction = 20.0, mass = 1.0 }

            [pointer]
            yaw_gain = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(config.animation.mount_delay_ms, 500);
        assert_eq!(config.animation.motion_start_delay_ms, 0);
        assert_eq!(config.animation.entrance_spring, SpringConfig::new(200.0, 20.0, 1.0));
        assert_eq!(config.animation.pointer_spring, SpringConfig::new(100.0, 25.0, 0.5));
        assert_eq!(config.pointer.yaw_gain, 0.5);
        assert_eq!(config.pointer.tilt_gain, 0.15);
    }

    #[test]
    fn test_invalid_spring_rejected() {
        let err = ViewerConfig::from_toml_str(
            "[animation]\npointer_spring = { tension = 100.0, friction = 25.0, mass = 0.0 }",
        )
        .unwrap_err();
        assert!(matches!(err, ViewerError::InvalidConfig(ref msg) if msg.contains("pointer_spring")));
    }

    #[test]
    fn test_zero_cache_rejected() {
        let err = ViewerConfig::from_toml_str("asset_cache_capacity = 0").unwrap_err();
        assert!(matches!(err, ViewerError::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = ViewerConfig::from_toml_str("[animation\n").unwrap_err();
        assert!(matches!(err, ViewerError::ConfigParse(_)));
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = ViewerConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(ViewerConfig::from_toml_str(&text).unwrap(), config);
    }
}
