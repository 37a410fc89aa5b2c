//! Per-frame transform composition

use badge_core::geometry::{Mat4, Vec3};

use crate::config::TransformConfig;

/// Transform applied to the badge model for one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BadgeTransform {
    pub scale: Vec3,
    pub position: Vec3,
    /// Rotation about the vertical axis: entrance plus pointer yaw
    pub rotation_y: f32,
    /// Rotation about the view axis: pointer tilt
    pub rotation_z: f32,
}

impl BadgeTransform {
    /// Column-major model matrix, `T * Ry * Rz * S`
    pub fn matrix(&self) -> Mat4 {
        Mat4::translation(self.position.x, self.position.y, self.position.z)
            .mul(&Mat4::rotation_y(self.rotation_y))
            .mul(&Mat4::rotation_z(self.rotation_z))
            .mul(&Mat4::scale(self.scale.x, self.scale.y, self.scale.z))
    }
}

/// Combines the entrance and pointer rotations into a [`BadgeTransform`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameComposer {
    scale: Vec3,
    position: Vec3,
}

impl FrameComposer {
    pub fn new(config: &TransformConfig) -> Self {
        Self {
            scale: Vec3::splat(config.scale),
            position: Vec3::from(config.position),
        }
    }

    /// Sum the entrance and pointer yaw; tilt passes through unchanged.
    /// Angles are not clamped or wrapped.
    pub fn compose(&self, entrance: f32, pointer_yaw: f32, pointer_tilt: f32) -> BadgeTransform {
        BadgeTransform {
            scale: self.scale,
            position: self.position,
            rotation_y: entrance + pointer_yaw,
            rotation_z: pointer_tilt,
        }
    }
}

impl Default for FrameComposer {
    fn default() -> Self {
        Self::new(&TransformConfig::default())
    }
}
