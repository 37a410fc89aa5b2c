//! Damped spring physics
//!
//! A [`Spring`] moves its value toward a target under a linear restoring force
//! with viscous damping, integrated with RK4. Changing the target keeps the
//! current velocity, so an interrupted animation continues from where it was.

use serde::{Deserialize, Serialize};

/// Distance and speed below which a spring counts as settled
const REST_EPSILON: f32 = 1e-3;

/// Longest single integration step (seconds)
const MAX_SUBSTEP: f32 = 1.0 / 120.0;

/// Longest frame delta honored in one call; longer stalls are truncated
const MAX_FRAME_DELTA: f32 = 0.1;

/// Physical parameters of a spring
///
/// `stiffness` and `damping` are also accepted as `tension` and `friction`
/// when deserializing, matching the vocabulary of web spring libraries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    #[serde(alias = "tension")]
    pub stiffness: f32,
    #[serde(alias = "friction")]
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    pub const fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Soft, slightly bouncy motion
    pub const fn gentle() -> Self {
        Self::new(120.0, 14.0, 1.0)
    }

    /// Pronounced overshoot
    pub const fn wobbly() -> Self {
        Self::new(180.0, 12.0, 1.0)
    }

    /// Quick with little overshoot
    pub const fn stiff() -> Self {
        Self::new(210.0, 20.0, 1.0)
    }

    /// Fast and tight
    pub const fn snappy() -> Self {
        Self::new(400.0, 30.0, 1.0)
    }

    /// Damping ratio ζ; below 1.0 the spring overshoots its target
    pub fn damping_ratio(&self) -> f32 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    /// Whether the parameters describe a spring that can be integrated
    pub fn is_valid(&self) -> bool {
        self.stiffness.is_finite()
            && self.damping.is_finite()
            && self.mass.is_finite()
            && self.stiffness > 0.0
            && self.damping >= 0.0
            && self.mass > 0.0
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::gentle()
    }
}

/// A spring-animated scalar
#[derive(Clone, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    /// Create a spring resting at `initial`
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    /// Retarget the spring; velocity is preserved
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < REST_EPSILON && self.velocity.abs() < REST_EPSILON
    }

    /// Advance the simulation by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if !(dt > 0.0) || self.is_settled() {
            return;
        }

        let dt = dt.min(MAX_FRAME_DELTA);
        let substeps = (dt / MAX_SUBSTEP).ceil().max(1.0) as u32;
        let h = dt / substeps as f32;
        for _ in 0..substeps {
            self.integrate(h);
        }

        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
        }
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        let SpringConfig {
            stiffness,
            damping,
            mass,
        } = self.config;
        (-stiffness * (x - self.target) - damping * v) / mass
    }

    fn integrate(&mut self, h: f32) {
        let (x, v) = (self.value, self.velocity);

        let k1x = v;
        let k1v = self.acceleration(x, v);

        let k2x = v + 0.5 * h * k1v;
        let k2v = self.acceleration(x + 0.5 * h * k1x, k2x);

        let k3x = v + 0.5 * h * k2v;
        let k3v = self.acceleration(x + 0.5 * h * k2x, k3x);

        let k4x = v + h * k3v;
        let k4v = self.acceleration(x + h * k3x, k4x);

        self.value = x + h / 6.0 * (k1x + 2.0 * k2x + 2.0 * k3x + k4x);
        self.velocity = v + h / 6.0 * (k1v + 2.0 * k2v + 2.0 * k3v + k4v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    #[test]
    fn test_spring_at_rest_does_not_move() {
        let mut spring = Spring::new(SpringConfig::gentle(), 0.0);
        for _ in 0..60 {
            spring.step(FRAME);
        }
        assert_eq!(spring.value(), 0.0);
        assert_eq!(spring.velocity(), 0.0);
        assert!(spring.is_settled());
    }

    #[test]
    fn test_spring_reaches_target() {
        let mut spring = Spring::new(SpringConfig::stiff(), 0.0);
        spring.set_target(100.0);
        assert!(!spring.is_settled());

        for _ in 0..300 {
            spring.step(FRAME);
        }

        assert!(spring.is_settled());
        assert_eq!(spring.value(), 100.0);
    }

    #[test]
    fn test_underdamped_spring_overshoots() {
        let config = SpringConfig::new(120.0, 14.0, 1.2);
        assert!(config.damping_ratio() < 1.0);

        let mut spring = Spring::new(config, std::f32::consts::PI);
        spring.set_target(0.0);

        let mut min = f32::MAX;
        for _ in 0..300 {
            spring.step(FRAME);
            min = min.min(spring.value());
        }
        assert!(min < 0.0, "expected overshoot past the target, min = {min}");
        assert!(spring.is_settled());
    }

    #[test]
    fn test_overdamped_spring_is_monotonic() {
        let config = SpringConfig::new(100.0, 25.0, 0.5);
        assert!(config.damping_ratio() > 1.0);

        let mut spring = Spring::new(config, 0.2);
        spring.set_target(0.0);

        let mut previous = spring.value();
        for _ in 0..240 {
            spring.step(FRAME);
            assert!(spring.value() <= previous + 1e-6);
            assert!(spring.value() >= -1e-6);
            previous = spring.value();
        }
        assert!(spring.is_settled());
    }

    #[test]
    fn test_retarget_preserves_velocity() {
        let mut spring = Spring::new(SpringConfig::stiff(), 0.0);
        spring.set_target(100.0);
        for _ in 0..10 {
            spring.step(FRAME);
        }
        let mid_velocity = spring.velocity();
        assert!(mid_velocity > 0.0);

        spring.set_target(0.0);
        assert_eq!(spring.velocity(), mid_velocity);
    }

    #[test]
    fn test_large_frame_delta_is_truncated() {
        let mut stalled = Spring::new(SpringConfig::snappy(), 0.0);
        stalled.set_target(1.0);
        stalled.step(5.0);

        let mut capped = Spring::new(SpringConfig::snappy(), 0.0);
        capped.set_target(1.0);
        capped.step(MAX_FRAME_DELTA);

        assert!((stalled.value() - capped.value()).abs() < 1e-6);
        assert!(stalled.value().is_finite());
    }

    #[test]
    fn test_non_positive_delta_is_ignored() {
        let mut spring = Spring::new(SpringConfig::gentle(), 0.0);
        spring.set_target(1.0);
        spring.step(0.0);
        spring.step(-1.0);
        spring.step(f32::NAN);
        assert_eq!(spring.value(), 0.0);
    }

    #[test]
    fn test_config_validity() {
        assert!(SpringConfig::gentle().is_valid());
        assert!(!SpringConfig::new(0.0, 1.0, 1.0).is_valid());
        assert!(!SpringConfig::new(1.0, -1.0, 1.0).is_valid());
        assert!(!SpringConfig::new(1.0, 1.0, 0.0).is_valid());
    }

    #[test]
    fn test_config_accepts_tension_friction_names() {
        let config: SpringConfig = toml::from_str("tension = 120.0\nfriction = 14.0\nmass = 1.2").unwrap();
        assert_eq!(config, SpringConfig::new(120.0, 14.0, 1.2));
    }
}
