//! Unit bridge between pixel space (scene) and simulation space (physics).
//!
//! Every constructor and every per-frame sync goes through one `UnitBridge`
//! owned by the simulation context. The scale factor is fixed when the world
//! is created and must be finite and positive.

use crate::core::error::ConfigError;
use crate::domain::geometry::Vec2;

/// Default pixels per simulation unit.
pub const DEFAULT_SCALE: f32 = 10.0;

/// Downward gravity in simulation units / s² when gravity is enabled.
pub const GRAVITY: f32 = 20.0;

/// Anything that can be scaled component-wise: scalars and 2-vectors.
pub trait Scalable: Copy {
    fn scaled(self, factor: f32) -> Self;
    fn divided(self, factor: f32) -> Self;
}

impl Scalable for f32 {
    #[inline]
    fn scaled(self, factor: f32) -> Self {
        self * factor
    }

    #[inline]
    fn divided(self, factor: f32) -> Self {
        self / factor
    }
}

impl Scalable for Vec2 {
    #[inline]
    fn scaled(self, factor: f32) -> Self {
        Vec2::new(self.x * factor, self.y * factor)
    }

    #[inline]
    fn divided(self, factor: f32) -> Self {
        Vec2::new(self.x / factor, self.y / factor)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitBridge {
    scale: f32,
}

impl UnitBridge {
    pub fn new(scale: f32) -> Result<Self, ConfigError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ConfigError::InvalidScale(scale));
        }
        Ok(Self { scale })
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Pixels -> simulation units.
    #[inline]
    pub fn to_sim<T: Scalable>(&self, value: T) -> T {
        value.divided(self.scale)
    }

    /// Simulation units -> pixels.
    #[inline]
    pub fn to_pixels<T: Scalable>(&self, value: T) -> T {
        value.scaled(self.scale)
    }

    #[inline]
    pub fn to_sim_xy(&self, x: f32, y: f32) -> Vec2 {
        self.to_sim(Vec2::new(x, y))
    }

    #[inline]
    pub fn to_pixels_xy(&self, x: f32, y: f32) -> Vec2 {
        self.to_pixels(Vec2::new(x, y))
    }
}

impl Default for UnitBridge {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
        }
    }
}

/// World-creation settings: the scale factor plus the gravity switch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldSettings {
    pub units: UnitBridge,
    pub gravity: Vec2,
}

impl WorldSettings {
    pub fn configure(scale: f32, gravity_enabled: bool) -> Result<Self, ConfigError> {
        let units = UnitBridge::new(scale)?;
        let gravity = if gravity_enabled {
            Vec2::new(0.0, GRAVITY)
        } else {
            Vec2::zero()
        };
        Ok(Self { units, gravity })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_non_positive_scale() {
        assert_eq!(UnitBridge::new(0.0), Err(ConfigError::InvalidScale(0.0)));
        assert!(UnitBridge::new(-3.0).is_err());
        assert!(UnitBridge::new(f32::NAN).is_err());
        assert!(UnitBridge::new(f32::INFINITY).is_err());
    }

    #[test]
    fn scalar_and_vector_share_one_call() {
        let units = UnitBridge::new(10.0).unwrap();
        assert_eq!(units.to_sim(35.0f32), 3.5);
        assert_eq!(units.to_pixels(3.5f32), 35.0);
        let v = units.to_sim_xy(100.0, -20.0);
        assert_eq!(v, Vec2::new(10.0, -2.0));
        assert_eq!(units.to_pixels(v), Vec2::new(100.0, -20.0));
    }

    #[test]
    fn round_trip_across_scales() {
        let samples = [
            Vec2::new(0.0, 0.0),
            Vec2::new(123.25, -987.5),
            Vec2::new(1.0e-3, 4.0e4),
            Vec2::new(-640.0, 480.0),
        ];
        for &scale in &[0.01f32, 1.0, 10.0, 33.3, 1000.0] {
            let units = UnitBridge::new(scale).unwrap();
            for &v in &samples {
                let back = units.to_pixels(units.to_sim(v));
                assert_relative_eq!(back.x, v.x, max_relative = 1e-5, epsilon = 1e-6);
                assert_relative_eq!(back.y, v.y, max_relative = 1e-5, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn configure_selects_gravity() {
        let on = WorldSettings::configure(10.0, true).unwrap();
        assert_eq!(on.gravity, Vec2::new(0.0, GRAVITY));
        let off = WorldSettings::configure(10.0, false).unwrap();
        assert_eq!(off.gravity, Vec2::zero());
        assert!(WorldSettings::configure(0.0, true).is_err());
    }
}
