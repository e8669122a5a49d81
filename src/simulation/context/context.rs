use crate::core::error::ConfigError;
use crate::core::random::DemoRng;
use crate::core::units::{UnitBridge, WorldSettings};
use crate::domain::geometry::Vec2;
use crate::systems::physics::{KinematicWorld, PhysicsWorld};
use crate::systems::scene::{Scene, SceneGraph};

/// Canvas size in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Result<Self, ConfigError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(ConfigError::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    /// Pixel point at fractions `(fx, fy)` of the viewport.
    #[inline]
    pub fn at(&self, fx: f32, fy: f32) -> Vec2 {
        Vec2::new(fx * self.width, fy * self.height)
    }
}

/// Everything an entity touches during construction, update and release.
///
/// One per session, owned by the frame driver and lent to entities by
/// `&mut` for the length of a call.
pub struct SimContext {
    pub physics: Box<dyn PhysicsWorld>,
    pub scene: Box<dyn Scene>,
    pub units: UnitBridge,
    pub rng: DemoRng,
    pub viewport: Viewport,
}

impl SimContext {
    /// Context over the in-crate backends.
    pub fn new(settings: WorldSettings, viewport: Viewport, rng: DemoRng) -> Self {
        Self::with_backends(
            Box::new(KinematicWorld::new(settings.gravity)),
            Box::new(SceneGraph::new()),
            settings.units,
            viewport,
            rng,
        )
    }

    pub fn with_backends(
        physics: Box<dyn PhysicsWorld>,
        scene: Box<dyn Scene>,
        units: UnitBridge,
        viewport: Viewport,
        rng: DemoRng,
    ) -> Self {
        Self {
            physics,
            scene,
            units,
            rng,
            viewport,
        }
    }
}
