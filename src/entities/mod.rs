//! Entities: one physics body plus one scene node, created together,
//! synced every frame and released together.
//!
//! Every variant implements [`Entity`]. The shared bookkeeping (pose sync,
//! aging, opacity fade, expiry test, release) lives in [`Anchored`]; variants
//! only build their geometry and any extra animation on top of it.

pub mod anchored;
pub mod box_entity;
pub mod creature;
pub mod lollipop;
pub mod pair;
pub mod particle;
pub mod polygon;
pub mod scenery;
pub mod spring;

pub use anchored::{Anchored, Life};
pub use box_entity::{BoxEntity, BoxSpec};
pub use creature::{CreatureEntity, CreaturePreset, CreatureSpec};
pub use lollipop::{LollipopEntity, LollipopSpec};
pub use pair::{PairEntity, PairSpec, PartSpec};
pub use particle::{ParticleEntity, ParticleSpec};
pub use polygon::{PolygonEntity, PolygonSpec};
pub use scenery::{Boundary, Surface, Windmill};
pub use spring::Spring;

use serde::{Deserialize, Serialize};

use crate::domain::geometry::Vec2;
use crate::domain::palette::Color;
use crate::domain::shapes::{BodyHandle, Material};
use crate::simulation::SimContext;
use crate::systems::scene::NodeId;

/// Stable entity id; also the user tag on its bodies, so contact events map back to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Box,
    Particle,
    Polygon,
    Lollipop,
    Creature,
    Pair,
}

impl EntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Box => "box",
            EntityKind::Particle => "particle",
            EntityKind::Polygon => "polygon",
            EntityKind::Lollipop => "lollipop",
            EntityKind::Creature => "creature",
            EntityKind::Pair => "pair",
        }
    }
}

/// Per-tick token handed to `update`. Not retained past the call.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameEvent {
    /// Seconds since the demo started.
    pub time: f64,
    pub count: u64,
    /// Seconds since the previous frame.
    pub delta: f64,
}

/// Initial motion, in simulation units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Launch {
    pub velocity: Vec2,
    pub spin: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lifespan {
    pub max: u32,
    /// Extra frames of decay per update, uniform in `0..=jitter`.
    pub jitter: u32,
    pub aging: bool,
    /// Set opacity to `life / max` on frames where `count % n == 0`.
    pub fade_every: Option<u32>,
}

impl Default for Lifespan {
    fn default() -> Self {
        Self {
            max: 200,
            jitter: 1,
            aging: true,
            fade_every: Some(5),
        }
    }
}

/// How far below the viewport an entity may fall before it is retired.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum MarginRule {
    /// Each shape uses its own measure: box and lollipop `w * h`,
    /// particle and creature `2r`, polygon `3r`.
    #[default]
    PerShape,
    /// `factor * r` with `r` the radius enclosing the whole shape.
    EnclosingRadius { factor: f32 },
}

impl MarginRule {
    pub fn margin(&self, per_shape: f32, enclosing_radius: f32) -> f32 {
        match self {
            MarginRule::PerShape => per_shape,
            MarginRule::EnclosingRadius { factor } => factor * enclosing_radius,
        }
    }
}

/// Everything a constructor needs besides its geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Blueprint {
    pub id: EntityId,
    pub launch: Launch,
    pub lifespan: Lifespan,
    pub margin: MarginRule,
    pub material: Material,
    /// Lowest value of each random color channel.
    pub color_floor: f32,
    /// Register the body for contact events.
    pub tagged: bool,
}

impl Blueprint {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            launch: Launch::default(),
            lifespan: Lifespan::default(),
            margin: MarginRule::default(),
            material: Material::default(),
            color_floor: 0.0,
            tagged: false,
        }
    }
}

pub trait Entity {
    fn id(&self) -> EntityId;

    fn kind(&self) -> EntityKind;

    /// Copy physics pose into the scene, animate, fade and age. Once per frame.
    fn update(&mut self, ctx: &mut SimContext, frame: &FrameEvent);

    /// Pure query: life spent or below the visibility bound.
    fn is_expired(&self, ctx: &SimContext) -> bool;

    /// Release every body, joint and node. Calling it again does nothing.
    fn destroy(&mut self, ctx: &mut SimContext);

    fn is_destroyed(&self) -> bool;

    /// Point-in-fixture test for a pixel-space point.
    fn contains_point(&self, ctx: &SimContext, pixel: Vec2) -> bool;

    /// The primary body.
    fn body(&self) -> BodyHandle;

    /// The body under a pixel-space point, if any. This is what a spring binds to.
    fn body_at(&self, ctx: &SimContext, pixel: Vec2) -> Option<BodyHandle> {
        self.contains_point(ctx, pixel).then(|| self.body())
    }

    fn bodies(&self) -> Vec<BodyHandle> {
        vec![self.body()]
    }

    /// Root scene node.
    fn node(&self) -> NodeId;

    fn nodes(&self) -> Vec<NodeId> {
        vec![self.node()]
    }

    fn life(&self) -> u32;

    fn fill(&self, ctx: &SimContext) -> Option<Color>;

    fn set_fill(&mut self, ctx: &mut SimContext, fill: Color);
}
