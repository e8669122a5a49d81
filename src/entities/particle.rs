use crate::domain::geometry::Vec2;
use crate::domain::palette::Color;
use crate::domain::shapes::{BodyHandle, FixtureDef, ShapeDef};
use crate::simulation::SimContext;
use crate::systems::scene::{NodeId, NodeShape, Scene, Style};

use super::{Anchored, Blueprint, Entity, EntityId, EntityKind, FrameEvent};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleSpec {
    pub radius: f32,
}

/// A circle with a radius line so its spin is visible.
pub struct ParticleEntity {
    core: Anchored,
    radius: f32,
}

impl ParticleEntity {
    pub fn new(ctx: &mut SimContext, blueprint: &Blueprint, at: Vec2, spec: ParticleSpec) -> Self {
        let shape = ShapeDef::circle(ctx.units.to_sim(spec.radius));
        let body = Anchored::create_body(ctx, blueprint, at, &[FixtureDef::new(shape, blueprint.material)]);
        let fill = ctx.rng.color(blueprint.color_floor);
        let (node, skin) = build_node(ctx.scene.as_mut(), at, spec.radius, fill);

        let margin = blueprint.margin.margin(spec.radius * 2.0, spec.radius);
        Self {
            core: Anchored::new(blueprint, body, node, skin, margin),
            radius: spec.radius,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Pixel position of the body, `None` once released.
    pub fn pixel_position(&self, ctx: &SimContext) -> Option<Vec2> {
        if self.core.is_destroyed() {
            return None;
        }
        self.core.pixel_position(ctx)
    }
}

/// Group with a filled circle and a radius line; returns (group, circle).
pub(crate) fn build_node(scene: &mut dyn Scene, at: Vec2, radius: f32, fill: Color) -> (NodeId, NodeId) {
    let node = scene.add(None, NodeShape::Group, Style::default(), at);
    let circle = scene.add(Some(node), NodeShape::Circle { radius }, Style::outlined(fill), Vec2::zero());
    scene.add(
        Some(node),
        NodeShape::Line { from: Vec2::zero(), to: Vec2::new(radius, 0.0) },
        Style::stroked(Color::BLACK, 1.0),
        Vec2::zero(),
    );
    (node, circle)
}

impl Entity for ParticleEntity {
    fn id(&self) -> EntityId {
        self.core.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Particle
    }

    fn update(&mut self, ctx: &mut SimContext, frame: &FrameEvent) {
        self.core.update(ctx, frame);
    }

    fn is_expired(&self, ctx: &SimContext) -> bool {
        self.core.is_expired(ctx)
    }

    fn destroy(&mut self, ctx: &mut SimContext) {
        self.core.destroy(ctx);
    }

    fn is_destroyed(&self) -> bool {
        self.core.is_destroyed()
    }

    fn contains_point(&self, ctx: &SimContext, pixel: Vec2) -> bool {
        self.core.contains_point(ctx, pixel)
    }

    fn body(&self) -> BodyHandle {
        self.core.body
    }

    fn node(&self) -> NodeId {
        self.core.node
    }

    fn life(&self) -> u32 {
        self.core.life.remaining()
    }

    fn fill(&self, ctx: &SimContext) -> Option<Color> {
        self.core.fill(ctx)
    }

    fn set_fill(&mut self, ctx: &mut SimContext, fill: Color) {
        self.core.set_fill(ctx, fill);
    }
}
