use crate::domain::geometry::Vec2;
use crate::domain::palette::Color;
use crate::domain::shapes::{BodyHandle, FixtureDef, ShapeDef};
use crate::simulation::SimContext;
use crate::systems::scene::{NodeId, NodeShape, Style};

use super::{Anchored, Blueprint, Entity, EntityId, EntityKind, FrameEvent};

/// Box size in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxSpec {
    pub width: f32,
    pub height: f32,
}

impl BoxSpec {
    pub fn diagonal(&self) -> f32 {
        (self.width * self.width + self.height * self.height).sqrt()
    }
}

pub struct BoxEntity {
    core: Anchored,
    spec: BoxSpec,
}

impl BoxEntity {
    pub fn new(ctx: &mut SimContext, blueprint: &Blueprint, at: Vec2, spec: BoxSpec) -> Self {
        let shape = ShapeDef::Box {
            half_width: ctx.units.to_sim(spec.width / 2.0),
            half_height: ctx.units.to_sim(spec.height / 2.0),
        };
        let body = Anchored::create_body(ctx, blueprint, at, &[FixtureDef::new(shape, blueprint.material)]);

        let fill = ctx.rng.color(blueprint.color_floor);
        let node = ctx.scene.add(None, NodeShape::Group, Style::default(), at);
        let skin = ctx.scene.add(
            Some(node),
            NodeShape::Rect { width: spec.width, height: spec.height },
            Style::outlined(fill),
            Vec2::zero(),
        );

        let margin = blueprint.margin.margin(spec.width * spec.height, spec.diagonal());
        Self {
            core: Anchored::new(blueprint, body, node, skin, margin),
            spec,
        }
    }

    pub fn spec(&self) -> BoxSpec {
        self.spec
    }
}

impl Entity for BoxEntity {
    fn id(&self) -> EntityId {
        self.core.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Box
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
