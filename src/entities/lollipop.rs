use crate::domain::geometry::Vec2;
use crate::domain::palette::Color;
use crate::domain::shapes::{BodyHandle, FixtureDef, ShapeDef};
use crate::simulation::SimContext;
use crate::systems::scene::{NodeId, NodeShape, Style};

use super::{Anchored, Blueprint, Entity, EntityId, EntityKind, FrameEvent};

/// Stick `width` x `height` with a round head of `pop_radius` on its top end (pixels).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LollipopSpec {
    pub width: f32,
    pub height: f32,
    pub pop_radius: f32,
}

impl LollipopSpec {
    /// Radius around the body center enclosing stick and head.
    pub fn enclosing_radius(&self) -> f32 {
        self.pop_radius + self.height / 2.0
    }
}

/// Two fixtures on one body: the composite shape.
pub struct LollipopEntity {
    core: Anchored,
    spec: LollipopSpec,
}

impl LollipopEntity {
    pub fn new(ctx: &mut SimContext, blueprint: &Blueprint, at: Vec2, spec: LollipopSpec) -> Self {
        let head_offset = Vec2::new(0.0, -spec.height / 2.0);
        let stick = ShapeDef::Box {
            half_width: ctx.units.to_sim(spec.width / 2.0),
            half_height: ctx.units.to_sim(spec.height / 2.0),
        };
        let head = ShapeDef::Circle {
            radius: ctx.units.to_sim(spec.pop_radius),
            offset: ctx.units.to_sim(head_offset),
        };
        let body = Anchored::create_body(
            ctx,
            blueprint,
            at,
            &[
                FixtureDef::new(stick, blueprint.material),
                FixtureDef::new(head, blueprint.material),
            ],
        );

        let stick_fill = ctx.rng.color(blueprint.color_floor);
        let head_fill = ctx.rng.color(blueprint.color_floor);
        let node = ctx.scene.add(None, NodeShape::Group, Style::default(), at);
        let skin = ctx.scene.add(
            Some(node),
            NodeShape::Rect { width: spec.width, height: spec.height },
            Style::outlined(stick_fill),
            Vec2::zero(),
        );
        ctx.scene.add(
            Some(node),
            NodeShape::Circle { radius: spec.pop_radius },
            Style::outlined(head_fill),
            head_offset,
        );

        let margin = blueprint
            .margin
            .margin(spec.width * spec.height, spec.enclosing_radius());
        Self {
            core: Anchored::new(blueprint, body, node, skin, margin),
            spec,
        }
    }

    pub fn spec(&self) -> LollipopSpec {
        self.spec
    }
}

impl Entity for LollipopEntity {
    fn id(&self) -> EntityId {
        self.core.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Lollipop
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
