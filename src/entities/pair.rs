use crate::domain::geometry::Vec2;
use crate::domain::palette::Color;
use crate::domain::shapes::{BodyHandle, JointDef, JointHandle, Material};
use crate::simulation::SimContext;
use crate::systems::scene::{NodeId, NodeShape, Style};

use super::{Blueprint, Entity, EntityId, EntityKind, FrameEvent, Launch, ParticleEntity, ParticleSpec};

/// One particle of a pair. `offset` is in pixels from the pair's spawn point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PartSpec {
    pub radius: f32,
    pub offset: Vec2,
    pub material: Material,
    pub launch: Launch,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PairSpec {
    /// Rest length of the joint, pixels.
    pub length: f32,
    pub frequency_hz: f32,
    pub damping_ratio: f32,
    pub parts: [PartSpec; 2],
    pub line_width: f32,
    pub line_opacity: f32,
}

/// Two particles held apart by a distance joint, drawn with a connecting line.
///
/// Retirement is all-or-nothing: when either particle expires, both bodies,
/// the joint and the line are released together.
pub struct PairEntity {
    id: EntityId,
    parts: [ParticleEntity; 2],
    joint: Option<JointHandle>,
    line: NodeId,
    destroyed: bool,
}

impl PairEntity {
    pub fn new(ctx: &mut SimContext, blueprint: &Blueprint, at: Vec2, spec: &PairSpec) -> Self {
        let part = |ctx: &mut SimContext, p: &PartSpec| {
            let bp = Blueprint {
                launch: p.launch,
                material: p.material,
                ..*blueprint
            };
            ParticleEntity::new(ctx, &bp, at + p.offset, ParticleSpec { radius: p.radius })
        };
        let first = part(ctx, &spec.parts[0]);
        let second = part(ctx, &spec.parts[1]);

        let joint = ctx.physics.create_joint(&JointDef::Distance {
            body_a: first.body(),
            body_b: second.body(),
            length: ctx.units.to_sim(spec.length),
            frequency_hz: spec.frequency_hz,
            damping_ratio: spec.damping_ratio,
        });

        let stroke = ctx.rng.color(blueprint.color_floor);
        let line = ctx.scene.add(
            None,
            NodeShape::Line {
                from: at + spec.parts[0].offset,
                to: at + spec.parts[1].offset,
            },
            Style::stroked(stroke, spec.line_width).with_opacity(spec.line_opacity),
            Vec2::zero(),
        );

        Self {
            id: blueprint.id,
            parts: [first, second],
            joint,
            line,
            destroyed: false,
        }
    }

    pub fn joint(&self) -> Option<JointHandle> {
        self.joint
    }

    pub fn line(&self) -> NodeId {
        self.line
    }

    pub fn parts(&self) -> &[ParticleEntity; 2] {
        &self.parts
    }
}

impl Entity for PairEntity {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Pair
    }

    fn update(&mut self, ctx: &mut SimContext, frame: &FrameEvent) {
        debug_assert!(!self.destroyed, "update() on destroyed pair {:?}", self.id);
        if self.destroyed {
            crate::console_warn!("update() on destroyed pair {}", self.id.0);
            return;
        }
        for part in self.parts.iter_mut() {
            part.update(ctx, frame);
        }
        let from = self.parts[0].pixel_position(ctx);
        let to = self.parts[1].pixel_position(ctx);
        if let (Some(from), Some(to)) = (from, to) {
            ctx.scene.set_line(self.line, from, to);
        }
    }

    fn is_expired(&self, ctx: &SimContext) -> bool {
        debug_assert!(!self.destroyed, "is_expired() on destroyed pair {:?}", self.id);
        if self.destroyed {
            crate::console_warn!("is_expired() on destroyed pair {}", self.id.0);
            return true;
        }
        self.parts.iter().any(|p| p.is_expired(ctx))
    }

    fn destroy(&mut self, ctx: &mut SimContext) {
        if self.destroyed {
            return;
        }
        if let Some(joint) = self.joint.take() {
            ctx.physics.destroy_joint(joint);
        }
        for part in self.parts.iter_mut() {
            part.destroy(ctx);
        }
        ctx.scene.remove(self.line);
        self.destroyed = true;
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn contains_point(&self, ctx: &SimContext, pixel: Vec2) -> bool {
        self.parts.iter().any(|p| p.contains_point(ctx, pixel))
    }

    fn body(&self) -> BodyHandle {
        self.parts[0].body()
    }

    fn body_at(&self, ctx: &SimContext, pixel: Vec2) -> Option<BodyHandle> {
        self.parts.iter().find(|p| p.contains_point(ctx, pixel)).map(|p| p.body())
    }

    fn bodies(&self) -> Vec<BodyHandle> {
        self.parts.iter().map(|p| p.body()).collect()
    }

    fn node(&self) -> NodeId {
        self.parts[0].node()
    }

    fn nodes(&self) -> Vec<NodeId> {
        vec![self.parts[0].node(), self.parts[1].node(), self.line]
    }

    fn life(&self) -> u32 {
        self.parts.iter().map(|p| p.life()).min().unwrap_or(0)
    }

    fn fill(&self, ctx: &SimContext) -> Option<Color> {
        self.parts[0].fill(ctx)
    }

    fn set_fill(&mut self, ctx: &mut SimContext, fill: Color) {
        for part in self.parts.iter_mut() {
            part.set_fill(ctx, fill);
        }
    }
}
