use std::mem;

use crate::domain::geometry::Vec2;
use crate::domain::shapes::{BodyDef, BodyHandle, JointDef, JointHandle};
use crate::simulation::SimContext;
use crate::systems::scene::{NodeId, NodeShape, Style};

use super::EntityId;

const FREQUENCY_HZ: f32 = 5.0;
const DAMPING_RATIO: f32 = 0.9;
/// Max force is this many times the target's mass.
const FORCE_PER_MASS: f32 = 1000.0;
const LINE_WIDTH: f32 = 4.0;

/// Pointer-drag helper: a mouse joint from a ground anchor to one entity,
/// drawn as a line. Joint and line exist together or not at all.
#[derive(Debug, Default)]
pub enum Spring {
    #[default]
    Inactive,
    Active {
        target: EntityId,
        anchor: BodyHandle,
        joint: JointHandle,
        line: NodeId,
    },
}

impl Spring {
    pub fn new() -> Self {
        Spring::Inactive
    }

    /// Attach to `body` of entity `target` at a pixel point. Any previous
    /// binding is released first. Returns false (and stays inactive) when the
    /// joint cannot be created.
    pub fn bind(&mut self, ctx: &mut SimContext, pixel: Vec2, target: EntityId, body: BodyHandle) -> bool {
        self.destroy(ctx);

        let mass = ctx.physics.mass(body).unwrap_or(0.0);
        let anchor = ctx.physics.create_body(&BodyDef::fixed(Vec2::zero()));
        let Some(joint) = ctx.physics.create_joint(&JointDef::Mouse {
            ground: anchor,
            body,
            target: ctx.units.to_sim(pixel),
            max_force: FORCE_PER_MASS * mass,
            frequency_hz: FREQUENCY_HZ,
            damping_ratio: DAMPING_RATIO,
        }) else {
            ctx.physics.destroy_body(anchor);
            return false;
        };

        let (from, to) = ctx
            .physics
            .joint_anchors(joint)
            .map(|(a, b)| (ctx.units.to_pixels(a), ctx.units.to_pixels(b)))
            .unwrap_or((pixel, pixel));
        let stroke = ctx.rng.color(0.0);
        let opacity = ctx.rng.range(0.2, 0.7);
        let line = ctx.scene.add(
            None,
            NodeShape::Line { from, to },
            Style::stroked(stroke, LINE_WIDTH).with_opacity(opacity),
            Vec2::zero(),
        );

        *self = Spring::Active {
            target,
            anchor,
            joint,
            line,
        };
        true
    }

    /// Re-target to the pointer and redraw the line. No-op while inactive.
    pub fn update(&mut self, ctx: &mut SimContext, pixel: Vec2) {
        let Spring::Active { joint, line, .. } = *self else {
            return;
        };
        ctx.physics.set_joint_target(joint, ctx.units.to_sim(pixel));
        if let Some((a, b)) = ctx.physics.joint_anchors(joint) {
            let (from, to) = (ctx.units.to_pixels(a), ctx.units.to_pixels(b));
            ctx.scene.set_line(line, from, to);
        }
    }

    /// Release joint, anchor body and line. Safe when inactive.
    pub fn destroy(&mut self, ctx: &mut SimContext) {
        if let Spring::Active { anchor, joint, line, .. } = mem::take(self) {
            ctx.physics.destroy_joint(joint);
            ctx.physics.destroy_body(anchor);
            ctx.scene.remove(line);
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Spring::Active { .. })
    }

    pub fn target(&self) -> Option<EntityId> {
        match self {
            Spring::Active { target, .. } => Some(*target),
            Spring::Inactive => None,
        }
    }

    pub fn joint(&self) -> Option<JointHandle> {
        match self {
            Spring::Active { joint, .. } => Some(*joint),
            Spring::Inactive => None,
        }
    }

    pub fn line(&self) -> Option<NodeId> {
        match self {
            Spring::Active { line, .. } => Some(*line),
            Spring::Inactive => None,
        }
    }
}
