//! Static scenery: created once at setup and kept for the whole session.

use crate::domain::geometry::Vec2;
use crate::domain::palette::Color;
use crate::domain::shapes::{BodyDef, BodyHandle, FixtureDef, JointDef, JointHandle, Material, ShapeDef};
use crate::simulation::SimContext;
use crate::systems::scene::{NodeId, NodeShape, Style};

use super::anchored::sync_node;

/// Fixed rectangle, centered on `at` (pixels).
pub struct Boundary {
    body: BodyHandle,
    node: NodeId,
    size: Vec2,
}

impl Boundary {
    pub fn new(ctx: &mut SimContext, at: Vec2, width: f32, height: f32, fill: Color) -> Self {
        let body = static_box(ctx, at, width, height);
        let node = ctx.scene.add(
            None,
            NodeShape::Rect { width, height },
            Style::outlined(fill),
            at,
        );
        Self {
            body,
            node,
            size: Vec2::new(width, height),
        }
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }
}

fn static_box(ctx: &mut SimContext, at: Vec2, width: f32, height: f32) -> BodyHandle {
    let body = ctx.physics.create_body(&BodyDef::fixed(ctx.units.to_sim(at)));
    let shape = ShapeDef::Box {
        half_width: ctx.units.to_sim(width / 2.0),
        half_height: ctx.units.to_sim(height / 2.0),
    };
    ctx.physics.create_fixture(body, &FixtureDef::new(shape, Material::SOLID));
    body
}

/// Rolling ground: a static chain through three points, filled down to the viewport floor.
pub struct Surface {
    body: BodyHandle,
    node: NodeId,
    points: Vec<Vec2>,
}

impl Surface {
    pub fn new(ctx: &mut SimContext, fill: Color) -> Self {
        let (w, h) = (ctx.viewport.width, ctx.viewport.height);
        let points = vec![
            Vec2::new(0.0, 3.0 * h / 4.0),
            Vec2::new(w / 2.0, 3.0 * h / 4.0 + h / 8.0),
            Vec2::new(w, 3.0 * h / 4.0),
        ];

        let body = ctx.physics.create_body(&BodyDef::fixed(Vec2::zero()));
        let chain: Vec<Vec2> = points.iter().map(|p| ctx.units.to_sim(*p)).collect();
        ctx.physics
            .create_fixture(body, &FixtureDef::new(ShapeDef::Chain { points: chain }, Material::GROUND));

        let mut outline = points.clone();
        outline.push(Vec2::new(w, h));
        outline.push(Vec2::new(0.0, h));
        let node = ctx.scene.add(
            None,
            NodeShape::Path { points: outline, closed: true, smooth: false },
            Style::outlined(fill),
            Vec2::zero(),
        );

        Self { body, node, points }
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Chain points, pixels.
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }
}

const MOTOR_SPEED: f32 = std::f32::consts::TAU;
const MOTOR_TORQUE: f32 = 16000.0;
const HUB_RADIUS: f32 = 8.0;

/// A blade pinned to a post by a revolute joint with a switchable motor.
pub struct Windmill {
    blade: BodyHandle,
    post: BodyHandle,
    joint: Option<JointHandle>,
    blade_node: NodeId,
    post_node: NodeId,
    hub: NodeId,
}

impl Windmill {
    /// `at` is the post center in pixels; the blade sits 20 px above it.
    pub fn new(ctx: &mut SimContext, at: Vec2) -> Self {
        let blade_at = at + Vec2::new(0.0, -20.0);
        let blade_size = Vec2::new(ctx.viewport.width / 4.0, 10.0);

        let blade = ctx.physics.create_body(&BodyDef::dynamic(ctx.units.to_sim(blade_at)));
        ctx.physics.create_fixture(
            blade,
            &FixtureDef::new(
                ShapeDef::Box {
                    half_width: ctx.units.to_sim(blade_size.x / 2.0),
                    half_height: ctx.units.to_sim(blade_size.y / 2.0),
                },
                Material::SOLID,
            ),
        );
        let post = static_box(ctx, at, 20.0, 40.0);

        let joint = ctx.physics.create_joint(&JointDef::Revolute {
            body_a: blade,
            body_b: post,
            anchor: ctx.units.to_sim(blade_at),
            motor_speed: MOTOR_SPEED,
            max_motor_torque: MOTOR_TORQUE,
            enable_motor: false,
        });
        if joint.is_none() {
            crate::console_warn!("windmill joint was not created");
        }

        let post_node = ctx.scene.add(
            None,
            NodeShape::Rect { width: 20.0, height: 40.0 },
            Style::outlined(ctx.rng.color(0.0)),
            at,
        );
        let blade_node = ctx.scene.add(
            None,
            NodeShape::Rect { width: blade_size.x, height: blade_size.y },
            Style::outlined(ctx.rng.color(0.0)),
            blade_at,
        );
        let hub = ctx.scene.add(
            None,
            NodeShape::Circle { radius: HUB_RADIUS },
            Style::outlined(Color::RED),
            blade_at,
        );

        Self {
            blade,
            post,
            joint,
            blade_node,
            post_node,
            hub,
        }
    }

    pub fn update(&self, ctx: &mut SimContext) {
        sync_node(ctx, self.blade, self.blade_node);
    }

    /// Flip the motor and recolor the hub (green on, red off). Returns the new state.
    pub fn toggle_motor(&mut self, ctx: &mut SimContext) -> bool {
        let Some(joint) = self.joint else {
            return false;
        };
        let on = !ctx.physics.is_motor_enabled(joint);
        ctx.physics.set_motor_enabled(joint, on);
        ctx.scene.set_fill(self.hub, if on { Color::GREEN } else { Color::RED });
        crate::console_log!("windmill motor {}", if on { "on" } else { "off" });
        on
    }

    pub fn motor_on(&self, ctx: &SimContext) -> bool {
        self.joint.map_or(false, |j| ctx.physics.is_motor_enabled(j))
    }

    pub fn blade(&self) -> BodyHandle {
        self.blade
    }

    pub fn post(&self) -> BodyHandle {
        self.post
    }

    pub fn hub(&self) -> NodeId {
        self.hub
    }

    pub fn post_node(&self) -> NodeId {
        self.post_node
    }
}
