use crate::core::random::DemoRng;
use crate::domain::geometry::Vec2;
use crate::domain::palette::Color;
use crate::domain::shapes::{BodyDef, BodyHandle, FixtureDef};
use crate::simulation::SimContext;
use crate::systems::scene::NodeId;

use super::{Blueprint, EntityId, FrameEvent, Lifespan};

/// Remaining-life countdown.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Life {
    remaining: u32,
    max: u32,
    jitter: u32,
    aging: bool,
}

impl Life {
    pub fn new(span: &Lifespan) -> Self {
        Self {
            remaining: span.max,
            max: span.max,
            jitter: span.jitter,
            aging: span.aging,
        }
    }

    /// Decrement by `1 + jitter`, never below zero.
    pub fn tick(&mut self, rng: &mut DemoRng) {
        if !self.aging {
            return;
        }
        let step = rng.up_to(self.jitter).saturating_add(1);
        self.remaining = self.remaining.saturating_sub(step);
    }

    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[inline]
    pub fn is_spent(&self) -> bool {
        self.remaining == 0
    }

    pub fn fraction(&self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        self.remaining as f32 / self.max as f32
    }
}

/// Copy position and angle from a body to a node.
pub(crate) fn sync_node(ctx: &mut SimContext, body: BodyHandle, node: NodeId) {
    let Some(pos) = ctx.physics.position(body) else {
        return;
    };
    ctx.scene.set_position(node, ctx.units.to_pixels(pos));
    if let Some(angle) = ctx.physics.angle_degrees(body) {
        let current = ctx.scene.rotation(node).unwrap_or(0.0);
        ctx.scene.rotate(node, angle - current);
    }
}

/// One body, one root node, and the lifecycle bookkeeping shared by all variants.
pub struct Anchored {
    pub(crate) id: EntityId,
    pub(crate) body: BodyHandle,
    pub(crate) node: NodeId,
    /// Child node carrying the swappable fill color.
    pub(crate) skin: NodeId,
    pub(crate) life: Life,
    fade_every: Option<u32>,
    /// Pixels below the viewport before the entity counts as gone.
    pub(crate) margin: f32,
    destroyed: bool,
}

impl Anchored {
    /// Create the dynamic body for `blueprint` at a pixel position and attach `fixtures`.
    pub fn create_body(
        ctx: &mut SimContext,
        blueprint: &Blueprint,
        at: Vec2,
        fixtures: &[FixtureDef],
    ) -> BodyHandle {
        let body = ctx.physics.create_body(&BodyDef::dynamic(ctx.units.to_sim(at)));
        for fixture in fixtures {
            ctx.physics.create_fixture(body, fixture);
        }
        ctx.physics.set_linear_velocity(body, blueprint.launch.velocity);
        ctx.physics.set_angular_velocity(body, blueprint.launch.spin);
        if blueprint.tagged {
            ctx.physics.set_user_data(body, blueprint.id.0);
        }
        body
    }

    pub fn new(blueprint: &Blueprint, body: BodyHandle, node: NodeId, skin: NodeId, margin: f32) -> Self {
        Self {
            id: blueprint.id,
            body,
            node,
            skin,
            life: Life::new(&blueprint.lifespan),
            fade_every: blueprint.lifespan.fade_every,
            margin,
            destroyed: false,
        }
    }

    pub fn pixel_position(&self, ctx: &SimContext) -> Option<Vec2> {
        ctx.physics.position(self.body).map(|p| ctx.units.to_pixels(p))
    }

    pub fn sync(&self, ctx: &mut SimContext) {
        sync_node(ctx, self.body, self.node);
    }

    /// Sync, fade and age. Returns false (and does nothing) once destroyed.
    pub fn update(&mut self, ctx: &mut SimContext, frame: &FrameEvent) -> bool {
        debug_assert!(!self.destroyed, "update() on destroyed entity {:?}", self.id);
        if self.destroyed {
            crate::console_warn!("update() on destroyed entity {}", self.id.0);
            return false;
        }

        self.sync(ctx);
        if let Some(every) = self.fade_every.filter(|n| *n > 0) {
            if frame.count % every as u64 == 0 {
                ctx.scene.set_opacity(self.node, self.life.fraction());
            }
        }
        self.life.tick(&mut ctx.rng);
        true
    }

    pub fn is_expired(&self, ctx: &SimContext) -> bool {
        debug_assert!(!self.destroyed, "is_expired() on destroyed entity {:?}", self.id);
        if self.destroyed {
            crate::console_warn!("is_expired() on destroyed entity {}", self.id.0);
            return true;
        }
        if self.life.is_spent() {
            return true;
        }
        match self.pixel_position(ctx) {
            Some(pos) => pos.y > ctx.viewport.height + self.margin,
            // The body vanished behind our back; nothing left to keep alive.
            None => true,
        }
    }

    pub fn destroy(&mut self, ctx: &mut SimContext) {
        if self.destroyed {
            return;
        }
        ctx.physics.destroy_body(self.body);
        ctx.scene.remove(self.node);
        self.destroyed = true;
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn contains_point(&self, ctx: &SimContext, pixel: Vec2) -> bool {
        if self.destroyed {
            return false;
        }
        ctx.physics.test_point(self.body, ctx.units.to_sim(pixel))
    }

    pub fn fill(&self, ctx: &SimContext) -> Option<Color> {
        ctx.scene.fill(self.skin)
    }

    pub fn set_fill(&mut self, ctx: &mut SimContext, fill: Color) {
        if !self.destroyed {
            ctx.scene.set_fill(self.skin, fill);
        }
    }
}
