//! Creature: a circle body drawn as a wobbling membrane with two eyes.
//!
//! The membrane is a ring of sample points. Each frame every point's radial
//! deviation takes a random kick proportional to the radius and the preset's
//! shakiness, then decays by 0.95. Eyes sit on two fixed ring samples and
//! follow their deviation. None of this feeds back into physics.

use serde::{Deserialize, Serialize};

use crate::core::random::DemoRng;
use crate::domain::geometry::Vec2;
use crate::domain::palette::Color;
use crate::domain::shapes::{BodyHandle, FixtureDef, ShapeDef};
use crate::simulation::SimContext;
use crate::systems::scene::{NodeId, NodeShape, Style};

use super::{Anchored, Blueprint, Entity, EntityId, EntityKind, FrameEvent};

const MEMBRANE_DAMPING: f32 = 0.95;
const EYE_DISTANCE: f32 = 0.6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreaturePreset {
    Food,
    Hunter,
}

impl CreaturePreset {
    pub fn base_radius(&self) -> f32 {
        match self {
            CreaturePreset::Food => 16.0,
            CreaturePreset::Hunter => 48.0,
        }
    }

    pub fn membrane_points(&self) -> usize {
        match self {
            CreaturePreset::Food => 8,
            CreaturePreset::Hunter => 16,
        }
    }

    pub fn shakiness(&self) -> f32 {
        match self {
            CreaturePreset::Food => 0.08,
            CreaturePreset::Hunter => 0.03,
        }
    }

    pub fn smooth(&self) -> bool {
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CreatureSpec {
    pub preset: CreaturePreset,
    pub radius: f32,
}

impl CreatureSpec {
    /// Preset radius scaled by a factor drawn from `scale`.
    pub fn sample(rng: &mut DemoRng, preset: CreaturePreset, scale: (f32, f32)) -> Self {
        Self {
            preset,
            radius: preset.base_radius() * rng.range(scale.0, scale.1),
        }
    }
}

pub struct CreatureEntity {
    core: Anchored,
    spec: CreatureSpec,
    /// Unit ring directions, `(sin θ, cos θ)`.
    ring: Vec<Vec2>,
    deviation: Vec<f32>,
    outline: Vec<Vec2>,
    eyes: [NodeId; 2],
    pupils: [NodeId; 2],
}

impl CreatureEntity {
    pub fn new(ctx: &mut SimContext, blueprint: &Blueprint, at: Vec2, spec: CreatureSpec) -> Self {
        let shape = ShapeDef::circle(ctx.units.to_sim(spec.radius));
        let body = Anchored::create_body(ctx, blueprint, at, &[FixtureDef::new(shape, blueprint.material)]);

        let n = spec.preset.membrane_points().max(3);
        let step = 360.0 / n as f32;
        let ring: Vec<Vec2> = (0..n)
            .map(|i| {
                let theta = (i as f32 * step).to_radians();
                Vec2::new(theta.sin(), theta.cos())
            })
            .collect();
        let outline: Vec<Vec2> = ring.iter().map(|d| *d * spec.radius).collect();

        let fill = ctx.rng.color(blueprint.color_floor);
        let node = ctx.scene.add(None, NodeShape::Group, Style::default(), at);
        let skin = ctx.scene.add(
            Some(node),
            NodeShape::Path { points: outline.clone(), closed: true, smooth: spec.preset.smooth() },
            Style::outlined(fill),
            Vec2::zero(),
        );
        let eye_radius = spec.radius / 3.0;
        let pupil_radius = spec.radius / 6.0;
        let mut eye = || {
            ctx.scene.add(
                Some(node),
                NodeShape::Ellipse { rx: eye_radius, ry: eye_radius },
                Style::outlined(Color::WHITE),
                Vec2::zero(),
            )
        };
        let eyes = [eye(), eye()];
        let mut pupil = || {
            ctx.scene.add(
                Some(node),
                NodeShape::Ellipse { rx: pupil_radius, ry: pupil_radius },
                Style::filled(Color::BLACK),
                Vec2::zero(),
            )
        };
        let pupils = [pupil(), pupil()];

        let margin = blueprint.margin.margin(spec.radius * 2.0, spec.radius);
        Self {
            core: Anchored::new(blueprint, body, node, skin, margin),
            spec,
            ring,
            deviation: vec![0.0; n],
            outline,
            eyes,
            pupils,
        }
    }

    pub fn spec(&self) -> CreatureSpec {
        self.spec
    }

    pub fn deviation(&self) -> &[f32] {
        &self.deviation
    }

    /// Ring index each eye follows, and the neighbour that shapes its offset.
    fn eye_samples(&self, eye: usize) -> (usize, usize) {
        let n = self.ring.len();
        let index = (n as f32 * (1.0 - (0.625 + 0.25 * eye as f32))).round() as usize % n;
        let neighbour = if eye == 0 { (index + 1) % n } else { (index + n - 1) % n };
        (index, neighbour)
    }

    fn animate(&mut self, ctx: &mut SimContext) {
        let r = self.spec.radius;
        let kick = r * self.spec.preset.shakiness();
        for i in (0..self.ring.len()).rev() {
            let mut d = self.deviation[i] + kick * ctx.rng.range(-1.0, 1.0);
            d *= MEMBRANE_DAMPING;
            self.deviation[i] = d;
            self.outline[i] = self.ring[i] * (r + d);
        }
        ctx.scene.set_points(self.core.skin, &self.outline);

        for i in 0..2 {
            let (index, neighbour) = self.eye_samples(i);
            let len = r + self.deviation[index];
            let antilen = r + self.deviation[neighbour];
            let dir = self.ring[index];
            let at = Vec2::new(
                len * dir.x * EYE_DISTANCE * len / r,
                len * dir.y * EYE_DISTANCE * antilen / r,
            );
            ctx.scene.set_position(self.eyes[i], at);
            ctx.scene.set_radius(self.eyes[i], len / 3.0);
            ctx.scene.set_position(self.pupils[i], at);
            ctx.scene.set_radius(self.pupils[i], len / 6.0);
        }
    }
}

impl Entity for CreatureEntity {
    fn id(&self) -> EntityId {
        self.core.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Creature
    }

    fn update(&mut self, ctx: &mut SimContext, frame: &FrameEvent) {
        if !self.core.is_destroyed() {
            self.animate(ctx);
        }
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
