use crate::core::random::DemoRng;
use crate::domain::geometry::Vec2;
use crate::domain::palette::Color;
use crate::domain::shapes::{BodyHandle, FixtureDef, ShapeDef};
use crate::simulation::SimContext;
use crate::systems::scene::{NodeId, NodeShape, Style};

use super::{Anchored, Blueprint, Entity, EntityId, EntityKind, FrameEvent};

/// Polygon outline in body-local pixels, plus its nominal radius.
#[derive(Clone, Debug, PartialEq)]
pub struct PolygonSpec {
    pub radius: f32,
    pub vertices: Vec<Vec2>,
}

impl PolygonSpec {
    /// `sides` vertices at even angles, each at `radius * spread` from the center.
    pub fn sample(rng: &mut DemoRng, radius: f32, sides: u32, spread: (f32, f32)) -> Self {
        let sides = sides.max(3);
        let step = std::f32::consts::TAU / sides as f32;
        let vertices = (0..sides)
            .map(|i| {
                let len = radius * rng.range(spread.0, spread.1);
                let angle = i as f32 * step;
                Vec2::new(len * angle.cos(), len * angle.sin())
            })
            .collect();
        Self { radius, vertices }
    }
}

pub struct PolygonEntity {
    core: Anchored,
    radius: f32,
}

impl PolygonEntity {
    pub fn new(ctx: &mut SimContext, blueprint: &Blueprint, at: Vec2, spec: &PolygonSpec) -> Self {
        let local: Vec<Vec2> = spec.vertices.iter().map(|v| ctx.units.to_sim(*v)).collect();
        let shape = ShapeDef::polygon(&local);

        // Draw the hull the physics side kept, not the raw samples.
        let outline: Vec<Vec2> = match &shape {
            ShapeDef::Polygon { vertices } => vertices.iter().map(|v| ctx.units.to_pixels(*v)).collect(),
            _ => spec.vertices.clone(),
        };
        let body = Anchored::create_body(ctx, blueprint, at, &[FixtureDef::new(shape, blueprint.material)]);

        let fill = ctx.rng.color(blueprint.color_floor);
        let node = ctx.scene.add(None, NodeShape::Group, Style::default(), at);
        let skin = ctx.scene.add(
            Some(node),
            NodeShape::Path { points: outline, closed: true, smooth: false },
            Style::outlined(fill),
            Vec2::zero(),
        );

        let margin = blueprint.margin.margin(spec.radius * 3.0, spec.radius);
        Self {
            core: Anchored::new(blueprint, body, node, skin, margin),
            radius: spec.radius,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Entity for PolygonEntity {
    fn id(&self) -> EntityId {
        self.core.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Polygon
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampled_vertices_stay_inside_spread() {
        let mut rng = DemoRng::new(11);
        let spec = PolygonSpec::sample(&mut rng, 20.0, 6, (1.0, 1.25));
        assert_eq!(spec.vertices.len(), 6);
        for v in spec.vertices.iter() {
            let len = v.length();
            assert!(len >= 20.0 - 1e-3 && len <= 25.0 + 1e-3, "vertex at {}", len);
        }
    }

    #[test]
    fn fewer_than_three_sides_is_raised() {
        let mut rng = DemoRng::new(2);
        assert_eq!(PolygonSpec::sample(&mut rng, 10.0, 1, (1.0, 1.0)).vertices.len(), 3);
    }
}
