use crate::domain::geometry::{polygon_contains, Vec2};
use crate::domain::shapes::{BodyDef, BodyKind, FixtureDef, ShapeDef};

use super::UserTag;

/// Rigid body - moves as a single unit
pub struct KinematicBody {
    // === Physics State ===
    /// World position of the body origin (simulation units)
    pub pos: Vec2,
    /// Velocity vector (units per second)
    pub velocity: Vec2,
    /// Rotation angle (radians)
    pub angle: f32,
    /// Angular velocity (radians per second)
    pub angular_vel: f32,
    /// Total mass (sum of density * area over fixtures)
    pub mass: f32,
    /// Moment of inertia about the origin
    pub moment_of_inertia: f32,
    pub kind: BodyKind,
    pub id: u32,
    pub user_data: Option<UserTag>,

    // === Shape Definition ===
    /// Fixtures in body-local coordinates
    pub fixtures: Vec<FixtureDef>,
    /// Enclosing circle radius around the origin (broad contact test)
    pub bounding_radius: f32,

    // === Material properties ===
    /// Bounciness (0.0 = no bounce, 1.0 = full elastic)
    pub restitution: f32,
    pub friction: f32,
}

impl KinematicBody {
    pub fn new(def: &BodyDef, id: u32) -> Self {
        Self {
            pos: def.position,
            velocity: Vec2::zero(),
            angle: def.angle,
            angular_vel: 0.0,
            mass: 0.0,
            moment_of_inertia: 0.0,
            kind: def.kind,
            id,
            user_data: None,
            fixtures: Vec::new(),
            bounding_radius: 0.0,
            restitution: 0.0,
            friction: 0.0,
        }
    }

    pub fn add_fixture(&mut self, def: &FixtureDef) {
        let density = def.material.density.max(0.0);
        self.mass += density * def.shape.area();
        self.moment_of_inertia += density * def.shape.unit_inertia();
        self.bounding_radius = self.bounding_radius.max(def.shape.bounding_radius());
        // Bounce against the liveliest fixture.
        self.restitution = self.restitution.max(def.material.restitution.clamp(0.0, 1.0));
        self.friction = self.friction.max(def.material.friction.max(0.0));
        self.fixtures.push(def.clone());
    }

    /// Static bodies and massless dynamic bodies do not integrate.
    #[inline]
    pub fn is_simulated(&self) -> bool {
        self.kind == BodyKind::Dynamic && self.mass > 0.0
    }

    #[inline]
    pub fn inv_mass(&self) -> f32 {
        if self.is_simulated() {
            1.0 / self.mass
        } else {
            0.0
        }
    }

    #[inline]
    pub fn inv_inertia(&self) -> f32 {
        if self.is_simulated() && self.moment_of_inertia > 0.0 {
            1.0 / self.moment_of_inertia
        } else {
            0.0
        }
    }

    /// Transform a body-local point to world coordinates
    #[inline]
    pub fn local_to_world(&self, local: Vec2) -> Vec2 {
        self.pos + local.rotate(self.angle)
    }

    /// Transform a world point into body-local coordinates
    #[inline]
    pub fn world_to_local(&self, world: Vec2) -> Vec2 {
        (world - self.pos).rotate(-self.angle)
    }

    /// Velocity of a world point rigidly attached to this body
    pub fn velocity_at(&self, world: Vec2) -> Vec2 {
        let r = world - self.pos;
        self.velocity + r.perp() * self.angular_vel
    }

    /// Apply an impulse at a world point
    pub fn apply_impulse_at(&mut self, impulse: Vec2, world: Vec2) {
        let r = world - self.pos;
        self.velocity += impulse * self.inv_mass();
        self.angular_vel += r.cross(impulse) * self.inv_inertia();
    }

    pub fn contains_point(&self, world: Vec2) -> bool {
        let p = self.world_to_local(world);
        self.fixtures.iter().any(|f| match &f.shape {
            ShapeDef::Circle { radius, offset } => (p - *offset).length_squared() <= radius * radius,
            ShapeDef::Box { half_width, half_height } => {
                p.x.abs() <= *half_width && p.y.abs() <= *half_height
            }
            ShapeDef::Polygon { vertices } => polygon_contains(vertices, p),
            ShapeDef::Chain { .. } => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shapes::Material;

    #[test]
    fn mass_accumulates_over_fixtures() {
        let mut body = KinematicBody::new(&BodyDef::dynamic(Vec2::zero()), 1);
        body.add_fixture(&FixtureDef::new(
            ShapeDef::Box { half_width: 1.0, half_height: 2.0 },
            Material::SOLID,
        ));
        body.add_fixture(&FixtureDef::new(ShapeDef::circle(1.0), Material::BOUNCY));
        let expected = 8.0 + std::f32::consts::PI;
        assert!((body.mass - expected).abs() < 1e-4);
        assert_eq!(body.restitution, 0.8);
        assert!(body.is_simulated());
    }

    #[test]
    fn point_test_follows_rotation() {
        let mut body = KinematicBody::new(&BodyDef::dynamic(Vec2::new(10.0, 10.0)), 1);
        body.add_fixture(&FixtureDef::new(
            ShapeDef::Box { half_width: 3.0, half_height: 0.5 },
            Material::SOLID,
        ));
        assert!(body.contains_point(Vec2::new(12.5, 10.0)));
        body.angle = std::f32::consts::FRAC_PI_2;
        assert!(!body.contains_point(Vec2::new(12.5, 10.0)));
        assert!(body.contains_point(Vec2::new(10.0, 12.5)));
    }

    #[test]
    fn static_body_never_simulates() {
        let mut body = KinematicBody::new(&BodyDef::fixed(Vec2::zero()), 1);
        body.add_fixture(&FixtureDef::new(ShapeDef::circle(1.0), Material::SOLID));
        assert!(!body.is_simulated());
        assert_eq!(body.inv_mass(), 0.0);
    }
}
