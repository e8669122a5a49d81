//! Body, fixture and joint definitions handed to the physics boundary.
//!
//! All lengths here are in simulation units; entity constructors convert
//! their pixel geometry through the unit bridge before filling these in.

use serde::{Deserialize, Serialize};

use super::geometry::{convex_hull, polygon_area, Vec2};

/// Opaque reference to a body owned by a physics world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Opaque reference to a joint owned by a physics world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JointHandle(pub u32);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    #[default]
    Static,
    Dynamic,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BodyDef {
    pub kind: BodyKind,
    pub position: Vec2,
    pub angle: f32,
}

impl BodyDef {
    pub fn dynamic(position: Vec2) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            position,
            angle: 0.0,
        }
    }

    pub fn fixed(position: Vec2) -> Self {
        Self {
            kind: BodyKind::Static,
            position,
            angle: 0.0,
        }
    }
}

/// Density / friction / restitution of a fixture.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl Material {
    pub const fn new(density: f32, friction: f32, restitution: f32) -> Self {
        Self { density, friction, restitution }
    }

    /// Boxes, polygons, lollipops and boundaries.
    pub const SOLID: Material = Material::new(1.0, 0.5, 0.2);
    /// Circles and creatures.
    pub const BOUNCY: Material = Material::new(1.0, 0.1, 0.8);
    /// The rolling surface.
    pub const GROUND: Material = Material::new(1.0, 0.1, 0.3);
}

impl Default for Material {
    fn default() -> Self {
        Material::SOLID
    }
}

/// Geometry of one fixture, in body-local simulation units.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeDef {
    Circle { radius: f32, offset: Vec2 },
    Box { half_width: f32, half_height: f32 },
    /// Convex polygon, counter-clockwise.
    Polygon { vertices: Vec<Vec2> },
    /// Open polyline; has no area and no mass.
    Chain { points: Vec<Vec2> },
}

impl ShapeDef {
    pub fn circle(radius: f32) -> Self {
        ShapeDef::Circle { radius, offset: Vec2::zero() }
    }

    /// Builds the convex hull of `points`, like the engine's polygon shape does.
    pub fn polygon(points: &[Vec2]) -> Self {
        ShapeDef::Polygon { vertices: convex_hull(points) }
    }

    pub fn area(&self) -> f32 {
        match self {
            ShapeDef::Circle { radius, .. } => std::f32::consts::PI * radius * radius,
            ShapeDef::Box { half_width, half_height } => 4.0 * half_width * half_height,
            ShapeDef::Polygon { vertices } => polygon_area(vertices).abs(),
            ShapeDef::Chain { .. } => 0.0,
        }
    }

    /// Radius of a circle around the body origin that encloses the shape.
    pub fn bounding_radius(&self) -> f32 {
        match self {
            ShapeDef::Circle { radius, offset } => offset.length() + radius,
            ShapeDef::Box { half_width, half_height } => {
                (half_width * half_width + half_height * half_height).sqrt()
            }
            ShapeDef::Polygon { vertices } | ShapeDef::Chain { points: vertices } => vertices
                .iter()
                .map(|v| v.length())
                .fold(0.0, f32::max),
        }
    }

    /// Second moment of area about the body origin (multiply by density for inertia).
    pub fn unit_inertia(&self) -> f32 {
        match self {
            ShapeDef::Circle { radius, offset } => {
                let a = self.area();
                a * (0.5 * radius * radius + offset.length_squared())
            }
            ShapeDef::Box { half_width, half_height } => {
                let a = self.area();
                a * (half_width * half_width + half_height * half_height) / 3.0
            }
            ShapeDef::Polygon { vertices } => {
                let a = self.area();
                if vertices.is_empty() {
                    return 0.0;
                }
                let mean_r2 =
                    vertices.iter().map(|v| v.length_squared()).sum::<f32>() / vertices.len() as f32;
                a * mean_r2 * 0.5
            }
            ShapeDef::Chain { .. } => 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FixtureDef {
    pub shape: ShapeDef,
    pub material: Material,
}

impl FixtureDef {
    pub fn new(shape: ShapeDef, material: Material) -> Self {
        Self { shape, material }
    }
}

/// Joint definitions. Handles refer to bodies already created in the same world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum JointDef {
    /// Pointer-driven soft constraint pulling `body` toward `target`.
    Mouse {
        ground: BodyHandle,
        body: BodyHandle,
        target: Vec2,
        max_force: f32,
        frequency_hz: f32,
        damping_ratio: f32,
    },
    /// Spring keeping two body centers `length` apart.
    Distance {
        body_a: BodyHandle,
        body_b: BodyHandle,
        length: f32,
        frequency_hz: f32,
        damping_ratio: f32,
    },
    /// Pin `body_a` to `body_b` at a world anchor, optionally motorised.
    Revolute {
        body_a: BodyHandle,
        body_b: BodyHandle,
        anchor: Vec2,
        motor_speed: f32,
        max_motor_torque: f32,
        enable_motor: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_area_and_bounds() {
        let b = ShapeDef::Box { half_width: 2.0, half_height: 1.5 };
        assert_eq!(b.area(), 12.0);
        assert!((b.bounding_radius() - 2.5).abs() < 1e-6);
    }

    #[test]
    fn offset_circle_bounds_include_offset() {
        let c = ShapeDef::Circle { radius: 1.0, offset: Vec2::new(0.0, -3.0) };
        assert!((c.bounding_radius() - 4.0).abs() < 1e-6);
    }

    #[test]
    fn chain_is_massless() {
        let chain = ShapeDef::Chain {
            points: vec![Vec2::new(0.0, 0.0), Vec2::new(5.0, 1.0)],
        };
        assert_eq!(chain.area(), 0.0);
        assert_eq!(chain.unit_inertia(), 0.0);
    }
}
