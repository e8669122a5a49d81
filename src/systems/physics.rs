//! Physics boundary
//!
//! `PhysicsWorld` is the surface the demos consume from a rigid-body engine:
//! body/fixture/joint lifetime, stepping, state queries and a contact event
//! queue. Everything is in simulation units; conversion to pixels happens in
//! the entity layer through the unit bridge.
//!
//! `KinematicWorld` is the in-crate backend. It integrates gravity and
//! velocity, drives soft mouse/distance joints and pinned revolute joints,
//! and reports contact begin/end from bounding-circle overlap. Dynamic bodies
//! are pushed out of static fixtures and bounce off them using the fixture
//! restitution and friction. Dynamic bodies still pass through each other.

mod body;
mod collision;
mod joints;
mod world;

pub use crate::domain::shapes::{BodyHandle, JointHandle};
pub use body::KinematicBody;
pub use world::KinematicWorld;

use crate::domain::geometry::Vec2;
use crate::domain::shapes::{BodyDef, FixtureDef, JointDef};

/// Value attached to a body so contact events can name their owners.
pub type UserTag = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactPhase {
    Begin,
    End,
}

/// One contact transition between two tagged bodies, queued during `step`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContactEvent {
    pub phase: ContactPhase,
    pub a: UserTag,
    pub b: UserTag,
}

pub trait PhysicsWorld {
    fn create_body(&mut self, def: &BodyDef) -> BodyHandle;

    /// Attach a fixture; returns false when the body does not exist.
    fn create_fixture(&mut self, body: BodyHandle, def: &FixtureDef) -> bool;

    /// Destroy a body together with its fixtures and every joint touching it.
    /// Returns false when the body was already gone.
    fn destroy_body(&mut self, body: BodyHandle) -> bool;

    /// Returns `None` when a referenced body does not exist.
    fn create_joint(&mut self, def: &JointDef) -> Option<JointHandle>;

    fn destroy_joint(&mut self, joint: JointHandle) -> bool;

    fn step(&mut self, dt: f32, velocity_iterations: u32, position_iterations: u32);

    fn position(&self, body: BodyHandle) -> Option<Vec2>;

    fn angle_degrees(&self, body: BodyHandle) -> Option<f32>;

    fn mass(&self, body: BodyHandle) -> Option<f32>;

    fn linear_velocity(&self, body: BodyHandle) -> Option<Vec2>;

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2);

    fn set_angular_velocity(&mut self, body: BodyHandle, omega: f32);

    fn set_user_data(&mut self, body: BodyHandle, tag: UserTag);

    /// Point-in-fixture test against every fixture of `body`.
    fn test_point(&self, body: BodyHandle, point: Vec2) -> bool;

    fn set_joint_target(&mut self, joint: JointHandle, target: Vec2);

    /// World anchors of a joint (A side, B side).
    fn joint_anchors(&self, joint: JointHandle) -> Option<(Vec2, Vec2)>;

    fn set_motor_enabled(&mut self, joint: JointHandle, enabled: bool);

    fn is_motor_enabled(&self, joint: JointHandle) -> bool;

    /// Move queued contact events into `out` (appends; the queue is emptied).
    fn drain_contacts(&mut self, out: &mut Vec<ContactEvent>);

    fn contains_body(&self, body: BodyHandle) -> bool;

    fn contains_joint(&self, joint: JointHandle) -> bool;

    fn body_count(&self) -> usize;

    fn joint_count(&self) -> usize;
}
