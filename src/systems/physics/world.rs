use std::collections::{BTreeMap, BTreeSet};

use crate::domain::geometry::Vec2;
use crate::domain::shapes::{BodyDef, BodyHandle, FixtureDef, JointDef, JointHandle};

use super::body::KinematicBody;
use super::collision::{emit_transitions, overlapping_pairs, resolve_static, PairKey};
use super::joints::Joint;
use super::{ContactEvent, PhysicsWorld, UserTag};

/// In-crate physics backend
pub struct KinematicWorld {
    bodies: BTreeMap<u32, KinematicBody>,
    joints: BTreeMap<u32, Joint>,
    next_body_id: u32,
    next_joint_id: u32,
    gravity: Vec2,
    touching: BTreeSet<PairKey>,
    contacts: Vec<ContactEvent>,
}

impl KinematicWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            bodies: BTreeMap::new(),
            joints: BTreeMap::new(),
            next_body_id: 1,
            next_joint_id: 1,
            gravity,
            touching: BTreeSet::new(),
            contacts: Vec::new(),
        }
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// Direct access for tests and debugging overlays.
    pub fn body(&self, handle: BodyHandle) -> Option<&KinematicBody> {
        self.bodies.get(&handle.0)
    }

    fn integrate_velocities(&mut self, dt: f32) {
        let gravity = self.gravity;
        for body in self.bodies.values_mut() {
            if body.is_simulated() {
                body.velocity += gravity * dt;
            }
        }
    }

    fn integrate_positions(&mut self, dt: f32) {
        for body in self.bodies.values_mut() {
            if body.is_simulated() {
                body.pos += body.velocity * dt;
                body.angle += body.angular_vel * dt;
            }
        }
    }
}

impl Default for KinematicWorld {
    fn default() -> Self {
        Self::new(Vec2::zero())
    }
}

impl PhysicsWorld for KinematicWorld {
    fn create_body(&mut self, def: &BodyDef) -> BodyHandle {
        let id = self.next_body_id;
        self.next_body_id = self.next_body_id.saturating_add(1);
        self.bodies.insert(id, KinematicBody::new(def, id));
        BodyHandle(id)
    }

    fn create_fixture(&mut self, body: BodyHandle, def: &FixtureDef) -> bool {
        match self.bodies.get_mut(&body.0) {
            Some(b) => {
                b.add_fixture(def);
                true
            }
            None => false,
        }
    }

    fn destroy_body(&mut self, body: BodyHandle) -> bool {
        if self.bodies.remove(&body.0).is_none() {
            return false;
        }
        self.joints.retain(|_, j| !j.touches(body));
        self.touching.retain(|&(a, b)| a != body.0 && b != body.0);
        true
    }

    fn create_joint(&mut self, def: &JointDef) -> Option<JointHandle> {
        let joint = Joint::new(*def, &self.bodies)?;
        let id = self.next_joint_id;
        self.next_joint_id = self.next_joint_id.saturating_add(1);
        self.joints.insert(id, joint);
        Some(JointHandle(id))
    }

    fn destroy_joint(&mut self, joint: JointHandle) -> bool {
        self.joints.remove(&joint.0).is_some()
    }

    fn step(&mut self, dt: f32, velocity_iterations: u32, position_iterations: u32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let velocity_iterations = velocity_iterations.max(1);
        let position_iterations = position_iterations.max(1);

        self.integrate_velocities(dt);

        let sub_dt = dt / velocity_iterations as f32;
        for _ in 0..velocity_iterations {
            for joint in self.joints.values_mut() {
                joint.solve_velocity(&mut self.bodies, sub_dt);
            }
        }

        self.integrate_positions(dt);

        for _ in 0..position_iterations {
            for joint in self.joints.values() {
                joint.solve_position(&mut self.bodies);
            }
        }

        let linked: BTreeSet<PairKey> = self
            .joints
            .values()
            .map(|j| {
                let (a, b) = j.bodies();
                (a.0.min(b.0), a.0.max(b.0))
            })
            .collect();
        resolve_static(&mut self.bodies, &linked);

        let current = overlapping_pairs(&self.bodies);
        emit_transitions(&self.bodies, &self.touching, &current, &mut self.contacts);
        self.touching = current;
    }

    fn position(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&body.0).map(|b| b.pos)
    }

    fn angle_degrees(&self, body: BodyHandle) -> Option<f32> {
        self.bodies.get(&body.0).map(|b| b.angle.to_degrees())
    }

    fn mass(&self, body: BodyHandle) -> Option<f32> {
        self.bodies.get(&body.0).map(|b| b.mass)
    }

    fn linear_velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&body.0).map(|b| b.velocity)
    }

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body.0) {
            b.velocity = velocity;
        }
    }

    fn set_angular_velocity(&mut self, body: BodyHandle, omega: f32) {
        if let Some(b) = self.bodies.get_mut(&body.0) {
            b.angular_vel = omega;
        }
    }

    fn set_user_data(&mut self, body: BodyHandle, tag: UserTag) {
        if let Some(b) = self.bodies.get_mut(&body.0) {
            b.user_data = Some(tag);
        }
    }

    fn test_point(&self, body: BodyHandle, point: Vec2) -> bool {
        self.bodies
            .get(&body.0)
            .map_or(false, |b| b.contains_point(point))
    }

    fn set_joint_target(&mut self, joint: JointHandle, target: Vec2) {
        if let Some(j) = self.joints.get_mut(&joint.0) {
            j.set_target(target);
        }
    }

    fn joint_anchors(&self, joint: JointHandle) -> Option<(Vec2, Vec2)> {
        self.joints.get(&joint.0)?.anchors(&self.bodies)
    }

    fn set_motor_enabled(&mut self, joint: JointHandle, enabled: bool) {
        if let Some(j) = self.joints.get_mut(&joint.0) {
            j.set_motor(enabled);
        }
    }

    fn is_motor_enabled(&self, joint: JointHandle) -> bool {
        self.joints.get(&joint.0).map_or(false, |j| j.motor_enabled())
    }

    fn drain_contacts(&mut self, out: &mut Vec<ContactEvent>) {
        out.append(&mut self.contacts);
    }

    fn contains_body(&self, body: BodyHandle) -> bool {
        self.bodies.contains_key(&body.0)
    }

    fn contains_joint(&self, joint: JointHandle) -> bool {
        self.joints.contains_key(&joint.0)
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn joint_count(&self) -> usize {
        self.joints.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shapes::{Material, ShapeDef};
    use crate::systems::physics::ContactPhase;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    fn ball(world: &mut KinematicWorld, at: Vec2, radius: f32) -> BodyHandle {
        let h = world.create_body(&BodyDef::dynamic(at));
        world.create_fixture(h, &FixtureDef::new(ShapeDef::circle(radius), Material::BOUNCY));
        h
    }

    #[test]
    fn gravity_accelerates_dynamic_bodies_only() {
        let mut world = KinematicWorld::new(Vec2::new(0.0, 20.0));
        let moving = ball(&mut world, Vec2::zero(), 1.0);
        let fixed = world.create_body(&BodyDef::fixed(Vec2::new(5.0, 5.0)));
        world.create_fixture(
            fixed,
            &FixtureDef::new(ShapeDef::Box { half_width: 1.0, half_height: 1.0 }, Material::SOLID),
        );

        for _ in 0..60 {
            world.step(DT, 10, 10);
        }

        let v = world.linear_velocity(moving).unwrap();
        assert_relative_eq!(v.y, 20.0, epsilon = 1e-3);
        assert_eq!(world.position(fixed), Some(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn zero_gravity_keeps_velocity() {
        let mut world = KinematicWorld::default();
        let b = ball(&mut world, Vec2::new(10.0, 10.0), 1.0);
        world.set_linear_velocity(b, Vec2::new(6.0, 0.0));
        for _ in 0..30 {
            world.step(DT, 10, 10);
        }
        let p = world.position(b).unwrap();
        assert_relative_eq!(p.x, 13.0, epsilon = 1e-3);
        assert_relative_eq!(p.y, 10.0);
    }

    #[test]
    fn destroy_body_drops_attached_joints() {
        let mut world = KinematicWorld::default();
        let a = ball(&mut world, Vec2::zero(), 1.0);
        let b = ball(&mut world, Vec2::new(5.0, 0.0), 1.0);
        let joint = world
            .create_joint(&JointDef::Distance {
                body_a: a,
                body_b: b,
                length: 5.0,
                frequency_hz: 3.0,
                damping_ratio: 0.3,
            })
            .unwrap();

        assert!(world.destroy_body(a));
        assert!(!world.contains_joint(joint));
        assert!(!world.destroy_body(a));
        assert!(!world.destroy_joint(joint));
        assert_eq!(world.body_count(), 1);
    }

    #[test]
    fn joint_to_missing_body_is_rejected() {
        let mut world = KinematicWorld::default();
        let a = ball(&mut world, Vec2::zero(), 1.0);
        let def = JointDef::Distance {
            body_a: a,
            body_b: BodyHandle(999),
            length: 1.0,
            frequency_hz: 1.0,
            damping_ratio: 0.5,
        };
        assert!(world.create_joint(&def).is_none());
        assert_eq!(world.joint_count(), 0);
    }

    #[test]
    fn mouse_joint_pulls_toward_target() {
        let mut world = KinematicWorld::default();
        let ground = world.create_body(&BodyDef::fixed(Vec2::zero()));
        let b = ball(&mut world, Vec2::new(0.0, 0.0), 1.0);
        let mass = world.mass(b).unwrap();
        let joint = world
            .create_joint(&JointDef::Mouse {
                ground,
                body: b,
                target: Vec2::zero(),
                max_force: 1000.0 * mass,
                frequency_hz: 5.0,
                damping_ratio: 0.9,
            })
            .unwrap();
        world.set_joint_target(joint, Vec2::new(10.0, 0.0));

        for _ in 0..120 {
            world.step(DT, 10, 10);
        }
        let p = world.position(b).unwrap();
        assert!((p.x - 10.0).abs() < 0.5, "body settled at {:?}", p);

        let (target, anchor) = world.joint_anchors(joint).unwrap();
        assert_eq!(target, Vec2::new(10.0, 0.0));
        assert!((anchor.x - 10.0).abs() < 0.5);
    }

    #[test]
    fn revolute_motor_spins_pinned_body() {
        let mut world = KinematicWorld::new(Vec2::new(0.0, 20.0));
        let post = world.create_body(&BodyDef::fixed(Vec2::new(0.0, 2.0)));
        let blade = world.create_body(&BodyDef::dynamic(Vec2::zero()));
        world.create_fixture(
            blade,
            &FixtureDef::new(ShapeDef::Box { half_width: 3.0, half_height: 0.5 }, Material::SOLID),
        );
        let joint = world
            .create_joint(&JointDef::Revolute {
                body_a: blade,
                body_b: post,
                anchor: Vec2::zero(),
                motor_speed: std::f32::consts::TAU,
                max_motor_torque: 16000.0,
                enable_motor: false,
            })
            .unwrap();

        world.step(DT, 10, 10);
        assert_relative_eq!(world.position(blade).unwrap().y, 0.0, epsilon = 1e-4);
        assert!(!world.is_motor_enabled(joint));

        world.set_motor_enabled(joint, true);
        for _ in 0..30 {
            world.step(DT, 10, 10);
        }
        assert!(world.angle_degrees(blade).unwrap() > 0.0);
        assert_relative_eq!(world.position(blade).unwrap().y, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn contact_events_are_queued_and_drained() {
        let mut world = KinematicWorld::default();
        let a = ball(&mut world, Vec2::new(0.0, 0.0), 1.0);
        let b = ball(&mut world, Vec2::new(3.0, 0.0), 1.0);
        world.set_user_data(a, 1);
        world.set_user_data(b, 2);
        world.set_linear_velocity(b, Vec2::new(-90.0, 0.0));

        world.step(DT, 10, 10);
        let mut events = Vec::new();
        world.drain_contacts(&mut events);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].phase, ContactPhase::Begin);

        world.drain_contacts(&mut events);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_point_hits_fixture() {
        let mut world = KinematicWorld::default();
        let b = ball(&mut world, Vec2::new(10.0, 10.0), 2.0);
        assert!(world.test_point(b, Vec2::new(11.0, 10.5)));
        assert!(!world.test_point(b, Vec2::new(13.0, 10.0)));
        assert!(!world.test_point(BodyHandle(77), Vec2::new(10.0, 10.0)));
    }

    fn floor(world: &mut KinematicWorld, at: Vec2) -> BodyHandle {
        let h = world.create_body(&BodyDef::fixed(at));
        world.create_fixture(
            h,
            &FixtureDef::new(ShapeDef::Box { half_width: 10.0, half_height: 0.5 }, Material::SOLID),
        );
        h
    }

    #[test]
    fn ball_bounces_off_a_fixed_box() {
        let mut world = KinematicWorld::default();
        let b = ball(&mut world, Vec2::zero(), 1.0);
        floor(&mut world, Vec2::new(0.0, 3.0));
        world.set_linear_velocity(b, Vec2::new(0.0, 10.0));

        for _ in 0..60 {
            world.step(DT, 10, 10);
            assert!(world.position(b).unwrap().y <= 1.5 + 1e-4);
        }
        // Bouncy against solid: the livelier restitution wins.
        let v = world.linear_velocity(b).unwrap();
        assert_relative_eq!(v.y, -8.0, epsilon = 1e-3);
        assert_relative_eq!(v.x, 0.0);
    }

    #[test]
    fn falling_box_comes_to_rest_on_the_floor() {
        let mut world = KinematicWorld::new(Vec2::new(0.0, 20.0));
        let crate_body = world.create_body(&BodyDef::dynamic(Vec2::zero()));
        world.create_fixture(
            crate_body,
            &FixtureDef::new(ShapeDef::Box { half_width: 1.0, half_height: 1.0 }, Material::SOLID),
        );
        floor(&mut world, Vec2::new(0.0, 3.0));

        for _ in 0..240 {
            world.step(DT, 10, 10);
        }
        let p = world.position(crate_body).unwrap();
        assert!(p.y < 2.5, "box sank to {:?}", p);
        assert!(p.y > 0.0);
    }

    #[test]
    fn chain_surface_catches_a_falling_ball() {
        let mut world = KinematicWorld::new(Vec2::new(0.0, 20.0));
        let b = ball(&mut world, Vec2::zero(), 1.0);
        let ground = world.create_body(&BodyDef::fixed(Vec2::zero()));
        world.create_fixture(
            ground,
            &FixtureDef::new(
                ShapeDef::Chain { points: vec![Vec2::new(-20.0, 5.0), Vec2::new(20.0, 5.0)] },
                Material::GROUND,
            ),
        );

        for _ in 0..240 {
            world.step(DT, 10, 10);
        }
        let p = world.position(b).unwrap();
        assert!(p.y < 5.0, "ball fell through to {:?}", p);
    }

    #[test]
    fn jointed_bodies_do_not_push_each_other() {
        let mut world = KinematicWorld::new(Vec2::new(0.0, 20.0));
        let post = world.create_body(&BodyDef::fixed(Vec2::new(0.0, 2.0)));
        world.create_fixture(
            post,
            &FixtureDef::new(ShapeDef::Box { half_width: 0.5, half_height: 2.0 }, Material::SOLID),
        );
        let blade = world.create_body(&BodyDef::dynamic(Vec2::zero()));
        world.create_fixture(
            blade,
            &FixtureDef::new(ShapeDef::Box { half_width: 3.0, half_height: 0.5 }, Material::SOLID),
        );
        world
            .create_joint(&JointDef::Revolute {
                body_a: blade,
                body_b: post,
                anchor: Vec2::zero(),
                motor_speed: 0.0,
                max_motor_torque: 0.0,
                enable_motor: false,
            })
            .unwrap();

        for _ in 0..30 {
            world.step(DT, 10, 10);
        }
        let p = world.position(blade).unwrap();
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-4);
    }
}
