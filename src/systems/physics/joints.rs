use std::collections::BTreeMap;

use crate::domain::geometry::Vec2;
use crate::domain::shapes::{BodyHandle, JointDef};

use super::body::KinematicBody;

const TAU: f32 = std::f32::consts::TAU;

pub(super) struct Joint {
    pub(super) def: JointDef,
    /// Body-local anchor on the driven body (mouse joints).
    pub(super) local_anchor: Vec2,
}

impl Joint {
    pub(super) fn new(def: JointDef, bodies: &BTreeMap<u32, KinematicBody>) -> Option<Self> {
        let local_anchor = match def {
            JointDef::Mouse { ground, body, target, .. } => {
                bodies.get(&ground.0)?;
                bodies.get(&body.0)?.world_to_local(target)
            }
            JointDef::Distance { body_a, body_b, .. } => {
                bodies.get(&body_a.0)?;
                bodies.get(&body_b.0)?;
                Vec2::zero()
            }
            JointDef::Revolute { body_a, body_b, anchor, .. } => {
                bodies.get(&body_b.0)?;
                bodies.get(&body_a.0)?.world_to_local(anchor)
            }
        };
        Some(Self { def, local_anchor })
    }

    pub(super) fn touches(&self, handle: BodyHandle) -> bool {
        match self.def {
            JointDef::Mouse { ground, body, .. } => ground == handle || body == handle,
            JointDef::Distance { body_a, body_b, .. } | JointDef::Revolute { body_a, body_b, .. } => {
                body_a == handle || body_b == handle
            }
        }
    }

    /// The two bodies this joint links.
    pub(super) fn bodies(&self) -> (BodyHandle, BodyHandle) {
        match self.def {
            JointDef::Mouse { ground, body, .. } => (ground, body),
            JointDef::Distance { body_a, body_b, .. } | JointDef::Revolute { body_a, body_b, .. } => {
                (body_a, body_b)
            }
        }
    }

    pub(super) fn anchors(&self, bodies: &BTreeMap<u32, KinematicBody>) -> Option<(Vec2, Vec2)> {
        match self.def {
            JointDef::Mouse { body, target, .. } => {
                let b = bodies.get(&body.0)?;
                Some((target, b.local_to_world(self.local_anchor)))
            }
            JointDef::Distance { body_a, body_b, .. } => {
                Some((bodies.get(&body_a.0)?.pos, bodies.get(&body_b.0)?.pos))
            }
            JointDef::Revolute { body_a, anchor, .. } => {
                let a = bodies.get(&body_a.0)?;
                Some((a.local_to_world(self.local_anchor), anchor))
            }
        }
    }

    /// Velocity pass; runs once per velocity iteration with `dt / iterations`.
    pub(super) fn solve_velocity(&mut self, bodies: &mut BTreeMap<u32, KinematicBody>, dt: f32) {
        match self.def {
            JointDef::Mouse {
                body,
                target,
                max_force,
                frequency_hz,
                damping_ratio,
                ..
            } => {
                let Some(b) = bodies.get_mut(&body.0) else {
                    return;
                };
                if !b.is_simulated() {
                    return;
                }
                let omega = TAU * frequency_hz;
                let k = b.mass * omega * omega;
                let c = 2.0 * b.mass * damping_ratio * omega;
                let anchor = b.local_to_world(self.local_anchor);
                let mut force = (target - anchor) * k - b.velocity_at(anchor) * c;
                let len = force.length();
                if len > max_force && len > 0.0 {
                    force = force * (max_force / len);
                }
                b.apply_impulse_at(force * dt, anchor);
            }
            JointDef::Distance {
                body_a,
                body_b,
                length,
                frequency_hz,
                damping_ratio,
            } => {
                let (Some(pa), Some(pb)) = (bodies.get(&body_a.0), bodies.get(&body_b.0)) else {
                    return;
                };
                let (ima, imb) = (pa.inv_mass(), pb.inv_mass());
                if ima + imb == 0.0 || frequency_hz <= 0.0 {
                    return;
                }
                let delta = pb.pos - pa.pos;
                let axis = delta.normalize();
                let stretch = delta.length() - length;
                let rel_vel = (pb.velocity - pa.velocity).dot(axis);
                let m_eff = 1.0 / (ima + imb);
                let omega = TAU * frequency_hz;
                let k = m_eff * omega * omega;
                let c = 2.0 * m_eff * damping_ratio * omega;
                let impulse = axis * ((k * stretch + c * rel_vel) * dt);
                if let Some(a) = bodies.get_mut(&body_a.0) {
                    a.velocity += impulse * ima;
                }
                if let Some(b) = bodies.get_mut(&body_b.0) {
                    b.velocity -= impulse * imb;
                }
            }
            JointDef::Revolute {
                body_a,
                motor_speed,
                max_motor_torque,
                enable_motor,
                ..
            } => {
                let Some(a) = bodies.get_mut(&body_a.0) else {
                    return;
                };
                a.velocity = Vec2::zero();
                if enable_motor && a.inv_inertia() > 0.0 {
                    let max_dw = max_motor_torque * a.inv_inertia() * dt;
                    let dw = (motor_speed - a.angular_vel).clamp(-max_dw, max_dw);
                    a.angular_vel += dw;
                }
            }
        }
    }

    /// Position pass: hard constraints (revolute pin, rigid distance).
    pub(super) fn solve_position(&self, bodies: &mut BTreeMap<u32, KinematicBody>) {
        match self.def {
            JointDef::Revolute { body_a, anchor, .. } => {
                if let Some(a) = bodies.get_mut(&body_a.0) {
                    let drift = anchor - a.local_to_world(self.local_anchor);
                    a.pos += drift;
                }
            }
            JointDef::Distance {
                body_a,
                body_b,
                length,
                frequency_hz,
                ..
            } if frequency_hz <= 0.0 => {
                let (Some(pa), Some(pb)) = (bodies.get(&body_a.0), bodies.get(&body_b.0)) else {
                    return;
                };
                let (ima, imb) = (pa.inv_mass(), pb.inv_mass());
                if ima + imb == 0.0 {
                    return;
                }
                let delta = pb.pos - pa.pos;
                let err = delta.length() - length;
                let correction = delta.normalize() * (err / (ima + imb));
                if let Some(a) = bodies.get_mut(&body_a.0) {
                    a.pos += correction * ima;
                }
                if let Some(b) = bodies.get_mut(&body_b.0) {
                    b.pos -= correction * imb;
                }
            }
            _ => {}
        }
    }

    pub(super) fn set_target(&mut self, new_target: Vec2) {
        if let JointDef::Mouse { ref mut target, .. } = self.def {
            *target = new_target;
        }
    }

    pub(super) fn set_motor(&mut self, enabled: bool) {
        if let JointDef::Revolute { ref mut enable_motor, .. } = self.def {
            *enable_motor = enabled;
        }
    }

    pub(super) fn motor_enabled(&self) -> bool {
        matches!(self.def, JointDef::Revolute { enable_motor: true, .. })
    }
}
