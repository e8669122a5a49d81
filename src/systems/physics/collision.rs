use std::collections::{BTreeMap, BTreeSet};

use crate::domain::geometry::{closest_on_segment, polygon_contains, Vec2};
use crate::domain::shapes::{BodyKind, ShapeDef};

use super::body::KinematicBody;
use super::{ContactEvent, ContactPhase};

/// Body-id pair, smaller id first.
pub(super) type PairKey = (u32, u32);

/// Two bodies touch when their bounding circles overlap.
pub(super) fn touching(a: &KinematicBody, b: &KinematicBody) -> bool {
    let reach = a.bounding_radius + b.bounding_radius;
    (a.pos - b.pos).length_squared() <= reach * reach
}

/// Every touching pair where both bodies carry a user tag and at least one moves.
pub(super) fn overlapping_pairs(bodies: &BTreeMap<u32, KinematicBody>) -> BTreeSet<PairKey> {
    let tagged: Vec<&KinematicBody> = bodies.values().filter(|b| b.user_data.is_some()).collect();
    let mut pairs = BTreeSet::new();

    for (i, a) in tagged.iter().enumerate() {
        for b in tagged.iter().skip(i + 1) {
            if !a.is_simulated() && !b.is_simulated() {
                continue;
            }
            if touching(a, b) {
                pairs.insert((a.id.min(b.id), a.id.max(b.id)));
            }
        }
    }

    pairs
}

/// Diff last step's pairs against this step's and queue begin/end events.
pub(super) fn emit_transitions(
    bodies: &BTreeMap<u32, KinematicBody>,
    previous: &BTreeSet<PairKey>,
    current: &BTreeSet<PairKey>,
    queue: &mut Vec<ContactEvent>,
) {
    let tag = |id: u32| bodies.get(&id).and_then(|b| b.user_data);

    for &(a, b) in current.difference(previous) {
        if let (Some(ta), Some(tb)) = (tag(a), tag(b)) {
            queue.push(ContactEvent { phase: ContactPhase::Begin, a: ta, b: tb });
        }
    }
    for &(a, b) in previous.difference(current) {
        // Pairs whose body was destroyed disappear without an end event.
        if let (Some(ta), Some(tb)) = (tag(a), tag(b)) {
            queue.push(ContactEvent { phase: ContactPhase::End, a: ta, b: tb });
        }
    }
}

/// How far behind a chain segment a point still counts as touching it.
const CHAIN_THICKNESS: f32 = 1.0;

/// Deepest penetration of a dynamic body into a static one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct StaticContact {
    /// World point on the dynamic body.
    pub point: Vec2,
    /// Unit push-out direction for the dynamic body.
    pub normal: Vec2,
    pub depth: f32,
}

/// Sample points of a dynamic body: circle centers with their radius,
/// polygon and box corners with radius zero.
fn sample_points(body: &KinematicBody) -> Vec<(Vec2, f32)> {
    let mut out = Vec::new();
    for fixture in body.fixtures.iter() {
        match &fixture.shape {
            ShapeDef::Circle { radius, offset } => out.push((body.local_to_world(*offset), *radius)),
            ShapeDef::Box { half_width, half_height } => {
                for (sx, sy) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                    let corner = Vec2::new(sx * half_width, sy * half_height);
                    out.push((body.local_to_world(corner), 0.0));
                }
            }
            ShapeDef::Polygon { vertices } => {
                out.extend(vertices.iter().map(|v| (body.local_to_world(*v), 0.0)));
            }
            ShapeDef::Chain { .. } => {}
        }
    }
    out
}

/// Push-out for a disc `(p, r)` given in the static shape's local frame.
/// `hint` is the dynamic body's origin in the same frame; a sample point that ends up
/// inside a box leaves through the face on the body's side.
fn shape_contact(shape: &ShapeDef, p: Vec2, r: f32, hint: Vec2) -> Option<(Vec2, f32)> {
    match shape {
        ShapeDef::Circle { radius, offset } => {
            let d = p - *offset;
            let dist = d.length();
            let reach = r + radius;
            if dist >= reach {
                return None;
            }
            let normal = if dist > f32::EPSILON { d * (1.0 / dist) } else { Vec2::new(0.0, -1.0) };
            Some((normal, reach - dist))
        }
        ShapeDef::Box { half_width, half_height } => {
            let (hw, hh) = (*half_width, *half_height);
            if p.x.abs() <= hw && p.y.abs() <= hh {
                let sx = if hint.x >= 0.0 { 1.0 } else { -1.0 };
                let sy = if hint.y >= 0.0 { 1.0 } else { -1.0 };
                return if hint.x.abs() - hw > hint.y.abs() - hh {
                    Some((Vec2::new(sx, 0.0), hw - p.x * sx + r))
                } else {
                    Some((Vec2::new(0.0, sy), hh - p.y * sy + r))
                };
            }
            let closest = Vec2::new(p.x.clamp(-hw, hw), p.y.clamp(-hh, hh));
            let d = p - closest;
            let dist = d.length();
            if dist >= r || dist <= f32::EPSILON {
                return None;
            }
            Some((d * (1.0 / dist), r - dist))
        }
        ShapeDef::Polygon { vertices } => {
            let n = vertices.len();
            if n < 3 {
                return None;
            }
            let closest = (0..n)
                .map(|i| closest_on_segment(vertices[i], vertices[(i + 1) % n], p))
                .min_by(|a, b| (p - *a).length_squared().total_cmp(&(p - *b).length_squared()))?;
            let d = p - closest;
            let dist = d.length();
            if polygon_contains(vertices, p) {
                if dist <= f32::EPSILON {
                    return None;
                }
                return Some((d * (-1.0 / dist), dist + r));
            }
            if dist >= r || dist <= f32::EPSILON {
                return None;
            }
            Some((d * (1.0 / dist), r - dist))
        }
        // One-sided: solid to the right of each segment's direction (below a
        // left-to-right chain in screen coordinates).
        ShapeDef::Chain { points } => {
            let mut best: Option<(Vec2, f32)> = None;
            for pair in points.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                let along = b - a;
                let len2 = along.length_squared();
                if len2 <= f32::EPSILON {
                    continue;
                }
                let t = (p - a).dot(along) / len2;
                if !(0.0..=1.0).contains(&t) {
                    continue;
                }
                let normal = Vec2::new(along.y, -along.x).normalize();
                let side = (p - a).dot(normal);
                if side >= r || side < -(r + CHAIN_THICKNESS) {
                    continue;
                }
                let depth = r - side;
                if best.map_or(true, |(_, d)| depth > d) {
                    best = Some((normal, depth));
                }
            }
            best
        }
    }
}

/// Deepest contact of `body` against the fixtures of `fixed`, if any.
pub(super) fn static_contact(body: &KinematicBody, fixed: &KinematicBody) -> Option<StaticContact> {
    let mut best: Option<StaticContact> = None;
    let hint = fixed.world_to_local(body.pos);
    for (center, radius) in sample_points(body) {
        let local = fixed.world_to_local(center);
        for fixture in fixed.fixtures.iter() {
            let Some((normal, depth)) = shape_contact(&fixture.shape, local, radius, hint) else {
                continue;
            };
            if best.map_or(true, |c| depth > c.depth) {
                let normal = normal.rotate(fixed.angle);
                best = Some(StaticContact {
                    point: center - normal * radius,
                    normal,
                    depth,
                });
            }
        }
    }
    best
}

/// Push `body` out of a static contact and apply a restitution + Coulomb
/// friction impulse at the contact point.
pub(super) fn respond(body: &mut KinematicBody, contact: &StaticContact, restitution: f32, friction: f32) {
    let n = contact.normal;
    body.pos += n * contact.depth;

    let r = contact.point - body.pos;
    let vn = body.velocity_at(contact.point).dot(n);
    if vn >= 0.0 {
        return;
    }
    let rn = r.cross(n);
    let k = body.inv_mass() + body.inv_inertia() * rn * rn;
    if k <= 0.0 {
        return;
    }
    let jn = -(1.0 + restitution) * vn / k;
    body.apply_impulse_at(n * jn, contact.point);

    let v = body.velocity_at(contact.point);
    let tangent = v - n * v.dot(n);
    let speed = tangent.length();
    if speed <= f32::EPSILON {
        return;
    }
    let t = tangent * (1.0 / speed);
    let rt = r.cross(t);
    let kt = body.inv_mass() + body.inv_inertia() * rt * rt;
    if kt <= 0.0 {
        return;
    }
    let jt = (speed / kt).min(friction * jn);
    body.apply_impulse_at(t * -jt, contact.point);
}

/// Resolve every simulated body against every static body with fixtures,
/// skipping pairs linked by a joint.
pub(super) fn resolve_static(bodies: &mut BTreeMap<u32, KinematicBody>, linked: &BTreeSet<PairKey>) {
    let fixed: Vec<u32> = bodies
        .values()
        .filter(|b| b.kind == BodyKind::Static && !b.fixtures.is_empty())
        .map(|b| b.id)
        .collect();
    let moving: Vec<u32> = bodies.values().filter(|b| b.is_simulated()).map(|b| b.id).collect();

    for &id in moving.iter() {
        for &wall in fixed.iter() {
            if linked.contains(&(id.min(wall), id.max(wall))) {
                continue;
            }
            let (Some(body), Some(other)) = (bodies.get(&id), bodies.get(&wall)) else {
                continue;
            };
            let reach = body.bounding_radius + other.bounding_radius + CHAIN_THICKNESS;
            let chain = other.fixtures.iter().any(|f| matches!(f.shape, ShapeDef::Chain { .. }));
            if !chain && (body.pos - other.pos).length_squared() > reach * reach {
                continue;
            }
            let Some(contact) = static_contact(body, other) else {
                continue;
            };
            let restitution = body.restitution.max(other.restitution);
            let friction = (body.friction * other.friction).sqrt();
            if let Some(body) = bodies.get_mut(&id) {
                respond(body, &contact, restitution, friction);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::Vec2;
    use crate::domain::shapes::{BodyDef, FixtureDef, Material, ShapeDef};

    fn ball(id: u32, x: f32, tag: Option<u32>) -> KinematicBody {
        let mut b = KinematicBody::new(&BodyDef::dynamic(Vec2::new(x, 0.0)), id);
        b.add_fixture(&FixtureDef::new(ShapeDef::circle(1.0), Material::BOUNCY));
        b.user_data = tag;
        b
    }

    #[test]
    fn untagged_bodies_never_pair() {
        let mut bodies = BTreeMap::new();
        bodies.insert(1, ball(1, 0.0, Some(10)));
        bodies.insert(2, ball(2, 0.5, None));
        assert!(overlapping_pairs(&bodies).is_empty());
    }

    #[test]
    fn begin_then_end() {
        let mut bodies = BTreeMap::new();
        bodies.insert(1, ball(1, 0.0, Some(10)));
        bodies.insert(2, ball(2, 1.5, Some(20)));
        let mut queue = Vec::new();

        let first = overlapping_pairs(&bodies);
        emit_transitions(&bodies, &BTreeSet::new(), &first, &mut queue);
        assert_eq!(queue, vec![ContactEvent { phase: ContactPhase::Begin, a: 10, b: 20 }]);

        if let Some(b) = bodies.get_mut(&2) {
            b.pos.x = 5.0;
        }
        queue.clear();
        let second = overlapping_pairs(&bodies);
        emit_transitions(&bodies, &first, &second, &mut queue);
        assert_eq!(queue, vec![ContactEvent { phase: ContactPhase::End, a: 10, b: 20 }]);
    }

    fn wall(id: u32, at: Vec2, half_width: f32, half_height: f32) -> KinematicBody {
        let mut b = KinematicBody::new(&BodyDef::fixed(at), id);
        b.add_fixture(&FixtureDef::new(ShapeDef::Box { half_width, half_height }, Material::SOLID));
        b
    }

    #[test]
    fn disc_near_a_box_is_pushed_off_its_face() {
        let floor = wall(1, Vec2::new(0.0, 3.0), 10.0, 0.5);
        let mut b = ball(2, 0.0, None);
        b.pos = Vec2::new(0.0, 1.75);
        let contact = static_contact(&b, &floor).unwrap();
        assert_eq!(contact.normal, Vec2::new(0.0, -1.0));
        assert!((contact.depth - 0.25).abs() < 1e-5);
    }

    #[test]
    fn sunk_corner_leaves_toward_the_body() {
        // Box corner 0.4 deep into a thin wall; the body itself is above it.
        let floor = wall(1, Vec2::new(0.0, 3.0), 10.0, 0.5);
        let mut body = KinematicBody::new(&BodyDef::dynamic(Vec2::new(0.0, 1.9)), 2);
        body.add_fixture(&FixtureDef::new(
            ShapeDef::Box { half_width: 1.0, half_height: 1.0 },
            Material::SOLID,
        ));
        let contact = static_contact(&body, &floor).unwrap();
        assert_eq!(contact.normal, Vec2::new(0.0, -1.0));
        assert!((contact.depth - 0.4).abs() < 1e-5);
    }

    #[test]
    fn chain_is_solid_below_only() {
        let mut ground = KinematicBody::new(&BodyDef::fixed(Vec2::zero()), 1);
        ground.add_fixture(&FixtureDef::new(
            ShapeDef::Chain { points: vec![Vec2::new(-10.0, 5.0), Vec2::new(10.0, 5.0)] },
            Material::GROUND,
        ));
        let mut above = ball(2, 0.0, None);
        above.pos = Vec2::new(0.0, 4.5);
        let contact = static_contact(&above, &ground).unwrap();
        assert_eq!(contact.normal, Vec2::new(0.0, -1.0));
        assert!((contact.depth - 0.5).abs() < 1e-5);

        let mut clear = ball(3, 0.0, None);
        clear.pos = Vec2::new(0.0, 2.0);
        assert!(static_contact(&clear, &ground).is_none());

        let mut far_below = ball(4, 0.0, None);
        far_below.pos = Vec2::new(0.0, 9.0);
        assert!(static_contact(&far_below, &ground).is_none());
    }

    #[test]
    fn response_reflects_with_restitution() {
        let floor = wall(1, Vec2::new(0.0, 3.0), 10.0, 0.5);
        let mut b = ball(2, 0.0, None);
        b.pos = Vec2::new(0.0, 1.75);
        b.velocity = Vec2::new(0.0, 10.0);
        let contact = static_contact(&b, &floor).unwrap();
        respond(&mut b, &contact, 0.5, 0.0);
        assert!((b.pos.y - 1.5).abs() < 1e-5);
        assert!((b.velocity.y + 5.0).abs() < 1e-4);
        assert_eq!(b.velocity.x, 0.0);
    }

    #[test]
    fn friction_slows_sliding() {
        let floor = wall(1, Vec2::new(0.0, 3.0), 10.0, 0.5);
        let mut b = ball(2, 0.0, None);
        b.pos = Vec2::new(0.0, 1.75);
        b.velocity = Vec2::new(4.0, 2.0);
        let contact = static_contact(&b, &floor).unwrap();
        respond(&mut b, &contact, 0.0, 0.5);
        assert!(b.velocity.y.abs() < 1e-4);
        assert!(b.velocity.x < 4.0 && b.velocity.x > 0.0);
    }

    #[test]
    fn linked_static_bodies_are_skipped() {
        let mut bodies = BTreeMap::new();
        let mut b = ball(1, 0.0, None);
        b.pos = Vec2::new(0.0, 1.75);
        bodies.insert(1, b);
        bodies.insert(2, wall(2, Vec2::new(0.0, 3.0), 10.0, 0.5));

        let mut linked = BTreeSet::new();
        linked.insert((1, 2));
        resolve_static(&mut bodies, &linked);
        assert_eq!(bodies[&1].pos, Vec2::new(0.0, 1.75));

        resolve_static(&mut bodies, &BTreeSet::new());
        assert!((bodies[&1].pos.y - 1.5).abs() < 1e-5);
    }
}
