use crate::domain::geometry::Vec2;

use super::config::PointerMode;
use super::{spawn, Simulation};

pub(super) fn down(sim: &mut Simulation, at: Vec2) {
    sim.pointer = at;
    match sim.config.pointer.clone() {
        PointerMode::Spawn { mix, .. } => {
            spawn::spawn_from_mix(sim, &mix, at);
        }
        PointerMode::Spring => bind_spring(sim, at),
        PointerMode::ToggleMotor => {
            if let Some(windmill) = sim.windmill.as_mut() {
                windmill.toggle_motor(&mut sim.ctx);
            }
        }
        PointerMode::None => {}
    }
}

pub(super) fn moved(sim: &mut Simulation, at: Vec2) {
    sim.pointer = at;
}

pub(super) fn dragged(sim: &mut Simulation, at: Vec2) {
    sim.pointer = at;
    if let PointerMode::Spawn { mix, on_drag: true } = sim.config.pointer.clone() {
        spawn::spawn_from_mix(sim, &mix, at);
    }
}

pub(super) fn up(sim: &mut Simulation, at: Vec2) {
    sim.pointer = at;
    if matches!(sim.config.pointer, PointerMode::Spring) {
        sim.spring.destroy(&mut sim.ctx);
    }
}

/// Bind to the body under the pointer of the first live entity (in spawn order).
fn bind_spring(sim: &mut Simulation, at: Vec2) {
    let ctx = &sim.ctx;
    let hit = sim.entities.iter().find_map(|e| e.body_at(ctx, at).map(|body| (e.id(), body)));
    if let Some((target, body)) = hit {
        if !sim.spring.bind(&mut sim.ctx, at, target, body) {
            crate::console_warn!("spring bind failed for entity {}", target.0);
        }
    }
}
