use std::mem;

use crate::entities::{Entity, FrameEvent};
use crate::systems::physics::ContactPhase;

use super::{spawn, PerfTimer, Simulation};

/// One frame: physics, contact colors, spring, entity pass, spawning.
pub(super) fn tick(sim: &mut Simulation, frame: FrameEvent) {
    let perf_on = sim.perf_enabled;
    if perf_on {
        sim.perf_stats.reset();
    }
    let step_start = if perf_on { Some(PerfTimer::start()) } else { None };
    let mut lap = PerfTimer::start();

    let config = &sim.config;
    sim.ctx
        .physics
        .step(config.time_step, config.velocity_iterations, config.position_iterations);
    if perf_on {
        sim.perf_stats.physics_ms = lap.lap();
    }

    apply_contacts(sim);
    if perf_on {
        sim.perf_stats.contacts_ms = lap.lap();
    }

    let pointer = sim.pointer;
    sim.spring.update(&mut sim.ctx, pointer);
    if let Some(windmill) = &sim.windmill {
        windmill.update(&mut sim.ctx);
    }

    let retired = update_entities(sim, &frame);
    if perf_on {
        sim.perf_stats.entities_ms = lap.lap();
        sim.perf_stats.retired = retired;
    }

    let before = sim.entities.len();
    spawn::run_rules(sim, frame.count);
    if perf_on {
        sim.perf_stats.spawn_ms = lap.lap();
        sim.perf_stats.spawned = sim.entities.len().saturating_sub(before) as u32;
    }

    sim.fps.record(&frame);

    if let Some(t0) = step_start {
        let stats = &mut sim.perf_stats;
        stats.step_ms = t0.elapsed_ms();
        stats.entity_count = sim.entities.len() as u32;
        stats.body_count = sim.ctx.physics.body_count() as u32;
        stats.joint_count = sim.ctx.physics.joint_count() as u32;
        stats.node_count = sim.ctx.scene.node_count() as u32;
    }
}

/// Drain contact events. With color swapping on, each begin between two
/// distinct live entities exchanges their fills.
fn apply_contacts(sim: &mut Simulation) {
    let mut events = mem::take(&mut sim.contacts);
    events.clear();
    sim.ctx.physics.drain_contacts(&mut events);

    let mut swaps = 0;
    if sim.config.contact_color_swap {
        for event in events.iter().filter(|e| e.phase == ContactPhase::Begin && e.a != e.b) {
            let a = sim.entities.iter().position(|e| e.id().0 == event.a);
            let b = sim.entities.iter().position(|e| e.id().0 == event.b);
            let (Some(a), Some(b)) = (a, b) else {
                continue;
            };
            let fill_a = sim.entities[a].fill(&sim.ctx);
            let fill_b = sim.entities[b].fill(&sim.ctx);
            if let (Some(fill_a), Some(fill_b)) = (fill_a, fill_b) {
                sim.entities[a].set_fill(&mut sim.ctx, fill_b);
                sim.entities[b].set_fill(&mut sim.ctx, fill_a);
                swaps += 1;
            }
        }
    }
    if sim.perf_enabled {
        sim.perf_stats.contacts = events.len() as u32;
        sim.perf_stats.color_swaps = swaps;
    }
    sim.contacts = events;
}

/// Last to first: update, test, and retire in place. Removing index `i`
/// only shifts entries that were already visited this pass.
fn update_entities(sim: &mut Simulation, frame: &FrameEvent) -> u32 {
    let mut retired = 0;
    let mut i = sim.entities.len();
    while i > 0 {
        i -= 1;
        sim.entities[i].update(&mut sim.ctx, frame);
        if sim.entities[i].is_expired(&sim.ctx) {
            let entity = sim.entities.remove(i);
            retire(sim, entity);
            retired += 1;
        }
    }
    retired
}

/// Release an entity that has left the live list, dropping the spring first
/// when it holds this entity.
pub(super) fn retire(sim: &mut Simulation, mut entity: Box<dyn Entity>) {
    if sim.spring.target() == Some(entity.id()) {
        sim.spring.destroy(&mut sim.ctx);
    }
    entity.destroy(&mut sim.ctx);
    if sim.config.verbose {
        crate::console_log!("a {} is destroyed with id {}", entity.kind().name(), entity.id().0);
    }
}
