use crate::domain::geometry::Vec2;
use crate::entities::{
    Blueprint, BoxEntity, BoxSpec, CreatureEntity, CreaturePreset, CreatureSpec, Entity, EntityId,
    EntityKind, Launch, LollipopEntity, LollipopSpec, PairEntity, PairSpec, ParticleEntity,
    ParticleSpec, PartSpec, PolygonEntity, PolygonSpec,
};

use super::config::{pick, DemoConfig, MixEntry, SpawnTrigger};
use super::{SimContext, Simulation};

fn is_round(kind: EntityKind) -> bool {
    matches!(kind, EntityKind::Particle | EntityKind::Creature | EntityKind::Pair)
}

fn launch(ctx: &mut SimContext, config: &DemoConfig, kind: EntityKind) -> Launch {
    let m = &config.motion;
    let velocity = Vec2::new(m.velocity_x.sample(&mut ctx.rng), m.velocity_y.sample(&mut ctx.rng));
    let spin = if is_round(kind) && !m.spin_round {
        0.0
    } else {
        m.spin.sample(&mut ctx.rng)
    };
    Launch { velocity, spin }
}

pub(super) fn blueprint(ctx: &mut SimContext, config: &DemoConfig, id: EntityId, kind: EntityKind) -> Blueprint {
    Blueprint {
        id,
        launch: launch(ctx, config, kind),
        lifespan: config.lifespan,
        margin: config.margin,
        material: config.materials.for_kind(kind).sample(&mut ctx.rng),
        color_floor: config.color_floor,
        tagged: config.contact_color_swap,
    }
}

fn part_spec(ctx: &mut SimContext, config: &DemoConfig, offset: Vec2) -> PartSpec {
    PartSpec {
        radius: config.shapes.pair.radius.sample(&mut ctx.rng),
        offset,
        material: config.materials.pairs.sample(&mut ctx.rng),
        launch: launch(ctx, config, EntityKind::Pair),
    }
}

fn pair_spec(ctx: &mut SimContext, config: &DemoConfig) -> PairSpec {
    let shape = config.shapes.pair;
    let length = shape.length.sample(&mut ctx.rng);
    let jitter = Vec2::new(shape.jitter.sample(&mut ctx.rng), shape.jitter.sample(&mut ctx.rng));
    let parts = [part_spec(ctx, config, Vec2::zero()), part_spec(ctx, config, jitter)];
    PairSpec {
        length,
        frequency_hz: shape.frequency_hz.sample(&mut ctx.rng),
        damping_ratio: shape.damping_ratio.sample(&mut ctx.rng),
        parts,
        line_width: length / shape.line_divisor.sample(&mut ctx.rng),
        line_opacity: shape.line_opacity.sample(&mut ctx.rng),
    }
}

/// Sample geometry for `kind` and construct it at a pixel point.
pub(super) fn build(
    ctx: &mut SimContext,
    config: &DemoConfig,
    blueprint: &Blueprint,
    kind: EntityKind,
    at: Vec2,
) -> Box<dyn Entity> {
    let s = &config.shapes;
    match kind {
        EntityKind::Box => {
            let spec = BoxSpec {
                width: s.box_width.sample(&mut ctx.rng),
                height: s.box_height.sample(&mut ctx.rng),
            };
            Box::new(BoxEntity::new(ctx, blueprint, at, spec))
        }
        EntityKind::Particle => {
            let spec = ParticleSpec {
                radius: s.particle_radius.sample(&mut ctx.rng),
            };
            Box::new(ParticleEntity::new(ctx, blueprint, at, spec))
        }
        EntityKind::Polygon => {
            let radius = s.polygon_radius.sample(&mut ctx.rng);
            let sides = s.polygon_sides.sample(&mut ctx.rng);
            let spec = PolygonSpec::sample(&mut ctx.rng, radius, sides, s.polygon_spread.as_tuple());
            Box::new(PolygonEntity::new(ctx, blueprint, at, &spec))
        }
        EntityKind::Lollipop => {
            let width = s.lollipop_width.sample(&mut ctx.rng);
            let spec = LollipopSpec {
                width,
                height: width * s.lollipop_height.sample(&mut ctx.rng),
                pop_radius: width * s.lollipop_pop.sample(&mut ctx.rng),
            };
            Box::new(LollipopEntity::new(ctx, blueprint, at, spec))
        }
        EntityKind::Creature => {
            let preset = if ctx.rng.chance(0.5) {
                CreaturePreset::Food
            } else {
                CreaturePreset::Hunter
            };
            let spec = CreatureSpec::sample(&mut ctx.rng, preset, s.creature_scale.as_tuple());
            Box::new(CreatureEntity::new(ctx, blueprint, at, spec))
        }
        EntityKind::Pair => {
            let spec = pair_spec(ctx, config);
            Box::new(PairEntity::new(ctx, blueprint, at, &spec))
        }
    }
}

/// Create one entity of `kind` at a pixel point and add it to the live list.
pub(super) fn spawn_at(sim: &mut Simulation, kind: EntityKind, at: Vec2) -> EntityId {
    let id = sim.allocate_id();
    let blueprint = blueprint(&mut sim.ctx, &sim.config, id, kind);
    let entity = build(&mut sim.ctx, &sim.config, &blueprint, kind, at);
    if sim.config.verbose {
        crate::console_log!("a {} is created with id {}", kind.name(), id.0);
    }
    sim.entities.push(entity);
    id
}

pub(super) fn spawn_from_mix(sim: &mut Simulation, mix: &[MixEntry], at: Vec2) -> Option<EntityId> {
    let kind = pick(mix, &mut sim.ctx.rng)?;
    Some(spawn_at(sim, kind, at))
}

/// Run every spawn rule once for this frame.
pub(super) fn run_rules(sim: &mut Simulation, count: u64) {
    for index in 0..sim.config.spawn.len() {
        let rule = sim.config.spawn[index].clone();
        let fire = match rule.trigger {
            SpawnTrigger::Chance { probability } => sim.ctx.rng.chance(probability),
            SpawnTrigger::Periodic { every } => every > 0 && count % every as u64 == 0,
        };
        if fire {
            let viewport = sim.ctx.viewport;
            let at = rule.area.sample(&mut sim.ctx.rng, viewport.width, viewport.height);
            spawn_from_mix(sim, &rule.mix, at);
        }
    }
}

/// Seed the initial population.
pub(super) fn populate(sim: &mut Simulation) {
    let initial = sim.config.initial.clone();
    for _ in 0..initial.count {
        let viewport = sim.ctx.viewport;
        let at = initial.area.sample(&mut sim.ctx.rng, viewport.width, viewport.height);
        spawn_from_mix(sim, &initial.mix, at);
    }
}
