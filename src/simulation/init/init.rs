use crate::core::error::DemoError;
use crate::core::random::DemoRng;
use crate::core::units::WorldSettings;
use crate::entities::{Boundary, Spring, Surface, Windmill};
use crate::systems::physics::ContactEvent;

use super::config::{DemoConfig, SceneryLayout};
use super::{spawn, FpsMeter, PerfStats, SimContext, Simulation, Viewport};

pub(super) fn create_simulation(config: DemoConfig, viewport: Viewport) -> Result<Simulation, DemoError> {
    config.validate()?;
    let settings = WorldSettings::configure(config.scale, config.gravity)?;
    let rng = match config.seed {
        Some(seed) => DemoRng::new(seed),
        None => DemoRng::from_host(),
    };
    Ok(assemble(config, SimContext::new(settings, viewport, rng)))
}

/// Wrap an existing context, build scenery and seed the initial population.
pub(super) fn assemble(config: DemoConfig, ctx: SimContext) -> Simulation {
    let mut sim = Simulation {
        ctx,
        config,
        entities: Vec::new(),
        boundaries: Vec::new(),
        surface: None,
        windmill: None,
        spring: Spring::new(),
        pointer: Default::default(),
        contacts: Vec::<ContactEvent>::new(),
        next_id: 0,
        frame: 0,
        start: 0.0,
        time: 0.0,
        perf_enabled: false,
        perf_stats: PerfStats::default(),
        fps: FpsMeter::new(),
    };
    build_scenery(&mut sim);
    spawn::populate(&mut sim);
    if sim.config.verbose {
        crate::console_log!(
            "demo ready: {}x{} px, {} entities",
            sim.ctx.viewport.width,
            sim.ctx.viewport.height,
            sim.entities.len()
        );
    }
    sim
}

fn build_scenery(sim: &mut Simulation) {
    let (w, h) = (sim.ctx.viewport.width, sim.ctx.viewport.height);
    let floor = sim.config.color_floor;
    let walls = [(w - 5.0, h / 2.0, 10.0, h), (5.0, h / 2.0, 10.0, h)];
    let rects: Vec<(f32, f32, f32, f32)> = match sim.config.scenery {
        SceneryLayout::None | SceneryLayout::Surface => Vec::new(),
        SceneryLayout::Frame => {
            let mut r = vec![(w / 2.0, h - 5.0, w, 10.0), (w / 2.0, 5.0, w, 10.0)];
            r.extend(walls);
            r
        }
        SceneryLayout::Ledges => {
            let mut r = vec![
                (3.0 * w / 8.0, h * 7.0 / 8.0, w / 3.0, 10.0),
                (5.0 * w / 8.0, h / 2.0, w / 3.0, 20.0),
            ];
            r.extend(walls);
            r
        }
        SceneryLayout::Windmill => {
            let mut r = vec![
                (3.0 * w / 8.0, h * 7.0 / 8.0, w / 3.0, 10.0),
                (5.0 * w / 8.0, 3.0 * h / 4.0, w / 3.0, 20.0),
            ];
            r.extend(walls);
            r
        }
    };

    if sim.config.scenery == SceneryLayout::Windmill {
        let at = sim.ctx.viewport.at(0.5, 1.0 / 3.0);
        sim.windmill = Some(Windmill::new(&mut sim.ctx, at));
    }
    for (x, y, bw, bh) in rects {
        let fill = sim.ctx.rng.color(floor);
        let at = crate::domain::geometry::Vec2::new(x, y);
        sim.boundaries.push(Boundary::new(&mut sim.ctx, at, bw, bh, fill));
    }
    if sim.config.scenery == SceneryLayout::Surface {
        let fill = sim.ctx.rng.color(floor);
        sim.surface = Some(Surface::new(&mut sim.ctx, fill));
    }
}
