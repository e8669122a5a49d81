//! Frame driver: owns the session context, the live entities and the static
//! scenery, and advances them one tick at a time.
//!
//! Setup lives in init/, the per-frame pass in step/, pointer dispatch in
//! input/, demo configuration in config/. The wasm facade wraps [`Simulation`]
//! for the browser.

use crate::core::error::{ConfigError, DemoError};
use crate::domain::geometry::Vec2;
use crate::entities::{Boundary, Entity, EntityId, EntityKind, FrameEvent, Spring, Surface, Windmill};
use crate::systems::physics::ContactEvent;

#[path = "context/context.rs"]
mod context;
#[path = "config/config.rs"]
mod config;
#[path = "config/presets.rs"]
mod presets;
#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/perf_stats.rs"]
mod perf_stats;
#[path = "perf/fps.rs"]
mod fps;
#[path = "spawn/spawn.rs"]
mod spawn;
#[path = "step/step.rs"]
mod step;
#[path = "input/pointer.rs"]
mod pointer;
#[path = "init/init.rs"]
mod init;
mod facade;

pub use config::{
    pick, Count, DemoConfig, InitialPopulation, MaterialConfig, MaterialRange, MixEntry, MotionConfig,
    PairShape, PointerMode, Range, SceneryLayout, ShapeConfig, SpawnArea, SpawnRule, SpawnTrigger,
};
pub use context::{SimContext, Viewport};
pub use facade::{preset_config_json, Demo};
pub use fps::FpsMeter;
pub use perf_stats::PerfStats;
pub use presets::DemoKind;

use perf_timer::PerfTimer;

/// A running demo session.
pub struct Simulation {
    ctx: SimContext,
    config: DemoConfig,
    entities: Vec<Box<dyn Entity>>,
    boundaries: Vec<Boundary>,
    surface: Option<Surface>,
    windmill: Option<Windmill>,
    spring: Spring,
    /// Last pointer position, pixels.
    pointer: Vec2,
    /// Reused buffer for drained contact events.
    contacts: Vec<ContactEvent>,
    next_id: u32,
    frame: u64,
    /// Host clock at frame 0; frame times are measured from it.
    start: f64,
    time: f64,

    // Perf metrics
    perf_enabled: bool,
    perf_stats: PerfStats,
    fps: FpsMeter,
}

impl Simulation {
    /// Start a bundled demo on a `width` x `height` pixel canvas.
    pub fn new(kind: DemoKind, width: f32, height: f32) -> Result<Self, DemoError> {
        Self::from_config(kind.config(), Viewport::new(width, height)?)
    }

    pub fn from_config(config: DemoConfig, viewport: Viewport) -> Result<Self, DemoError> {
        init::create_simulation(config, viewport)
    }

    /// Build over a caller-supplied context (custom backends, fixed rng).
    pub fn with_context(config: DemoConfig, ctx: SimContext) -> Result<Self, DemoError> {
        config.validate()?;
        Ok(init::assemble(config, ctx))
    }

    /// Advance one frame; `time` is the host clock in seconds.
    pub fn step(&mut self, time: f64) {
        if self.frame == 0 {
            self.start = time;
        }
        let time = time - self.start;
        let delta = if self.frame == 0 { 0.0 } else { time - self.time };
        let frame = FrameEvent {
            time,
            count: self.frame,
            delta,
        };
        self.time = time;
        step::tick(self, frame);
        self.frame += 1;
    }

    /// Advance one frame on the simulation clock (`time_step` per frame).
    pub fn advance(&mut self) {
        let time = if self.frame == 0 {
            0.0
        } else {
            self.time + self.config.time_step as f64
        };
        self.step(time);
    }

    pub fn spawn(&mut self, kind: EntityKind, at: Vec2) -> EntityId {
        spawn::spawn_at(self, kind, at)
    }

    /// Take ownership of an entity built outside the spawn rules.
    pub fn adopt(&mut self, entity: Box<dyn Entity>) {
        self.entities.push(entity);
    }

    /// Next free entity id. Ids are never reused within a session.
    pub fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn pointer_down(&mut self, at: Vec2) {
        pointer::down(self, at);
    }

    pub fn pointer_move(&mut self, at: Vec2) {
        pointer::moved(self, at);
    }

    pub fn pointer_drag(&mut self, at: Vec2) {
        pointer::dragged(self, at);
    }

    pub fn pointer_up(&mut self, at: Vec2) {
        pointer::up(self, at);
    }

    pub fn ctx(&self) -> &SimContext { &self.ctx }

    pub fn ctx_mut(&mut self) -> &mut SimContext { &mut self.ctx }

    pub fn config(&self) -> &DemoConfig { &self.config }

    pub fn entities(&self) -> &[Box<dyn Entity>] { &self.entities }

    pub fn entity_count(&self) -> usize { self.entities.len() }

    pub fn boundaries(&self) -> &[Boundary] { &self.boundaries }

    pub fn surface(&self) -> Option<&Surface> { self.surface.as_ref() }

    pub fn windmill(&self) -> Option<&Windmill> { self.windmill.as_ref() }

    pub fn spring(&self) -> &Spring { &self.spring }

    pub fn frame(&self) -> u64 { self.frame }

    /// Seconds since the first frame.
    pub fn time(&self) -> f64 { self.time }

    pub fn fps(&self) -> f64 { self.fps.fps() }

    pub fn windmill_motor_on(&self) -> bool {
        self.windmill.as_ref().map_or(false, |w| w.motor_on(&self.ctx))
    }

    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.perf_enabled = enabled;
        if !enabled {
            self.perf_stats.reset();
        }
    }

    pub fn get_perf_stats(&self) -> PerfStats {
        self.perf_stats.clone()
    }

    /// Paint-ordered scene snapshot as JSON.
    pub fn scene_json(&self) -> Result<String, DemoError> {
        let snapshot = self.ctx.scene.snapshot();
        Ok(serde_json::to_string(&snapshot).map_err(ConfigError::from)?)
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
