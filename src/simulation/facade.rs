use wasm_bindgen::prelude::*;

use crate::domain::geometry::Vec2;

use super::perf_stats::PerfStats;
use super::{DemoConfig, DemoKind, Simulation, Viewport};

fn to_js<E: std::fmt::Display>(e: E) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct Demo {
    core: Simulation,
}

#[wasm_bindgen]
impl Demo {
    /// Start a bundled demo by numeric id on a canvas of the given size.
    #[wasm_bindgen(constructor)]
    pub fn new(kind: u8, width: f32, height: f32) -> Result<Demo, JsValue> {
        let kind = DemoKind::from_id(kind).map_err(to_js)?;
        let core = Simulation::new(kind, width, height).map_err(to_js)?;
        Ok(Self { core })
    }

    /// Start from a full JSON `DemoConfig`.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(json: &str, width: f32, height: f32) -> Result<Demo, JsValue> {
        let config = DemoConfig::from_json(json).map_err(to_js)?;
        let viewport = Viewport::new(width, height).map_err(to_js)?;
        let core = Simulation::from_config(config, viewport).map_err(to_js)?;
        Ok(Self { core })
    }

    /// Start a bundled demo with top-level fields replaced from a JSON object.
    #[wasm_bindgen(js_name = withOverrides)]
    pub fn with_overrides(kind: u8, json: &str, width: f32, height: f32) -> Result<Demo, JsValue> {
        let kind = DemoKind::from_id(kind).map_err(to_js)?;
        let config = kind.config().with_overrides(json).map_err(to_js)?;
        let viewport = Viewport::new(width, height).map_err(to_js)?;
        let core = Simulation::from_config(config, viewport).map_err(to_js)?;
        Ok(Self { core })
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> f32 { self.core.ctx().viewport.width }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> f32 { self.core.ctx().viewport.height }

    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> u64 { self.core.frame() }

    #[wasm_bindgen(getter)]
    pub fn entity_count(&self) -> u32 { self.core.entity_count() as u32 }

    #[wasm_bindgen(getter)]
    pub fn fps(&self) -> f64 { self.core.fps() }

    #[wasm_bindgen(getter)]
    pub fn motor_on(&self) -> bool { self.core.windmill_motor_on() }

    #[wasm_bindgen(getter)]
    pub fn spring_active(&self) -> bool { self.core.spring().is_active() }

    /// Advance one frame. `time_ms` is the animation-frame timestamp.
    pub fn step(&mut self, time_ms: f64) {
        self.core.step(time_ms / 1000.0);
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.core.pointer_down(Vec2::new(x, y));
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.core.pointer_move(Vec2::new(x, y));
    }

    pub fn pointer_drag(&mut self, x: f32, y: f32) {
        self.core.pointer_drag(Vec2::new(x, y));
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) {
        self.core.pointer_up(Vec2::new(x, y));
    }

    /// Paint-ordered scene nodes for the JS painter.
    pub fn scene_json(&self) -> Result<String, JsValue> {
        self.core.scene_json().map_err(to_js)
    }

    /// Enable or disable per-step perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.core.enable_perf_metrics(enabled);
    }

    /// Get last step perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        self.core.get_perf_stats()
    }
}

/// Bundled preset as JSON, a starting point for `withConfig`.
#[wasm_bindgen]
pub fn preset_config_json(kind: u8) -> Result<String, JsValue> {
    let kind = DemoKind::from_id(kind).map_err(to_js)?;
    kind.config().to_json().map_err(to_js)
}
