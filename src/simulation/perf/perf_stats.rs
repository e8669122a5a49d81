use wasm_bindgen::prelude::*;

/// Per-tick timings and counts. Zeros while perf metrics are disabled.
#[wasm_bindgen]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PerfStats {
    pub(super) step_ms: f64,
    pub(super) physics_ms: f64,
    pub(super) contacts_ms: f64,
    pub(super) entities_ms: f64,
    pub(super) spawn_ms: f64,
    pub(super) entity_count: u32,
    pub(super) body_count: u32,
    pub(super) joint_count: u32,
    pub(super) node_count: u32,
    pub(super) contacts: u32,
    pub(super) color_swaps: u32,
    pub(super) spawned: u32,
    pub(super) retired: u32,
}

impl PerfStats {
    pub(crate) fn reset(&mut self) {
        *self = PerfStats::default();
    }
}

#[wasm_bindgen]
impl PerfStats {
    #[wasm_bindgen(getter)]
    pub fn step_ms(&self) -> f64 { self.step_ms }
    #[wasm_bindgen(getter)]
    pub fn physics_ms(&self) -> f64 { self.physics_ms }
    #[wasm_bindgen(getter)]
    pub fn contacts_ms(&self) -> f64 { self.contacts_ms }
    #[wasm_bindgen(getter)]
    pub fn entities_ms(&self) -> f64 { self.entities_ms }
    #[wasm_bindgen(getter)]
    pub fn spawn_ms(&self) -> f64 { self.spawn_ms }
    #[wasm_bindgen(getter)]
    pub fn entity_count(&self) -> u32 { self.entity_count }
    #[wasm_bindgen(getter)]
    pub fn body_count(&self) -> u32 { self.body_count }
    #[wasm_bindgen(getter)]
    pub fn joint_count(&self) -> u32 { self.joint_count }
    #[wasm_bindgen(getter)]
    pub fn node_count(&self) -> u32 { self.node_count }
    #[wasm_bindgen(getter)]
    pub fn contacts(&self) -> u32 { self.contacts }
    #[wasm_bindgen(getter)]
    pub fn color_swaps(&self) -> u32 { self.color_swaps }
    #[wasm_bindgen(getter)]
    pub fn spawned(&self) -> u32 { self.spawned }
    #[wasm_bindgen(getter)]
    pub fn retired(&self) -> u32 { self.retired }
}
