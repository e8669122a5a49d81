//! Tumble Engine - physics/scene glue for the canvas demos, in WASM
//!
//! Architecture:
//! - core/        - logging, errors, seeded randomness, unit bridge
//! - domain/      - plain geometry, colors and body/joint descriptions
//! - systems/     - physics world and scene graph traits plus in-crate backends
//! - entities/    - body + node pairs with a shared lifecycle
//! - simulation/  - frame driver, demo presets, wasm facade

// Log macros are exported from here, so core comes first.
#[macro_use]
pub mod core;
pub mod domain;
pub mod systems;
pub mod entities;
pub mod simulation;

use wasm_bindgen::prelude::*;

pub use crate::core::error::{ConfigError, DemoError};
pub use crate::core::units::{UnitBridge, WorldSettings};
pub use entities::{Entity, EntityId, EntityKind, FrameEvent};
pub use simulation::{Demo, DemoConfig, DemoKind, SimContext, Simulation, Viewport};

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    console_log!("Tumble engine {} initialized", env!("CARGO_PKG_VERSION"));
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Export demo ids for JS
#[wasm_bindgen]
pub fn demo_intro() -> u8 { DemoKind::Intro.id() }
#[wasm_bindgen]
pub fn demo_falling() -> u8 { DemoKind::Falling.id() }
#[wasm_bindgen]
pub fn demo_boundaries() -> u8 { DemoKind::Boundaries.id() }
#[wasm_bindgen]
pub fn demo_polygons() -> u8 { DemoKind::Polygons.id() }
#[wasm_bindgen]
pub fn demo_multishape() -> u8 { DemoKind::Multishape.id() }
#[wasm_bindgen]
pub fn demo_spring_pairs() -> u8 { DemoKind::SpringPairs.id() }
#[wasm_bindgen]
pub fn demo_windmill() -> u8 { DemoKind::Windmill.id() }
#[wasm_bindgen]
pub fn demo_mouse_springs() -> u8 { DemoKind::MouseSprings.id() }
