//! Demo configuration
//!
//! Every demo is one `DemoConfig`: world settings, the geometry/material/motion
//! ranges its constructors sample from, the static scenery, spawn rules and
//! pointer behavior. Presets live in `presets.rs`; JS may override any
//! top-level field with a JSON document.

use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;
use crate::core::random::DemoRng;
use crate::core::units::{UnitBridge, DEFAULT_SCALE};
use crate::domain::geometry::Vec2;
use crate::domain::shapes::Material;
use crate::entities::{EntityKind, Lifespan, MarginRule};

/// Uniform float range `[min, max)`. `min == max` is a constant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub const fn fixed(value: f32) -> Self {
        Self { min: value, max: value }
    }

    #[inline]
    pub fn sample(&self, rng: &mut DemoRng) -> f32 {
        rng.range(self.min, self.max)
    }

    pub fn as_tuple(&self) -> (f32, f32) {
        (self.min, self.max)
    }

    fn check(&self, field: &'static str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(ConfigError::InvalidRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Integer range `[min, max)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Count {
    pub min: u32,
    pub max: u32,
}

impl Count {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut DemoRng) -> u32 {
        rng.range_int(self.min, self.max)
    }
}

/// Initial velocity ranges, simulation units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub velocity_x: Range,
    pub velocity_y: Range,
    pub spin: Range,
    /// Also spin round shapes (particles, creatures, pair parts).
    pub spin_round: bool,
}

impl MotionConfig {
    pub const STILL: MotionConfig = MotionConfig {
        velocity_x: Range::fixed(0.0),
        velocity_y: Range::fixed(0.0),
        spin: Range::fixed(0.0),
        spin_round: false,
    };
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            velocity_x: Range::new(-10.0, 10.0),
            velocity_y: Range::new(2.0, 10.0),
            spin: Range::new(-5.0, 5.0),
            spin_round: false,
        }
    }
}

/// Material with sampled friction and restitution.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialRange {
    pub density: f32,
    pub friction: Range,
    pub restitution: Range,
}

impl MaterialRange {
    pub const fn fixed(m: Material) -> Self {
        Self {
            density: m.density,
            friction: Range::fixed(m.friction),
            restitution: Range::fixed(m.restitution),
        }
    }

    pub fn sample(&self, rng: &mut DemoRng) -> Material {
        Material::new(self.density, self.friction.sample(rng), self.restitution.sample(rng))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub boxes: MaterialRange,
    pub particles: MaterialRange,
    pub polygons: MaterialRange,
    pub lollipops: MaterialRange,
    pub creatures: MaterialRange,
    pub pairs: MaterialRange,
}

impl MaterialConfig {
    pub fn for_kind(&self, kind: EntityKind) -> &MaterialRange {
        match kind {
            EntityKind::Box => &self.boxes,
            EntityKind::Particle => &self.particles,
            EntityKind::Polygon => &self.polygons,
            EntityKind::Lollipop => &self.lollipops,
            EntityKind::Creature => &self.creatures,
            EntityKind::Pair => &self.pairs,
        }
    }
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            boxes: MaterialRange::fixed(Material::SOLID),
            particles: MaterialRange::fixed(Material::BOUNCY),
            polygons: MaterialRange::fixed(Material::SOLID),
            lollipops: MaterialRange::fixed(Material::SOLID),
            creatures: MaterialRange::fixed(Material::BOUNCY),
            pairs: MaterialRange {
                density: 1.0,
                friction: Range::new(0.1, 0.5),
                restitution: Range::new(0.4, 0.8),
            },
        }
    }
}

/// Two particles on a soft distance joint.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairShape {
    pub radius: Range,
    /// Rest length, pixels.
    pub length: Range,
    pub frequency_hz: Range,
    pub damping_ratio: Range,
    /// Second particle's offset from the first, per axis, pixels.
    pub jitter: Range,
    /// Line width is `length / divisor`.
    pub line_divisor: Range,
    pub line_opacity: Range,
}

impl Default for PairShape {
    fn default() -> Self {
        Self {
            radius: Range::new(10.0, 20.0),
            length: Range::new(40.0, 60.0),
            frequency_hz: Range::new(2.0, 5.0),
            damping_ratio: Range::new(0.1, 0.5),
            jitter: Range::new(-1.0, 1.0),
            line_divisor: Range::new(10.0, 20.0),
            line_opacity: Range::new(0.2, 0.7),
        }
    }
}

/// Geometry ranges, pixels. Lollipop height and head are factors of its width.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeConfig {
    pub box_width: Range,
    pub box_height: Range,
    pub particle_radius: Range,
    pub polygon_radius: Range,
    pub polygon_sides: Count,
    /// Vertex distance as a factor of the polygon radius.
    pub polygon_spread: Range,
    pub lollipop_width: Range,
    pub lollipop_height: Range,
    pub lollipop_pop: Range,
    /// Factor applied to the creature preset radius.
    pub creature_scale: Range,
    pub pair: PairShape,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            box_width: Range::new(20.0, 40.0),
            box_height: Range::new(10.0, 30.0),
            particle_radius: Range::new(10.0, 20.0),
            polygon_radius: Range::new(10.0, 15.0),
            polygon_sides: Count::new(3, 14),
            polygon_spread: Range::new(1.0, 3.0),
            lollipop_width: Range::new(4.0, 16.0),
            lollipop_height: Range::new(2.0, 4.0),
            lollipop_pop: Range::new(0.8, 1.2),
            creature_scale: Range::new(0.8, 1.2),
            pair: PairShape::default(),
        }
    }
}

/// Static scenery built once at setup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneryLayout {
    #[default]
    None,
    /// Four walls around the viewport.
    Frame,
    /// Two ledges plus side walls.
    Ledges,
    /// Lower ledges plus side walls and a motorised windmill.
    Windmill,
    /// A rolling chain surface along the bottom.
    Surface,
}

/// One weighted choice in a spawn mix.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MixEntry {
    pub kind: EntityKind,
    pub weight: f32,
}

impl MixEntry {
    pub const fn new(kind: EntityKind, weight: f32) -> Self {
        Self { kind, weight }
    }
}

/// Weighted pick; `None` for an empty or all-zero mix.
pub fn pick(mix: &[MixEntry], rng: &mut DemoRng) -> Option<EntityKind> {
    let total: f32 = mix.iter().map(|m| m.weight.max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }
    let mut roll = rng.range(0.0, total);
    for entry in mix.iter().filter(|m| m.weight > 0.0) {
        if roll < entry.weight {
            return Some(entry.kind);
        }
        roll -= entry.weight;
    }
    mix.iter().rev().find(|m| m.weight > 0.0).map(|m| m.kind)
}

fn check_mix(mix: &[MixEntry], field: &'static str) -> Result<(), ConfigError> {
    if mix.iter().any(|m| m.weight > 0.0 && m.weight.is_finite()) {
        Ok(())
    } else {
        Err(ConfigError::EmptyMix(field))
    }
}

/// Where spawned items appear: fractions of the viewport plus a pixel offset.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnArea {
    pub x: Range,
    pub y: Range,
    pub offset: Vec2,
}

impl SpawnArea {
    pub const fn point(fx: f32, fy: f32, offset: Vec2) -> Self {
        Self {
            x: Range::fixed(fx),
            y: Range::fixed(fy),
            offset,
        }
    }

    pub fn sample(&self, rng: &mut DemoRng, width: f32, height: f32) -> Vec2 {
        let x = self.x.sample(rng) * width;
        let y = self.y.sample(rng) * height;
        Vec2::new(x, y) + self.offset
    }
}

impl Default for SpawnArea {
    fn default() -> Self {
        Self {
            x: Range::new(0.125, 0.875),
            y: Range::new(0.125, 0.875),
            offset: Vec2::zero(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "trigger", rename_all = "snake_case")]
pub enum SpawnTrigger {
    /// Roll once per frame.
    Chance { probability: f32 },
    /// Every `every` frames.
    Periodic { every: u32 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnRule {
    #[serde(flatten)]
    pub trigger: SpawnTrigger,
    pub area: SpawnArea,
    pub mix: Vec<MixEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PointerMode {
    #[default]
    None,
    /// Spawn one item from `mix` at the pointer on press (and drag, if set).
    Spawn { mix: Vec<MixEntry>, on_drag: bool },
    /// Press binds a spring to the first item under the pointer; release drops it.
    Spring,
    /// Press flips the windmill motor.
    ToggleMotor,
}

/// Items created at setup.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialPopulation {
    pub count: u32,
    pub mix: Vec<MixEntry>,
    pub area: SpawnArea,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Pixels per simulation unit.
    pub scale: f32,
    pub gravity: bool,
    /// Seconds per physics step.
    pub time_step: f32,
    pub velocity_iterations: u32,
    pub position_iterations: u32,
    /// Fixed RNG seed; `None` seeds from the host.
    pub seed: Option<u64>,
    pub lifespan: Lifespan,
    pub margin: MarginRule,
    /// Lowest value of each random color channel.
    pub color_floor: f32,
    pub motion: MotionConfig,
    pub shapes: ShapeConfig,
    pub materials: MaterialConfig,
    pub scenery: SceneryLayout,
    pub spawn: Vec<SpawnRule>,
    pub pointer: PointerMode,
    pub initial: InitialPopulation,
    /// Tag bodies and swap fill colors on contact begin.
    pub contact_color_swap: bool,
    /// Log entity creation and retirement.
    pub verbose: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            gravity: true,
            time_step: 1.0 / 60.0,
            velocity_iterations: 10,
            position_iterations: 10,
            seed: None,
            lifespan: Lifespan::default(),
            margin: MarginRule::PerShape,
            color_floor: 0.0,
            motion: MotionConfig::default(),
            shapes: ShapeConfig::default(),
            materials: MaterialConfig::default(),
            scenery: SceneryLayout::None,
            spawn: Vec::new(),
            pointer: PointerMode::None,
            initial: InitialPopulation::default(),
            contact_color_swap: false,
            verbose: false,
        }
    }
}

impl DemoConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: DemoConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace top-level fields with those present in `json` (a JSON object).
    pub fn with_overrides(&self, json: &str) -> Result<Self, ConfigError> {
        let overrides: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Object(overrides) = overrides else {
            return Err(ConfigError::Parse("overrides must be a JSON object".to_string()));
        };
        let mut base = serde_json::to_value(self)?;
        if let serde_json::Value::Object(fields) = &mut base {
            for (key, value) in overrides {
                fields.insert(key, value);
            }
        }
        let config: DemoConfig = serde_json::from_value(base)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        UnitBridge::new(self.scale)?;
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(ConfigError::InvalidTimeStep(self.time_step));
        }
        if self.velocity_iterations == 0 || self.position_iterations == 0 {
            return Err(ConfigError::InvalidIterations {
                velocity: self.velocity_iterations,
                position: self.position_iterations,
            });
        }
        // Jitter may not exceed the lifespan.
        if self.lifespan.jitter > self.lifespan.max {
            return Err(ConfigError::InvalidRange {
                field: "lifespan.jitter",
                min: self.lifespan.jitter as f32,
                max: self.lifespan.max as f32,
            });
        }
        if !(0.0..=1.0).contains(&self.color_floor) {
            return Err(ConfigError::InvalidRange {
                field: "color_floor",
                min: self.color_floor,
                max: 1.0,
            });
        }

        let m = &self.motion;
        m.velocity_x.check("motion.velocity_x")?;
        m.velocity_y.check("motion.velocity_y")?;
        m.spin.check("motion.spin")?;

        let s = &self.shapes;
        let positive = [
            (s.box_width, "shapes.box_width"),
            (s.box_height, "shapes.box_height"),
            (s.particle_radius, "shapes.particle_radius"),
            (s.polygon_radius, "shapes.polygon_radius"),
            (s.polygon_spread, "shapes.polygon_spread"),
            (s.lollipop_width, "shapes.lollipop_width"),
            (s.lollipop_height, "shapes.lollipop_height"),
            (s.lollipop_pop, "shapes.lollipop_pop"),
            (s.creature_scale, "shapes.creature_scale"),
            (s.pair.radius, "shapes.pair.radius"),
            (s.pair.length, "shapes.pair.length"),
            (s.pair.line_divisor, "shapes.pair.line_divisor"),
        ];
        for (range, field) in positive {
            range.check(field)?;
            if range.min <= 0.0 {
                return Err(ConfigError::InvalidRange {
                    field,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        s.pair.frequency_hz.check("shapes.pair.frequency_hz")?;
        s.pair.damping_ratio.check("shapes.pair.damping_ratio")?;
        s.pair.jitter.check("shapes.pair.jitter")?;
        s.pair.line_opacity.check("shapes.pair.line_opacity")?;

        for rule in self.spawn.iter() {
            check_mix(&rule.mix, "spawn")?;
            rule.area.x.check("spawn.area.x")?;
            rule.area.y.check("spawn.area.y")?;
        }
        if let PointerMode::Spawn { mix, .. } = &self.pointer {
            check_mix(mix, "pointer")?;
        }
        if self.initial.count > 0 {
            check_mix(&self.initial.mix, "initial")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(DemoConfig::default().validate(), Ok(()));
    }

    #[test]
    fn bad_scale_and_step_are_rejected() {
        let mut config = DemoConfig::default();
        config.scale = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidScale(0.0)));

        let mut config = DemoConfig::default();
        config.time_step = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTimeStep(_))));

        let mut config = DemoConfig::default();
        config.position_iterations = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidIterations { .. })));
    }

    #[test]
    fn jitter_past_the_lifespan_is_rejected() {
        let mut config = DemoConfig::default();
        config.lifespan.jitter = u32::MAX;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange { field: "lifespan.jitter", .. })
        ));

        config.lifespan.jitter = config.lifespan.max;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut config = DemoConfig::default();
        config.shapes.box_width = Range::new(30.0, 10.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange { field: "shapes.box_width", .. })
        ));
    }

    #[test]
    fn spawn_rule_needs_a_weighted_kind() {
        let mut config = DemoConfig::default();
        config.spawn.push(SpawnRule {
            trigger: SpawnTrigger::Chance { probability: 0.1 },
            area: SpawnArea::default(),
            mix: vec![MixEntry::new(EntityKind::Box, 0.0)],
        });
        assert_eq!(config.validate(), Err(ConfigError::EmptyMix("spawn")));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = DemoConfig::from_json(r#"{ "scale": 20, "gravity": false }"#).unwrap();
        assert_eq!(config.scale, 20.0);
        assert!(!config.gravity);
        assert_eq!(config.velocity_iterations, 10);
        assert_eq!(config.shapes, ShapeConfig::default());
    }

    #[test]
    fn tagged_enums_parse() {
        let json = r#"{
            "scenery": "ledges",
            "pointer": { "mode": "spawn", "mix": [{ "kind": "lollipop", "weight": 1 }], "on_drag": true },
            "spawn": [{ "trigger": "chance", "probability": 0.05,
                        "area": { "x": { "min": 0.5, "max": 0.5 }, "y": { "min": 0, "max": 0 } },
                        "mix": [{ "kind": "box", "weight": 1 }] }]
        }"#;
        let config = DemoConfig::from_json(json).unwrap();
        assert_eq!(config.scenery, SceneryLayout::Ledges);
        assert!(matches!(config.pointer, PointerMode::Spawn { on_drag: true, .. }));
        assert_eq!(config.spawn[0].trigger, SpawnTrigger::Chance { probability: 0.05 });
    }

    #[test]
    fn overrides_replace_only_named_fields() {
        let base = DemoConfig {
            contact_color_swap: true,
            ..DemoConfig::default()
        };
        let merged = base.with_overrides(r#"{ "verbose": true }"#).unwrap();
        assert!(merged.verbose);
        assert!(merged.contact_color_swap);
        assert!(base.with_overrides("[1, 2]").is_err());
        assert!(base.with_overrides(r#"{ "scale": -2 }"#).is_err());
    }

    #[test]
    fn pick_respects_weights() {
        let mut rng = DemoRng::new(11);
        let mix = [MixEntry::new(EntityKind::Box, 0.0), MixEntry::new(EntityKind::Particle, 1.0)];
        for _ in 0..50 {
            assert_eq!(pick(&mix, &mut rng), Some(EntityKind::Particle));
        }
        assert_eq!(pick(&[], &mut rng), None);
    }
}
