use serde::{Deserialize, Serialize};

use crate::core::error::DemoError;
use crate::domain::geometry::Vec2;
use crate::domain::shapes::Material;
use crate::entities::{EntityKind, Lifespan, MarginRule};

use super::config::{
    Count, DemoConfig, InitialPopulation, MaterialRange, MixEntry, MotionConfig, PointerMode, Range,
    SceneryLayout, SpawnArea, SpawnRule, SpawnTrigger,
};

/// The bundled demos. Numeric ids are what the page passes in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoKind {
    Intro = 0,
    Falling = 1,
    Boundaries = 3,
    Polygons = 4,
    Multishape = 5,
    SpringPairs = 6,
    Windmill = 7,
    MouseSprings = 8,
}

/// Top-center drop point used by the falling demos.
const DROP_POINT: SpawnArea = SpawnArea::point(0.5, 0.0, Vec2::new(0.0, 30.0));

const FULL_MOTION: MotionConfig = MotionConfig {
    velocity_x: Range::new(-10.0, 10.0),
    velocity_y: Range::new(-10.0, 10.0),
    spin: Range::new(-5.0, 5.0),
    spin_round: true,
};

const NO_AGING: Lifespan = Lifespan {
    max: 200,
    jitter: 1,
    aging: false,
    fade_every: None,
};

fn only(kind: EntityKind) -> Vec<MixEntry> {
    vec![MixEntry::new(kind, 1.0)]
}

fn even(kinds: &[EntityKind]) -> Vec<MixEntry> {
    kinds.iter().map(|k| MixEntry::new(*k, 1.0)).collect()
}

impl DemoKind {
    pub const ALL: [DemoKind; 8] = [
        DemoKind::Intro,
        DemoKind::Falling,
        DemoKind::Boundaries,
        DemoKind::Polygons,
        DemoKind::Multishape,
        DemoKind::SpringPairs,
        DemoKind::Windmill,
        DemoKind::MouseSprings,
    ];

    pub fn from_id(id: u8) -> Result<Self, DemoError> {
        DemoKind::ALL
            .iter()
            .copied()
            .find(|k| k.id() == id)
            .ok_or(DemoError::UnknownDemo(id))
    }

    #[inline]
    pub fn id(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            DemoKind::Intro => "intro",
            DemoKind::Falling => "falling",
            DemoKind::Boundaries => "boundaries",
            DemoKind::Polygons => "polygons",
            DemoKind::Multishape => "multishape",
            DemoKind::SpringPairs => "spring_pairs",
            DemoKind::Windmill => "windmill",
            DemoKind::MouseSprings => "mouse_springs",
        }
    }

    pub fn config(&self) -> DemoConfig {
        let base = DemoConfig::default();
        match self {
            // Floating boxes, particles and creatures; drag them around on springs.
            DemoKind::Intro => {
                let mut c = DemoConfig {
                    gravity: false,
                    lifespan: NO_AGING,
                    margin: MarginRule::EnclosingRadius { factor: 2.0 },
                    color_floor: 0.5,
                    motion: FULL_MOTION,
                    scenery: SceneryLayout::Frame,
                    pointer: PointerMode::Spring,
                    initial: InitialPopulation {
                        count: 20,
                        mix: even(&[EntityKind::Box, EntityKind::Particle, EntityKind::Creature]),
                        area: SpawnArea::default(),
                    },
                    ..base
                };
                c.shapes.box_width = Range::new(35.0, 80.0);
                c.shapes.box_height = Range::new(35.0, 80.0);
                c.shapes.particle_radius = Range::new(20.0, 35.0);
                c
            }
            // Click to drop boxes; no scenery, nothing ages.
            DemoKind::Falling => {
                let mut c = DemoConfig {
                    lifespan: NO_AGING,
                    motion: MotionConfig::STILL,
                    pointer: PointerMode::Spawn {
                        mix: only(EntityKind::Box),
                        on_drag: true,
                    },
                    ..base
                };
                c.shapes.box_width = Range::new(10.0, 30.0);
                c.shapes.box_height = Range::new(10.0, 30.0);
                c
            }
            // Boxes and balls rolling down a chain surface.
            DemoKind::Boundaries => {
                let mut c = DemoConfig {
                    lifespan: Lifespan {
                        fade_every: Some(20),
                        ..Lifespan::default()
                    },
                    scenery: SceneryLayout::Surface,
                    spawn: vec![SpawnRule {
                        trigger: SpawnTrigger::Chance { probability: 0.05 },
                        area: DROP_POINT,
                        mix: even(&[EntityKind::Box, EntityKind::Particle]),
                    }],
                    pointer: PointerMode::Spawn {
                        mix: only(EntityKind::Box),
                        on_drag: true,
                    },
                    initial: InitialPopulation {
                        count: 1,
                        mix: only(EntityKind::Box),
                        area: DROP_POINT,
                    },
                    ..base
                };
                c.shapes.box_width = Range::new(20.0, 40.0);
                c.shapes.box_height = Range::new(30.0, 60.0);
                c.shapes.particle_radius = Range::new(15.0, 40.0);
                c.materials.boxes = MaterialRange::fixed(Material::new(1.0, 0.5, 0.6));
                c
            }
            DemoKind::Polygons => DemoConfig {
                scenery: SceneryLayout::Ledges,
                pointer: PointerMode::Spawn {
                    mix: vec![
                        MixEntry::new(EntityKind::Box, 0.1),
                        MixEntry::new(EntityKind::Polygon, 0.7),
                        MixEntry::new(EntityKind::Particle, 0.2),
                    ],
                    on_drag: true,
                },
                initial: InitialPopulation {
                    count: 1,
                    mix: only(EntityKind::Polygon),
                    area: DROP_POINT,
                },
                ..base
            },
            DemoKind::Multishape => DemoConfig {
                scenery: SceneryLayout::Ledges,
                pointer: PointerMode::Spawn {
                    mix: only(EntityKind::Lollipop),
                    on_drag: true,
                },
                initial: InitialPopulation {
                    count: 1,
                    mix: only(EntityKind::Lollipop),
                    area: DROP_POINT,
                },
                ..base
            },
            DemoKind::SpringPairs => DemoConfig {
                lifespan: NO_AGING,
                scenery: SceneryLayout::Ledges,
                pointer: PointerMode::Spawn {
                    mix: only(EntityKind::Pair),
                    on_drag: true,
                },
                verbose: true,
                ..base
            },
            // Particles rain onto a windmill; clicks toggle its motor.
            DemoKind::Windmill => {
                let mut c = DemoConfig {
                    lifespan: NO_AGING,
                    scenery: SceneryLayout::Windmill,
                    spawn: vec![SpawnRule {
                        trigger: SpawnTrigger::Chance { probability: 0.1 },
                        area: SpawnArea {
                            x: Range::new(0.4, 0.6),
                            y: Range::new(-0.1, 0.1),
                            offset: Vec2::zero(),
                        },
                        mix: only(EntityKind::Particle),
                    }],
                    pointer: PointerMode::ToggleMotor,
                    ..base
                };
                c.shapes.particle_radius = Range::new(10.0, 15.0);
                c.materials.particles = c.materials.pairs;
                c
            }
            // Zero gravity, springs on press, colors swap on contact.
            DemoKind::MouseSprings => {
                let mut c = DemoConfig {
                    gravity: false,
                    lifespan: NO_AGING,
                    margin: MarginRule::EnclosingRadius { factor: 2.0 },
                    motion: FULL_MOTION,
                    scenery: SceneryLayout::Frame,
                    pointer: PointerMode::Spring,
                    initial: InitialPopulation {
                        count: 20,
                        mix: even(&[
                            EntityKind::Polygon,
                            EntityKind::Box,
                            EntityKind::Particle,
                            EntityKind::Lollipop,
                        ]),
                        area: SpawnArea::default(),
                    },
                    contact_color_swap: true,
                    ..base
                };
                c.shapes.polygon_radius = Range::new(15.0, 30.0);
                c.shapes.polygon_sides = Count::new(4, 9);
                c.shapes.polygon_spread = Range::new(1.0, 1.25);
                c.shapes.lollipop_width = Range::new(4.0, 8.0);
                c.shapes.lollipop_height = Range::new(4.0, 8.0);
                c.shapes.lollipop_pop = Range::new(2.0, 3.0);
                c
            }
        }
    }
}
