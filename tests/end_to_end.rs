use tumble_engine::domain::geometry::Vec2;
use tumble_engine::entities::{EntityKind, Lifespan};
use tumble_engine::{DemoConfig, Simulation, Viewport};

#[test]
fn lone_circle_expires_and_is_forgotten() {
    let config = DemoConfig {
        scale: 10.0,
        gravity: false,
        seed: Some(2024),
        lifespan: Lifespan {
            max: 200,
            jitter: 1,
            aging: true,
            fade_every: Some(5),
        },
        ..DemoConfig::default()
    };
    let mut sim = Simulation::from_config(config, Viewport::new(800.0, 600.0).unwrap()).unwrap();
    let id = sim.spawn(EntityKind::Particle, Vec2::new(100.0, 100.0));
    assert_eq!(sim.entity_count(), 1);

    let mut gone_at = None;
    for step in 1..=200u32 {
        sim.advance();
        if gone_at.is_none() && sim.entity_count() == 0 {
            gone_at = Some(step);
        }
    }
    assert!(gone_at.is_some_and(|s| s <= 200), "gone at {:?}", gone_at);

    for _ in 0..10 {
        sim.advance();
    }
    assert!(sim.entities().iter().all(|e| e.id() != id));
    assert_eq!(sim.ctx().physics.body_count(), 0);
    assert_eq!(sim.ctx().scene.node_count(), 0);
}

#[test]
fn overrides_reach_the_running_demo() {
    let config = tumble_engine::DemoKind::Falling
        .config()
        .with_overrides(r#"{"gravity": false, "seed": 9}"#)
        .unwrap();
    let mut sim = Simulation::from_config(config, Viewport::new(400.0, 300.0).unwrap()).unwrap();
    sim.pointer_down(Vec2::new(200.0, 150.0));
    let body = sim.entities()[0].body();
    let before = sim.ctx().physics.position(body).unwrap();
    for _ in 0..30 {
        sim.advance();
    }
    let after = sim.ctx().physics.position(body).unwrap();
    // Falling launches boxes still; without gravity they stay put.
    assert_eq!(before, after);
}
