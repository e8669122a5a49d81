use tumble_engine::core::random::DemoRng;
use tumble_engine::domain::geometry::Vec2;
use tumble_engine::domain::shapes::Material;
use tumble_engine::entities::{
    Blueprint, Entity, EntityId, Launch, PairEntity, PairSpec, ParticleEntity, ParticleSpec, PartSpec, Spring,
};
use tumble_engine::{SimContext, Viewport, WorldSettings};

fn context() -> SimContext {
    let settings = WorldSettings::configure(10.0, false).unwrap();
    SimContext::new(settings, Viewport::new(800.0, 600.0).unwrap(), DemoRng::new(11))
}

#[test]
fn bind_then_destroy_leaves_nothing_behind() {
    let mut ctx = context();
    let at = Vec2::new(200.0, 200.0);
    let entity = ParticleEntity::new(&mut ctx, &Blueprint::new(EntityId(4)), at, ParticleSpec { radius: 15.0 });
    let (bodies, nodes) = (ctx.physics.body_count(), ctx.scene.node_count());

    let mut spring = Spring::new();
    assert!(spring.bind(&mut ctx, at, entity.id(), entity.body()));
    assert!(spring.is_active());
    assert_eq!(spring.target(), Some(EntityId(4)));
    let joint = spring.joint().unwrap();
    let line = spring.line().unwrap();
    assert!(ctx.physics.contains_joint(joint));
    assert!(ctx.scene.contains(line));

    spring.destroy(&mut ctx);
    assert!(!spring.is_active());
    assert_eq!(spring.joint(), None);
    assert_eq!(spring.line(), None);
    assert!(!ctx.physics.contains_joint(joint));
    assert!(!ctx.scene.contains(line));
    assert_eq!(ctx.physics.body_count(), bodies);
    assert_eq!(ctx.scene.node_count(), nodes);

    // Second destroy is harmless.
    spring.destroy(&mut ctx);
    assert!(!spring.is_active());
}

#[test]
fn update_while_inactive_does_nothing() {
    let mut ctx = context();
    let mut spring = Spring::new();
    let nodes = ctx.scene.node_count();
    spring.update(&mut ctx, Vec2::new(10.0, 10.0));
    assert!(!spring.is_active());
    assert_eq!(ctx.scene.node_count(), nodes);
    assert_eq!(ctx.physics.joint_count(), 0);
}

#[test]
fn rebinding_releases_the_previous_joint() {
    let mut ctx = context();
    let a = ParticleEntity::new(&mut ctx, &Blueprint::new(EntityId(1)), Vec2::new(100.0, 100.0), ParticleSpec { radius: 10.0 });
    let b = ParticleEntity::new(&mut ctx, &Blueprint::new(EntityId(2)), Vec2::new(300.0, 100.0), ParticleSpec { radius: 10.0 });

    let mut spring = Spring::new();
    assert!(spring.bind(&mut ctx, Vec2::new(100.0, 100.0), a.id(), a.body()));
    assert!(spring.bind(&mut ctx, Vec2::new(300.0, 100.0), b.id(), b.body()));
    assert_eq!(spring.target(), Some(EntityId(2)));
    assert_eq!(ctx.physics.joint_count(), 1);
    // Two particles plus one anchor.
    assert_eq!(ctx.physics.body_count(), 3);
}

#[test]
fn update_pulls_the_body_toward_the_pointer() {
    let mut ctx = context();
    let at = Vec2::new(200.0, 200.0);
    let entity = ParticleEntity::new(&mut ctx, &Blueprint::new(EntityId(0)), at, ParticleSpec { radius: 10.0 });
    let mut spring = Spring::new();
    assert!(spring.bind(&mut ctx, at, entity.id(), entity.body()));

    for _ in 0..30 {
        spring.update(&mut ctx, Vec2::new(300.0, 200.0));
        ctx.physics.step(1.0 / 60.0, 10, 10);
    }
    let x = ctx.physics.position(entity.body()).map(|p| ctx.units.to_pixels(p).x).unwrap();
    assert!(x > 200.0, "body did not move toward the pointer: {}", x);
}

#[test]
fn pair_reports_the_part_under_the_point() {
    let mut ctx = context();
    let part = |offset| PartSpec {
        radius: 10.0,
        offset,
        material: Material::BOUNCY,
        launch: Launch::default(),
    };
    let spec = PairSpec {
        length: 50.0,
        frequency_hz: 3.0,
        damping_ratio: 0.3,
        parts: [part(Vec2::zero()), part(Vec2::new(50.0, 0.0))],
        line_width: 4.0,
        line_opacity: 0.5,
    };
    let pair = PairEntity::new(&mut ctx, &Blueprint::new(EntityId(9)), Vec2::new(100.0, 100.0), &spec);
    let [first, second] = pair.parts();

    assert_eq!(pair.body_at(&ctx, Vec2::new(100.0, 100.0)), Some(first.body()));
    assert_eq!(pair.body_at(&ctx, Vec2::new(150.0, 100.0)), Some(second.body()));
    assert_eq!(pair.body_at(&ctx, Vec2::new(125.0, 130.0)), None);

    let at = Vec2::new(150.0, 100.0);
    let body = pair.body_at(&ctx, at).unwrap();
    let mut spring = Spring::new();
    assert!(spring.bind(&mut ctx, at, pair.id(), body));
    assert_eq!(spring.target(), Some(EntityId(9)));

    for _ in 0..10 {
        spring.update(&mut ctx, Vec2::new(150.0, 200.0));
        ctx.physics.step(1.0 / 60.0, 10, 10);
    }
    let y = |b| ctx.physics.position(b).map(|p| p.y).unwrap();
    assert!(y(second.body()) > y(first.body()));
}
