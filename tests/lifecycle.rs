use approx::assert_relative_eq;
use tumble_engine::core::random::DemoRng;
use tumble_engine::domain::geometry::Vec2;
use tumble_engine::entities::{
    Blueprint, BoxEntity, BoxSpec, Entity, EntityId, FrameEvent, Lifespan, ParticleEntity, ParticleSpec,
};
use tumble_engine::{SimContext, Viewport, WorldSettings};

fn context() -> SimContext {
    let settings = WorldSettings::configure(10.0, false).unwrap();
    SimContext::new(settings, Viewport::new(800.0, 600.0).unwrap(), DemoRng::new(3))
}

fn blueprint(max: u32) -> Blueprint {
    Blueprint {
        lifespan: Lifespan {
            max,
            jitter: 1,
            aging: true,
            fade_every: None,
        },
        ..Blueprint::new(EntityId(1))
    }
}

fn frame(count: u64) -> FrameEvent {
    FrameEvent {
        time: count as f64 / 60.0,
        count,
        delta: 1.0 / 60.0,
    }
}

#[test]
fn destroy_releases_body_and_node_once() {
    let mut ctx = context();
    let mut entity = BoxEntity::new(
        &mut ctx,
        &blueprint(200),
        Vec2::new(100.0, 100.0),
        BoxSpec { width: 30.0, height: 20.0 },
    );
    let body = entity.body();
    let node = entity.node();
    assert!(ctx.physics.contains_body(body));
    assert!(ctx.scene.contains(node));

    entity.destroy(&mut ctx);
    assert!(entity.is_destroyed());
    assert!(!ctx.physics.contains_body(body));
    assert!(!ctx.scene.contains(node));
    assert_eq!(ctx.physics.body_count(), 0);
    assert_eq!(ctx.scene.node_count(), 0);

    entity.destroy(&mut ctx);
    assert!(entity.is_destroyed());
    assert_eq!(ctx.scene.node_count(), 0);
}

#[test]
fn life_runs_out_within_its_frames() {
    for max in [1u32, 10, 200] {
        let mut ctx = context();
        let mut entity =
            ParticleEntity::new(&mut ctx, &blueprint(max), Vec2::new(100.0, 100.0), ParticleSpec { radius: 10.0 });
        let mut expired_at = None;
        for count in 0..max as u64 {
            entity.update(&mut ctx, &frame(count));
            if entity.is_expired(&ctx) {
                expired_at = Some(count + 1);
                break;
            }
        }
        let expired_at = expired_at.expect("entity outlived its life counter");
        assert!(expired_at <= max as u64);
        entity.destroy(&mut ctx);
    }
}

#[test]
fn below_the_viewport_expires_with_life_left() {
    let mut ctx = context();
    // Particle margin is 2r = 20 px under the bottom edge.
    let entity = ParticleEntity::new(&mut ctx, &blueprint(200), Vec2::new(100.0, 621.0), ParticleSpec { radius: 10.0 });
    assert_eq!(entity.life(), 200);
    assert!(entity.is_expired(&ctx));

    let inside = ParticleEntity::new(&mut ctx, &blueprint(200), Vec2::new(100.0, 619.0), ParticleSpec { radius: 10.0 });
    assert!(!inside.is_expired(&ctx));
}

#[test]
fn contains_point_uses_the_fixture() {
    let mut ctx = context();
    let entity = ParticleEntity::new(&mut ctx, &blueprint(200), Vec2::new(100.0, 100.0), ParticleSpec { radius: 10.0 });
    assert!(entity.contains_point(&ctx, Vec2::new(105.0, 100.0)));
    assert!(!entity.contains_point(&ctx, Vec2::new(115.0, 100.0)));
}

#[test]
fn update_copies_the_body_pose_to_the_node() {
    let mut ctx = context();
    let mut entity = ParticleEntity::new(&mut ctx, &blueprint(200), Vec2::new(100.0, 100.0), ParticleSpec { radius: 10.0 });
    ctx.physics.set_linear_velocity(entity.body(), Vec2::new(6.0, 0.0));
    ctx.physics.step(1.0, 10, 10);
    entity.update(&mut ctx, &frame(0));

    let at = ctx.scene.position(entity.node()).unwrap();
    assert_relative_eq!(at.x, 160.0, epsilon = 1e-3);
    assert_relative_eq!(at.y, 100.0, epsilon = 1e-3);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "update() on destroyed entity")]
fn update_after_destroy_asserts() {
    let mut ctx = context();
    let mut entity = ParticleEntity::new(&mut ctx, &blueprint(200), Vec2::new(100.0, 100.0), ParticleSpec { radius: 10.0 });
    entity.destroy(&mut ctx);
    entity.update(&mut ctx, &frame(0));
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "is_expired() on destroyed entity")]
fn expiry_check_after_destroy_asserts() {
    let mut ctx = context();
    let mut entity = BoxEntity::new(
        &mut ctx,
        &blueprint(200),
        Vec2::new(100.0, 100.0),
        BoxSpec { width: 30.0, height: 20.0 },
    );
    entity.destroy(&mut ctx);
    entity.is_expired(&ctx);
}
