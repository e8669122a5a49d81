use tumble_engine::{demo_intro, Demo};

#[test]
fn perf_smoke_step() {
    let mut demo = Demo::new(demo_intro(), 800.0, 600.0).unwrap();
    demo.enable_perf_metrics(true);
    for i in 0..120 {
        demo.step(i as f64 * 1000.0 / 60.0);
    }
    let stats = demo.get_perf_stats();
    assert!(stats.step_ms() >= 0.0);
    assert_eq!(stats.entity_count(), demo.entity_count());
    assert_eq!(demo.frame(), 120);
}

#[test]
fn fps_readout_tracks_the_host_clock() {
    let mut demo = Demo::new(demo_intro(), 800.0, 600.0).unwrap();
    // 30 fps host clock.
    for i in 0..60 {
        demo.step(i as f64 * 1000.0 / 30.0);
    }
    assert!((demo.fps() - 30.5).abs() < 1.0, "fps {}", demo.fps());
}
