//! Mount, emit and teardown behaviour of both fields

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use shimmer::config::ShimmerConfig;
use shimmer::fx::{
    mount_glyph_rain, mount_particles, run_virtual, DeviceClass, Emitter, Field, NodeId, Stage,
    Viewport,
};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn rain(config: &ShimmerConfig, viewport: &Viewport, seed: u64) -> shimmer::GlyphRain {
    let stage = Stage::new(viewport.width as f32, viewport.height as f32);
    mount_glyph_rain(config, viewport, stage, StdRng::seed_from_u64(seed), Duration::ZERO)
}

fn node_ids<E: Emitter>(field: &Field<E>) -> Vec<NodeId> {
    field.stage().iter().map(|(id, _)| id).collect()
}

#[test]
fn test_glyph_rain_ticks_then_unmounts_clean() {
    let config = ShimmerConfig::default();
    let mut rain = rain(&config, &Viewport::new(1280, 800), 1);

    let stats = run_virtual(&mut rain, ms(10), ms(1100));
    assert!(stats.ticks >= 4, "ticks = {}", stats.ticks);
    assert!(rain.stage().child_count() >= 1);

    rain.unmount();
    assert_eq!(rain.stage().child_count(), 0);
    assert!(!rain.is_mounted());

    // Nothing spawns after teardown
    rain.update(ms(5000));
    assert_eq!(rain.stage().child_count(), 0);
    assert_eq!(rain.stats().ticks, stats.ticks);
}

#[test]
fn test_narrow_viewport_uses_mobile_particles() {
    let config = ShimmerConfig::default();
    let field = mount_particles(
        &config,
        &Viewport::new(390, 844),
        StdRng::seed_from_u64(0),
        Duration::ZERO,
    );
    assert_eq!(field.device_class(), DeviceClass::Mobile);
    assert_eq!(*field.profile(), config.particles.mobile);
}

#[test]
fn test_mobile_user_agent_on_wide_viewport() {
    let config = ShimmerConfig::default();
    let viewport = Viewport::new(1024, 1366)
        .with_user_agent("Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X)");
    let rain = rain(&config, &viewport, 0);
    assert_eq!(rain.device_class(), DeviceClass::Mobile);
    assert_eq!(*rain.profile(), config.glyphs.mobile);
}

#[test]
fn test_spawns_bounded_by_ticks_and_burst() {
    let config = ShimmerConfig::default();
    for seed in 0..5 {
        let mut field = mount_particles(
            &config,
            &Viewport::new(1440, 900),
            StdRng::seed_from_u64(seed),
            Duration::ZERO,
        );
        let stats = run_virtual(&mut field, ms(16), ms(12_000));
        let profile = field.profile();
        let bound = stats.ticks * profile.per_tick as u64 + profile.initial_burst as u64;
        assert!(stats.spawned <= bound);
        assert_eq!(stats.spawned, stats.completed + stats.live as u64);
    }
}

#[test]
fn test_instances_gone_after_max_duration() {
    let config = ShimmerConfig::default();
    let mut rain = rain(&config, &Viewport::new(800, 600), 7);

    run_virtual(&mut rain, ms(16), ms(2000));
    let seen = node_ids(&rain);
    assert!(!seen.is_empty());

    let max = rain.emitter().max_duration();
    rain.update(ms(2000) + max + ms(1));
    for id in seen {
        assert!(!rain.stage().contains(id));
    }
}

#[test]
fn test_particles_gone_after_max_duration() {
    let config = ShimmerConfig::default();
    let mut field = mount_particles(
        &config,
        &Viewport::new(1280, 720),
        StdRng::seed_from_u64(9),
        Duration::ZERO,
    );

    run_virtual(&mut field, ms(16), ms(4000));
    let seen = node_ids(&field);
    assert!(seen.len() >= config.particles.desktop.initial_burst);

    let max = field.emitter().max_duration();
    assert_eq!(max, ms(15_000));
    field.update(ms(4000) + max + ms(1));
    for id in &seen {
        assert!(!field.stage().contains(*id));
    }
    assert!(field.stats().completed >= seen.len() as u64);
    assert!(field.is_mounted());
}

#[test]
fn test_unmount_is_idempotent() {
    let config = ShimmerConfig::default();
    let mut field = mount_particles(
        &config,
        &Viewport::new(1280, 720),
        StdRng::seed_from_u64(3),
        Duration::ZERO,
    );
    run_virtual(&mut field, ms(16), ms(3000));
    let live = field.stage().child_count();
    assert!(live > 0);

    assert_eq!(field.unmount(), live);
    assert_eq!(field.unmount(), 0);
    let stats = field.stats();
    assert_eq!(stats.live, 0);
    assert_eq!(stats.reclaimed, live as u64);
}

#[test]
fn test_unmount_before_first_tick() {
    let config = ShimmerConfig::default();
    let mut rain = rain(&config, &Viewport::new(1280, 800), 0);
    assert_eq!(rain.unmount(), 0);
    rain.update(ms(1000));
    assert_eq!(rain.stats().spawned, 0);
}
