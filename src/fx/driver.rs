//! Frame loops for driving a field
//!
//! Both drivers assume the field was mounted at `Duration::ZERO`.

use std::time::Duration;

use rand::Rng;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::info;

use super::{Emitter, Field, FieldStats};

const MIN_FRAME: Duration = Duration::from_millis(1);

/// Step a field through virtual time, one frame at a time
pub fn run_virtual<E: Emitter, R: Rng>(
    field: &mut Field<E, R>,
    frame: Duration,
    duration: Duration,
) -> FieldStats {
    let frame = frame.max(MIN_FRAME);
    let mut now = Duration::ZERO;
    while now < duration {
        now = (now + frame).min(duration);
        field.update(now);
    }
    field.stats()
}

/// Drive a field against the wall clock until `duration` passes or Ctrl-C
pub async fn run_realtime<E: Emitter, R: Rng>(
    field: &mut Field<E, R>,
    frame: Duration,
    duration: Duration,
) -> FieldStats {
    let started = Instant::now();
    let mut ticker = tokio::time::interval(frame.max(MIN_FRAME));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let elapsed = started.elapsed().min(duration);
                field.update(elapsed);
                if elapsed >= duration {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                info!("Interrupted, stopping field");
                break;
            }
        }
    }

    field.stats()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShimmerConfig;
    use crate::fx::{mount_glyph_rain, Stage, Viewport};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_run_virtual_counts_ticks() {
        let config = ShimmerConfig::default();
        let mut rain = mount_glyph_rain(
            &config,
            &Viewport::new(1280, 800),
            Stage::new(1280.0, 800.0),
            StdRng::seed_from_u64(2),
            Duration::ZERO,
        );
        let stats = run_virtual(&mut rain, Duration::from_millis(16), Duration::from_secs(2));
        assert_eq!(stats.ticks, 8);
        assert_eq!(stats.spawned, 8);
    }

    #[tokio::test]
    async fn test_run_realtime_spawns() {
        let mut config = ShimmerConfig::default();
        config.glyphs.desktop.interval_ms = 20;
        let mut rain = mount_glyph_rain(
            &config,
            &Viewport::new(1280, 800),
            Stage::new(1280.0, 800.0),
            StdRng::seed_from_u64(2),
            Duration::ZERO,
        );
        let stats = run_realtime(&mut rain, Duration::from_millis(5), Duration::from_millis(200)).await;
        assert!(stats.ticks >= 1);
        assert!(stats.spawned >= 1);
        assert!(rain.is_mounted());
    }
}
