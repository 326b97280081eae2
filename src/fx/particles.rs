//! Floating particle field
//!
//! Dots scattered over the whole viewport that drift a short random distance
//! while fading out.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;

use super::{
    Animation, DeviceClass, Easing, Element, ElementKind, Emitter, Field, Keyframe, Spawn, Stage,
    Viewport,
};
use crate::config::{EmissionProfile, ParticleConfig, ShimmerConfig};

/// Particle field over a full-viewport stage
pub type ParticleField<R = StdRng> = Field<ParticleEmitter, R>;

/// Spawns drifting particles
#[derive(Debug, Clone)]
pub struct ParticleEmitter {
    config: ParticleConfig,
}

impl ParticleEmitter {
    pub fn new(config: ParticleConfig) -> Self {
        Self { config }
    }
}

impl Emitter for ParticleEmitter {
    fn name(&self) -> &'static str {
        "particle"
    }

    fn profile(&self, class: DeviceClass) -> EmissionProfile {
        class.select(self.config.desktop, self.config.mobile)
    }

    fn spawn<R: Rng + ?Sized>(&self, rng: &mut R, stage: &Stage, now: Duration) -> Spawn {
        let size = self.config.size.sample(rng);
        let left = rng.gen::<f32>() * stage.width();
        let top = rng.gen::<f32>() * stage.height();
        let opacity = self.config.opacity.sample(rng);
        let duration = millis(self.config.duration_ms.sample(rng));
        let drift = (
            (rng.gen::<f32>() - 0.5) * self.config.drift,
            (rng.gen::<f32>() - 0.5) * self.config.drift,
        );

        Spawn {
            element: Element::new(ElementKind::Particle { size }, left, top, opacity),
            animation: Animation::new(
                Keyframe::new((0.0, 0.0), opacity),
                Keyframe::new(drift, 0.0),
                now,
                duration,
                Easing::EaseOut,
            ),
        }
    }

    fn max_duration(&self) -> Duration {
        millis(self.config.duration_ms.max)
    }
}

pub(crate) fn millis(ms: f32) -> Duration {
    Duration::from_secs_f64(f64::from(ms.max(0.0)) / 1000.0)
}

/// Mount a particle field sized to `viewport`, tuned for its device class
pub fn mount_particles<R: Rng>(
    config: &ShimmerConfig,
    viewport: &Viewport,
    rng: R,
    now: Duration,
) -> ParticleField<R> {
    let class = viewport.classify(&config.viewport);
    let stage = Stage::new(viewport.width as f32, viewport.height as f32);
    Field::mount(ParticleEmitter::new(config.particles.clone()), stage, class, rng, now)
}
