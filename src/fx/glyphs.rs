//! Falling glyph rain
//!
//! Binary digits that fall straight down through their container while
//! fading out, behind the loading screen.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;

use super::particles::millis;
use super::{
    Animation, DeviceClass, Easing, Element, ElementKind, Emitter, Field, Keyframe, Spawn, Stage,
    Viewport,
};
use crate::config::{EmissionProfile, GlyphConfig, ShimmerConfig};

/// Glyph rain inside a bounded container
pub type GlyphRain<R = StdRng> = Field<GlyphEmitter, R>;

/// Spawns falling glyphs
#[derive(Debug, Clone)]
pub struct GlyphEmitter {
    config: GlyphConfig,
    symbols: Vec<char>,
}

impl GlyphEmitter {
    pub fn new(config: GlyphConfig) -> Self {
        let mut symbols: Vec<char> = config.symbols.chars().collect();
        if symbols.is_empty() {
            symbols = vec!['0', '1'];
        }
        Self { config, symbols }
    }
}

impl Emitter for GlyphEmitter {
    fn name(&self) -> &'static str {
        "glyph"
    }

    fn profile(&self, class: DeviceClass) -> EmissionProfile {
        class.select(self.config.desktop, self.config.mobile)
    }

    fn spawn<R: Rng + ?Sized>(&self, rng: &mut R, stage: &Stage, now: Duration) -> Spawn {
        let symbol = self.symbols[rng.gen_range(0..self.symbols.len())];
        let left = rng.gen::<f32>() * stage.width();
        let font_size = self.config.font_size.sample(rng);
        let duration = millis(self.config.duration_ms.sample(rng));
        let height = stage.height();

        Spawn {
            element: Element::new(ElementKind::Glyph { symbol, font_size }, left, 0.0, 1.0),
            animation: Animation::new(
                Keyframe::new((0.0, -height), 1.0),
                Keyframe::new((0.0, height), 0.0),
                now,
                duration,
                Easing::Linear,
            ),
        }
    }

    fn max_duration(&self) -> Duration {
        millis(self.config.duration_ms.max)
    }
}

/// Mount glyph rain on `stage`, tuned for the viewport's device class
pub fn mount_glyph_rain<R: Rng>(
    config: &ShimmerConfig,
    viewport: &Viewport,
    stage: Stage,
    rng: R,
    now: Duration,
) -> GlyphRain<R> {
    let class = viewport.classify(&config.viewport);
    Field::mount(GlyphEmitter::new(config.glyphs.clone()), stage, class, rng, now)
}
