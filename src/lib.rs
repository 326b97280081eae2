//! Shimmer - Procedural UI sound cues and ambient particle effects
//!
//! A small effects engine: a tone synthesizer for click, hover and
//! notification cues, and two self-cleaning visual fields (floating
//! particles and falling glyphs).

pub mod config;
pub mod engine;
pub mod fx;
pub mod synth;
pub mod viz;

pub use config::ShimmerConfig;
pub use engine::{PlayOutcome, ToneSynthesizer};
pub use fx::{GlyphRain, ParticleField};
