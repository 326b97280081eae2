//! Configuration schema definitions

use anyhow::{bail, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration for Shimmer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShimmerConfig {
    /// Audio output settings
    #[serde(default)]
    pub audio: AudioConfig,

    /// Cue envelope and timing
    #[serde(default)]
    pub cues: CueConfig,

    /// Device classification heuristic
    #[serde(default)]
    pub viewport: ViewportConfig,

    /// Floating particle field tuning
    #[serde(default)]
    pub particles: ParticleConfig,

    /// Glyph rain tuning
    #[serde(default)]
    pub glyphs: GlyphConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ShimmerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.audio.sample_rate < 8000 || self.audio.sample_rate > 192000 {
            bail!("Sample rate must be between 8000 and 192000");
        }
        if self.audio.buffer_size < 64 || self.audio.buffer_size > 8192 {
            bail!("Buffer size must be between 64 and 8192");
        }
        if !(0.0..=1.0).contains(&self.audio.volume) {
            bail!("Audio volume must be between 0.0 and 1.0");
        }

        // Exponential ramps cannot target zero
        if self.cues.floor <= 0.0 {
            bail!("Cue floor must be greater than 0");
        }
        if self.cues.gain > 1.0 || self.cues.floor >= self.cues.gain {
            bail!("Cue gain must satisfy floor < gain <= 1.0");
        }

        if self.viewport.mobile_breakpoint == 0 {
            bail!("Mobile breakpoint must be greater than 0");
        }

        self.particles.desktop.validate("particles.desktop")?;
        self.particles.mobile.validate("particles.mobile")?;
        self.particles.size.validate("particles.size")?;
        self.particles.opacity.validate("particles.opacity")?;
        self.particles.duration_ms.validate("particles.duration_ms")?;
        if self.particles.opacity.max > 1.0 || self.particles.opacity.min < 0.0 {
            bail!("particles.opacity must stay within 0.0-1.0");
        }
        if self.particles.drift < 0.0 {
            bail!("particles.drift must not be negative");
        }

        self.glyphs.desktop.validate("glyphs.desktop")?;
        self.glyphs.mobile.validate("glyphs.mobile")?;
        self.glyphs.font_size.validate("glyphs.font_size")?;
        self.glyphs.duration_ms.validate("glyphs.duration_ms")?;
        if self.glyphs.symbols.is_empty() {
            bail!("glyphs.symbols must contain at least one character");
        }

        if self.particles.duration_ms.min <= 0.0 || self.glyphs.duration_ms.min <= 0.0 {
            bail!("Animation durations must be greater than 0");
        }

        Ok(())
    }
}

/// Audio output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate in Hz for offline rendering (default: 44100)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Buffer size in samples (default: 512)
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Output device name (None = default device)
    pub device: Option<String>,

    /// Master volume 0.0-1.0 (default: 1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            buffer_size: default_buffer_size(),
            device: None,
            volume: default_volume(),
        }
    }
}

fn default_sample_rate() -> u32 { 44100 }
fn default_buffer_size() -> usize { 512 }
fn default_volume() -> f32 { 1.0 }

/// Gain envelope and timing shared by all cues
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CueConfig {
    /// Starting amplitude of every tone (default: 0.1)
    #[serde(default = "default_gain")]
    pub gain: f64,

    /// Exponential ramp target (default: 0.01)
    #[serde(default = "default_floor")]
    pub floor: f64,

    /// Delay between the two notification tones (default: 100)
    #[serde(default = "default_notification_gap_ms")]
    pub notification_gap_ms: u64,
}

impl Default for CueConfig {
    fn default() -> Self {
        Self {
            gain: default_gain(),
            floor: default_floor(),
            notification_gap_ms: default_notification_gap_ms(),
        }
    }
}

fn default_gain() -> f64 { 0.1 }
fn default_floor() -> f64 { 0.01 }
fn default_notification_gap_ms() -> u64 { 100 }

/// Mobile vs desktop heuristic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Viewports narrower than this are treated as mobile (default: 768)
    #[serde(default = "default_mobile_breakpoint")]
    pub mobile_breakpoint: u32,

    /// User-agent fragments that mark a mobile device
    #[serde(default = "default_mobile_markers")]
    pub mobile_markers: Vec<String>,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: default_mobile_breakpoint(),
            mobile_markers: default_mobile_markers(),
        }
    }
}

fn default_mobile_breakpoint() -> u32 { 768 }
fn default_mobile_markers() -> Vec<String> {
    ["Mobi", "Android", "iPhone", "iPad"].iter().map(|s| s.to_string()).collect()
}

/// Inclusive range a random scalar is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f32,
    pub max: f32,
}

impl Band {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Draw a uniform value from the band
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max <= self.min {
            return self.min;
        }
        rng.gen_range(self.min..self.max)
    }

    fn validate(&self, name: &str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            bail!("{} must be finite", name);
        }
        if self.min > self.max {
            bail!("{}: min ({}) must not exceed max ({})", name, self.min, self.max);
        }
        Ok(())
    }
}

/// Emission tuning for one device class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionProfile {
    /// Milliseconds between spawn ticks
    pub interval_ms: u64,

    /// Instances spawned per tick
    #[serde(default = "default_per_tick")]
    pub per_tick: usize,

    /// Instances spawned once at mount, spread over `burst_window_ms`
    #[serde(default)]
    pub initial_burst: usize,

    #[serde(default = "default_burst_window_ms")]
    pub burst_window_ms: u64,
}

fn default_per_tick() -> usize { 1 }
fn default_burst_window_ms() -> u64 { 2000 }

impl EmissionProfile {
    pub const fn new(interval_ms: u64, per_tick: usize) -> Self {
        Self {
            interval_ms,
            per_tick,
            initial_burst: 0,
            burst_window_ms: 2000,
        }
    }

    pub const fn with_burst(mut self, count: usize, window_ms: u64) -> Self {
        self.initial_burst = count;
        self.burst_window_ms = window_ms;
        self
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn burst_window(&self) -> Duration {
        Duration::from_millis(self.burst_window_ms)
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.interval_ms == 0 {
            bail!("{}: interval_ms must be greater than 0", name);
        }
        if self.per_tick == 0 {
            bail!("{}: per_tick must be at least 1", name);
        }
        if self.initial_burst > 0 && self.burst_window_ms == 0 {
            bail!("{}: burst_window_ms must be greater than 0 when initial_burst is set", name);
        }
        Ok(())
    }
}

/// Floating particle field tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleConfig {
    #[serde(default = "default_particle_desktop")]
    pub desktop: EmissionProfile,

    #[serde(default = "default_particle_mobile")]
    pub mobile: EmissionProfile,

    /// Particle diameter in px
    #[serde(default = "default_particle_size")]
    pub size: Band,

    /// Starting opacity
    #[serde(default = "default_particle_opacity")]
    pub opacity: Band,

    #[serde(default = "default_particle_duration")]
    pub duration_ms: Band,

    /// Full width of the random drift vector on each axis, in px
    #[serde(default = "default_particle_drift")]
    pub drift: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            desktop: default_particle_desktop(),
            mobile: default_particle_mobile(),
            size: default_particle_size(),
            opacity: default_particle_opacity(),
            duration_ms: default_particle_duration(),
            drift: default_particle_drift(),
        }
    }
}

fn default_particle_desktop() -> EmissionProfile { EmissionProfile::new(1000, 1).with_burst(20, 2000) }
fn default_particle_mobile() -> EmissionProfile { EmissionProfile::new(2000, 1).with_burst(8, 2000) }
fn default_particle_size() -> Band { Band::new(1.0, 5.0) }
fn default_particle_opacity() -> Band { Band::new(0.2, 0.7) }
fn default_particle_duration() -> Band { Band::new(5000.0, 15000.0) }
fn default_particle_drift() -> f32 { 200.0 }

/// Falling glyph tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlyphConfig {
    #[serde(default = "default_glyph_desktop")]
    pub desktop: EmissionProfile,

    #[serde(default = "default_glyph_mobile")]
    pub mobile: EmissionProfile,

    /// Font size in px
    #[serde(default = "default_glyph_font_size")]
    pub font_size: Band,

    #[serde(default = "default_glyph_duration")]
    pub duration_ms: Band,

    /// Symbols drawn with equal probability (default: "01")
    #[serde(default = "default_glyph_symbols")]
    pub symbols: String,
}

impl Default for GlyphConfig {
    fn default() -> Self {
        Self {
            desktop: default_glyph_desktop(),
            mobile: default_glyph_mobile(),
            font_size: default_glyph_font_size(),
            duration_ms: default_glyph_duration(),
            symbols: default_glyph_symbols(),
        }
    }
}

fn default_glyph_desktop() -> EmissionProfile { EmissionProfile::new(250, 1) }
fn default_glyph_mobile() -> EmissionProfile { EmissionProfile::new(400, 1) }
fn default_glyph_font_size() -> Band { Band::new(14.0, 24.0) }
fn default_glyph_duration() -> Band { Band::new(1000.0, 3000.0) }
fn default_glyph_symbols() -> String { "01".to_string() }

/// Diagnostic output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset (default: warn)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write logs to this file instead of stderr
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String { "warn".to_string() }
