//! Named UI sound cues
//!
//! Each cue is a short sequence of tones with offsets relative to the moment
//! the cue is played.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;

use super::{Tone, Waveform};
use crate::config::CueConfig;

/// A short, named synthesized sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Sharp square blip for direct actions
    Click,
    /// Very short, quiet sine for pointer-enter events
    Hover,
    /// Two ascending sine tones for positive events
    Notification,
}

/// A tone plus its start offset in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledTone {
    pub offset: f64,
    pub tone: Tone,
}

impl Cue {
    pub const ALL: [Cue; 3] = [Cue::Click, Cue::Hover, Cue::Notification];

    /// Tones making up this cue, in start order
    pub fn tones(self, config: &CueConfig) -> Vec<ScheduledTone> {
        let shape = |tone: Tone| tone.with_gain(config.gain, config.floor);
        match self {
            Cue::Click => vec![ScheduledTone {
                offset: 0.0,
                tone: shape(Tone::new(800.0, 0.1, Waveform::Square)),
            }],
            Cue::Hover => vec![ScheduledTone {
                offset: 0.0,
                tone: shape(Tone::new(600.0, 0.05, Waveform::Sine)),
            }],
            Cue::Notification => vec![
                ScheduledTone {
                    offset: 0.0,
                    tone: shape(Tone::new(500.0, 0.15, Waveform::Sine)),
                },
                ScheduledTone {
                    offset: config.notification_gap_ms as f64 / 1000.0,
                    tone: shape(Tone::new(700.0, 0.15, Waveform::Sine)),
                },
            ],
        }
    }

    /// Seconds from the first tone's start until the last tone ends
    pub fn span(self, config: &CueConfig) -> f64 {
        self.tones(config)
            .iter()
            .map(|t| t.offset + t.tone.duration)
            .fold(0.0, f64::max)
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Cue::Click => "click",
            Cue::Hover => "hover",
            Cue::Notification => "notification",
        };
        f.write_str(name)
    }
}

impl FromStr for Cue {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "click" => Ok(Cue::Click),
            "hover" => Ok(Cue::Hover),
            "notification" | "notify" => Ok(Cue::Notification),
            other => bail!("Unknown cue '{}' (expected click, hover or notification)", other),
        }
    }
}
