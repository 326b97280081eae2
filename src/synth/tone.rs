//! Single oscillator tones
//!
//! A [`Tone`] describes one audible event; a [`ToneVoice`] renders it as an
//! oscillator fed through a decaying gain stage.

use super::{DecayEnvelope, Oscillator, Voice, Waveform};

/// One oscillator-driven audible event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Frequency in Hz
    pub frequency: f64,
    /// Duration in seconds
    pub duration: f64,
    pub waveform: Waveform,
    /// Starting amplitude (0.0-1.0)
    pub gain: f64,
    /// Exponential ramp target, strictly positive
    pub floor: f64,
}

impl Tone {
    pub fn new(frequency: f64, duration: f64, waveform: Waveform) -> Self {
        Self {
            frequency,
            duration,
            waveform,
            gain: 0.1,
            floor: 0.01,
        }
    }

    /// Override the gain envelope
    pub fn with_gain(mut self, gain: f64, floor: f64) -> Self {
        self.gain = gain;
        self.floor = floor;
        self
    }
}

/// Oscillator -> gain node, stopped after the tone's duration
pub struct ToneVoice {
    oscillator: Oscillator,
    envelope: DecayEnvelope,
    samples_left: u64,
    sample_rate: f64,
}

impl ToneVoice {
    /// Build a voice and start it immediately
    pub fn new(tone: &Tone, sample_rate: f64) -> Self {
        let mut envelope = DecayEnvelope::new(sample_rate, tone.gain, tone.floor, tone.duration);
        envelope.trigger();
        Self {
            oscillator: Oscillator::new(tone.waveform, tone.frequency, sample_rate),
            envelope,
            samples_left: (tone.duration * sample_rate).round().max(1.0) as u64,
            sample_rate,
        }
    }
}

impl Voice for ToneVoice {
    fn is_active(&self) -> bool {
        self.samples_left > 0
    }

    fn process(&mut self) -> f64 {
        if self.samples_left == 0 {
            return 0.0;
        }
        self.samples_left -= 1;
        self.oscillator.generate() * self.envelope.process()
    }

    fn remaining(&self) -> f64 {
        self.samples_left as f64 / self.sample_rate
    }
}
