//! Synthesis primitives for UI sound cues
//!
//! Contains the oscillator, the decay envelope, tones and the named cues.

mod cue;
mod envelope;
mod oscillator;
mod tone;
mod voice;

pub use cue::{Cue, ScheduledTone};
pub use envelope::{DecayEnvelope, EnvelopeStage};
pub use oscillator::{Oscillator, Waveform};
pub use tone::{Tone, ToneVoice};
pub use voice::Voice;
