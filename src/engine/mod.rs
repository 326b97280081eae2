//! Audio engine for Shimmer
//!
//! The platform audio graph is modelled by two traits: an [`AudioHost`] that
//! can construct contexts, and the [`AudioContext`] it hands out. Backends:
//! real-time output through cpal ([`CpalHost`]) and an offline software graph
//! ([`OfflineHost`]). The [`ToneSynthesizer`] drives either.

mod mixer;
mod player;
mod recorder;
mod synthesizer;

pub use mixer::{Mixer, OfflineContext, OfflineHost, VoiceOwner};
pub use player::{default_device_name, list_output_devices, CpalContext, CpalHost};
pub use recorder::{render_cue, Recorder, RenderSummary};
pub use synthesizer::{AudioEngineState, PlayOutcome, ToneSynthesizer};

use crate::synth::Tone;
use thiserror::Error;

/// Lifecycle state of an audio context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    /// Created but not producing sound, typically until a user gesture
    Suspended,
    Running,
    Closed,
}

/// Failures raised by audio backends
///
/// None of these ever reach the caller of a cue; the synthesizer reports them
/// as [`PlayOutcome::Degraded`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    #[error("audio output is not supported in this environment")]
    Unsupported,

    #[error("failed to create audio context: {0}")]
    Construction(String),

    #[error("failed to resume audio context: {0}")]
    Resume(String),

    #[error("failed to schedule tone: {0}")]
    Node(String),

    #[error("audio context is closed")]
    Closed,
}

/// An exclusively owned audio-processing graph
pub trait AudioContext {
    fn state(&self) -> ContextState;

    /// Start producing sound if suspended
    fn resume(&mut self) -> Result<(), AudioError>;

    /// Seconds on the context's own clock
    fn current_time(&self) -> f64;

    /// Seconds until every tone this context scheduled has finished playing
    fn time_remaining(&self) -> f64;

    /// Schedule an oscillator -> gain -> output chain starting at `at` seconds
    /// on the context clock. Returns once scheduled, not once played.
    fn schedule(&mut self, tone: &Tone, at: f64) -> Result<(), AudioError>;

    /// Tear down the graph; closing twice is not an error
    fn close(&mut self) -> Result<(), AudioError>;
}

/// Factory for audio contexts
pub trait AudioHost {
    type Context: AudioContext;

    fn create_context(&self) -> Result<Self::Context, AudioError>;
}
