//! UI sound cue synthesizer
//!
//! Owns at most one audio context, created on the first cue rather than at
//! construction since hosts commonly refuse to start audio before a user
//! gesture. Playing a cue never fails from the caller's point of view: every
//! backend error is logged and reported as [`PlayOutcome::Degraded`].

use tracing::{debug, warn};

use super::{AudioContext, AudioError, AudioHost, ContextState};
use crate::config::CueConfig;
use crate::synth::Cue;

/// Result of a play request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Every tone of the cue was handed to the audio graph
    Scheduled { tones: usize },
    /// The cue could not be fully scheduled; the reason is kept for diagnostics
    ///
    /// Usually nothing plays. When a later tone of a multi-tone cue fails,
    /// the tones scheduled before it still play.
    Degraded(AudioError),
}

impl PlayOutcome {
    pub fn is_scheduled(&self) -> bool {
        matches!(self, PlayOutcome::Scheduled { .. })
    }
}

/// Context handle plus readiness flag
#[derive(Debug)]
pub struct AudioEngineState<C> {
    context: Option<C>,
    ready: bool,
}

impl<C> Default for AudioEngineState<C> {
    fn default() -> Self {
        Self {
            context: None,
            ready: false,
        }
    }
}

impl<C> AudioEngineState<C> {
    pub fn context(&self) -> Option<&C> {
        self.context.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }
}

/// Produces click, hover and notification cues on a lazily created context
pub struct ToneSynthesizer<H: AudioHost> {
    host: H,
    cues: CueConfig,
    state: AudioEngineState<H::Context>,
    unsupported_reported: bool,
}

impl<H: AudioHost> ToneSynthesizer<H> {
    /// Create a synthesizer; no audio resources are touched yet
    pub fn new(host: H, cues: CueConfig) -> Self {
        Self {
            host,
            cues,
            state: AudioEngineState::default(),
            unsupported_reported: false,
        }
    }

    pub fn state(&self) -> &AudioEngineState<H::Context> {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state.ready
    }

    pub fn has_context(&self) -> bool {
        self.state.context.is_some()
    }

    /// Seconds until every tone scheduled so far has finished playing
    pub fn time_remaining(&self) -> f64 {
        self.state.context.as_ref().map_or(0.0, |c| c.time_remaining())
    }

    pub fn play_click(&mut self) -> PlayOutcome {
        self.play(Cue::Click)
    }

    pub fn play_hover(&mut self) -> PlayOutcome {
        self.play(Cue::Hover)
    }

    pub fn play_notification(&mut self) -> PlayOutcome {
        self.play(Cue::Notification)
    }

    /// Schedule every tone of `cue` and return without waiting for playback
    pub fn play(&mut self, cue: Cue) -> PlayOutcome {
        match self.try_play(cue) {
            Ok(tones) => {
                debug!("Scheduled {} cue ({} tones)", cue, tones);
                PlayOutcome::Scheduled { tones }
            }
            Err(err) => {
                self.report(cue, &err);
                PlayOutcome::Degraded(err)
            }
        }
    }

    fn try_play(&mut self, cue: Cue) -> Result<usize, AudioError> {
        let tones = cue.tones(&self.cues);
        let context = self.ensure_ready()?;

        let start = context.current_time();
        for scheduled in &tones {
            context.schedule(&scheduled.tone, start + scheduled.offset)?;
        }
        Ok(tones.len())
    }

    /// Create the context on first use and resume it if suspended
    pub fn ensure_ready(&mut self) -> Result<&mut H::Context, AudioError> {
        // A context closed underneath us is replaced rather than reused
        if let Some(context) = &self.state.context {
            if context.state() == ContextState::Closed {
                debug!("Audio context was closed externally, recreating");
                self.state.context = None;
                self.state.ready = false;
            }
        }

        if self.state.context.is_none() {
            self.state.context = Some(self.host.create_context()?);
        }
        let Some(context) = self.state.context.as_mut() else {
            return Err(AudioError::Closed);
        };

        if context.state() == ContextState::Suspended {
            context.resume()?;
        }
        self.state.ready = true;
        Ok(context)
    }

    /// Close the audio graph; the next cue starts from scratch
    pub fn destroy(&mut self) {
        if let Some(mut context) = self.state.context.take() {
            if let Err(e) = context.close() {
                debug!("Ignoring error while closing audio context: {}", e);
            }
            debug!("Audio context released");
        }
        self.state.ready = false;
    }

    fn report(&mut self, cue: Cue, err: &AudioError) {
        match err {
            AudioError::Unsupported if self.unsupported_reported => {
                debug!("Skipping {} cue: {}", cue, err);
            }
            AudioError::Unsupported => {
                self.unsupported_reported = true;
                warn!("Sound cues disabled: {}", err);
            }
            _ => warn!("Failed to play {} cue: {}", cue, err),
        }
    }
}

impl<H: AudioHost> Drop for ToneSynthesizer<H> {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::OfflineHost;

    /// Host that never has an output device
    struct NoAudio;

    impl AudioHost for NoAudio {
        type Context = crate::engine::OfflineContext;

        fn create_context(&self) -> Result<Self::Context, AudioError> {
            Err(AudioError::Unsupported)
        }
    }

    #[test]
    fn test_no_context_before_first_cue() {
        let synth = ToneSynthesizer::new(OfflineHost::new(1000.0, 1.0), CueConfig::default());
        assert!(!synth.has_context());
        assert!(!synth.is_ready());
    }

    #[test]
    fn test_click_schedules_one_tone() {
        let host = OfflineHost::new(1000.0, 1.0);
        let mixer = host.mixer();
        let mut synth = ToneSynthesizer::new(host, CueConfig::default());

        assert_eq!(synth.play_click(), PlayOutcome::Scheduled { tones: 1 });
        assert!(synth.is_ready());
        assert_eq!(mixer.lock().unwrap().voice_count(), 1);
    }

    #[test]
    fn test_unsupported_is_silent_noop() {
        let mut synth = ToneSynthesizer::new(NoAudio, CueConfig::default());
        for _ in 0..3 {
            assert_eq!(synth.play_hover(), PlayOutcome::Degraded(AudioError::Unsupported));
        }
        assert!(!synth.has_context());
        assert!(!synth.is_ready());
        assert!(synth.unsupported_reported);
    }

    #[test]
    fn test_destroy_before_use_is_noop() {
        let mut synth = ToneSynthesizer::new(NoAudio, CueConfig::default());
        synth.destroy();
        synth.destroy();
        assert!(!synth.has_context());
    }

    #[test]
    fn test_destroy_then_play_reinitializes() {
        let host = OfflineHost::new(1000.0, 1.0);
        let mixer = host.mixer();
        let mut synth = ToneSynthesizer::new(host, CueConfig::default());

        synth.play_notification();
        synth.destroy();
        assert!(!synth.is_ready());
        assert!(mixer.lock().unwrap().is_idle());

        assert_eq!(synth.play_notification(), PlayOutcome::Scheduled { tones: 2 });
        assert!(synth.is_ready());
        assert_eq!(mixer.lock().unwrap().voice_count(), 2);
    }

    #[test]
    fn test_externally_closed_context_is_replaced() {
        let host = OfflineHost::new(1000.0, 1.0);
        let mut synth = ToneSynthesizer::new(host, CueConfig::default());
        synth.play_click();

        if let Some(ctx) = synth.state.context.as_mut() {
            ctx.close().unwrap();
        }
        assert!(synth.play_click().is_scheduled());
    }

    #[test]
    fn test_notification_renders_both_tones() {
        let host = OfflineHost::new(8000.0, 1.0);
        let mixer = host.mixer();
        let mut synth = ToneSynthesizer::new(host, CueConfig::default());
        synth.play_notification();

        let mut mixer = mixer.lock().unwrap();
        let mut buffer = vec![0.0f32; 2000];
        mixer.fill_buffer(&mut buffer);

        // 0.00-0.10 s only the first tone, 0.15-0.25 s only the second
        assert!(buffer[..800].iter().any(|s| s.abs() > 0.0));
        assert!(buffer[1200..1990].iter().any(|s| s.abs() > 0.0));
        assert!(mixer.is_idle());
    }

    #[test]
    fn test_destroying_one_synthesizer_keeps_others_playing() {
        let host = OfflineHost::new(1000.0, 1.0);
        let mixer = host.mixer();
        let mut a = ToneSynthesizer::new(host.clone(), CueConfig::default());
        let mut b = ToneSynthesizer::new(host, CueConfig::default());

        assert!(a.play_click().is_scheduled());
        assert!(b.play_hover().is_scheduled());
        assert_eq!(mixer.lock().unwrap().voice_count(), 2);

        b.destroy();
        assert_eq!(mixer.lock().unwrap().voice_count(), 1);
        assert!(a.is_ready());
        assert!((a.time_remaining() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_time_remaining_tracks_scheduled_cue() {
        let host = OfflineHost::new(1000.0, 1.0);
        let mixer = host.mixer();
        let mut synth = ToneSynthesizer::new(host, CueConfig::default());
        assert_eq!(synth.time_remaining(), 0.0);

        synth.play_notification();
        let span = Cue::Notification.span(&CueConfig::default());
        assert!((synth.time_remaining() - span).abs() < 1e-9);
        assert_eq!(
            synth.state().context().map(|c| c.state()),
            Some(ContextState::Running)
        );
        assert!(synth.state().is_ready());

        let mut buffer = vec![0.0f32; 100];
        mixer.lock().unwrap().fill_buffer(&mut buffer);
        assert!((synth.time_remaining() - (span - 0.1)).abs() < 1e-9);
    }
}
