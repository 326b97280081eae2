//! Software audio graph
//!
//! The [`Mixer`] keeps a sample clock, starts scheduled voices when the clock
//! reaches them and sums every active voice into one output stream. It backs
//! both the real-time player and the offline host.
//!
//! Every voice carries the [`VoiceOwner`] of the context that scheduled it, so
//! closing one context never cuts off another context's tones.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::{AudioContext, AudioError, AudioHost, ContextState};
use crate::synth::{Tone, ToneVoice, Voice};

/// Identifies the context a voice belongs to
pub type VoiceOwner = u64;

/// Mixes scheduled voices on a sample clock
pub struct Mixer {
    sample_rate: f64,
    master_volume: f32,
    clock: u64,
    /// Voices waiting for their start sample
    pending: Vec<Pending>,
    active: Vec<(VoiceOwner, Box<dyn Voice>)>,
}

struct Pending {
    owner: VoiceOwner,
    start: u64,
    voice: Box<dyn Voice>,
}

impl Mixer {
    /// Create a new mixer
    pub fn new(sample_rate: f64, master_volume: f32) -> Self {
        Self {
            sample_rate,
            master_volume,
            clock: 0,
            pending: Vec::new(),
            active: Vec::new(),
        }
    }

    /// Get the sample rate
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Seconds rendered so far
    pub fn current_time(&self) -> f64 {
        self.clock as f64 / self.sample_rate
    }

    /// Samples rendered so far
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Schedule a tone at `at` seconds; times in the past start immediately
    pub fn schedule_tone(&mut self, owner: VoiceOwner, tone: &Tone, at: f64) {
        let start = (at * self.sample_rate).round() as u64;
        let voice = ToneVoice::new(tone, self.sample_rate);
        self.schedule_voice(owner, Box::new(voice), start);
    }

    /// Schedule any voice at an absolute sample position
    pub fn schedule_voice(&mut self, owner: VoiceOwner, voice: Box<dyn Voice>, start_sample: u64) {
        self.pending.push(Pending {
            owner,
            start: start_sample.max(self.clock),
            voice,
        });
    }

    /// Voices playing or waiting to play
    pub fn voice_count(&self) -> usize {
        self.pending.len() + self.active.len()
    }

    /// Voices of one owner playing or waiting to play
    pub fn owned_voice_count(&self, owner: VoiceOwner) -> usize {
        self.pending.iter().filter(|p| p.owner == owner).count()
            + self.active.iter().filter(|(o, _)| *o == owner).count()
    }

    pub fn is_idle(&self) -> bool {
        self.voice_count() == 0
    }

    /// Seconds until every voice of `owner` has finished
    pub fn time_remaining(&self, owner: VoiceOwner) -> f64 {
        let active = self
            .active
            .iter()
            .filter(|(o, _)| *o == owner)
            .map(|(_, v)| v.remaining())
            .fold(0.0, f64::max);
        let pending = self
            .pending
            .iter()
            .filter(|p| p.owner == owner)
            .map(|p| p.start.saturating_sub(self.clock) as f64 / self.sample_rate + p.voice.remaining())
            .fold(0.0, f64::max);
        active.max(pending)
    }

    /// Drop the voices of `owner`; returns how many were cut off
    pub fn silence(&mut self, owner: VoiceOwner) -> usize {
        let before = self.voice_count();
        self.pending.retain(|p| p.owner != owner);
        self.active.retain(|(o, _)| *o != owner);
        before - self.voice_count()
    }

    /// Generate the next sample (mix of all voices)
    pub fn process(&mut self) -> f64 {
        if !self.pending.is_empty() {
            let clock = self.clock;
            let mut i = 0;
            while i < self.pending.len() {
                if self.pending[i].start <= clock {
                    let Pending { owner, voice, .. } = self.pending.swap_remove(i);
                    self.active.push((owner, voice));
                } else {
                    i += 1;
                }
            }
        }

        let mut output = 0.0;
        for (_, voice) in &mut self.active {
            output += voice.process();
        }
        self.active.retain(|(_, v)| v.is_active());
        self.clock += 1;

        output * self.master_volume as f64
    }

    /// Fill a buffer with samples
    pub fn fill_buffer(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process() as f32;
        }
    }
}

/// Host whose contexts render into a shared in-memory mixer
///
/// Each context gets its own [`VoiceOwner`], including contexts handed out by
/// clones of the host.
#[derive(Clone)]
pub struct OfflineHost {
    mixer: Arc<Mutex<Mixer>>,
    next_owner: Arc<AtomicU64>,
}

impl OfflineHost {
    pub fn new(sample_rate: f64, master_volume: f32) -> Self {
        Self {
            mixer: Arc::new(Mutex::new(Mixer::new(sample_rate, master_volume))),
            next_owner: Arc::new(AtomicU64::new(1)),
        }
    }

    /// The mixer every context of this host schedules into
    pub fn mixer(&self) -> Arc<Mutex<Mixer>> {
        Arc::clone(&self.mixer)
    }
}

impl AudioHost for OfflineHost {
    type Context = OfflineContext;

    fn create_context(&self) -> Result<OfflineContext, AudioError> {
        Ok(OfflineContext {
            mixer: self.mixer(),
            owner: self.next_owner.fetch_add(1, Ordering::Relaxed),
            state: ContextState::Running,
        })
    }
}

/// Context over an [`OfflineHost`]'s mixer; never suspended
pub struct OfflineContext {
    mixer: Arc<Mutex<Mixer>>,
    owner: VoiceOwner,
    state: ContextState,
}

impl OfflineContext {
    pub fn owner(&self) -> VoiceOwner {
        self.owner
    }
}

impl AudioContext for OfflineContext {
    fn state(&self) -> ContextState {
        self.state
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        match self.state {
            ContextState::Closed => Err(AudioError::Closed),
            _ => {
                self.state = ContextState::Running;
                Ok(())
            }
        }
    }

    fn current_time(&self) -> f64 {
        self.mixer.lock().map(|m| m.current_time()).unwrap_or(0.0)
    }

    fn time_remaining(&self) -> f64 {
        self.mixer.lock().map(|m| m.time_remaining(self.owner)).unwrap_or(0.0)
    }

    fn schedule(&mut self, tone: &Tone, at: f64) -> Result<(), AudioError> {
        if self.state == ContextState::Closed {
            return Err(AudioError::Closed);
        }
        let mut mixer = self
            .mixer
            .lock()
            .map_err(|_| AudioError::Node("mixer lock poisoned".to_string()))?;
        mixer.schedule_tone(self.owner, tone, at);
        Ok(())
    }

    fn close(&mut self) -> Result<(), AudioError> {
        if self.state == ContextState::Closed {
            return Ok(());
        }
        self.state = ContextState::Closed;
        if let Ok(mut mixer) = self.mixer.lock() {
            mixer.silence(self.owner);
        }
        Ok(())
    }
}
