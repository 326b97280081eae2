//! Exponential decay envelope
//!
//! Starts at a fixed gain and ramps exponentially toward a small positive
//! floor over the tone's duration. An exponential ramp can never reach zero,
//! so the floor must stay strictly positive.

/// Envelope stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnvelopeStage {
    Idle,
    Decay,
    Done,
}

/// Exponential gain ramp from `start` to `floor` over `duration` seconds
#[derive(Debug, Clone)]
pub struct DecayEnvelope {
    sample_rate: f64,
    start: f64,
    floor: f64,
    duration: f64,

    stage: EnvelopeStage,
    level: f64,
    elapsed: f64,
}

/// Smallest floor accepted by the ramp
pub const MIN_FLOOR: f64 = 1e-4;

impl DecayEnvelope {
    /// Create an idle envelope
    pub fn new(sample_rate: f64, start: f64, floor: f64, duration: f64) -> Self {
        let start = start.clamp(MIN_FLOOR, 1.0);
        Self {
            sample_rate,
            start,
            floor: floor.clamp(MIN_FLOOR, start),
            duration: duration.max(1.0 / sample_rate),
            stage: EnvelopeStage::Idle,
            level: 0.0,
            elapsed: 0.0,
        }
    }

    /// Start the ramp from the top
    pub fn trigger(&mut self) {
        self.stage = EnvelopeStage::Decay;
        self.elapsed = 0.0;
        self.level = self.start;
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    pub fn is_active(&self) -> bool {
        self.stage == EnvelopeStage::Decay
    }

    /// Gain at `t` seconds into the ramp
    pub fn level_at(&self, t: f64) -> f64 {
        let progress = (t / self.duration).clamp(0.0, 1.0);
        self.start * (self.floor / self.start).powf(progress)
    }

    /// Generate the next envelope sample
    pub fn process(&mut self) -> f64 {
        match self.stage {
            EnvelopeStage::Idle | EnvelopeStage::Done => {
                self.level = 0.0;
            }
            EnvelopeStage::Decay => {
                self.level = self.level_at(self.elapsed);
                self.elapsed += 1.0 / self.sample_rate;
                if self.elapsed >= self.duration {
                    self.stage = EnvelopeStage::Done;
                }
            }
        }
        self.level
    }
}
