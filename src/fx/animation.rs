//! Two-keyframe animations with completion

use std::time::Duration;

/// Timing curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    /// Fast start, slow finish
    EaseOut,
}

impl Easing {
    /// Map linear progress in 0..=1 onto the curve
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

/// Animated properties of an element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub translate: (f32, f32),
    pub opacity: f32,
}

impl Keyframe {
    pub fn new(translate: (f32, f32), opacity: f32) -> Self {
        Self { translate, opacity }
    }

    fn lerp(&self, to: &Keyframe, t: f32) -> Keyframe {
        Keyframe {
            translate: (
                self.translate.0 + (to.translate.0 - self.translate.0) * t,
                self.translate.1 + (to.translate.1 - self.translate.1) * t,
            ),
            opacity: self.opacity + (to.opacity - self.opacity) * t,
        }
    }
}

/// Interpolation between two keyframes over a fixed window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub from: Keyframe,
    pub to: Keyframe,
    pub start: Duration,
    pub duration: Duration,
    pub easing: Easing,
}

impl Animation {
    pub fn new(from: Keyframe, to: Keyframe, start: Duration, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            start,
            duration,
            easing,
        }
    }

    pub fn end(&self) -> Duration {
        self.start + self.duration
    }

    /// Linear progress at `now`, 0 before start and 1 once finished
    pub fn progress(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return if now >= self.start { 1.0 } else { 0.0 };
        }
        let elapsed = now.saturating_sub(self.start);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0) as f32
    }

    /// Whether the finish event has been reached
    pub fn is_finished(&self, now: Duration) -> bool {
        now >= self.end()
    }

    /// Interpolated keyframe at `now`; holds the final frame once finished
    pub fn sample(&self, now: Duration) -> Keyframe {
        let t = self.easing.apply(self.progress(now));
        self.from.lerp(&self.to, t)
    }
}
