//! Voice trait for sound generators

/// Anything the mixer can render sample by sample
pub trait Voice: Send {
    /// Check if the voice still produces sound
    fn is_active(&self) -> bool;

    /// Generate the next sample
    fn process(&mut self) -> f64;

    /// Seconds of audio left before the voice goes silent
    fn remaining(&self) -> f64;
}
