//! Recurring emission timer

use std::time::Duration;

use crate::config::EmissionProfile;

/// Fires every `interval` from mount until cancelled
///
/// Like an interval timer, the first tick is one interval after mount.
#[derive(Debug, Clone)]
pub struct EmissionSchedule {
    interval: Duration,
    per_tick: usize,
    next_due: Duration,
    ticks: u64,
    cancelled: bool,
}

impl EmissionSchedule {
    pub fn new(profile: &EmissionProfile, mounted_at: Duration) -> Self {
        let interval = profile.interval().max(Duration::from_millis(1));
        Self {
            interval,
            per_tick: profile.per_tick,
            next_due: mounted_at + interval,
            ticks: 0,
            cancelled: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn per_tick(&self) -> usize {
        self.per_tick
    }

    /// Ticks fired so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Whether [`cancel`](Self::cancel) has run
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Count the ticks that came due up to `now`, catching up after a stall
    pub fn poll(&mut self, now: Duration) -> u64 {
        if self.cancelled {
            return 0;
        }
        let mut fired = 0;
        while self.next_due <= now {
            self.next_due += self.interval;
            fired += 1;
        }
        self.ticks += fired;
        fired
    }

    /// Stop the timer; returns `true` only the first time
    pub fn cancel(&mut self) -> bool {
        !std::mem::replace(&mut self.cancelled, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_first_tick_after_one_interval() {
        let mut schedule = EmissionSchedule::new(&EmissionProfile::new(250, 1), ms(0));
        assert_eq!(schedule.poll(ms(249)), 0);
        assert_eq!(schedule.poll(ms(250)), 1);
        assert_eq!(schedule.poll(ms(251)), 0);
    }

    #[test]
    fn test_catch_up_after_stall() {
        let mut schedule = EmissionSchedule::new(&EmissionProfile::new(250, 2), ms(100));
        assert_eq!(schedule.poll(ms(1100)), 4);
        assert_eq!(schedule.ticks(), 4);
        assert_eq!(schedule.per_tick(), 2);
    }

    #[test]
    fn test_cancel_once() {
        let mut schedule = EmissionSchedule::new(&EmissionProfile::new(250, 1), ms(0));
        assert!(schedule.cancel());
        assert!(!schedule.cancel());
        assert_eq!(schedule.poll(ms(10_000)), 0);
    }
}
