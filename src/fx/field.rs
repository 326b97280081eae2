//! Mounted effect fields
//!
//! A [`Field`] owns a stage, an emission schedule and the in-flight
//! animations of everything it spawned. Each instance removes itself when its
//! animation finishes; unmounting cancels the schedule and clears whatever is
//! still on the stage, so no element outlives the field.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use super::{Animation, DeviceClass, EmissionSchedule, Element, NodeId, Stage};
use crate::config::EmissionProfile;

/// A freshly generated instance, not yet on the stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawn {
    pub element: Element,
    pub animation: Animation,
}

/// Generates instances for a field
pub trait Emitter {
    /// Short name used in diagnostics
    fn name(&self) -> &'static str;

    /// Emission tuning for a device class
    fn profile(&self, class: DeviceClass) -> EmissionProfile;

    /// Draw one randomized instance inside the stage bounds
    fn spawn<R: Rng + ?Sized>(&self, rng: &mut R, stage: &Stage, now: Duration) -> Spawn;

    /// Upper bound on any instance's animation length
    fn max_duration(&self) -> Duration;
}

/// Counters for one mount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldStats {
    pub device_class: DeviceClass,
    pub ticks: u64,
    pub spawned: u64,
    /// Removed by their own completion
    pub completed: u64,
    /// Removed by teardown
    pub reclaimed: u64,
    /// Currently on the stage
    pub live: usize,
}

struct Flight {
    node: NodeId,
    animation: Animation,
}

/// A mounted effect; dropping or unmounting it tears everything down
pub struct Field<E, R = StdRng> {
    emitter: E,
    stage: Stage,
    class: DeviceClass,
    profile: EmissionProfile,
    schedule: EmissionSchedule,
    /// Pending initial-burst spawn times, latest first
    burst: Vec<Duration>,
    flights: Vec<Flight>,
    rng: R,
    spawned: u64,
    completed: u64,
    reclaimed: u64,
}

impl<E: Emitter, R: Rng> Field<E, R> {
    /// Start emitting onto `stage` with the profile for `class`
    pub fn mount(emitter: E, stage: Stage, class: DeviceClass, mut rng: R, now: Duration) -> Self {
        let profile = emitter.profile(class);
        let schedule = EmissionSchedule::new(&profile, now);

        let window = profile.burst_window();
        let mut burst: Vec<Duration> = (0..profile.initial_burst)
            .map(|_| now + window.mul_f64(rng.gen::<f64>()))
            .collect();
        burst.sort_unstable_by(|a, b| b.cmp(a));

        debug!(
            "Mounted {} field ({:?}, every {:?} x{}, burst {})",
            emitter.name(),
            class,
            schedule.interval(),
            schedule.per_tick(),
            burst.len()
        );

        Self {
            emitter,
            stage,
            class,
            profile,
            schedule,
            burst,
            flights: Vec::new(),
            rng,
            spawned: 0,
            completed: 0,
            reclaimed: 0,
        }
    }

    /// Advance animations, fire completions and run due spawns
    pub fn update(&mut self, now: Duration) {
        if !self.is_mounted() {
            return;
        }

        self.advance(now);

        let ticks = self.schedule.poll(now);
        let count = ticks as usize * self.schedule.per_tick();
        for _ in 0..count {
            self.spawn_one(now);
        }

        while let Some(&due) = self.burst.last() {
            if due > now {
                break;
            }
            self.burst.pop();
            self.spawn_one(now);
        }
    }

    fn advance(&mut self, now: Duration) {
        let stage = &mut self.stage;
        let mut completed = 0;

        self.flights.retain(|flight| {
            if flight.animation.is_finished(now) {
                // Finish event: the instance removes itself
                if !stage.remove(flight.node) {
                    debug!("Finished node {:?} was already removed", flight.node);
                }
                completed += 1;
                return false;
            }
            match stage.get_mut(flight.node) {
                Some(element) => {
                    let frame = flight.animation.sample(now);
                    element.translate = frame.translate;
                    element.opacity = frame.opacity;
                    true
                }
                None => false,
            }
        });

        self.completed += completed;
    }

    fn spawn_one(&mut self, now: Duration) {
        let Spawn { mut element, animation } = self.emitter.spawn(&mut self.rng, &self.stage, now);
        let frame = animation.sample(now);
        element.translate = frame.translate;
        element.opacity = frame.opacity;

        let node = self.stage.append(element);
        self.flights.push(Flight { node, animation });
        self.spawned += 1;
    }

    pub fn emitter(&self) -> &E {
        &self.emitter
    }
}

impl<E, R> Field<E, R> {
    /// Cancel emission and remove every element still on the stage
    ///
    /// Returns the number of elements reclaimed; later calls return 0.
    pub fn unmount(&mut self) -> usize {
        if !self.schedule.cancel() {
            return 0;
        }
        self.burst.clear();
        self.flights.clear();

        let reclaimed = self.stage.clear();
        self.reclaimed += reclaimed as u64;
        debug!("Unmounted field, reclaimed {} elements", reclaimed);
        reclaimed
    }

    pub fn is_mounted(&self) -> bool {
        !self.schedule.is_cancelled()
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn device_class(&self) -> DeviceClass {
        self.class
    }

    pub fn profile(&self) -> &EmissionProfile {
        &self.profile
    }

    /// Instances whose animation has not finished yet
    pub fn in_flight(&self) -> usize {
        self.flights.len()
    }

    pub fn stats(&self) -> FieldStats {
        FieldStats {
            device_class: self.class,
            ticks: self.schedule.ticks(),
            spawned: self.spawned,
            completed: self.completed,
            reclaimed: self.reclaimed,
            live: self.stage.child_count(),
        }
    }
}

impl<E, R> Drop for Field<E, R> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::{Easing, ElementKind, Keyframe};
    use rand::SeedableRng;

    /// Emits one dot per tick that lives exactly `life`
    struct Fixed {
        life: Duration,
        profile: EmissionProfile,
    }

    impl Emitter for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn profile(&self, _class: DeviceClass) -> EmissionProfile {
            self.profile
        }

        fn spawn<R: Rng + ?Sized>(&self, _rng: &mut R, _stage: &Stage, now: Duration) -> Spawn {
            Spawn {
                element: Element::new(ElementKind::Particle { size: 1.0 }, 0.0, 0.0, 1.0),
                animation: Animation::new(
                    Keyframe::new((0.0, 0.0), 1.0),
                    Keyframe::new((10.0, 0.0), 0.0),
                    now,
                    self.life,
                    Easing::Linear,
                ),
            }
        }

        fn max_duration(&self) -> Duration {
            self.life
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn fixed_field(interval: u64, life: u64) -> Field<Fixed> {
        let emitter = Fixed {
            life: ms(life),
            profile: EmissionProfile::new(interval, 1),
        };
        Field::mount(
            emitter,
            Stage::new(100.0, 100.0),
            DeviceClass::Desktop,
            StdRng::seed_from_u64(1),
            ms(0),
        )
    }

    #[test]
    fn test_spawns_on_tick() {
        let mut field = fixed_field(100, 1000);
        field.update(ms(50));
        assert_eq!(field.stage().child_count(), 0);
        field.update(ms(100));
        assert_eq!(field.stage().child_count(), 1);
        assert_eq!(field.stats().ticks, 1);
    }

    #[test]
    fn test_instances_remove_themselves() {
        let mut field = fixed_field(100, 150);
        field.update(ms(100));
        field.update(ms(200));
        assert_eq!(field.stage().child_count(), 2);

        // First instance finishes at 250
        field.update(ms(250));
        assert_eq!(field.stats().completed, 1);
        assert_eq!(field.stage().child_count(), 1);
    }

    #[test]
    fn test_animation_applied_to_element() {
        let mut field = fixed_field(100, 1000);
        field.update(ms(100));
        field.update(ms(600));

        let (_, element) = field.stage().iter().next().unwrap();
        assert!((element.translate.0 - 5.0).abs() < 1e-3);
        assert!((element.opacity - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_unmount_reclaims_in_flight() {
        let mut field = fixed_field(100, 10_000);
        for t in (0..=1000).step_by(50) {
            field.update(ms(t));
        }
        assert_eq!(field.in_flight(), 10);

        assert_eq!(field.unmount(), 10);
        assert_eq!(field.stage().child_count(), 0);
        assert_eq!(field.in_flight(), 0);
        assert!(!field.is_mounted());

        // Idempotent, and updates after teardown spawn nothing
        assert_eq!(field.unmount(), 0);
        field.update(ms(5000));
        assert_eq!(field.stage().child_count(), 0);
        assert_eq!(field.stats().reclaimed, 10);
    }

    #[test]
    fn test_burst_spread_over_window() {
        let emitter = Fixed {
            life: ms(60_000),
            profile: EmissionProfile::new(10_000, 1).with_burst(20, 2000),
        };
        let mut field = Field::mount(
            emitter,
            Stage::new(100.0, 100.0),
            DeviceClass::Desktop,
            StdRng::seed_from_u64(9),
            ms(0),
        );
        field.update(ms(0));
        let early = field.stats().spawned;
        field.update(ms(2000));
        assert_eq!(field.stats().spawned, 20);
        assert!(early < 20);
    }
}
