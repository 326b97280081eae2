//! Ephemeral visual effects
//!
//! Two fields share one lifecycle: a floating particle field over the whole
//! viewport and a glyph rain inside a bounded container. Both spawn on a
//! recurring schedule, let every instance remove itself when its animation
//! completes, and clear their stage on unmount.

mod animation;
mod device;
mod driver;
mod field;
mod glyphs;
mod particles;
mod schedule;
mod stage;

pub use animation::{Animation, Easing, Keyframe};
pub use device::{DeviceClass, Viewport};
pub use driver::{run_realtime, run_virtual};
pub use field::{Emitter, Field, FieldStats, Spawn};
pub use glyphs::{mount_glyph_rain, GlyphEmitter, GlyphRain};
pub use particles::{mount_particles, ParticleEmitter, ParticleField};
pub use schedule::EmissionSchedule;
pub use stage::{Element, ElementKind, NodeId, Stage};
