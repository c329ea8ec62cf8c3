//! Cave Runner - procedural scrolling cave for an endless runner
//!
//! Core modules:
//! - `sim`: Frame-stepped world generation (cave stream, hazards, pickups)
//! - `settings`: Validated, data-driven tuning

pub mod settings;
pub mod sim;

pub use settings::{ConfigError, DiamondSettings, WorldSettings};

/// Frame constants
pub mod consts {
    /// Largest frame delta accepted by the stream; hitches beyond this are clamped
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Step used by the headless host (60 Hz)
    pub const DEMO_DT: f32 = 1.0 / 60.0;
}

/// Move `current` toward `target` by at most `max_delta`
#[inline]
pub fn move_towards(current: glam::Vec2, target: glam::Vec2, max_delta: f32) -> glam::Vec2 {
    let delta = target - current;
    let dist = delta.length();
    if dist <= max_delta || dist <= f32::EPSILON {
        target
    } else {
        current + delta / dist * max_delta
    }
}
