//! Laser Link - an animated optical line-of-sight data link
//!
//! Core modules:
//! - `codec`: Fixed-width text <-> bit encoding
//! - `sim`: Stage sequencer, particles and timers (no rendering or platform dependencies)
//! - `renderer`: Scene painting onto an abstract 2D drawing surface
//! - `settings`: Run speed and visual quality
//! - `ui`: Status line and transmission report shown by the host page

pub mod codec;
pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use error::StartError;
pub use settings::{QualityPreset, Settings};

/// Choreography and scene constants
pub mod consts {
    /// Base stage delays in milliseconds (divided by the speed factor)
    pub const ENCODING_DELAY_MS: f64 = 1500.0;
    pub const BIT_SPAWN_INTERVAL_MS: f64 = 200.0;
    pub const RISE_SETTLE_DELAY_MS: f64 = 1000.0;
    pub const LASER_DURATION_MS: f64 = 2000.0;
    pub const DESCEND_SETTLE_DELAY_MS: f64 = 500.0;
    pub const DECODING_DELAY_MS: f64 = 1500.0;

    /// Delay between picking a demo message and starting it (not speed-scaled)
    pub const DEMO_START_DELAY_MS: f64 = 500.0;

    /// Rising bits pick a speed in [MIN, MAX) units per frame
    pub const RISE_SPEED_MIN: f32 = 2.0;
    pub const RISE_SPEED_MAX: f32 = 4.0;
    /// Descending bits all fall at this speed (units per frame)
    pub const DESCEND_SPEED: f32 = 3.0;

    /// Success pulse ring
    pub const PULSE_START_RADIUS: f32 = 5.0;
    pub const PULSE_MAX_RADIUS: f32 = 30.0;
    pub const PULSE_GROWTH: f32 = 1.0;

    /// Scene geometry
    pub const CANVAS_HEIGHT: f32 = 384.0;
    pub const TOWER_WIDTH: f32 = 30.0;
    pub const TOWER_HEIGHT: f32 = 200.0;
    pub const PERSON_SIZE: f32 = 30.0;
    pub const BIT_RADIUS: f32 = 6.0;

    /// Speed control range of the host slider
    pub const SPEED_MIN: u32 = 1;
    pub const SPEED_MAX: u32 = 10;
    pub const SPEED_DEFAULT: u32 = 5;
}

/// Scale a base delay by the user's speed factor
#[inline]
pub fn scaled_delay(base_ms: f64, speed_factor: f64) -> f64 {
    base_ms / speed_factor
}
