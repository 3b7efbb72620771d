//! Scene geometry derived from the drawing surface size
//!
//! Recomputed whenever the host resizes the canvas.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_HEIGHT, TOWER_HEIGHT};

/// Horizontal position of the sender tower (fraction of width)
pub const SENDER_X_FRACTION: f32 = 0.25;
/// Horizontal position of the receiver tower (fraction of width)
pub const RECEIVER_X_FRACTION: f32 = 0.75;
/// Ground line / tower base (fraction of height)
pub const GROUND_FRACTION: f32 = 0.7;
/// Figure center below the tower base
pub const PERSON_OFFSET: f32 = 35.0;
/// Device panel center below the tower base
pub const DEVICE_OFFSET: f32 = 75.0;

/// Cached positions of the towers, figures and device panels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub sender_x: f32,
    pub receiver_x: f32,
    /// Tower base, on the ground line
    pub tower_base_y: f32,
    /// Top of the tower shaft, where the laser lamp sits
    pub tower_top_y: f32,
    pub person_y: f32,
    pub device_y: f32,
}

impl Layout {
    /// Layout for a surface of the given width and the fixed scene height
    pub fn new(width: f32) -> Self {
        Self::with_size(width, CANVAS_HEIGHT)
    }

    pub fn with_size(width: f32, height: f32) -> Self {
        let width = width.max(1.0);
        let tower_base_y = height * GROUND_FRACTION;
        Self {
            width,
            height,
            sender_x: width * SENDER_X_FRACTION,
            receiver_x: width * RECEIVER_X_FRACTION,
            tower_base_y,
            tower_top_y: tower_base_y - TOWER_HEIGHT,
            person_y: tower_base_y + PERSON_OFFSET,
            device_y: tower_base_y + DEVICE_OFFSET,
        }
    }

    /// Where bits leave the sender device
    pub fn sender_device(&self) -> Vec2 {
        Vec2::new(self.sender_x, self.device_y)
    }

    /// Where the success pulse is centered
    pub fn receiver_device(&self) -> Vec2 {
        Vec2::new(self.receiver_x, self.device_y)
    }

    /// Laser lamp on top of the sender tower
    pub fn sender_lamp(&self) -> Vec2 {
        Vec2::new(self.sender_x, self.tower_top_y)
    }

    /// Point along the beam for a progress in [0, 1]
    pub fn beam_point(&self, progress: f32) -> Vec2 {
        let t = progress.clamp(0.0, 1.0);
        Vec2::new(
            self.sender_x + (self.receiver_x - self.sender_x) * t,
            self.tower_top_y,
        )
    }

    /// Height of the ground band
    pub fn ground_height(&self) -> f32 {
        self.height - self.tower_base_y
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(800.0)
    }
}
