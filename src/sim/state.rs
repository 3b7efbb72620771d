//! Simulation state and core types
//!
//! Everything the renderer needs to paint a frame lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Phase of the transmission choreography
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Stage {
    /// Waiting for a message
    #[default]
    Idle,
    /// Message is being turned into bits at the sender
    Encoding,
    /// Bits climb the sender tower
    RisingBits,
    /// Laser crosses from sender to receiver
    LaserBeam,
    /// Bits drop down the receiver tower
    DescendingBits,
    /// Receiver turns bits back into text
    Decoding,
    /// Transmission finished
    Complete,
}

impl Stage {
    /// Every stage a successful run passes through, in order
    pub const RUN_ORDER: [Stage; 6] = [
        Stage::Encoding,
        Stage::RisingBits,
        Stage::LaserBeam,
        Stage::DescendingBits,
        Stage::Decoding,
        Stage::Complete,
    ];

    /// The stage that follows this one. Idle and Complete have none.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Idle | Stage::Complete => None,
            Stage::Encoding => Some(Stage::RisingBits),
            Stage::RisingBits => Some(Stage::LaserBeam),
            Stage::LaserBeam => Some(Stage::DescendingBits),
            Stage::DescendingBits => Some(Stage::Decoding),
            Stage::Decoding => Some(Stage::Complete),
        }
    }

    /// Position in the choreography (Idle = 0, Complete = 6)
    pub fn index(self) -> u8 {
        match self {
            Stage::Idle => 0,
            Stage::Encoding => 1,
            Stage::RisingBits => 2,
            Stage::LaserBeam => 3,
            Stage::DescendingBits => 4,
            Stage::Decoding => 5,
            Stage::Complete => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::Encoding => "encoding",
            Stage::RisingBits => "rising-bits",
            Stage::LaserBeam => "laser-beam",
            Stage::DescendingBits => "descending-bits",
            Stage::Decoding => "decoding",
            Stage::Complete => "complete",
        }
    }
}

/// Which tower a bit is travelling along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TravelPhase {
    /// Sender device -> sender tower top
    Rising,
    /// Receiver tower top -> receiver device
    Descending,
}

/// One encoded bit in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitParticle {
    pub pos: Vec2,
    pub target_y: f32,
    pub value: bool,
    /// Vertical speed in units per frame
    pub speed: f32,
    pub phase: TravelPhase,
}

impl BitParticle {
    /// A bit leaving the sender device
    pub fn rising(origin: Vec2, target_y: f32, value: bool, speed: f32) -> Self {
        Self {
            pos: origin,
            target_y,
            value,
            speed,
            phase: TravelPhase::Rising,
        }
    }

    pub fn arrived(&self) -> bool {
        self.pos.y == self.target_y
    }

    /// Move one frame toward the target, snapping on arrival.
    /// Returns true once the target is reached.
    pub fn step(&mut self) -> bool {
        match self.phase {
            TravelPhase::Rising => {
                if self.pos.y > self.target_y {
                    self.pos.y = (self.pos.y - self.speed).max(self.target_y);
                } else {
                    self.pos.y = self.target_y;
                }
            }
            TravelPhase::Descending => {
                if self.pos.y < self.target_y {
                    self.pos.y = (self.pos.y + self.speed).min(self.target_y);
                } else {
                    self.pos.y = self.target_y;
                }
            }
        }
        self.arrived()
    }

    /// Hand the bit over to the receiver tower
    pub fn relocate_descending(&mut self, receiver_x: f32, target_y: f32) {
        self.pos.x = receiver_x;
        self.target_y = target_y;
        self.speed = DESCEND_SPEED;
        self.phase = TravelPhase::Descending;
    }
}

/// Expanding, fading ring shown once a transmission completes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuccessPulse {
    pub center: Vec2,
    pub radius: f32,
}

impl SuccessPulse {
    pub fn new(center: Vec2) -> Self {
        Self {
            center,
            radius: PULSE_START_RADIUS,
        }
    }

    /// Opacity falls linearly to zero at the maximum radius
    pub fn opacity(&self) -> f32 {
        (1.0 - self.radius / PULSE_MAX_RADIUS).clamp(0.0, 1.0)
    }

    pub fn grow(&mut self) {
        self.radius += PULSE_GROWTH;
    }

    pub fn finished(&self) -> bool {
        self.radius >= PULSE_MAX_RADIUS
    }
}

/// Complete simulation state for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub stage: Stage,
    pub is_running: bool,
    /// Divisor applied to every stage delay (> 0)
    pub speed_factor: f64,
    /// Wall-clock time the run started (ms)
    pub start_time: f64,
    /// Trimmed message being sent
    pub message: String,
    /// Encoded message, fixed for the whole run
    pub payload: Vec<bool>,
    /// Laser crossing progress in [0, 1]
    pub laser_progress: f64,
    /// Bits in flight (in spawn order)
    pub particles: Vec<BitParticle>,
    /// Text recovered by the receiver
    pub decoded: Option<String>,
    /// Run duration, set on completion (ms)
    pub elapsed_ms: Option<f64>,
    pub pulse: Option<SuccessPulse>,
    /// Frames stepped since the session began
    pub frames: u64,
}

impl SimulationState {
    /// Fresh idle state
    pub fn new(speed_factor: f64) -> Self {
        Self {
            stage: Stage::Idle,
            is_running: false,
            speed_factor,
            start_time: 0.0,
            message: String::new(),
            payload: Vec::new(),
            laser_progress: 0.0,
            particles: Vec::new(),
            decoded: None,
            elapsed_ms: None,
            pulse: None,
            frames: 0,
        }
    }

    pub fn bit_count(&self) -> usize {
        self.payload.len()
    }

    /// True when every particle has been spawned and reached its target
    pub fn all_bits_arrived(&self, phase: TravelPhase) -> bool {
        self.particles.len() == self.payload.len()
            && self
                .particles
                .iter()
                .all(|p| p.phase == phase && p.arrived())
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new(f64::from(SPEED_DEFAULT))
    }
}
