//! Transmission simulation
//!
//! All sequencing logic lives here. This module must stay deterministic:
//! - Time is passed in by the caller, never read from the platform
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod layout;
pub mod sequencer;
pub mod state;
pub mod timers;

pub use layout::Layout;
pub use sequencer::{DEMO_MESSAGES, DelayKind, SimEvent, StageSequencer};
pub use state::{BitParticle, SimulationState, Stage, SuccessPulse, TravelPhase};
pub use timers::{TimerHandle, TimerQueue};
