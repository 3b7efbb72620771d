//! Stage sequencer
//!
//! Drives the fixed choreography Encoding -> RisingBits -> LaserBeam ->
//! DescendingBits -> Decoding -> Complete. Stage delays go through the timer
//! queue; particle motion, laser interpolation and the success pulse advance
//! once per animation frame in `frame`.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::layout::Layout;
use super::state::{BitParticle, SimulationState, Stage, SuccessPulse, TravelPhase};
use super::timers::{TimerHandle, TimerQueue};
use crate::codec;
use crate::consts::*;
use crate::error::StartError;
use crate::scaled_delay;
use crate::settings::Settings;

/// Messages picked by `run_demo`
pub const DEMO_MESSAGES: [&str; 5] = [
    "Hello from optical communications",
    "Li-Fi is the future of the internet",
    "Lasers carry data at the speed of light",
    "An innovative engineering graduation project",
    "Optical links are faster and more secure",
];

/// Speed-scaled delays of the choreography
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayKind {
    /// Time spent in Encoding
    Encoding,
    /// Gap between two bits leaving the sender device
    BitSpawn,
    /// Pause after every bit reached the sender tower top
    RiseSettle,
    /// Time for the beam to cross
    LaserBeam,
    /// Pause after every bit reached the receiver device
    DescendSettle,
    /// Time spent in Decoding
    Decoding,
}

impl DelayKind {
    pub const ALL: [DelayKind; 6] = [
        DelayKind::Encoding,
        DelayKind::BitSpawn,
        DelayKind::RiseSettle,
        DelayKind::LaserBeam,
        DelayKind::DescendSettle,
        DelayKind::Decoding,
    ];

    /// Delay at speed factor 1 (ms)
    pub fn base_ms(self) -> f64 {
        match self {
            DelayKind::Encoding => ENCODING_DELAY_MS,
            DelayKind::BitSpawn => BIT_SPAWN_INTERVAL_MS,
            DelayKind::RiseSettle => RISE_SETTLE_DELAY_MS,
            DelayKind::LaserBeam => LASER_DURATION_MS,
            DelayKind::DescendSettle => DESCEND_SETTLE_DELAY_MS,
            DelayKind::Decoding => DECODING_DELAY_MS,
        }
    }
}

/// Notifications for the host page, drained once per frame
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    StageEntered(Stage),
    /// A demo message was picked and will start shortly
    DemoSelected(String),
    /// The receiver recovered this text
    Decoded(String),
    Completed { elapsed_ms: f64 },
    /// The delayed demo start was refused
    DemoRejected(StartError),
}

/// Continuations waiting in the timer queue
#[derive(Debug, Clone, PartialEq)]
enum TimerEvent {
    /// Leave the given stage (ignored if the stage has already changed)
    Advance(Stage),
    /// Release the next bit from the sender device
    SpawnBit,
    StartDemo(String),
}

/// Owns the simulation state and moves it through the stages
#[derive(Debug)]
pub struct StageSequencer {
    state: SimulationState,
    layout: Layout,
    timers: TimerQueue<TimerEvent>,
    rng: Pcg32,
    events: Vec<SimEvent>,
    /// Bits released so far in RisingBits
    spawned: usize,
    /// Exit delay of the current particle stage already queued
    settle_scheduled: bool,
    laser_started_at: f64,
    laser_duration: f64,
    pulse_enabled: bool,
    demo_pending: Option<TimerHandle>,
}

impl StageSequencer {
    pub fn new(seed: u64, speed_factor: f64, layout: Layout) -> Self {
        Self {
            state: SimulationState::new(speed_factor),
            layout,
            timers: TimerQueue::new(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            spawned: 0,
            settle_scheduled: false,
            laser_started_at: 0.0,
            laser_duration: 0.0,
            pulse_enabled: true,
            demo_pending: None,
        }
    }

    /// Build from host settings; `fallback_seed` is used when no seed is configured
    pub fn from_settings(settings: &Settings, fallback_seed: u64, layout: Layout) -> Self {
        let seed = settings.seed.unwrap_or(fallback_seed);
        let mut sequencer = Self::new(seed, settings.speed_factor(), layout);
        sequencer.pulse_enabled = settings.success_pulse();
        sequencer
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Replace the scene geometry; bits in flight follow their tower
    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
        for bit in &mut self.state.particles {
            match bit.phase {
                TravelPhase::Rising => {
                    bit.pos.x = layout.sender_x;
                    bit.target_y = layout.tower_top_y;
                }
                TravelPhase::Descending => {
                    bit.pos.x = layout.receiver_x;
                    bit.target_y = layout.device_y;
                }
            }
        }
        if let Some(pulse) = self.state.pulse.as_mut() {
            pulse.center = layout.receiver_device();
        }
    }

    /// Change the speed factor; applies to delays scheduled from now on
    pub fn set_speed_factor(&mut self, speed_factor: f64) {
        if !speed_factor.is_finite() || speed_factor <= 0.0 {
            log::warn!("Ignoring invalid speed factor {speed_factor}");
            return;
        }
        self.state.speed_factor = speed_factor;
    }

    /// Delay for `kind` at the current speed factor (ms)
    pub fn stage_delay(&self, kind: DelayKind) -> f64 {
        scaled_delay(kind.base_ms(), self.state.speed_factor)
    }

    /// Whether the host should keep requesting animation frames
    pub fn wants_frames(&self) -> bool {
        self.state.is_running
            || self.state.stage != Stage::Idle
            || !self.timers.is_empty()
            || self.state.pulse.is_some()
    }

    /// Take the notifications raised since the last call
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Begin transmitting `message`
    pub fn start(&mut self, message: &str, now: f64) -> Result<(), StartError> {
        if self.state.is_running {
            log::debug!("Start ignored: transmission already running");
            return Err(StartError::AlreadyRunning);
        }
        let message = message.trim();
        if message.is_empty() {
            log::warn!("Start rejected: empty message");
            return Err(StartError::EmptyMessage);
        }

        let frames = self.state.frames;
        self.state = SimulationState::new(self.state.speed_factor);
        self.state.frames = frames;
        self.state.is_running = true;
        self.state.start_time = now;
        self.state.message = message.to_string();
        self.state.payload = codec::encode(message);
        self.spawned = 0;
        self.settle_scheduled = false;

        log::info!(
            "Transmitting {} chars as {} bits",
            message.chars().count(),
            self.state.payload.len()
        );
        self.enter_stage(Stage::Encoding, now);
        Ok(())
    }

    /// Cancel everything and return to a fresh idle state
    pub fn reset(&mut self) {
        self.timers.cancel_all();
        self.state = SimulationState::new(self.state.speed_factor);
        self.spawned = 0;
        self.settle_scheduled = false;
        self.laser_started_at = 0.0;
        self.laser_duration = 0.0;
        self.demo_pending = None;
        self.events.clear();
        self.events.push(SimEvent::StageEntered(Stage::Idle));
        log::info!("Simulation reset");
    }

    /// Pick a random demo message and start it after a short pause
    pub fn run_demo(&mut self, now: f64) -> &'static str {
        let message = DEMO_MESSAGES[self.rng.random_range(0..DEMO_MESSAGES.len())];
        if let Some(handle) = self.demo_pending.take() {
            self.timers.cancel(handle);
        }
        self.demo_pending = Some(self.timers.schedule(
            now,
            DEMO_START_DELAY_MS,
            TimerEvent::StartDemo(message.to_string()),
        ));
        self.events.push(SimEvent::DemoSelected(message.to_string()));
        log::info!("Demo selected: {message}");
        message
    }

    /// Advance one animation frame at wall-clock time `now` (ms)
    pub fn frame(&mut self, now: f64) {
        self.state.frames += 1;

        while let Some((due, event)) = self.timers.pop_due(now) {
            self.on_timer(event, due, now);
        }

        match self.state.stage {
            Stage::RisingBits => self.move_bits(TravelPhase::Rising, DelayKind::RiseSettle, now),
            Stage::LaserBeam => self.update_laser(now),
            Stage::DescendingBits => {
                self.move_bits(TravelPhase::Descending, DelayKind::DescendSettle, now)
            }
            _ => {}
        }

        if let Some(pulse) = self.state.pulse.as_mut() {
            pulse.grow();
            if pulse.finished() {
                self.state.pulse = None;
            }
        }
    }

    /// `due` is when the timer was meant to fire, `now` the frame handling it
    fn on_timer(&mut self, event: TimerEvent, due: f64, now: f64) {
        match event {
            TimerEvent::Advance(from) => {
                if from == self.state.stage {
                    self.advance(now);
                } else {
                    log::debug!("Stale advance from {:?} ignored", from);
                }
            }
            TimerEvent::SpawnBit => self.spawn_bit(due),
            TimerEvent::StartDemo(message) => {
                self.demo_pending = None;
                if let Err(e) = self.start(&message, now) {
                    log::warn!("Demo not started: {e}");
                    self.events.push(SimEvent::DemoRejected(e));
                }
            }
        }
    }

    /// Move to the next stage in the fixed order
    fn advance(&mut self, now: f64) {
        let Some(next) = self.state.stage.next() else {
            return;
        };
        if self.state.stage == Stage::Decoding {
            let text = codec::decode(&self.state.payload);
            self.events.push(SimEvent::Decoded(text.clone()));
            self.state.decoded = Some(text);
        }
        self.enter_stage(next, now);
    }

    fn enter_stage(&mut self, stage: Stage, now: f64) {
        log::info!("Stage: {:?} -> {:?}", self.state.stage, stage);
        self.state.stage = stage;
        self.events.push(SimEvent::StageEntered(stage));

        match stage {
            Stage::Encoding => {
                let delay = self.stage_delay(DelayKind::Encoding);
                self.timers.schedule(now, delay, TimerEvent::Advance(stage));
            }
            Stage::RisingBits => {
                self.spawned = 0;
                self.settle_scheduled = false;
                let delay = self.stage_delay(DelayKind::BitSpawn);
                self.timers.schedule(now, delay, TimerEvent::SpawnBit);
            }
            Stage::LaserBeam => {
                self.state.laser_progress = 0.0;
                self.laser_started_at = now;
                self.laser_duration = self.stage_delay(DelayKind::LaserBeam);
            }
            Stage::DescendingBits => {
                self.settle_scheduled = false;
            }
            Stage::Decoding => {
                let delay = self.stage_delay(DelayKind::Decoding);
                self.timers.schedule(now, delay, TimerEvent::Advance(stage));
            }
            Stage::Complete => {
                let elapsed = now - self.state.start_time;
                self.state.elapsed_ms = Some(elapsed);
                self.state.is_running = false;
                if self.pulse_enabled {
                    self.state.pulse = Some(SuccessPulse::new(self.layout.receiver_device()));
                }
                self.events.push(SimEvent::Completed { elapsed_ms: elapsed });
                log::info!("Transmission complete in {elapsed:.0}ms");
            }
            Stage::Idle => {}
        }
    }

    /// Release the next bit; the following one is timed from `due`, so late
    /// frames release every overdue bit at once instead of drifting
    fn spawn_bit(&mut self, due: f64) {
        if self.state.stage != Stage::RisingBits {
            return;
        }
        let Some(&value) = self.state.payload.get(self.spawned) else {
            return;
        };
        let speed = self.rng.random_range(RISE_SPEED_MIN..RISE_SPEED_MAX);
        self.state.particles.push(BitParticle::rising(
            self.layout.sender_device(),
            self.layout.tower_top_y,
            value,
            speed,
        ));
        self.spawned += 1;

        if self.spawned < self.state.payload.len() {
            let delay = self.stage_delay(DelayKind::BitSpawn);
            self.timers.schedule(due, delay, TimerEvent::SpawnBit);
        } else {
            log::debug!("All {} bits released", self.spawned);
        }
    }

    /// Step every particle in `phase`; once all arrived, queue the exit delay
    fn move_bits(&mut self, phase: TravelPhase, settle: DelayKind, now: f64) {
        for bit in self.state.particles.iter_mut().filter(|b| b.phase == phase) {
            bit.step();
        }
        if !self.settle_scheduled && self.state.all_bits_arrived(phase) {
            self.settle_scheduled = true;
            let delay = self.stage_delay(settle);
            let stage = self.state.stage;
            self.timers.schedule(now, delay, TimerEvent::Advance(stage));
        }
    }

    fn update_laser(&mut self, now: f64) {
        let progress = if self.laser_duration > 0.0 {
            ((now - self.laser_started_at) / self.laser_duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.state.laser_progress = self.state.laser_progress.max(progress);

        if self.state.laser_progress >= 1.0 {
            self.state.laser_progress = 1.0;
            let receiver_x = self.layout.receiver_x;
            let target_y = self.layout.device_y;
            for bit in &mut self.state.particles {
                bit.relocate_descending(receiver_x, target_y);
            }
            self.advance(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME_MS: f64 = 16.0;

    fn sequencer(speed: f64) -> StageSequencer {
        StageSequencer::new(42, speed, Layout::new(800.0))
    }

    /// Step frames from `start` until `done` holds; returns the final time
    fn run_until(
        seq: &mut StageSequencer,
        start: f64,
        mut done: impl FnMut(&StageSequencer) -> bool,
    ) -> f64 {
        let mut now = start;
        for _ in 0..20_000 {
            if done(&*seq) {
                return now;
            }
            now += FRAME_MS;
            seq.frame(now);
        }
        panic!("condition never reached, stuck in {:?}", seq.state().stage);
    }

    fn entered_stages(events: &[SimEvent]) -> Vec<Stage> {
        events
            .iter()
            .filter_map(|e| match e {
                SimEvent::StageEntered(stage) => Some(*stage),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_start_rejects_empty_message() {
        let mut seq = sequencer(5.0);
        assert_eq!(seq.start("", 0.0), Err(StartError::EmptyMessage));
        assert_eq!(seq.start("   \t", 0.0), Err(StartError::EmptyMessage));
        assert_eq!(seq.state(), &SimulationState::new(5.0));
        assert!(seq.drain_events().is_empty());
        assert!(!seq.wants_frames());
    }

    #[test]
    fn test_start_while_running_is_noop() {
        let mut seq = sequencer(5.0);
        seq.start("Hi", 0.0).unwrap();
        seq.frame(16.0);
        let before = seq.state().clone();

        assert_eq!(seq.start("Other", 32.0), Err(StartError::AlreadyRunning));
        assert_eq!(seq.state(), &before);
    }

    #[test]
    fn test_start_trims_and_encodes() {
        let mut seq = sequencer(5.0);
        seq.start("  Hi  ", 100.0).unwrap();
        let state = seq.state();
        assert_eq!(state.stage, Stage::Encoding);
        assert!(state.is_running);
        assert_eq!(state.message, "Hi");
        assert_eq!(state.bit_count(), 16);
        assert_eq!(state.start_time, 100.0);
        assert!(state.particles.is_empty());
        assert_eq!(state.laser_progress, 0.0);
    }

    #[test]
    fn test_full_run_visits_every_stage_once() {
        let mut seq = sequencer(5.0);
        seq.start("Hi", 0.0).unwrap();
        let end = run_until(&mut seq, 0.0, |s| s.state().stage == Stage::Complete);

        let events = seq.drain_events();
        assert_eq!(entered_stages(&events), Stage::RUN_ORDER.to_vec());
        assert!(events.contains(&SimEvent::Decoded("Hi".to_string())));

        let state = seq.state();
        assert_eq!(state.decoded.as_deref(), Some("Hi"));
        assert!(!state.is_running);
        assert_eq!(state.elapsed_ms, Some(end));
        assert!(state.pulse.is_some());
        // Complete keeps the render loop alive until reset
        assert!(seq.wants_frames());
    }

    #[test]
    fn test_encoding_lasts_scaled_delay() {
        let mut seq = sequencer(5.0);
        seq.start("A", 1000.0).unwrap();
        seq.frame(1299.0);
        assert_eq!(seq.state().stage, Stage::Encoding);
        seq.frame(1300.0);
        assert_eq!(seq.state().stage, Stage::RisingBits);
    }

    #[test]
    fn test_rising_bits_spawn_one_per_bit() {
        let mut seq = sequencer(5.0);
        seq.start("Hi", 0.0).unwrap();
        run_until(&mut seq, 0.0, |s| s.state().stage == Stage::LaserBeam);

        let state = seq.state();
        assert_eq!(state.particles.len(), 16);
        let layout = *seq.layout();
        for (bit, &value) in state.particles.iter().zip(&state.payload) {
            assert_eq!(bit.value, value);
            assert_eq!(bit.pos, glam::Vec2::new(layout.sender_x, layout.tower_top_y));
            assert!(bit.speed >= RISE_SPEED_MIN && bit.speed < RISE_SPEED_MAX);
        }
    }

    #[test]
    fn test_laser_progress_monotonic_and_reaches_one() {
        let mut seq = sequencer(5.0);
        seq.start("Hi", 0.0).unwrap();
        let mut now = run_until(&mut seq, 0.0, |s| s.state().stage == Stage::LaserBeam);

        let mut last = seq.state().laser_progress;
        assert_eq!(last, 0.0);
        while seq.state().stage == Stage::LaserBeam {
            now += FRAME_MS;
            seq.frame(now);
            let progress = seq.state().laser_progress;
            assert!(progress >= last);
            assert!(progress <= 1.0);
            last = progress;
        }
        assert_eq!(last, 1.0);
        assert_eq!(seq.state().stage, Stage::DescendingBits);

        let receiver_x = seq.layout().receiver_x;
        let device_y = seq.layout().device_y;
        for bit in &seq.state().particles {
            assert_eq!(bit.pos.x, receiver_x);
            assert_eq!(bit.target_y, device_y);
            assert_eq!(bit.phase, TravelPhase::Descending);
        }
    }

    #[test]
    fn test_reset_from_every_stage() {
        for target in Stage::RUN_ORDER {
            let mut seq = sequencer(3.0);
            seq.start("Reset me", 0.0).unwrap();
            let now = run_until(&mut seq, 0.0, |s| s.state().stage == target);

            seq.reset();
            assert_eq!(seq.state(), &SimulationState::new(3.0), "after {target:?}");
            assert!(!seq.wants_frames());

            // Nothing queued before the reset may fire afterwards
            seq.drain_events();
            seq.frame(now + 60_000.0);
            assert_eq!(seq.state().stage, Stage::Idle);
            assert!(seq.drain_events().is_empty());
        }
    }

    #[test]
    fn test_reset_when_idle() {
        let mut seq = sequencer(5.0);
        seq.reset();
        assert_eq!(seq.state(), &SimulationState::new(5.0));
    }

    #[test]
    fn test_restart_after_complete() {
        let mut seq = sequencer(10.0);
        seq.start("one", 0.0).unwrap();
        let now = run_until(&mut seq, 0.0, |s| s.state().stage == Stage::Complete);

        seq.start("two", now).unwrap();
        assert_eq!(seq.state().stage, Stage::Encoding);
        assert_eq!(seq.state().decoded, None);
        run_until(&mut seq, now, |s| s.state().stage == Stage::Complete);
        assert_eq!(seq.state().decoded.as_deref(), Some("two"));
    }

    #[test]
    fn test_delays_scale_inversely_with_speed() {
        let slow = sequencer(2.0);
        let fast = sequencer(4.0);
        for kind in DelayKind::ALL {
            let (s, f) = (slow.stage_delay(kind), fast.stage_delay(kind));
            assert!(f < s, "{kind:?}");
            assert!((s / f - 2.0).abs() < 1e-9, "{kind:?}");
        }
    }

    #[test]
    fn test_faster_run_finishes_sooner() {
        let mut slow = sequencer(2.0);
        slow.start("Hi", 0.0).unwrap();
        let slow_end = run_until(&mut slow, 0.0, |s| s.state().stage == Stage::Complete);

        let mut fast = sequencer(8.0);
        fast.start("Hi", 0.0).unwrap();
        let fast_end = run_until(&mut fast, 0.0, |s| s.state().stage == Stage::Complete);

        assert!(fast_end < slow_end);
    }

    #[test]
    fn test_invalid_speed_ignored() {
        let mut seq = sequencer(5.0);
        seq.set_speed_factor(0.0);
        seq.set_speed_factor(f64::NAN);
        seq.set_speed_factor(-2.0);
        assert_eq!(seq.state().speed_factor, 5.0);
        seq.set_speed_factor(7.0);
        assert_eq!(seq.state().speed_factor, 7.0);
    }

    #[test]
    fn test_run_demo_starts_after_delay() {
        let mut seq = sequencer(5.0);
        let message = seq.run_demo(0.0);
        assert!(DEMO_MESSAGES.contains(&message));
        assert!(seq.wants_frames());
        assert_eq!(
            seq.drain_events(),
            vec![SimEvent::DemoSelected(message.to_string())]
        );

        seq.frame(DEMO_START_DELAY_MS - 1.0);
        assert_eq!(seq.state().stage, Stage::Idle);
        seq.frame(DEMO_START_DELAY_MS);
        assert_eq!(seq.state().stage, Stage::Encoding);
        assert_eq!(seq.state().message, message);
    }

    #[test]
    fn test_run_demo_deterministic_per_seed() {
        let mut a = StageSequencer::new(7, 5.0, Layout::default());
        let mut b = StageSequencer::new(7, 5.0, Layout::default());
        for _ in 0..10 {
            assert_eq!(a.run_demo(0.0), b.run_demo(0.0));
        }
    }

    #[test]
    fn test_demo_while_running_is_rejected() {
        let mut seq = sequencer(1.0);
        seq.start("busy", 0.0).unwrap();
        seq.run_demo(0.0);
        seq.drain_events();
        seq.frame(DEMO_START_DELAY_MS);
        assert_eq!(seq.state().message, "busy");
        assert!(
            seq.drain_events()
                .contains(&SimEvent::DemoRejected(StartError::AlreadyRunning))
        );
    }

    #[test]
    fn test_reset_cancels_pending_demo() {
        let mut seq = sequencer(5.0);
        seq.run_demo(0.0);
        seq.reset();
        seq.frame(10_000.0);
        assert_eq!(seq.state().stage, Stage::Idle);
    }

    #[test]
    fn test_pulse_disabled_by_settings() {
        let settings = Settings {
            reduced_motion: true,
            seed: Some(1),
            ..Settings::default()
        };
        let mut seq = StageSequencer::from_settings(&settings, 99, Layout::default());
        seq.start("x", 0.0).unwrap();
        run_until(&mut seq, 0.0, |s| s.state().stage == Stage::Complete);
        assert!(seq.state().pulse.is_none());
    }

    #[test]
    fn test_pulse_expires() {
        let mut seq = sequencer(10.0);
        seq.start("x", 0.0).unwrap();
        let now = run_until(&mut seq, 0.0, |s| s.state().stage == Stage::Complete);
        run_until(&mut seq, now, |s| s.state().pulse.is_none());
        assert_eq!(seq.state().stage, Stage::Complete);
    }

    #[test]
    fn test_set_layout_moves_spawn_origin() {
        let mut seq = sequencer(10.0);
        let wide = Layout::new(1600.0);
        seq.set_layout(wide);
        seq.start("A", 0.0).unwrap();
        run_until(&mut seq, 0.0, |s| !s.state().particles.is_empty());
        assert_eq!(seq.state().particles[0].pos.x, wide.sender_x);
    }

    #[test]
    fn test_bit_release_keeps_scaled_cadence() {
        const FRAME_60HZ: f64 = 1000.0 / 60.0;
        let mut release_times = Vec::new();
        for speed in [5.0, 8.0, 10.0] {
            let mut seq = sequencer(speed);
            seq.start("Hi", 0.0).unwrap();
            let mut now = 0.0;
            while seq.state().stage != Stage::RisingBits {
                now += FRAME_60HZ;
                seq.frame(now);
            }
            let entered = now;
            while seq.state().particles.len() < 16 {
                now += FRAME_60HZ;
                seq.frame(now);
            }
            let took = now - entered;
            let budget = 16.0 * BIT_SPAWN_INTERVAL_MS / speed + FRAME_60HZ + 1e-6;
            assert!(took <= budget, "speed {speed}: {took}ms > {budget}ms");
            release_times.push(took);
        }
        assert!(release_times.windows(2).all(|w| w[1] < w[0]), "{release_times:?}");
    }

    #[test]
    fn test_late_frame_releases_overdue_bits() {
        let mut seq = sequencer(5.0);
        seq.start("Hi", 0.0).unwrap();
        seq.frame(300.0);
        assert_eq!(seq.state().stage, Stage::RisingBits);
        // Four spawn intervals of 40ms pass in a single frame
        seq.frame(460.0);
        assert_eq!(seq.state().particles.len(), 4);
    }

    #[test]
    fn test_resize_moves_bits_in_flight() {
        let mut seq = sequencer(10.0);
        seq.start("Hi", 0.0).unwrap();
        let now = run_until(&mut seq, 0.0, |s| s.state().particles.len() >= 3);
        let wide = Layout::new(1600.0);
        seq.set_layout(wide);
        assert!(seq.state().particles.iter().all(|b| b.pos.x == wide.sender_x));

        run_until(&mut seq, now, |s| s.state().stage == Stage::DescendingBits);
        let narrow = Layout::new(400.0);
        seq.set_layout(narrow);
        for bit in &seq.state().particles {
            assert_eq!(bit.pos.x, narrow.receiver_x);
            assert_eq!(bit.target_y, narrow.device_y);
        }
    }
}
