//! Integration tests for axis-motion.
//!
//! These drive the whole coordinator (debounce, interlock, homing,
//! dispatch, translation) against a simulated rail with physical switch
//! locations, one millisecond per tick.

mod common;

use common::{rail, step_physics, SharedRail, SimActuator, SimAlarm, SimSwitches};

use axis_motion::channel::{ChannelReceiver, ChannelTranslator, ControlMode};
use axis_motion::config::ControlConfig;
use axis_motion::control::{MotionController, MotionState, StatusSnapshot};
use axis_motion::error::FaultCode;
use axis_motion::homing::HomingPhase;
use axis_motion::safety::{EdgeFlags, SafetyState};
use axis_motion::{CommandQueue, MotionCommand, MotionProfile};

use proptest::prelude::*;

// =============================================================================
// Harness
// =============================================================================

/// Switch geometry: near at physical -500, far at physical +3000.
///
/// With a 20 ms dwell and the 500 steps/s homing speed the overtravel past
/// each switch is 10 steps, comfortably inside the 50-step back-off. The
/// run measures: zero at physical -460, far limit at logical 3470, envelope
/// [10, 3410], reference 1710.
const NEAR_EDGE: f32 = -500.0;
const FAR_EDGE: f32 = 3000.0;

struct World {
    rail: SharedRail,
    controller: MotionController<SimActuator, SimSwitches, SimAlarm>,
    queue: CommandQueue,
    edges: EdgeFlags,
    now_ms: u32,
}

impl World {
    fn new(config: ControlConfig) -> Self {
        let rail = rail(NEAR_EDGE, FAR_EDGE);
        let controller = MotionController::new(
            SimActuator(rail.clone()),
            SimSwitches(rail.clone()),
            SimAlarm(rail.clone()),
            config,
        );
        Self {
            rail,
            controller,
            queue: CommandQueue::new(),
            edges: EdgeFlags::new(),
            now_ms: 0,
        }
    }

    /// Step physics and controller together for `ms` milliseconds.
    fn run(&mut self, ms: u32) -> StatusSnapshot {
        let mut snap = self.controller.status();
        for _ in 0..ms {
            self.now_ms += 1;
            step_physics(&self.rail, 1);
            snap = self.controller.tick(&self.queue, &self.edges, self.now_ms);
        }
        snap
    }

    /// Run until the predicate holds, panicking past the deadline.
    fn run_until(
        &mut self,
        max_ms: u32,
        mut pred: impl FnMut(&StatusSnapshot) -> bool,
    ) -> StatusSnapshot {
        for _ in 0..max_ms {
            let snap = self.run(1);
            if pred(&snap) {
                return snap;
            }
        }
        panic!("condition not reached within {} ms", max_ms);
    }
}

fn test_config() -> ControlConfig {
    let mut config = ControlConfig::default();
    // Short dwell keeps homing overtravel (dwell x homing speed) well
    // inside the back-off distance.
    config.safety.debounce_dwell_ms = 20;
    config
}

fn homed_world() -> World {
    let mut world = World::new(test_config());
    world.queue.try_send(MotionCommand::home(0)).unwrap();
    let snap = world.run_until(20_000, |s| s.homing_phase == HomingPhase::Complete);
    assert!(snap.homed);
    world
}

// =============================================================================
// Full homing run against the simulated rail
// =============================================================================

#[test]
fn cold_start_homing_measures_the_rail() {
    let mut world = World::new(test_config());

    world.queue.try_send(MotionCommand::home(0)).unwrap();

    let mut milestones: Vec<u8> = Vec::new();
    let snap = world.run_until(20_000, |s| {
        if milestones.last() != Some(&s.homing_progress) {
            milestones.push(s.homing_progress);
        }
        s.homing_phase == HomingPhase::Complete
    });

    assert!(snap.homed);
    assert_eq!(snap.safety, SafetyState::Normal);
    assert_eq!(snap.envelope.min, 10);
    assert_eq!(snap.envelope.max, 3410);
    // Parked at the configured reference (mid-range).
    assert_eq!(snap.position, 1710);
    assert_eq!(snap.motion, MotionState::Idle);
    assert_eq!(milestones, vec![10, 25, 50, 75, 90, 100]);
}

#[test]
fn second_homing_run_reproduces_the_envelope() {
    let mut world = homed_world();
    let first = world.controller.status().envelope;

    world.queue.try_send(MotionCommand::home(world.now_ms)).unwrap();
    let snap = world.run_until(20_000, |s| s.homing_phase == HomingPhase::Complete);

    assert_eq!(snap.envelope, first);
}

// =============================================================================
// Command dispatch over the measured envelope
// =============================================================================

#[test]
fn moves_respect_the_measured_envelope() {
    let mut world = homed_world();

    // In-range move lands exactly.
    world
        .queue
        .try_send(MotionCommand::move_to(
            200,
            MotionProfile::default(),
            world.now_ms,
        ))
        .unwrap();
    let snap = world.run_until(5_000, |s| s.motion == MotionState::Idle);
    assert_eq!(snap.position, 200);

    // Out-of-range move clamps to the envelope edge instead of hitting the
    // physical switch.
    world
        .queue
        .try_send(MotionCommand::move_to(
            9_999,
            MotionProfile::default(),
            world.now_ms,
        ))
        .unwrap();
    let snap = world.run_until(5_000, |s| s.motion == MotionState::Idle);
    assert_eq!(snap.position, 3410);
    assert_eq!(snap.clamped_moves, 1);
    assert_eq!(snap.last_fault.unwrap().code, FaultCode::ClampApplied);
    assert_eq!(snap.safety, SafetyState::Normal);
}

#[test]
fn unlimited_move_into_the_switch_latches_a_fault() {
    let mut world = homed_world();

    world
        .queue
        .try_send(MotionCommand::move_to(
            5_000,
            MotionProfile::default().unlimited(),
            world.now_ms,
        ))
        .unwrap();

    let snap = world.run_until(5_000, |s| s.safety != SafetyState::Normal);
    assert_eq!(snap.safety, SafetyState::FarLimitFault);
    assert_eq!(snap.motion, MotionState::Idle); // hard-stopped
    assert!(!snap.homed);
    assert!(!snap.envelope.valid);

    // Latched: further motion is rejected.
    world
        .queue
        .try_send(MotionCommand::move_to(
            100,
            MotionProfile::default(),
            world.now_ms,
        ))
        .unwrap();
    let snap = world.run(5);
    assert_eq!(snap.rejected_commands, 1);
}

// =============================================================================
// Emergency stop and recovery
// =============================================================================

#[test]
fn estop_latches_until_homing_recovers() {
    let mut world = homed_world();

    world
        .queue
        .try_send(MotionCommand::emergency_stop(world.now_ms))
        .unwrap();
    let snap = world.run(1);
    assert_eq!(snap.safety, SafetyState::EstopFault);
    assert!(!snap.homed);
    assert!(!snap.envelope.valid);

    // The latch survives time and rejects motion.
    world
        .queue
        .try_send(MotionCommand::move_to(
            100,
            MotionProfile::default(),
            world.now_ms,
        ))
        .unwrap();
    let snap = world.run(100);
    assert_eq!(snap.safety, SafetyState::EstopFault);
    assert_eq!(snap.rejected_commands, 1);

    // Homing is the one recovery path.
    world.queue.try_send(MotionCommand::home(world.now_ms)).unwrap();
    let snap = world.run_until(20_000, |s| s.homing_phase == HomingPhase::Complete);
    assert_eq!(snap.safety, SafetyState::Normal);
    assert!(snap.homed);
}

#[test]
fn driver_alarm_reports_without_gating() {
    let mut world = homed_world();

    world.rail.borrow_mut().alarm = true;
    let snap = world.run(20);
    assert!(snap.alarm_active);
    assert_eq!(snap.safety, SafetyState::ActuatorFault);

    // Report-only: a move still dispatches and completes.
    world
        .queue
        .try_send(MotionCommand::move_to(
            500,
            MotionProfile::default(),
            world.now_ms,
        ))
        .unwrap();
    let snap = world.run_until(5_000, |s| s.motion == MotionState::Idle && s.position == 500);
    assert_eq!(snap.rejected_commands, 0);

    world.rail.borrow_mut().alarm = false;
    let snap = world.run(20);
    assert_eq!(snap.safety, SafetyState::Normal);
}

// =============================================================================
// Channel translation end to end
// =============================================================================

struct TestReceiver {
    connected: bool,
    frame: u32,
    bytes: [u8; 5],
}

impl TestReceiver {
    fn new() -> Self {
        Self {
            connected: true,
            frame: 0,
            bytes: [0; 5],
        }
    }

    fn frame(&mut self, bytes: [u8; 5]) {
        self.bytes = bytes;
        self.frame += 1;
    }
}

impl ChannelReceiver for TestReceiver {
    fn connected(&self) -> bool {
        self.connected
    }
    fn frame_count(&self) -> u32 {
        self.frame
    }
    fn byte(&self, index: usize) -> u8 {
        self.bytes.get(index).copied().unwrap_or(0)
    }
}

#[test]
fn channel_follow_drives_the_axis_across_the_envelope() {
    let mut world = homed_world();
    let mut translator = ChannelTranslator::new(world.controller.config().channel.clone());
    let mut rx = TestReceiver::new();

    // Follow mode, position byte 128, full speed and acceleration scales.
    rx.frame([128, 0, 255, 255, 120]);
    let status = world.controller.status();
    translator.tick(&rx, &status, &world.queue.sender(), world.now_ms);
    assert_eq!(translator.mode(), ControlMode::Follow);

    // 10 + round(3400 * 128 / 255) = 1717
    let snap = world.run_until(5_000, |s| s.motion == MotionState::Idle);
    assert_eq!(snap.position, 1717);

    // New frame, new position; the axis tracks it.
    rx.frame([0, 0, 255, 255, 120]);
    let status = world.controller.status();
    translator.tick(&rx, &status, &world.queue.sender(), world.now_ms);
    let snap = world.run_until(5_000, |s| s.motion == MotionState::Idle && s.position == 10);
    assert_eq!(snap.position, snap.envelope.min);
}

#[test]
fn channel_home_band_triggers_a_run_then_follow_takes_over() {
    let mut world = World::new(test_config());
    let mut translator = ChannelTranslator::new(world.controller.config().channel.clone());
    let mut rx = TestReceiver::new();

    // Unhomed Follow is suppressed, with a diagnostic counter.
    rx.frame([128, 0, 255, 255, 120]);
    let status = world.controller.status();
    translator.tick(&rx, &status, &world.queue.sender(), world.now_ms);
    let snap = world.run(10);
    assert_eq!(snap.motion, MotionState::Idle);
    assert_eq!(translator.stats().unhomed_notices, 1);

    // Mode byte into the Home band starts a homing run.
    rx.frame([128, 0, 255, 255, 220]);
    let status = world.controller.status();
    translator.tick(&rx, &status, &world.queue.sender(), world.now_ms);
    let snap = world.run_until(20_000, |s| s.homing_phase == HomingPhase::Complete);
    assert!(snap.homed);

    // Back to Follow: position commands flow now.
    rx.frame([128, 0, 255, 255, 120]);
    let status = world.controller.status();
    translator.tick(&rx, &status, &world.queue.sender(), world.now_ms);
    let snap = world.run_until(5_000, |s| s.motion == MotionState::Idle && s.position == 1717);
    assert_eq!(snap.position, 1717);
}

#[test]
fn signal_loss_stops_a_following_axis() {
    let mut world = homed_world();
    let mut translator = ChannelTranslator::new(world.controller.config().channel.clone());
    let mut rx = TestReceiver::new();

    rx.frame([255, 0, 255, 40, 120]);
    let status = world.controller.status();
    translator.tick(&rx, &status, &world.queue.sender(), world.now_ms);
    // Slow move toward the far end of the envelope (speed byte 40).
    let snap = world.run(100);
    assert_eq!(snap.motion, MotionState::Moving);

    rx.connected = false;
    let status = world.controller.status();
    translator.tick(&rx, &status, &world.queue.sender(), world.now_ms);
    let snap = world.run_until(1_000, |s| s.motion == MotionState::Idle);
    // Stopped short of the commanded 3410.
    assert!(snap.position < 3410);
    assert_eq!(translator.mode(), ControlMode::Stop);
    assert_eq!(snap.safety, SafetyState::Normal);
}

// =============================================================================
// Configuration round trip
// =============================================================================

#[test]
fn toml_config_flows_into_the_controller() {
    let toml_str = r#"
[motion]
max_speed = 2000.0
acceleration = 1000.0

[homing]
speed = 400.0
reference_fraction = 0.0

[safety]
debounce_dwell_ms = 20

[channel]
resolution = "fine"
"#;
    let config = axis_motion::config::parse_config(toml_str).unwrap();
    let mut world = World::new(config);

    world.queue.try_send(MotionCommand::home(0)).unwrap();
    let snap = world.run_until(30_000, |s| s.homing_phase == HomingPhase::Complete);

    // reference_fraction = 0.0 parks at the envelope minimum.
    assert_eq!(snap.position, snap.envelope.min);
    assert_eq!(snap.profile.max_speed, 2000.0);
    // Nominal acceleration restored once homing completes.
    assert_eq!(world.rail.borrow().accel, 1000.0);
}

#[test]
fn invalid_config_is_rejected() {
    assert!(axis_motion::config::parse_config("[homing]\nspeed = 0.0").is_err());
    assert!(axis_motion::config::parse_config("[channel]\nguard_margin = 42").is_err());
}

// =============================================================================
// Properties
// =============================================================================

fn mode_strategy() -> impl Strategy<Value = ControlMode> {
    prop_oneof![
        Just(ControlMode::Stop),
        Just(ControlMode::Follow),
        Just(ControlMode::Home),
    ]
}

proptest! {
    #[test]
    fn clamped_targets_stay_inside_the_envelope(
        min in -10_000i32..10_000,
        span in 0i32..50_000,
        target in proptest::num::i32::ANY,
    ) {
        let mut envelope = axis_motion::TravelEnvelope::invalid();
        envelope.set(min, min + span);
        let (clamped, _) = envelope.clamp(target);
        prop_assert!(clamped >= min && clamped <= min + span);
        prop_assert!(envelope.contains(clamped));
    }

    #[test]
    fn zero_guard_decoding_matches_the_bands(
        current in mode_strategy(),
        raw in proptest::num::u8::ANY,
    ) {
        use axis_motion::channel::{decode_band, next_mode};
        prop_assert_eq!(next_mode(current, raw, 0), decode_band(raw));
    }

    #[test]
    fn guarded_decoding_is_stable_under_repetition(
        current in mode_strategy(),
        raw in proptest::num::u8::ANY,
        guard in 0u8..42,
    ) {
        use axis_motion::channel::next_mode;
        let once = next_mode(current, raw, guard);
        prop_assert_eq!(next_mode(once, raw, guard), once);
    }
}
