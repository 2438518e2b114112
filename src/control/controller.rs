//! The real-time control loop: command dispatch, safety reaction, homing
//! supervision and telemetry refresh, all inside one tick.
//!
//! The controller owns the actuator exclusively. Every mutation funnels
//! through [`MotionController::tick`], so ordering inside a tick is the
//! whole concurrency story on this side: limits are debounced before the
//! queue is drained, and the homing machine advances after dispatch so a
//! Home command takes effect on the tick that dequeued it.

use crate::actuator::Actuator;
use crate::command::{CommandKind, CommandQueue, MotionCommand, MotionProfile};
use crate::config::ControlConfig;
use crate::error::{FaultCode, FaultRecord};
use crate::homing::{HomingEvent, HomingSequencer, TravelEnvelope};
use crate::safety::{
    DriverAlarm, EdgeFlags, LimitDebouncer, LimitSide, LimitSwitches, SafetyInterlock,
};

use super::status::{MotionState, StatusSnapshot};

/// Single-axis motion coordinator.
///
/// Generic over the actuator, the limit inputs and the driver health input;
/// everything else is owned state. Call [`tick`](Self::tick) at the
/// real-time cadence (nominally 1 ms) with a monotonic millisecond clock.
pub struct MotionController<A, L, D>
where
    A: Actuator,
    L: LimitSwitches,
    D: DriverAlarm,
{
    actuator: A,
    switches: L,
    alarm: D,
    config: ControlConfig,
    near: LimitDebouncer,
    far: LimitDebouncer,
    interlock: SafetyInterlock,
    homing: HomingSequencer,
    envelope: TravelEnvelope,
    profile: MotionProfile,
    enabled: bool,
    homed: bool,
    sensor_fault_seen: bool,
    last_fault: Option<FaultRecord>,
    seen_interlock_fault: Option<FaultRecord>,
    rejected_commands: u32,
    clamped_moves: u32,
    tick_count: u32,
    snapshot: StatusSnapshot,
}

impl<A, L, D> MotionController<A, L, D>
where
    A: Actuator,
    L: LimitSwitches,
    D: DriverAlarm,
{
    /// Create a controller and apply the nominal profile to the actuator.
    ///
    /// The debouncers seed from a direct level read so a limit already
    /// asserted at power-on is visible before any edge fires.
    pub fn new(mut actuator: A, mut switches: L, alarm: D, config: ControlConfig) -> Self {
        let safety = &config.safety;
        let near = LimitDebouncer::new(
            switches.near(),
            safety.debounce_dwell_ms,
            safety.settle_window_ms,
            safety.max_transitions,
        );
        let far = LimitDebouncer::new(
            switches.far(),
            safety.debounce_dwell_ms,
            safety.settle_window_ms,
            safety.max_transitions,
        );

        let profile = config.motion.profile();
        actuator.set_speed(profile.max_speed);
        actuator.set_acceleration(profile.acceleration);
        actuator.set_enabled(true);

        Self {
            actuator,
            switches,
            alarm,
            config,
            near,
            far,
            interlock: SafetyInterlock::new(),
            homing: HomingSequencer::new(),
            envelope: TravelEnvelope::invalid(),
            profile,
            enabled: true,
            homed: false,
            sensor_fault_seen: false,
            last_fault: None,
            seen_interlock_fault: None,
            rejected_commands: 0,
            clamped_moves: 0,
            tick_count: 0,
            snapshot: StatusSnapshot::new(),
        }
    }

    /// The snapshot refreshed by the last tick.
    #[inline]
    pub fn status(&self) -> StatusSnapshot {
        self.snapshot
    }

    /// Effective configuration.
    #[inline]
    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    /// Run one control tick.
    ///
    /// Order inside the tick: take the estop latch (pre-empting everything
    /// queued behind it), sample and debounce limits (reacting to
    /// unexpected hits), poll the driver alarm on its divider, drain up to
    /// the budgeted number of commands, advance homing, refresh telemetry.
    /// Returns the fresh snapshot for publication.
    pub fn tick(&mut self, queue: &CommandQueue, edges: &EdgeFlags, now_ms: u32) -> StatusSnapshot {
        self.tick_count = self.tick_count.wrapping_add(1);

        // The latch outranks the ring: the hard stop lands and the fault
        // latches before any queued move can reach the actuator.
        if queue.take_estop() {
            self.apply_estop(now_ms);
        }

        self.sample_limits(edges, now_ms);

        if self.tick_count % self.config.safety.alarm_poll_ticks.max(1) == 0 {
            let active = self.alarm.alarm_active();
            self.interlock.set_alarm(active, now_ms);
        }

        for _ in 0..self.config.dispatcher.drain_budget {
            match queue.try_recv() {
                Some(command) => self.apply(command, now_ms),
                None => break,
            }
        }

        if self.homing.in_progress() {
            let near = self.near.stable();
            let far = self.far.stable();
            let event = self.homing.update(
                &mut self.actuator,
                near,
                far,
                &mut self.envelope,
                &self.config.homing,
                self.profile.max_speed,
                now_ms,
            );
            match event {
                Some(HomingEvent::Completed) => {
                    self.homed = true;
                    self.actuator.set_acceleration(self.profile.acceleration);
                    self.interlock.clear_on_homing_complete();
                }
                Some(HomingEvent::Failed(code)) => {
                    self.homed = false;
                    self.interlock.latch_homing_fault(code, now_ms);
                }
                None => {}
            }
        }

        self.refresh_snapshot(now_ms);
        self.snapshot
    }

    fn sample_limits(&mut self, edges: &EdgeFlags, now_ms: u32) {
        let near_raw = self.switches.near();
        if edges.take_near() && near_raw == self.near.stable() {
            // The pulse came and went between ticks; only the interrupt saw
            // it. Feed the excursion so oscillation tracking counts it.
            self.near.sample(!near_raw, now_ms);
        }
        if let Some(active) = self.near.sample(near_raw, now_ms) {
            self.limit_changed(LimitSide::Near, active, now_ms);
        }

        let far_raw = self.switches.far();
        if edges.take_far() && far_raw == self.far.stable() {
            self.far.sample(!far_raw, now_ms);
        }
        if let Some(active) = self.far.sample(far_raw, now_ms) {
            self.limit_changed(LimitSide::Far, active, now_ms);
        }

        let fault = self.near.sensor_fault() || self.far.sensor_fault();
        if fault && !self.sensor_fault_seen {
            self.interlock.record_sensor_fault(now_ms);
        }
        self.sensor_fault_seen = fault;
    }

    fn limit_changed(&mut self, side: LimitSide, active: bool, now_ms: u32) {
        let seeking = self.homing.seeking();
        if self.interlock.on_limit_change(side, active, seeking, now_ms) {
            // Position knowledge is gone until the next homing run.
            self.actuator.hard_stop();
            self.homing.abort();
            self.envelope.invalidate();
            self.homed = false;
        }
    }

    fn apply_estop(&mut self, now_ms: u32) {
        self.actuator.hard_stop();
        self.homing.abort();
        self.envelope.invalidate();
        self.homed = false;
        self.interlock.trigger_estop(now_ms);
        if self.config.safety.auto_home_on_estop {
            self.start_homing(now_ms);
        }
    }

    fn apply(&mut self, command: MotionCommand, now_ms: u32) {
        match command.kind {
            // Normally diverted to the queue's latch; applied here all the
            // same if one reaches the ring.
            CommandKind::EmergencyStop => self.apply_estop(now_ms),

            CommandKind::Stop => {
                if self.homing.in_progress() {
                    self.homing.cancel(&mut self.actuator);
                } else {
                    self.actuator.ramped_stop();
                }
            }

            CommandKind::Home => {
                self.start_homing(now_ms);
            }

            // Only Home/Stop/EmergencyStop are honored mid-homing.
            CommandKind::Enable => {
                if self.homing.in_progress() {
                    self.rejected_commands = self.rejected_commands.saturating_add(1);
                    return;
                }
                self.actuator.set_enabled(true);
                self.enabled = true;
            }

            CommandKind::Disable => {
                if self.homing.in_progress() {
                    self.rejected_commands = self.rejected_commands.saturating_add(1);
                    return;
                }
                self.actuator.ramped_stop();
                self.actuator.set_enabled(false);
                self.enabled = false;
            }

            CommandKind::MoveAbsolute
            | CommandKind::MoveRelative
            | CommandKind::SetSpeed
            | CommandKind::SetAcceleration => {
                if self.interlock.blocks_motion() || self.homing.in_progress() || !self.enabled {
                    self.rejected_commands = self.rejected_commands.saturating_add(1);
                    return;
                }
                self.apply_motion(command, now_ms);
            }
        }
    }

    fn apply_motion(&mut self, command: MotionCommand, now_ms: u32) {
        match command.kind {
            CommandKind::SetSpeed => {
                self.profile.max_speed = command.profile.max_speed;
                self.actuator.set_speed(self.profile.max_speed);
            }

            CommandKind::SetAcceleration => {
                self.profile.acceleration = command.profile.acceleration;
                self.profile.deceleration = command.profile.deceleration;
                self.actuator.set_acceleration(self.profile.acceleration);
            }

            CommandKind::MoveAbsolute => {
                let target = command.profile.target_position;
                self.issue_move(target, &command, now_ms);
            }

            CommandKind::MoveRelative => {
                let target = self
                    .actuator
                    .current_position()
                    .saturating_add(command.profile.target_position);
                self.issue_move(target, &command, now_ms);
            }

            _ => {}
        }
    }

    fn issue_move(&mut self, target: i32, command: &MotionCommand, now_ms: u32) {
        let (target, clamped) = if command.profile.enable_limits {
            self.envelope.clamp(target)
        } else {
            (target, false)
        };
        if clamped {
            self.clamped_moves = self.clamped_moves.saturating_add(1);
            self.last_fault = Some(FaultRecord::new(FaultCode::ClampApplied, now_ms));
        }

        self.actuator.set_speed(command.profile.max_speed);
        self.actuator.set_acceleration(command.profile.acceleration);
        self.actuator.move_to(target);
    }

    /// Start a homing run. Allowed while faults are latched (a completed
    /// run is the only recovery path) and implies enabled outputs.
    fn start_homing(&mut self, now_ms: u32) {
        self.actuator.set_enabled(true);
        self.enabled = true;
        self.actuator.set_acceleration(self.profile.acceleration);
        if self.homing.start(&mut self.actuator, &self.config.homing, now_ms) {
            // Recomputed from scratch; a cancelled run leaves it invalid.
            self.homed = false;
            self.envelope.invalidate();
        }
    }

    fn refresh_snapshot(&mut self, now_ms: u32) {
        // Latches and informational notes share one "most recent fault"
        // slot; the interlock's record wins whenever it changed.
        let interlock_fault = self.interlock.last_fault();
        if interlock_fault != self.seen_interlock_fault {
            self.seen_interlock_fault = interlock_fault;
            if interlock_fault.is_some() {
                self.last_fault = interlock_fault;
            }
        }

        let motion = if self.homing.in_progress() {
            MotionState::Homing
        } else if self.actuator.is_moving() {
            MotionState::Moving
        } else {
            MotionState::Idle
        };

        self.snapshot = StatusSnapshot {
            position: self.actuator.current_position(),
            speed: self.actuator.current_speed(),
            motion,
            homing_phase: self.homing.phase(),
            homing_progress: self.homing.progress(),
            safety: self.interlock.state(),
            homed: self.homed,
            envelope: self.envelope,
            enabled: self.enabled,
            alarm_active: self.interlock.alarm_active(),
            profile: self.profile,
            last_fault: self.last_fault,
            rejected_commands: self.rejected_commands,
            clamped_moves: self.clamped_moves,
            tick_ms: now_ms,
        };
    }
}
