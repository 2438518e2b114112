//! Fault-latching safety interlock.
//!
//! A debounced limit going active while homing is not deliberately seeking
//! that limit means the calibration can no longer be trusted: the interlock
//! demands an immediate hard stop and latches. Latched states persist until
//! a homing run reaches `Complete`; no fault self-clears.

use crate::error::{FaultCode, FaultRecord};

use super::debounce::LimitSide;

/// Safety condition visible to the dispatcher and external layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SafetyState {
    /// No fault.
    Normal,
    /// Near limit asserted outside a controlled homing approach (latched).
    NearLimitFault,
    /// Far limit asserted outside a controlled homing approach (latched).
    FarLimitFault,
    /// Explicit emergency stop (latched).
    EstopFault,
    /// Driver health signal active (report-only, not latched).
    ActuatorFault,
    /// Homing failed; position knowledge lost (latched).
    PositionError,
}

/// Latching interlock over limit, estop, homing and driver-health signals.
#[derive(Debug, Default)]
pub struct SafetyInterlock {
    latched: Option<SafetyState>,
    alarm_active: bool,
    last_fault: Option<FaultRecord>,
}

impl SafetyInterlock {
    /// Create an interlock in the `Normal` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective safety state.
    ///
    /// Latched faults dominate; a live driver alarm shows as `ActuatorFault`
    /// only while nothing is latched, and reverts on its own.
    pub fn state(&self) -> SafetyState {
        match self.latched {
            Some(latched) => latched,
            None if self.alarm_active => SafetyState::ActuatorFault,
            None => SafetyState::Normal,
        }
    }

    /// Whether position/speed/acceleration commands must be rejected.
    ///
    /// Only latched faults gate motion; the report-only driver alarm does
    /// not (escalation policy lives outside this core).
    #[inline]
    pub fn blocks_motion(&self) -> bool {
        self.latched.is_some()
    }

    /// Most recent fault record (including informational codes).
    #[inline]
    pub fn last_fault(&self) -> Option<FaultRecord> {
        self.last_fault
    }

    /// A debounced limit changed state.
    ///
    /// `seeking` is the limit the homing machine is actively searching for,
    /// if any. Returns `true` when the event demands an immediate hard stop.
    pub fn on_limit_change(
        &mut self,
        side: LimitSide,
        active: bool,
        seeking: Option<LimitSide>,
        now_ms: u32,
    ) -> bool {
        if !active || seeking == Some(side) {
            return false;
        }

        let (state, code) = match side {
            LimitSide::Near => (SafetyState::NearLimitFault, FaultCode::NearLimit),
            LimitSide::Far => (SafetyState::FarLimitFault, FaultCode::FarLimit),
        };
        self.latch(state, code, now_ms);
        true
    }

    /// Latch the emergency-stop fault.
    pub fn trigger_estop(&mut self, now_ms: u32) {
        self.latch(SafetyState::EstopFault, FaultCode::Estop, now_ms);
    }

    /// Latch a homing failure as a position error.
    pub fn latch_homing_fault(&mut self, code: FaultCode, now_ms: u32) {
        self.latch(SafetyState::PositionError, code, now_ms);
    }

    /// Update the report-only driver alarm. Records a fault on the rising
    /// edge but never latches.
    pub fn set_alarm(&mut self, active: bool, now_ms: u32) {
        if active && !self.alarm_active {
            self.last_fault = Some(FaultRecord::new(FaultCode::Actuator, now_ms));
        }
        self.alarm_active = active;
    }

    /// Whether the driver alarm is currently active.
    #[inline]
    pub fn alarm_active(&self) -> bool {
        self.alarm_active
    }

    /// Record a debounce oscillation fault. Surfaced only; never latches.
    pub fn record_sensor_fault(&mut self, now_ms: u32) {
        self.last_fault = Some(FaultRecord::new(FaultCode::Sensor, now_ms));
    }

    /// A homing run reached `Complete`: the only recovery path.
    pub fn clear_on_homing_complete(&mut self) {
        self.latched = None;
    }

    fn latch(&mut self, state: SafetyState, code: FaultCode, now_ms: u32) {
        self.latched = Some(state);
        self.last_fault = Some(FaultRecord::new(code, now_ms));
    }
}
