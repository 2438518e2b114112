//! Homing state machine.
//!
//! Drives the actuator through find-near / back-off / find-far / back-off /
//! move-to-reference and derives the travel envelope. The sequencer issues
//! actuator commands directly, so it runs inside the real-time tick and
//! shares the dispatcher's mutual-exclusion domain.

use libm::roundf;

use crate::actuator::Actuator;
use crate::config::HomingConfig;
use crate::error::FaultCode;
use crate::safety::LimitSide;

use super::envelope::TravelEnvelope;

/// Phase of the homing sequence.
///
/// Progression is forward-only, except into `Error` (reachable from any
/// active phase) or back to `Idle` via cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingPhase {
    /// No homing run started.
    Idle,
    /// Sweeping toward the near end at homing speed.
    FindingNear,
    /// Backing off the near limit; zero reference set on completion.
    BackingOffNear,
    /// Sweeping toward the far end.
    FindingFar,
    /// Backing off the far limit; envelope becomes valid on completion.
    BackingOffFar,
    /// Moving to the configured reference point inside the envelope.
    MovingToReference,
    /// Homing finished; envelope valid, faults cleared.
    Complete,
    /// Homing failed; absorbing until the next run.
    Error,
}

/// Terminal outcome of a homing update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingEvent {
    /// The run reached `Complete`; latched faults may now be cleared.
    Completed,
    /// The run failed with the given fault code.
    Failed(FaultCode),
}

/// Auto-ranging homing sequencer.
#[derive(Debug)]
pub struct HomingSequencer {
    phase: HomingPhase,
    progress: u8,
    started_ms: u32,
    backoff_issued: bool,
    detected_far: i32,
    last_error: Option<FaultCode>,
}

impl HomingSequencer {
    /// Create a sequencer in `Idle`.
    pub fn new() -> Self {
        Self {
            phase: HomingPhase::Idle,
            progress: 0,
            started_ms: 0,
            backoff_issued: false,
            detected_far: 0,
            last_error: None,
        }
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> HomingPhase {
        self.phase
    }

    /// Progress percentage, 0–100.
    #[inline]
    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Fault code of the last failed run, if any.
    #[inline]
    pub fn last_error(&self) -> Option<FaultCode> {
        self.last_error
    }

    /// Whether a run is active (neither idle nor terminal).
    pub fn in_progress(&self) -> bool {
        !matches!(
            self.phase,
            HomingPhase::Idle | HomingPhase::Complete | HomingPhase::Error
        )
    }

    /// Entry is allowed only from `Idle`, `Complete` or `Error`.
    #[inline]
    pub fn can_start(&self) -> bool {
        !self.in_progress()
    }

    /// The limit the machine is deliberately approaching right now.
    ///
    /// The interlock excuses exactly this limit from fault latching.
    pub fn seeking(&self) -> Option<LimitSide> {
        match self.phase {
            HomingPhase::FindingNear => Some(LimitSide::Near),
            HomingPhase::FindingFar => Some(LimitSide::Far),
            _ => None,
        }
    }

    /// Start a homing run: unbounded sweep toward the near end at the
    /// reduced homing speed. Returns `false` when entry is not allowed.
    pub fn start<A: Actuator>(&mut self, actuator: &mut A, cfg: &HomingConfig, now_ms: u32) -> bool {
        if !self.can_start() {
            return false;
        }

        self.phase = HomingPhase::FindingNear;
        self.progress = 10;
        self.started_ms = now_ms;
        self.backoff_issued = false;
        self.detected_far = 0;
        self.last_error = None;

        actuator.set_speed(cfg.speed);
        actuator.move_to(-cfg.sweep_steps);
        true
    }

    /// Cancel an active run (operator Stop). Ramped stop, back to `Idle`,
    /// no fault latched; the envelope stays invalid until the next full run.
    pub fn cancel<A: Actuator>(&mut self, actuator: &mut A) {
        if self.in_progress() {
            actuator.ramped_stop();
            self.phase = HomingPhase::Idle;
            self.progress = 0;
        }
    }

    /// Abort into `Error` without a homing fault of its own (emergency stop
    /// pre-empted the run; the estop latch carries the fault).
    pub fn abort(&mut self) {
        if self.in_progress() {
            self.phase = HomingPhase::Error;
            self.progress = 0;
        }
    }

    /// Advance the sequence by one tick.
    ///
    /// `near_limit`/`far_limit` are the debounced states; `travel_speed` is
    /// the nominal profile speed restored for the reference move.
    pub fn update<A: Actuator>(
        &mut self,
        actuator: &mut A,
        near_limit: bool,
        far_limit: bool,
        envelope: &mut TravelEnvelope,
        cfg: &HomingConfig,
        travel_speed: f32,
        now_ms: u32,
    ) -> Option<HomingEvent> {
        if !self.in_progress() {
            return None;
        }

        if now_ms.wrapping_sub(self.started_ms) > cfg.timeout_ms {
            return Some(self.fail(actuator, envelope, FaultCode::HomingTimeout));
        }

        match self.phase {
            HomingPhase::FindingNear => {
                if near_limit {
                    actuator.hard_stop();
                    self.enter(HomingPhase::BackingOffNear, 25);
                } else if !actuator.is_moving() {
                    // Stopped short of the switch: mechanical failure.
                    return Some(self.fail(actuator, envelope, FaultCode::HomingMechanical));
                }
                None
            }

            HomingPhase::BackingOffNear => {
                if !self.backoff_issued {
                    if !actuator.is_moving() {
                        actuator.move_by(cfg.backoff_steps);
                        self.backoff_issued = true;
                    }
                } else if !actuator.is_moving() {
                    if near_limit {
                        // Backed off but the switch never released.
                        return Some(self.fail(actuator, envelope, FaultCode::HomingMechanical));
                    }
                    // This location is the zero reference.
                    actuator.set_current_position(0);
                    actuator.set_speed(cfg.speed);
                    actuator.move_to(cfg.sweep_steps);
                    self.enter(HomingPhase::FindingFar, 50);
                }
                None
            }

            HomingPhase::FindingFar => {
                if far_limit {
                    // Raw position at the instant the far limit triggered.
                    self.detected_far = actuator.current_position();
                    actuator.hard_stop();
                    self.enter(HomingPhase::BackingOffFar, 75);
                } else if !actuator.is_moving() {
                    return Some(self.fail(actuator, envelope, FaultCode::HomingMechanical));
                }
                None
            }

            HomingPhase::BackingOffFar => {
                if !self.backoff_issued {
                    if !actuator.is_moving() {
                        actuator.move_by(-cfg.backoff_steps);
                        self.backoff_issued = true;
                    }
                } else if !actuator.is_moving() {
                    if far_limit {
                        return Some(self.fail(actuator, envelope, FaultCode::HomingMechanical));
                    }
                    let min = cfg.safety_margin;
                    let max = self.detected_far - cfg.backoff_steps - cfg.safety_margin;
                    envelope.set(min, max);

                    let reference =
                        min + roundf(cfg.reference_fraction * (max - min) as f32) as i32;
                    actuator.set_speed(travel_speed);
                    actuator.move_to(reference);
                    self.enter(HomingPhase::MovingToReference, 90);
                }
                None
            }

            HomingPhase::MovingToReference => {
                if !actuator.is_moving() {
                    self.phase = HomingPhase::Complete;
                    self.progress = 100;
                    return Some(HomingEvent::Completed);
                }
                None
            }

            // in_progress() excludes these.
            HomingPhase::Idle | HomingPhase::Complete | HomingPhase::Error => None,
        }
    }

    fn enter(&mut self, phase: HomingPhase, progress: u8) {
        self.phase = phase;
        self.progress = progress;
        self.backoff_issued = false;
    }

    fn fail<A: Actuator>(
        &mut self,
        actuator: &mut A,
        envelope: &mut TravelEnvelope,
        code: FaultCode,
    ) -> HomingEvent {
        actuator.hard_stop();
        envelope.invalidate();
        self.phase = HomingPhase::Error;
        self.progress = 0;
        self.last_error = Some(code);
        HomingEvent::Failed(code)
    }
}

impl Default for HomingSequencer {
    fn default() -> Self {
        Self::new()
    }
}
