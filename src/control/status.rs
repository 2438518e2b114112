//! Telemetry snapshot and its cross-domain publication cell.
//!
//! Telemetry is strictly one-way: the controller refreshes a value-type
//! snapshot at the end of every tick and external layers read whole copies.
//! Nothing in the snapshot is load-bearing for control decisions.

use crate::command::MotionProfile;
use crate::error::FaultRecord;
use crate::homing::{HomingPhase, TravelEnvelope};
use crate::safety::SafetyState;

/// Coarse motion state derived each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionState {
    /// Holding position, no move in flight.
    #[default]
    Idle,
    /// Executing a commanded move.
    Moving,
    /// A homing run owns the actuator.
    Homing,
}

/// One coherent view of the coordinator, refreshed every tick.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusSnapshot {
    /// Actuator position in steps.
    pub position: i32,
    /// Actuator speed in steps per second (signed for direction).
    pub speed: f32,
    /// Coarse motion state.
    pub motion: MotionState,
    /// Phase of the homing sequencer.
    pub homing_phase: HomingPhase,
    /// Homing progress percentage, 0–100.
    pub homing_progress: u8,
    /// Effective safety state.
    pub safety: SafetyState,
    /// Whether a completed homing run has established the envelope.
    pub homed: bool,
    /// The travel envelope (invalid until homed).
    pub envelope: TravelEnvelope,
    /// Whether driver outputs are enabled.
    pub enabled: bool,
    /// Whether the driver alarm input is currently active.
    pub alarm_active: bool,
    /// Nominal motion profile currently in effect.
    pub profile: MotionProfile,
    /// Most recent fault record, if any.
    pub last_fault: Option<FaultRecord>,
    /// Commands rejected by safety gating or dropped since start.
    pub rejected_commands: u32,
    /// Move targets altered to respect the envelope since start.
    pub clamped_moves: u32,
    /// Controller timestamp of this snapshot, milliseconds.
    pub tick_ms: u32,
}

impl StatusSnapshot {
    /// The power-on snapshot: idle, unhomed, no faults.
    pub fn new() -> Self {
        Self {
            position: 0,
            speed: 0.0,
            motion: MotionState::Idle,
            homing_phase: HomingPhase::Idle,
            homing_progress: 0,
            safety: SafetyState::Normal,
            homed: false,
            envelope: TravelEnvelope::invalid(),
            enabled: true,
            alarm_active: false,
            profile: MotionProfile::default(),
            last_fault: None,
            rejected_commands: 0,
            clamped_moves: 0,
            tick_ms: 0,
        }
    }
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutex-guarded snapshot cell shared between the controller and readers.
///
/// The controller publishes with `try_lock` and skips the update on
/// contention rather than stall the tick; a reader holding the lock costs
/// one stale snapshot, never a missed control deadline. Readers take whole
/// copies, so no reference ever escapes the lock.
#[cfg(feature = "std")]
#[derive(Debug, Default)]
pub struct SharedStatus {
    inner: std::sync::Mutex<StatusSnapshot>,
}

#[cfg(feature = "std")]
impl SharedStatus {
    /// Create a cell holding the power-on snapshot.
    pub fn new() -> Self {
        Self {
            inner: std::sync::Mutex::new(StatusSnapshot::new()),
        }
    }

    /// Publish a snapshot without blocking.
    ///
    /// Returns `false` when a reader held the lock and the update was
    /// skipped; the next tick publishes a fresher one anyway.
    pub fn publish(&self, snapshot: StatusSnapshot) -> bool {
        match self.inner.try_lock() {
            Ok(mut guard) => {
                *guard = snapshot;
                true
            }
            Err(_) => false,
        }
    }

    /// Read a copy of the latest published snapshot.
    pub fn read(&self) -> StatusSnapshot {
        match self.inner.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_on_snapshot_is_idle_and_unhomed() {
        let snap = StatusSnapshot::new();
        assert_eq!(snap.motion, MotionState::Idle);
        assert_eq!(snap.safety, SafetyState::Normal);
        assert!(!snap.homed);
        assert!(!snap.envelope.valid);
        assert!(snap.last_fault.is_none());
    }

    #[cfg(feature = "std")]
    #[test]
    fn publish_and_read_round_trip() {
        let shared = SharedStatus::new();

        let mut snap = StatusSnapshot::new();
        snap.position = 1234;
        snap.homed = true;
        assert!(shared.publish(snap));

        let read = shared.read();
        assert_eq!(read.position, 1234);
        assert!(read.homed);
    }

    #[cfg(feature = "std")]
    #[test]
    fn publish_skips_while_reader_holds_lock() {
        let shared = SharedStatus::new();
        let guard = shared.inner.lock().unwrap();

        let mut snap = StatusSnapshot::new();
        snap.position = 77;
        assert!(!shared.publish(snap));

        drop(guard);
        assert!(shared.publish(snap));
        assert_eq!(shared.read().position, 77);
    }
}
