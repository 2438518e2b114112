//! Command and motion-profile types.

/// Requested motion parameters carried by a command.
///
/// Deceleration mirrors acceleration unless overridden via
/// [`MotionProfile::with_deceleration`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionProfile {
    /// Maximum speed in steps per second.
    pub max_speed: f32,
    /// Acceleration in steps per second squared.
    pub acceleration: f32,
    /// Deceleration in steps per second squared.
    pub deceleration: f32,
    /// Target position in steps (absolute or relative per command kind).
    pub target_position: i32,
    /// Respect the travel envelope when valid.
    pub enable_limits: bool,
}

impl MotionProfile {
    /// Create a profile; deceleration mirrors the acceleration.
    pub fn new(max_speed: f32, acceleration: f32) -> Self {
        Self {
            max_speed,
            acceleration,
            deceleration: acceleration,
            target_position: 0,
            enable_limits: true,
        }
    }

    /// Override the deceleration rate.
    #[must_use]
    pub fn with_deceleration(mut self, deceleration: f32) -> Self {
        self.deceleration = deceleration;
        self
    }

    /// Set the target position.
    #[must_use]
    pub fn with_target(mut self, target: i32) -> Self {
        self.target_position = target;
        self
    }

    /// Disable envelope limiting for this profile.
    #[must_use]
    pub fn unlimited(mut self) -> Self {
        self.enable_limits = false;
        self
    }
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self {
            max_speed: 5000.0,
            acceleration: 5000.0,
            deceleration: 5000.0,
            target_position: 0,
            enable_limits: true,
        }
    }
}

/// What a command asks the dispatcher to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandKind {
    /// Move to `profile.target_position` (absolute steps).
    MoveAbsolute,
    /// Move by `profile.target_position` (relative steps).
    MoveRelative,
    /// Apply `profile.max_speed` as the nominal speed.
    SetSpeed,
    /// Apply `profile.acceleration` (deceleration mirrors it).
    SetAcceleration,
    /// Start the auto-ranging homing sequence.
    Home,
    /// Halt with bounded deceleration.
    Stop,
    /// Immediate non-ramped halt; latches EstopFault.
    EmergencyStop,
    /// Enable driver outputs.
    Enable,
    /// Disable driver outputs.
    Disable,
}

/// A motion request: created by any producer, consumed exactly once,
/// discarded after application. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionCommand {
    /// The requested operation.
    pub kind: CommandKind,
    /// Motion parameters for the operation.
    pub profile: MotionProfile,
    /// Producer-side millisecond timestamp.
    pub timestamp_ms: u32,
    /// Producer-assigned identifier (diagnostic only).
    pub id: u16,
}

impl MotionCommand {
    /// Build a command with an explicit profile.
    pub fn new(kind: CommandKind, profile: MotionProfile, timestamp_ms: u32) -> Self {
        Self {
            kind,
            profile,
            timestamp_ms,
            id: 0,
        }
    }

    /// Move to an absolute position using the supplied profile.
    pub fn move_to(target: i32, profile: MotionProfile, timestamp_ms: u32) -> Self {
        Self::new(
            CommandKind::MoveAbsolute,
            profile.with_target(target),
            timestamp_ms,
        )
    }

    /// Move by a relative amount using the supplied profile.
    pub fn move_by(delta: i32, profile: MotionProfile, timestamp_ms: u32) -> Self {
        Self::new(
            CommandKind::MoveRelative,
            profile.with_target(delta),
            timestamp_ms,
        )
    }

    /// Request a bounded-deceleration stop.
    pub fn stop(timestamp_ms: u32) -> Self {
        Self::new(CommandKind::Stop, MotionProfile::default(), timestamp_ms)
    }

    /// Request an immediate halt.
    pub fn emergency_stop(timestamp_ms: u32) -> Self {
        Self::new(
            CommandKind::EmergencyStop,
            MotionProfile::default(),
            timestamp_ms,
        )
    }

    /// Request a homing run.
    pub fn home(timestamp_ms: u32) -> Self {
        Self::new(CommandKind::Home, MotionProfile::default(), timestamp_ms)
    }

    /// Attach a producer-assigned identifier.
    #[must_use]
    pub fn with_id(mut self, id: u16) -> Self {
        self.id = id;
        self
    }
}
