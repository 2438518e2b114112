//! Error types for axis-motion.
//!
//! Two distinct surfaces live here. [`Error`] and its sub-enums are the
//! `Result`-path errors returned by the API (bad configuration, rejected
//! command submission). [`FaultCode`] / [`FaultRecord`] are the latched-fault
//! taxonomy published through telemetry: faults are recorded as status fields
//! observed on the next tick, never propagated across scheduling domains.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all axis-motion operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Command submission error
    Command(CommandError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Invalid homing speed (must be > 0)
    InvalidHomingSpeed(f32),
    /// Invalid backoff distance (must be > 0 steps)
    InvalidBackoff(i32),
    /// Invalid safety margin (must be >= 0 steps)
    InvalidMargin(i32),
    /// Invalid reference fraction (must be within 0.0..=1.0)
    InvalidReferenceFraction(f32),
    /// Invalid nominal speed (must be > 0)
    InvalidMaxSpeed(f32),
    /// Invalid acceleration (must be > 0)
    InvalidAcceleration(f32),
    /// Invalid debounce dwell time (must be > 0 ms)
    InvalidDebounceDwell(u32),
    /// Invalid homing timeout (must be > 0 ms)
    InvalidHomingTimeout(u32),
    /// Mode guard margin too large for the band layout
    InvalidGuardMargin(u8),
    /// Queue drain budget must be at least 1 command per tick
    InvalidDrainBudget(usize),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Command submission errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The bounded command queue is full; the command was dropped.
    QueueFull,
}

/// Latched and informational fault taxonomy.
///
/// Latched codes persist until a homing run reaches `Complete`; none
/// self-clear. Human-readable description is an external-layer concern;
/// the contract here is enum plus timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultCode {
    /// Debounce filter saw oscillation past the settle window (non-fatal).
    Sensor,
    /// Near-end limit asserted outside a controlled homing approach.
    NearLimit,
    /// Far-end limit asserted outside a controlled homing approach.
    FarLimit,
    /// Explicit emergency stop.
    Estop,
    /// Driver-reported health fault (report-only, non-latching).
    Actuator,
    /// Homing exceeded its global or phase timeout.
    HomingTimeout,
    /// Motion stopped during homing without reaching the expected limit.
    HomingMechanical,
    /// Command dropped because the queue was full.
    QueueFull,
    /// Target altered to respect the travel envelope (informational).
    ClampApplied,
}

/// A fault code with the tick timestamp at which it was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaultRecord {
    /// What happened.
    pub code: FaultCode,
    /// Millisecond timestamp of the owning domain when recorded.
    pub at_ms: u32,
}

impl FaultRecord {
    /// Record a fault at the given timestamp.
    #[inline]
    pub const fn new(code: FaultCode, at_ms: u32) -> Self {
        Self { code, at_ms }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Command(e) => write!(f, "Command error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidHomingSpeed(v) => {
                write!(f, "Invalid homing speed: {}. Must be > 0", v)
            }
            ConfigError::InvalidBackoff(v) => {
                write!(f, "Invalid backoff distance: {}. Must be > 0 steps", v)
            }
            ConfigError::InvalidMargin(v) => {
                write!(f, "Invalid safety margin: {}. Must be >= 0 steps", v)
            }
            ConfigError::InvalidReferenceFraction(v) => {
                write!(f, "Invalid reference fraction: {}. Must be in 0.0..=1.0", v)
            }
            ConfigError::InvalidMaxSpeed(v) => {
                write!(f, "Invalid nominal speed: {}. Must be > 0", v)
            }
            ConfigError::InvalidAcceleration(v) => {
                write!(f, "Invalid acceleration: {}. Must be > 0", v)
            }
            ConfigError::InvalidDebounceDwell(v) => {
                write!(f, "Invalid debounce dwell: {} ms. Must be > 0", v)
            }
            ConfigError::InvalidHomingTimeout(v) => {
                write!(f, "Invalid homing timeout: {} ms. Must be > 0", v)
            }
            ConfigError::InvalidGuardMargin(v) => {
                write!(f, "Invalid mode guard margin: {}. Bands would overlap", v)
            }
            ConfigError::InvalidDrainBudget(v) => {
                write!(f, "Invalid drain budget: {}. Must be >= 1", v)
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::QueueFull => write!(f, "Command queue full, command dropped"),
        }
    }
}

impl fmt::Display for FaultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FaultCode::Sensor => "SensorFault",
            FaultCode::NearLimit => "NearLimitFault",
            FaultCode::FarLimit => "FarLimitFault",
            FaultCode::Estop => "EstopFault",
            FaultCode::Actuator => "ActuatorFault",
            FaultCode::HomingTimeout => "HomingTimeout",
            FaultCode::HomingMechanical => "HomingMechanicalFailure",
            FaultCode::QueueFull => "QueueFull",
            FaultCode::ClampApplied => "ClampApplied",
        };
        f.write_str(name)
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Error::Command(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for CommandError {}
