//! Configuration for the motion coordinator.
//!
//! Provides types for loading and validating coordinator configuration from
//! TOML (with the `std` feature) or pre-parsed data. Defaults reproduce the
//! compiled-in constants of a typical single-axis rig.

mod channel;
mod homing;
#[cfg(feature = "std")]
mod loader;
mod motion;
mod safety;
mod system;
mod validation;

pub use channel::{ChannelConfig, PositionResolution};
pub use homing::HomingConfig;
pub use motion::MotionConfig;
pub use safety::SafetyConfig;
pub use system::{ControlConfig, DispatcherConfig};
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};
