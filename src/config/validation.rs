//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::ControlConfig;

/// Validate a coordinator configuration.
///
/// Checks:
/// - Speeds and accelerations are positive
/// - Homing distances and timeouts are usable
/// - The reference fraction stays inside the envelope
/// - Mode guard margin leaves the bands distinguishable
pub fn validate_config(config: &ControlConfig) -> Result<()> {
    if config.motion.max_speed <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidMaxSpeed(
            config.motion.max_speed,
        )));
    }
    if config.motion.acceleration <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidAcceleration(
            config.motion.acceleration,
        )));
    }
    if let Some(decel) = config.motion.deceleration {
        if decel <= 0.0 {
            return Err(Error::Config(ConfigError::InvalidAcceleration(decel)));
        }
    }

    if config.homing.speed <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidHomingSpeed(
            config.homing.speed,
        )));
    }
    if config.homing.backoff_steps <= 0 {
        return Err(Error::Config(ConfigError::InvalidBackoff(
            config.homing.backoff_steps,
        )));
    }
    if config.homing.safety_margin < 0 {
        return Err(Error::Config(ConfigError::InvalidMargin(
            config.homing.safety_margin,
        )));
    }
    if config.homing.timeout_ms == 0 {
        return Err(Error::Config(ConfigError::InvalidHomingTimeout(
            config.homing.timeout_ms,
        )));
    }
    if !(0.0..=1.0).contains(&config.homing.reference_fraction) {
        return Err(Error::Config(ConfigError::InvalidReferenceFraction(
            config.homing.reference_fraction,
        )));
    }

    if config.safety.debounce_dwell_ms == 0 {
        return Err(Error::Config(ConfigError::InvalidDebounceDwell(
            config.safety.debounce_dwell_ms,
        )));
    }

    // Three equal bands over 0..=255 are ~85 counts wide; the guard must
    // leave room to sit inside a band at all.
    if config.channel.guard_margin as u16 >= 42 {
        return Err(Error::Config(ConfigError::InvalidGuardMargin(
            config.channel.guard_margin,
        )));
    }

    if config.dispatcher.drain_budget == 0 {
        return Err(Error::Config(ConfigError::InvalidDrainBudget(
            config.dispatcher.drain_budget,
        )));
    }

    Ok(())
}
