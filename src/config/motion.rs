//! Nominal motion parameters.

use serde::Deserialize;

use crate::command::MotionProfile;

/// Nominal motion profile applied at startup and used as the base for
/// percentage scaling by the protocol translator.
#[derive(Debug, Clone, Deserialize)]
pub struct MotionConfig {
    /// Nominal maximum speed in steps per second.
    #[serde(default = "default_max_speed")]
    pub max_speed: f32,

    /// Nominal acceleration in steps per second squared.
    #[serde(default = "default_acceleration")]
    pub acceleration: f32,

    /// Deceleration in steps per second squared; mirrors acceleration
    /// when omitted.
    #[serde(default)]
    pub deceleration: Option<f32>,

    /// Respect the travel envelope by default.
    #[serde(default = "default_true")]
    pub enable_limits: bool,
}

fn default_max_speed() -> f32 {
    5000.0
}

fn default_acceleration() -> f32 {
    5000.0
}

fn default_true() -> bool {
    true
}

impl MotionConfig {
    /// Build the startup [`MotionProfile`].
    pub fn profile(&self) -> MotionProfile {
        let mut profile = MotionProfile::new(self.max_speed, self.acceleration);
        if let Some(decel) = self.deceleration {
            profile = profile.with_deceleration(decel);
        }
        profile.enable_limits = self.enable_limits;
        profile
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            max_speed: default_max_speed(),
            acceleration: default_acceleration(),
            deceleration: None,
            enable_limits: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deceleration_mirrors_when_omitted() {
        let config = MotionConfig::default();
        let profile = config.profile();
        assert_eq!(profile.deceleration, profile.acceleration);
    }

    #[test]
    fn deceleration_override() {
        let config = MotionConfig {
            deceleration: Some(1500.0),
            ..MotionConfig::default()
        };
        assert_eq!(config.profile().deceleration, 1500.0);
    }
}
