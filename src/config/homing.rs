//! Homing sequence parameters.

use serde::Deserialize;

/// Parameters of the auto-ranging homing sequence.
#[derive(Debug, Clone, Deserialize)]
pub struct HomingConfig {
    /// Reduced speed for limit approaches, steps per second.
    #[serde(default = "default_speed")]
    pub speed: f32,

    /// Distance backed off each detected limit, steps.
    #[serde(default = "default_backoff")]
    pub backoff_steps: i32,

    /// Margin kept inward of the physically detected limits, steps.
    #[serde(default = "default_margin")]
    pub safety_margin: i32,

    /// Deadline for the whole homing run, milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout_ms: u32,

    /// Sweep distance commanded when searching for a limit, steps.
    /// Large enough to guarantee the switch is reached first.
    #[serde(default = "default_sweep")]
    pub sweep_steps: i32,

    /// Reference point as a fraction of the measured range (0.0..=1.0).
    /// 0.5 homes to the center.
    #[serde(default = "default_reference_fraction")]
    pub reference_fraction: f32,
}

fn default_speed() -> f32 {
    500.0
}

fn default_backoff() -> i32 {
    50
}

fn default_margin() -> i32 {
    10
}

fn default_timeout() -> u32 {
    30_000
}

fn default_sweep() -> i32 {
    100_000
}

fn default_reference_fraction() -> f32 {
    0.5
}

impl Default for HomingConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            backoff_steps: default_backoff(),
            safety_margin: default_margin(),
            timeout_ms: default_timeout(),
            sweep_steps: default_sweep(),
            reference_fraction: default_reference_fraction(),
        }
    }
}
