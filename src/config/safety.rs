//! Safety layer parameters.

use serde::Deserialize;

/// Debounce, alarm cadence and estop policy.
#[derive(Debug, Clone, Deserialize)]
pub struct SafetyConfig {
    /// Dwell a candidate limit state must hold before committing, ms.
    #[serde(default = "default_dwell")]
    pub debounce_dwell_ms: u32,

    /// Window over which raw transitions are counted for oscillation
    /// detection, ms.
    #[serde(default = "default_settle_window")]
    pub settle_window_ms: u32,

    /// Raw transitions tolerated inside the settle window before a
    /// SensorFault is surfaced.
    #[serde(default = "default_max_transitions")]
    pub max_transitions: u8,

    /// Driver alarm sampling divider, in real-time ticks. The alarm is a
    /// coarse health signal and does not need 1 ms cadence.
    #[serde(default = "default_alarm_poll")]
    pub alarm_poll_ticks: u32,

    /// Automatically start a homing run after an emergency stop.
    #[serde(default)]
    pub auto_home_on_estop: bool,
}

fn default_dwell() -> u32 {
    100
}

fn default_settle_window() -> u32 {
    500
}

fn default_max_transitions() -> u8 {
    8
}

fn default_alarm_poll() -> u32 {
    10
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            debounce_dwell_ms: default_dwell(),
            settle_window_ms: default_settle_window(),
            max_transitions: default_max_transitions(),
            alarm_poll_ticks: default_alarm_poll(),
            auto_home_on_estop: false,
        }
    }
}
