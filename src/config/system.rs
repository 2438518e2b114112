//! Root configuration structure.

use serde::Deserialize;

use super::channel::ChannelConfig;
use super::homing::HomingConfig;
use super::motion::MotionConfig;
use super::safety::SafetyConfig;

/// Command-dispatch tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct DispatcherConfig {
    /// Maximum queued commands applied per real-time tick.
    #[serde(default = "default_drain_budget")]
    pub drain_budget: usize,
}

fn default_drain_budget() -> usize {
    4
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            drain_budget: default_drain_budget(),
        }
    }
}

/// Root configuration from TOML.
///
/// Every table is optional; an empty document yields the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ControlConfig {
    /// Nominal motion profile.
    #[serde(default)]
    pub motion: MotionConfig,

    /// Homing sequence parameters.
    #[serde(default)]
    pub homing: HomingConfig,

    /// Debounce and estop policy.
    #[serde(default)]
    pub safety: SafetyConfig,

    /// Protocol translator parameters.
    #[serde(default)]
    pub channel: ChannelConfig,

    /// Dispatcher tuning.
    #[serde(default)]
    pub dispatcher: DispatcherConfig,
}
