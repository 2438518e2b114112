//! External control-channel translation parameters.

use serde::Deserialize;

/// Precision of the position mapping in Follow mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PositionResolution {
    /// High byte alone maps onto the envelope (256 positions).
    #[default]
    Coarse,
    /// High and low bytes combine to a 16-bit value (65536 positions).
    Fine,
}

/// Parameters of the protocol-to-command translator.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelConfig {
    /// Index of the first byte of the 5-byte window inside the receiver's
    /// byte array.
    #[serde(default)]
    pub window_offset: usize,

    /// Position mapping precision.
    #[serde(default)]
    pub resolution: PositionResolution,

    /// Raw counts a mode value must cross a band boundary by, in the
    /// direction of travel, before the new mode is honored.
    #[serde(default = "default_guard_margin")]
    pub guard_margin: u8,

    /// Floor for the scaled speed, steps per second. Keeps a near-zero
    /// speed byte from stalling motion entirely.
    #[serde(default = "default_min_speed")]
    pub min_speed: f32,

    /// Floor for the scaled acceleration, steps per second squared.
    #[serde(default = "default_min_acceleration")]
    pub min_acceleration: f32,

    /// Minimum change in computed target, steps, before a new MoveAbsolute
    /// is emitted. Suppresses near-duplicate commands every tick.
    #[serde(default = "default_min_step")]
    pub min_step_threshold: i32,

    /// Minimum spacing of the "follow output suppressed while unhomed"
    /// diagnostic notice, milliseconds.
    #[serde(default = "default_notice_interval")]
    pub unhomed_notice_ms: u32,
}

fn default_guard_margin() -> u8 {
    5
}

fn default_min_speed() -> f32 {
    50.0
}

fn default_min_acceleration() -> f32 {
    100.0
}

fn default_min_step() -> i32 {
    2
}

fn default_notice_interval() -> u32 {
    1000
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            window_offset: 0,
            resolution: PositionResolution::Coarse,
            guard_margin: default_guard_margin(),
            min_speed: default_min_speed(),
            min_acceleration: default_min_acceleration(),
            min_step_threshold: default_min_step(),
            unhomed_notice_ms: default_notice_interval(),
        }
    }
}
