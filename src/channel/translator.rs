//! Stateful translation from channel frames to motion commands.
//!
//! Runs on the slow tick. The translator is intentionally forgetful: it
//! tracks only the current mode, the last emitted target and frame
//! bookkeeping. All motion authority stays with the dispatcher, which can
//! reject anything emitted here.

use libm::roundf;

use crate::command::{CommandSender, MotionCommand, MotionProfile};
use crate::config::{ChannelConfig, PositionResolution};
use crate::control::StatusSnapshot;

use super::mode::{next_mode, ControlMode};
use super::window::{ChannelReceiver, ChannelWindow};

/// Counters surfaced for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TranslatorStats {
    /// Commands successfully enqueued.
    pub emitted: u32,
    /// Commands dropped because the queue was full.
    pub queue_drops: u32,
    /// Rate-limited notices that Follow output is suppressed while unhomed.
    pub unhomed_notices: u32,
}

/// Protocol-to-command translator over one [`ChannelReceiver`].
pub struct ChannelTranslator {
    config: ChannelConfig,
    mode: ControlMode,
    last_frame: Option<u32>,
    last_target: Option<i32>,
    last_notice_ms: Option<u32>,
    was_connected: bool,
    enabled: bool,
    window: ChannelWindow,
    stats: TranslatorStats,
}

impl ChannelTranslator {
    /// Create a translator in Stop mode, treating the channel as absent.
    pub fn new(config: ChannelConfig) -> Self {
        Self {
            config,
            mode: ControlMode::Stop,
            last_frame: None,
            last_target: None,
            last_notice_ms: None,
            was_connected: false,
            enabled: true,
            window: ChannelWindow::default(),
            stats: TranslatorStats::default(),
        }
    }

    /// Current control mode.
    #[inline]
    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    /// Last decoded window (zeroed until the first frame).
    #[inline]
    pub fn window(&self) -> ChannelWindow {
        self.window
    }

    /// Diagnostic counters.
    #[inline]
    pub fn stats(&self) -> TranslatorStats {
        self.stats
    }

    /// Enable or disable command emission.
    ///
    /// While disabled the translator keeps decoding frames and tracking the
    /// mode so re-enabling never acts on a stale view, but emits nothing.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled && !self.enabled {
            // Force a fresh MoveAbsolute on the next Follow frame.
            self.last_target = None;
        }
        self.enabled = enabled;
    }

    /// Whether command emission is enabled.
    #[inline]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Process one slow tick against the receiver's current frame.
    ///
    /// `status` is the latest controller snapshot; the envelope and nominal
    /// profile in it drive the position and scale mappings.
    pub fn tick<R: ChannelReceiver>(
        &mut self,
        rx: &R,
        status: &StatusSnapshot,
        sender: &CommandSender<'_>,
        now_ms: u32,
    ) {
        if !rx.connected() {
            if self.was_connected {
                // Edge-triggered: exactly one Stop per signal loss.
                self.was_connected = false;
                self.mode = ControlMode::Stop;
                self.last_frame = None;
                self.last_target = None;
                self.emit(sender, MotionCommand::stop(now_ms));
            }
            return;
        }
        self.was_connected = true;

        let frame = rx.frame_count();
        if self.last_frame == Some(frame) {
            return;
        }
        self.last_frame = Some(frame);

        self.window = ChannelWindow::read_from(rx, self.config.window_offset);

        let mode = next_mode(self.mode, self.window.mode, self.config.guard_margin);
        if mode != self.mode {
            self.mode = mode;
            self.last_target = None;
            match mode {
                ControlMode::Stop => {
                    self.emit(sender, MotionCommand::stop(now_ms));
                }
                ControlMode::Home => {
                    self.emit(sender, MotionCommand::home(now_ms));
                }
                ControlMode::Follow => {}
            }
        }

        if self.mode == ControlMode::Follow {
            self.follow(status, sender, now_ms);
        }
    }

    /// Emit the position the window asks for, if it moved far enough.
    fn follow(&mut self, status: &StatusSnapshot, sender: &CommandSender<'_>, now_ms: u32) {
        if !status.homed || !status.envelope.valid {
            self.notice_unhomed(now_ms);
            return;
        }

        let target = self.map_position(status);

        if let Some(last) = self.last_target {
            if (target - last).abs() <= self.config.min_step_threshold {
                return;
            }
        }

        let speed = scaled(
            status.profile.max_speed,
            self.window.speed_scale,
            self.config.min_speed,
        );
        let accel = scaled(
            status.profile.acceleration,
            self.window.accel_scale,
            self.config.min_acceleration,
        );

        let profile = MotionProfile::new(speed, accel);
        if self.emit(sender, MotionCommand::move_to(target, profile, now_ms)) {
            self.last_target = Some(target);
        }
    }

    /// Map the window's position bytes onto the travel envelope.
    fn map_position(&self, status: &StatusSnapshot) -> i32 {
        let span = status.envelope.span() as f32;
        let fraction = match self.config.resolution {
            PositionResolution::Coarse => self.window.position_high as f32 / 255.0,
            PositionResolution::Fine => self.window.position_fine() as f32 / 65535.0,
        };
        status.envelope.min + roundf(span * fraction) as i32
    }

    fn notice_unhomed(&mut self, now_ms: u32) {
        let due = match self.last_notice_ms {
            Some(last) => now_ms.wrapping_sub(last) >= self.config.unhomed_notice_ms,
            None => true,
        };
        if due {
            self.last_notice_ms = Some(now_ms);
            self.stats.unhomed_notices = self.stats.unhomed_notices.saturating_add(1);
        }
    }

    /// Returns whether the command actually reached the queue.
    fn emit(&mut self, sender: &CommandSender<'_>, command: MotionCommand) -> bool {
        if !self.enabled {
            return false;
        }
        match sender.send(command) {
            Ok(()) => {
                self.stats.emitted = self.stats.emitted.saturating_add(1);
                true
            }
            Err(_) => {
                self.stats.queue_drops = self.stats.queue_drops.saturating_add(1);
                false
            }
        }
    }
}

/// Scale a nominal value by a 0–255 byte, floored.
fn scaled(nominal: f32, scale: u8, floor: f32) -> f32 {
    let value = nominal * scale as f32 / 255.0;
    if value > floor {
        value
    } else {
        floor
    }
}
