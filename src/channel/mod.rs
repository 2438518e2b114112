//! Protocol-to-command translation from the external control channel.
//!
//! The channel is an externally-clocked byte array refreshed at its own
//! cadence; this module owns the slow tick that decodes a fixed 5-byte
//! window into a control mode and, while following, into motion commands.
//! It only ever produces command-queue entries and never touches actuator
//! state directly.

mod mode;
mod translator;
mod window;

pub use mode::{decode_band, next_mode, ControlMode};
pub use translator::{ChannelTranslator, TranslatorStats};
pub use window::{ChannelReceiver, ChannelWindow, WINDOW_LEN};
