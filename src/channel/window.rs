//! Receiver interface and the fixed command window.

/// Number of channel bytes the translator consumes.
pub const WINDOW_LEN: usize = 5;

/// Read access to the externally-clocked channel byte array.
///
/// Transport, framing and checksums live outside this core; the receiver
/// exposes only signal presence, a monotonically increasing frame counter
/// and indexed byte reads.
pub trait ChannelReceiver {
    /// Whether a valid signal is currently present.
    fn connected(&self) -> bool;

    /// Count of frames received so far. The translator skips ticks where
    /// this has not advanced.
    fn frame_count(&self) -> u32;

    /// Read one byte of the most recent frame. Out-of-range indices
    /// read as zero.
    fn byte(&self, index: usize) -> u8;
}

/// The fixed 5-byte command window read from the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelWindow {
    /// Coarse position (or high byte of the fine position).
    pub position_high: u8,
    /// Low byte of the fine position.
    pub position_low: u8,
    /// Acceleration scale, 0–255 mapping to 0–100 % of nominal.
    pub accel_scale: u8,
    /// Speed scale, 0–255 mapping to 0–100 % of nominal.
    pub speed_scale: u8,
    /// Control-mode byte, decoded into three bands.
    pub mode: u8,
}

impl ChannelWindow {
    /// Snapshot the window starting at `offset` in the receiver's array.
    pub fn read_from<R: ChannelReceiver>(rx: &R, offset: usize) -> Self {
        Self {
            position_high: rx.byte(offset),
            position_low: rx.byte(offset + 1),
            accel_scale: rx.byte(offset + 2),
            speed_scale: rx.byte(offset + 3),
            mode: rx.byte(offset + 4),
        }
    }

    /// Combined 16-bit position value (high and low bytes).
    #[inline]
    pub fn position_fine(&self) -> u16 {
        ((self.position_high as u16) << 8) | self.position_low as u16
    }
}
