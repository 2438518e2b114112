//! Control-mode decoding with boundary hysteresis.
//!
//! The mode byte's full range splits into three contiguous bands. A noisy
//! value parked near a band boundary must not flap the mode, so a
//! transition is honored only once the raw value has crossed the boundary
//! by a guard margin in the direction of travel; that makes four guarded
//! boundary/direction pairs for the three bands.

/// Control mode decoded from the external channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlMode {
    /// No channel-driven motion; entering this band emits one Stop.
    #[default]
    Stop,
    /// Position/speed/acceleration follow the channel window.
    Follow,
    /// Entering this band emits one Home command.
    Home,
}

/// First raw value of the Follow band.
pub const FOLLOW_START: u8 = 86;
/// First raw value of the Home band.
pub const HOME_START: u8 = 170;

/// Band a raw value falls in, ignoring hysteresis.
///
/// Used to seed the decoder; steady-state decoding goes through
/// [`next_mode`].
pub fn decode_band(raw: u8) -> ControlMode {
    if raw < FOLLOW_START {
        ControlMode::Stop
    } else if raw < HOME_START {
        ControlMode::Follow
    } else {
        ControlMode::Home
    }
}

/// Decode the next mode given the current one.
///
/// Idempotent under repeated identical input; a raw value within `guard`
/// counts of a neighboring boundary leaves the mode unchanged.
pub fn next_mode(current: ControlMode, raw: u8, guard: u8) -> ControlMode {
    let v = raw as i16;
    let g = guard as i16;
    let follow_start = FOLLOW_START as i16;
    let home_start = HOME_START as i16;

    match current {
        ControlMode::Stop => {
            if v >= home_start + g {
                ControlMode::Home
            } else if v >= follow_start + g {
                ControlMode::Follow
            } else {
                ControlMode::Stop
            }
        }
        ControlMode::Follow => {
            if v >= home_start + g {
                ControlMode::Home
            } else if v <= follow_start - 1 - g {
                ControlMode::Stop
            } else {
                ControlMode::Follow
            }
        }
        ControlMode::Home => {
            if v <= follow_start - 1 - g {
                ControlMode::Stop
            } else if v <= home_start - 1 - g {
                ControlMode::Follow
            } else {
                ControlMode::Home
            }
        }
    }
}
