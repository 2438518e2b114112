//! Validated travel range.

/// The travel range established by homing, inset by the safety margin.
///
/// Created invalid at process start, recomputed from scratch on every homing
/// run, and invalidated by an emergency stop. Never loaded from storage: the
/// physical setup may change between power cycles, so a remembered range is
/// a lie waiting to happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TravelEnvelope {
    /// Minimum valid position in steps.
    pub min: i32,
    /// Maximum valid position in steps.
    pub max: i32,
    /// Whether min/max come from a completed homing run.
    pub valid: bool,
}

impl TravelEnvelope {
    /// The invalid envelope present before any homing run.
    pub const fn invalid() -> Self {
        Self {
            min: 0,
            max: 0,
            valid: false,
        }
    }

    /// Establish a measured range.
    pub fn set(&mut self, min: i32, max: i32) {
        self.min = min;
        self.max = max;
        self.valid = true;
    }

    /// Discard the range (homing error, emergency stop).
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Whether a position lies inside the valid range.
    pub fn contains(&self, position: i32) -> bool {
        self.valid && position >= self.min && position <= self.max
    }

    /// Clamp a target into the range. Returns the clamped target and whether
    /// it was altered. Passes the target through unchanged when invalid.
    pub fn clamp(&self, target: i32) -> (i32, bool) {
        if !self.valid {
            return (target, false);
        }
        let clamped = target.clamp(self.min, self.max);
        (clamped, clamped != target)
    }

    /// Range span in steps (0 when invalid).
    pub fn span(&self) -> i32 {
        if self.valid {
            self.max - self.min
        } else {
            0
        }
    }
}

impl Default for TravelEnvelope {
    fn default() -> Self {
        Self::invalid()
    }
}
