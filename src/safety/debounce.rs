//! Limit-sensor debouncing and raw input plumbing.
//!
//! Limit switches near stepper wiring are electrically noisy; an edge
//! interrupt only means "look now", never "the switch changed". Interrupt
//! context does the minimum possible work (set an [`EdgeFlags`] atomic)
//! and the real-time tick samples levels and runs the dwell filter.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::digital::InputPin;

/// Which end of travel a signal belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LimitSide {
    /// The end approached first during homing (position zero is near it).
    Near,
    /// The opposite end.
    Far,
}

/// Lock-free flags set from interrupt context, drained once per tick.
#[derive(Debug, Default)]
pub struct EdgeFlags {
    near: AtomicBool,
    far: AtomicBool,
}

impl EdgeFlags {
    /// Create cleared flags. Usable in `static` initializers.
    pub const fn new() -> Self {
        Self {
            near: AtomicBool::new(false),
            far: AtomicBool::new(false),
        }
    }

    /// Signal a near-side edge. Safe to call from interrupt context.
    #[inline]
    pub fn notify_near(&self) {
        self.near.store(true, Ordering::Release);
    }

    /// Signal a far-side edge. Safe to call from interrupt context.
    #[inline]
    pub fn notify_far(&self) {
        self.far.store(true, Ordering::Release);
    }

    /// Consume the near-side flag.
    #[inline]
    pub fn take_near(&self) -> bool {
        self.near.swap(false, Ordering::AcqRel)
    }

    /// Consume the far-side flag.
    #[inline]
    pub fn take_far(&self) -> bool {
        self.far.swap(false, Ordering::AcqRel)
    }
}

/// Raw limit level reads, pre-inverted to active-high.
pub trait LimitSwitches {
    /// Level of the near-end switch.
    fn near(&mut self) -> bool;
    /// Level of the far-end switch.
    fn far(&mut self) -> bool;
}

/// Coarse driver health signal (e.g. a servo-driver alarm output).
pub trait DriverAlarm {
    /// Whether the driver currently reports a fault.
    fn alarm_active(&mut self) -> bool;
}

/// Alarm source for drivers without a health output.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAlarm;

impl DriverAlarm for NoAlarm {
    #[inline]
    fn alarm_active(&mut self) -> bool {
        false
    }
}

/// [`LimitSwitches`] over two embedded-hal input pins.
///
/// `active_low` covers the common pulled-up, switch-to-ground wiring.
/// Pin read errors are treated as "not asserted": a flaky line shows up as
/// debounce oscillation rather than a phantom limit hit.
pub struct PinLimitSwitches<N, F>
where
    N: InputPin,
    F: InputPin,
{
    near_pin: N,
    far_pin: F,
    active_low: bool,
}

impl<N, F> PinLimitSwitches<N, F>
where
    N: InputPin,
    F: InputPin,
{
    /// Wrap two input pins.
    pub fn new(near_pin: N, far_pin: F, active_low: bool) -> Self {
        Self {
            near_pin,
            far_pin,
            active_low,
        }
    }

    fn read<P: InputPin>(pin: &mut P, active_low: bool) -> bool {
        let level = if active_low {
            pin.is_low()
        } else {
            pin.is_high()
        };
        level.unwrap_or(false)
    }
}

impl<N, F> LimitSwitches for PinLimitSwitches<N, F>
where
    N: InputPin,
    F: InputPin,
{
    fn near(&mut self) -> bool {
        Self::read(&mut self.near_pin, self.active_low)
    }

    fn far(&mut self) -> bool {
        Self::read(&mut self.far_pin, self.active_low)
    }
}

/// [`DriverAlarm`] over an embedded-hal input pin.
pub struct PinDriverAlarm<P: InputPin> {
    pin: P,
    active_low: bool,
}

impl<P: InputPin> PinDriverAlarm<P> {
    /// Wrap an alarm input pin.
    pub fn new(pin: P, active_low: bool) -> Self {
        Self { pin, active_low }
    }
}

impl<P: InputPin> DriverAlarm for PinDriverAlarm<P> {
    fn alarm_active(&mut self) -> bool {
        let level = if self.active_low {
            self.pin.is_low()
        } else {
            self.pin.is_high()
        };
        level.unwrap_or(false)
    }
}

/// Dwell-time debounce filter for one travel end.
///
/// A candidate state must hold for the configured dwell before it commits.
/// Initial state comes from a direct level read at startup; a limit may
/// already be asserted at boot, and waiting for an edge would miss it.
#[derive(Debug, Clone)]
pub struct LimitDebouncer {
    stable: bool,
    candidate: bool,
    candidate_since_ms: u32,
    last_raw: bool,
    dwell_ms: u32,
    // Oscillation tracking: too many raw flips inside the settle window
    // without a commit means the signal is not trustworthy.
    settle_window_ms: u32,
    max_transitions: u8,
    transitions: u8,
    window_start_ms: u32,
    sensor_fault: bool,
}

impl LimitDebouncer {
    /// Create a debouncer initialized from a direct level read.
    pub fn new(initial_level: bool, dwell_ms: u32, settle_window_ms: u32, max_transitions: u8) -> Self {
        Self {
            stable: initial_level,
            candidate: initial_level,
            candidate_since_ms: 0,
            last_raw: initial_level,
            dwell_ms,
            settle_window_ms,
            max_transitions,
            transitions: 0,
            window_start_ms: 0,
            sensor_fault: false,
        }
    }

    /// Current debounced state.
    #[inline]
    pub fn stable(&self) -> bool {
        self.stable
    }

    /// Whether the raw signal oscillated past the settle window without
    /// committing. Non-fatal; surfaced only. Clears on the next commit.
    #[inline]
    pub fn sensor_fault(&self) -> bool {
        self.sensor_fault
    }

    /// Feed one raw sample. Returns the new stable state when a change
    /// commits, `None` otherwise.
    pub fn sample(&mut self, raw: bool, now_ms: u32) -> Option<bool> {
        if raw != self.last_raw {
            self.last_raw = raw;
            self.track_transition(now_ms);
        }

        if raw == self.stable {
            // Bounce collapsed back; nothing pending.
            self.candidate = self.stable;
            return None;
        }

        if raw != self.candidate {
            self.candidate = raw;
            self.candidate_since_ms = now_ms;
            return None;
        }

        if now_ms.wrapping_sub(self.candidate_since_ms) >= self.dwell_ms {
            self.stable = raw;
            self.transitions = 0;
            self.sensor_fault = false;
            Some(raw)
        } else {
            None
        }
    }

    fn track_transition(&mut self, now_ms: u32) {
        if now_ms.wrapping_sub(self.window_start_ms) > self.settle_window_ms {
            self.window_start_ms = now_ms;
            self.transitions = 0;
        }
        self.transitions = self.transitions.saturating_add(1);
        if self.transitions > self.max_transitions {
            self.sensor_fault = true;
        }
    }
}
