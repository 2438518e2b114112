//! Actuator abstraction.
//!
//! The coordinator never generates step pulses itself. It drives an opaque
//! motion primitive that accepts a target and moves asynchronously while the
//! coordinator keeps ticking. Positions are signed integer steps from an
//! arbitrary zero established at homing.

/// The asynchronous single-axis motion primitive.
///
/// Implementations are expected to ramp speed with a trapezoidal profile and
/// to keep moving between calls; all methods must be cheap enough to call
/// from a 1 ms control loop.
pub trait Actuator {
    /// Command a move to an absolute position in steps.
    fn move_to(&mut self, position: i32);

    /// Command a move relative to the current position.
    fn move_by(&mut self, delta: i32) {
        let target = self.current_position().saturating_add(delta);
        self.move_to(target);
    }

    /// Set the maximum speed in steps per second for subsequent motion.
    fn set_speed(&mut self, steps_per_sec: f32);

    /// Set the acceleration (and deceleration) in steps per second squared.
    fn set_acceleration(&mut self, steps_per_sec2: f32);

    /// Halt immediately with no deceleration ramp.
    fn hard_stop(&mut self);

    /// Halt with a bounded deceleration ramp.
    fn ramped_stop(&mut self);

    /// Whether the actuator is currently executing a move.
    fn is_moving(&self) -> bool;

    /// Current position in steps.
    fn current_position(&self) -> i32;

    /// Current speed in steps per second (signed for direction).
    fn current_speed(&self) -> f32;

    /// Redefine the current physical location as `position`.
    ///
    /// Used by homing to establish the zero reference; must only be called
    /// while the actuator is stopped.
    fn set_current_position(&mut self, position: i32);

    /// Enable or disable the driver outputs.
    fn set_enabled(&mut self, enabled: bool);
}
