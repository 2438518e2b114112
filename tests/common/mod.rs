//! Simulated rail shared by the integration tests.
//!
//! One `RailState` models the physics: an absolute position along the rail,
//! a constant-speed move toward a target, and two switches at fixed physical
//! locations. The actuator, switch and alarm handles all reference the same
//! state, so the controller under test sees a consistent little world.

use std::cell::RefCell;
use std::rc::Rc;

use axis_motion::safety::{DriverAlarm, LimitSwitches};
use axis_motion::Actuator;

/// Physical state of the simulated rail.
pub struct RailState {
    /// Absolute position along the rail, steps.
    pub physical: f32,
    /// Logical position = physical - offset.
    pub offset: f32,
    /// Physical position the current move heads for.
    pub target_physical: f32,
    /// Whether a move is in flight.
    pub moving: bool,
    /// Commanded speed, steps per second.
    pub speed: f32,
    /// Commanded acceleration (tracked, not modeled).
    pub accel: f32,
    /// Driver outputs enabled.
    pub enabled: bool,
    /// Near switch asserts at and below this physical position.
    pub near_edge: f32,
    /// Far switch asserts at and above this physical position.
    pub far_edge: f32,
    /// Driver alarm line.
    pub alarm: bool,
}

pub type SharedRail = Rc<RefCell<RailState>>;

/// Build a rail starting at physical zero with the given switch locations.
pub fn rail(near_edge: f32, far_edge: f32) -> SharedRail {
    Rc::new(RefCell::new(RailState {
        physical: 0.0,
        offset: 0.0,
        target_physical: 0.0,
        moving: false,
        speed: 0.0,
        accel: 0.0,
        enabled: false,
        near_edge,
        far_edge,
        alarm: false,
    }))
}

/// Advance the physics by `dt_ms`: constant speed toward the target.
pub fn step_physics(rail: &SharedRail, dt_ms: u32) {
    let mut s = rail.borrow_mut();
    if !s.moving || !s.enabled {
        return;
    }
    let step = s.speed * dt_ms as f32 / 1000.0;
    let delta = s.target_physical - s.physical;
    if delta.abs() <= step {
        s.physical = s.target_physical;
        s.moving = false;
    } else {
        s.physical += step * delta.signum();
    }
}

pub struct SimActuator(pub SharedRail);

impl Actuator for SimActuator {
    fn move_to(&mut self, position: i32) {
        let mut s = self.0.borrow_mut();
        s.target_physical = position as f32 + s.offset;
        s.moving = true;
    }
    fn set_speed(&mut self, steps_per_sec: f32) {
        self.0.borrow_mut().speed = steps_per_sec;
    }
    fn set_acceleration(&mut self, steps_per_sec2: f32) {
        self.0.borrow_mut().accel = steps_per_sec2;
    }
    fn hard_stop(&mut self) {
        let mut s = self.0.borrow_mut();
        s.target_physical = s.physical;
        s.moving = false;
    }
    fn ramped_stop(&mut self) {
        // The sim has no ramp model; both stops halt on the spot.
        self.hard_stop();
    }
    fn is_moving(&self) -> bool {
        self.0.borrow().moving
    }
    fn current_position(&self) -> i32 {
        let s = self.0.borrow();
        (s.physical - s.offset).round() as i32
    }
    fn current_speed(&self) -> f32 {
        let s = self.0.borrow();
        if s.moving {
            s.speed * (s.target_physical - s.physical).signum()
        } else {
            0.0
        }
    }
    fn set_current_position(&mut self, position: i32) {
        let mut s = self.0.borrow_mut();
        s.offset = s.physical - position as f32;
        s.target_physical = s.physical;
    }
    fn set_enabled(&mut self, enabled: bool) {
        self.0.borrow_mut().enabled = enabled;
    }
}

pub struct SimSwitches(pub SharedRail);

impl LimitSwitches for SimSwitches {
    fn near(&mut self) -> bool {
        let s = self.0.borrow();
        s.physical <= s.near_edge
    }
    fn far(&mut self) -> bool {
        let s = self.0.borrow();
        s.physical >= s.far_edge
    }
}

pub struct SimAlarm(pub SharedRail);

impl DriverAlarm for SimAlarm {
    fn alarm_active(&mut self) -> bool {
        self.0.borrow().alarm
    }
}
