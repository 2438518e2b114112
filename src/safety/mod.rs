//! Safety layer: limit debouncing and the fault-latching interlock.

mod debounce;
mod interlock;

pub use debounce::{
    DriverAlarm, EdgeFlags, LimitDebouncer, LimitSide, LimitSwitches, NoAlarm, PinDriverAlarm,
    PinLimitSwitches,
};
pub use interlock::{SafetyInterlock, SafetyState};
