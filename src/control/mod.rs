//! The real-time control domain: command dispatch and telemetry.

mod controller;
mod status;

pub use controller::MotionController;
pub use status::{MotionState, StatusSnapshot};

#[cfg(feature = "std")]
pub use status::SharedStatus;
