//! # axis-motion
//!
//! Real-time motion-control coordinator for a single-axis closed-loop
//! actuator with auto-ranging homing and an external control channel.
//!
//! ## Features
//!
//! - **Auto-ranging homing**: travel limits measured at every startup, never
//!   trusted from storage
//! - **Latched safety interlock**: unexpected limit hits, emergency stops and
//!   homing failures gate motion until a homing run completes
//! - **Debounced limit inputs**: dwell filtering with oscillation detection
//!   over embedded-hal 1.0 `InputPin`s
//! - **Bounded command queue**: lock-free MPMC ring between scheduling
//!   domains, producers never block the control loop
//! - **Protocol translator**: a 5-byte channel window decoded into modes and
//!   envelope-mapped position commands with boundary hysteresis
//! - **no_std compatible**: the control core runs without the standard
//!   library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use axis_motion::{CommandQueue, EdgeFlags, MotionCommand, MotionController};
//!
//! static QUEUE: CommandQueue = CommandQueue::new();
//! static EDGES: EdgeFlags = EdgeFlags::new();
//!
//! let config = axis_motion::load_config("axis.toml")?;
//! let mut controller = MotionController::new(actuator, switches, alarm, config);
//!
//! // Any producer, any domain:
//! QUEUE.sender().send(MotionCommand::home(now_ms))?;
//!
//! // The 1 ms real-time loop:
//! let snapshot = controller.tick(&QUEUE, &EDGES, now_ms);
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O, TOML parsing and the shared
//!   telemetry cell
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Core modules
pub mod actuator;
pub mod channel;
pub mod command;
pub mod config;
pub mod control;
pub mod error;
pub mod homing;
pub mod safety;

// Re-exports for ergonomic API
pub use actuator::Actuator;
pub use channel::{ChannelReceiver, ChannelTranslator, ChannelWindow, ControlMode};
pub use command::{CommandKind, CommandQueue, CommandSender, MotionCommand, MotionProfile};
pub use config::{validate_config, ControlConfig};
pub use control::{MotionController, MotionState, StatusSnapshot};
pub use error::{Error, FaultCode, FaultRecord, Result};
pub use homing::{HomingPhase, TravelEnvelope};
pub use safety::{DriverAlarm, EdgeFlags, LimitSide, LimitSwitches, SafetyState};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::load_config;

// Shared telemetry cell (std only)
#[cfg(feature = "std")]
pub use control::SharedStatus;
