//! Motion commands and the bounded cross-domain queue.
//!
//! Any number of producers (operator console, scripting API, the protocol
//! translator) enqueue [`MotionCommand`]s; exactly one consumer, the
//! real-time control loop, drains them.

mod queue;
mod types;

pub use queue::{CommandQueue, CommandSender, QUEUE_DEPTH};
pub use types::{CommandKind, MotionCommand, MotionProfile};
