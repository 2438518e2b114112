//! Auto-ranging homing: travel-envelope discovery with no prior position
//! knowledge.

mod envelope;
mod sequencer;

pub use envelope::TravelEnvelope;
pub use sequencer::{HomingEvent, HomingPhase, HomingSequencer};
