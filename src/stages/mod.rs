//! Cancellable, timer-driven progress stages shown while a request is in
//! flight.

pub mod sequencer;

pub use sequencer::{
    Stage, StageError, StageProgress, StageSequencer, StageStatus, default_stages,
};
