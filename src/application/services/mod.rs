pub mod result_sequencer;

pub use result_sequencer::{ResultSequencer, SequencerError};
