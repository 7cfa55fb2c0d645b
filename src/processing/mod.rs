//! Processing Pipeline

pub mod transcoder;
pub mod processor;

pub use transcoder::{GainTranscoder, TranscodeReport};
pub use processor::{SoundProcessor, ProcessingResult};
