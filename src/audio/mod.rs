//! Audio Module
//!
//! WAV decoding/encoding through `hound` and the gain stage applied between them.
//! Samples are streamed from decoder to encoder, never buffered as a whole.

pub mod wav;
pub mod gain;

pub use wav::{AudioFormat, Sample, SampleKind, SampleStream, WavDecoder, WavEncoder};
pub use gain::{Gain, GainBase, GainStage};
