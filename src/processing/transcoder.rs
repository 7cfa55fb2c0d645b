//! Decode -> gain -> encode pipeline for a single sound

use std::path::Path;
use crate::audio::{AudioFormat, Gain, GainBase, WavDecoder, WavEncoder};
use crate::error::Result;

/// Summary of one transcode.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeReport {
    pub format: AudioFormat,
    pub frames: u32,
    pub samples: u64,
    pub clipped: u64,
    pub decibels: f64,
    pub multiplier: f64,
}

/// Rewrites a WAV payload with a gain applied, keeping its format.
#[derive(Debug, Clone, Copy, Default)]
pub struct GainTranscoder {
    base: GainBase,
}

impl GainTranscoder {
    pub fn new(base: GainBase) -> Self {
        Self { base }
    }

    /// Decodes `encoded`, applies `gain_factor` and writes a new file at `output_path`.
    ///
    /// The gain is validated before the output file is created. If encoding
    /// fails partway the partial file stays on disk.
    pub fn transcode(&self, encoded: &[u8], gain_factor: f64, output_path: &Path) -> Result<TranscodeReport> {
        let decoder = WavDecoder::from_bytes(encoded)?;
        let format = decoder.format();
        let frames = decoder.frames();
        log::debug!("Decoded {} frames ({})", frames, format);

        let gain = Gain::from_factor(gain_factor, self.base)?;
        log::debug!("Gain {:.3} dB, multiplier {:.4}", gain.decibels(), gain.multiplier());

        let mut stage = gain.apply(decoder.into_stream(), format);
        let mut encoder = WavEncoder::create(output_path, format)?;
        for sample in stage.by_ref() {
            encoder.write(sample?)?;
        }
        let samples = encoder.samples_written();
        encoder.finalize()?;

        if stage.clipped() > 0 {
            log::warn!("{} samples clipped while applying gain", stage.clipped());
        }
        log::info!("Wrote {} ({} samples)", output_path.display(), samples);

        Ok(TranscodeReport {
            format,
            frames,
            samples,
            clipped: stage.clipped(),
            decibels: gain.decibels(),
            multiplier: gain.multiplier(),
        })
    }
}
