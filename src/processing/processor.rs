//! End-to-end run: validate, resolve, transcode

use std::path::PathBuf;
use std::time::{Duration, Instant};
use crate::archive::{ArchiveResolver, ContainerSource, PfsSource};
use crate::config::Config;
use crate::error::Result;
use crate::processing::{GainTranscoder, TranscodeReport};

#[derive(Debug)]
pub struct SoundProcessor {
    config: Config,
}

impl SoundProcessor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs against the PFS files under the configured root.
    pub fn process(&self) -> Result<ProcessingResult> {
        self.process_with(PfsSource::new(&self.config.root))
    }

    /// Runs against any container source. Paths are validated before the first container is opened.
    pub fn process_with<S: ContainerSource + Sync>(&self, source: S) -> Result<ProcessingResult> {
        let start_time = Instant::now();
        let config = &self.config;

        config.validate_paths()?;

        let gain_factor = config.gain_factor();
        log::info!("Volume: {:.6}", config.volume.fraction());
        log::debug!("Gain factor {:.4} ({:.3} dB)", gain_factor, config.decibels());

        let resolver = ArchiveResolver::new(source, config.containers.clone())
            .with_mode(config.scan_mode);
        let resolved = resolver.resolve(&config.asset)?;

        let output_path = config.output_path();
        let report = GainTranscoder::new(config.gain_base)
            .transcode(&resolved.payload, gain_factor, &output_path)?;

        Ok(ProcessingResult {
            asset: config.asset.clone(),
            container: resolved.container,
            output_path,
            gain_factor,
            processing_time: start_time.elapsed(),
            report,
        })
    }
}

#[derive(Debug)]
pub struct ProcessingResult {
    pub asset: String,
    pub container: String,
    pub output_path: PathBuf,
    pub gain_factor: f64,
    pub processing_time: Duration,
    pub report: TranscodeReport,
}
