//! Configuration for a single run

use crate::audio::GainBase;
use crate::archive::ScanMode;
use crate::error::{SndVolError, Result};
use crate::volume::{VolumeCurve, VolumePercent};
use clap::Parser;
use std::path::{Component, Path, PathBuf};

/// Sound archives searched, in priority order.
pub const CONTAINER_COUNT: usize = 17;

/// Subdirectory of the root that receives the rewritten sound.
pub const OUTPUT_DIR: &str = "sounds";

#[derive(Debug, Clone)]
pub struct Config {
    pub root: PathBuf,
    pub asset: String,
    pub volume: VolumePercent,
    pub curve: VolumeCurve,
    pub containers: Vec<String>,
    pub output_dir: String,
    pub scan_mode: ScanMode,
    pub gain_base: GainBase,
    pub verbose: bool,
}

impl Config {
    pub fn new<P: AsRef<Path>>(root: P, asset: impl Into<String>, volume: VolumePercent) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            asset: asset.into(),
            volume,
            curve: VolumeCurve::default(),
            containers: Self::default_containers(),
            output_dir: OUTPUT_DIR.to_string(),
            scan_mode: ScanMode::default(),
            gain_base: GainBase::default(),
            verbose: false,
        }
    }

    /// `snd1.pfs` through `snd17.pfs`.
    pub fn default_containers() -> Vec<String> {
        (1..=CONTAINER_COUNT).map(|i| format!("snd{}.pfs", i)).collect()
    }

    /// Build a config from parsed arguments. Performs no file system access.
    pub fn from_args(args: Args) -> Result<Self> {
        let volume: VolumePercent = args.volume.parse()?;
        validate_asset_name(&args.asset)?;

        let mut config = Self::new(args.root, args.asset, volume);
        config.verbose = args.verbose;
        if args.parallel {
            config.scan_mode = ScanMode::Parallel;
        }
        if args.legacy_base2 {
            config.gain_base = GainBase::Binary;
        }
        Ok(config)
    }

    /// Bounded linear gain for the configured volume.
    pub fn gain_factor(&self) -> f64 {
        self.curve.linear(self.volume)
    }

    pub fn decibels(&self) -> f64 {
        self.curve.decibels(self.volume)
    }

    pub fn output_dir_path(&self) -> PathBuf {
        self.root.join(&self.output_dir)
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir_path().join(&self.asset)
    }

    /// Checks that the root is a directory and already holds the output directory.
    pub fn validate_paths(&self) -> Result<()> {
        let meta = std::fs::metadata(&self.root)
            .map_err(|e| SndVolError::root_path(&self.root, format!("stat: {}", e)))?;
        if !meta.is_dir() {
            return Err(SndVolError::root_path(&self.root, "not a directory"));
        }

        let out = self.output_dir_path();
        match std::fs::metadata(&out) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(SndVolError::OutputPathMissing { path: out }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SndVolError::OutputPathMissing { path: out })
            }
            Err(e) => Err(SndVolError::root_path(&out, format!("stat: {}", e))),
        }
    }
}

/// Asset names are written below the output directory, so they must be a plain file name.
fn validate_asset_name(asset: &str) -> Result<()> {
    let mut components = Path::new(asset).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(SndVolError::usage(format!("Asset name must be a plain file name: {:?}", asset))),
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "sndvol", about = "Extract a sound from the PFS archives at a reduced volume", version, author)]
pub struct Args {
    #[arg(help = "Game directory containing snd1.pfs..snd17.pfs and a sounds/ directory")]
    pub root: PathBuf,

    #[arg(help = "Exact name of the sound to extract, e.g. weap01.wav")]
    pub asset: String,

    #[arg(allow_hyphen_values = true, help = "Volume from 0 to 100 (0 keeps 70% amplitude, 100 leaves it unchanged)")]
    pub volume: String,

    #[arg(short = 'v', long = "verbose", help = "Enable verbose output mode")]
    pub verbose: bool,

    #[arg(long = "parallel", help = "Scan archives in parallel (first archive in order still wins)")]
    pub parallel: bool,

    #[arg(long = "legacy-base2", help = "Apply the decibel value as a power of 2 (legacy curve, quieter than the percentage suggests)")]
    pub legacy_base2: bool,
}
