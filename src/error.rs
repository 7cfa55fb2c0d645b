//! Error Types

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum SndVolError {
    #[error("Usage error: {message}")]
    Usage { message: String },

    #[error("Invalid volume {value}, must be range of 0 to 100")]
    InvalidVolume { value: String },

    #[error("Root path error: {}: {message}", .path.display())]
    RootPath { path: PathBuf, message: String },

    #[error("Output path {} does not exist", .path.display())]
    OutputPathMissing { path: PathBuf },

    #[error("Cannot open container {}: {source}", .path.display())]
    ContainerOpen {
        path: PathBuf,
        #[source]
        source: Box<SndVolError>,
    },

    #[error("File {asset} not found in any of {searched} containers")]
    AssetNotFound { asset: String, searched: usize },

    #[error("Archive error: {message}")]
    Archive { message: String },

    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Invalid gain factor {factor}: must be finite and greater than 0")]
    InvalidGain { factor: f64 },

    #[error("Encode error: {message}")]
    Encode { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SndVolError {
    pub fn usage<S: Into<String>>(msg: S) -> Self { Self::Usage { message: msg.into() } }
    pub fn invalid_volume<S: Into<String>>(value: S) -> Self { Self::InvalidVolume { value: value.into() } }
    pub fn archive<S: Into<String>>(msg: S) -> Self { Self::Archive { message: msg.into() } }
    pub fn decode<S: Into<String>>(msg: S) -> Self { Self::Decode { message: msg.into() } }
    pub fn encode<S: Into<String>>(msg: S) -> Self { Self::Encode { message: msg.into() } }

    pub fn root_path<S: Into<String>>(path: &Path, msg: S) -> Self {
        Self::RootPath { path: path.to_path_buf(), message: msg.into() }
    }

    pub fn container_open(path: &Path, source: SndVolError) -> Self {
        Self::ContainerOpen { path: path.to_path_buf(), source: Box::new(source) }
    }
}

pub type Result<T> = std::result::Result<T, SndVolError>;
