//! Volume curve
//!
//! Maps a user volume percentage onto the gain actually applied to a sound.
//! The curve never mutes and never amplifies: 0% keeps 70% of the original
//! amplitude, 100% leaves the sound untouched.

use std::fmt;
use std::str::FromStr;
use crate::error::{SndVolError, Result};

/// A validated volume percentage in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct VolumePercent(u8);

impl VolumePercent {
    pub const MAX: u8 = 100;

    pub fn new(percent: u8) -> Result<Self> {
        if percent > Self::MAX {
            return Err(SndVolError::invalid_volume(percent.to_string()));
        }
        Ok(Self(percent))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Percentage as a fraction in `[0.0, 1.0]`.
    pub fn fraction(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl FromStr for VolumePercent {
    type Err = SndVolError;

    fn from_str(s: &str) -> Result<Self> {
        let value: i64 = s.parse()
            .map_err(|_| SndVolError::invalid_volume(s))?;
        if !(0..=i64::from(Self::MAX)).contains(&value) {
            return Err(SndVolError::invalid_volume(s));
        }
        Ok(Self(value as u8))
    }
}

impl fmt::Display for VolumePercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Bounded linear volume curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeCurve {
    pub floor: f64,
    pub span: f64,
}

impl VolumeCurve {
    /// Linear gain kept at 0%.
    pub const FLOOR: f64 = 0.7;
    /// Linear gain added between 0% and 100%.
    pub const SPAN: f64 = 0.3;

    /// Linear gain factor for a percentage: `floor + span * p / 100`.
    pub fn linear(&self, volume: VolumePercent) -> f64 {
        self.floor + self.span * volume.fraction()
    }

    /// Decibel gain for a percentage: `20 * log10(linear)`.
    pub fn decibels(&self, volume: VolumePercent) -> f64 {
        amplitude_to_db(self.linear(volume))
    }
}

impl Default for VolumeCurve {
    fn default() -> Self {
        Self {
            floor: Self::FLOOR,
            span: Self::SPAN,
        }
    }
}

pub fn amplitude_to_db(factor: f64) -> f64 {
    20.0 * factor.log10()
}

pub fn db_to_amplitude(db: f64) -> f64 {
    10f64.powf(db / 20.0)
}
