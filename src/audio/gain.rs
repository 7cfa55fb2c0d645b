//! Logarithmic gain stage

use crate::audio::{AudioFormat, Sample};
use crate::error::{SndVolError, Result};
use crate::volume::{amplitude_to_db, db_to_amplitude};

/// Base the gain stage raises to the decibel value to get its multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GainBase {
    /// Standard amplitude decibels: `10^(db / 20)`, i.e. the gain factor itself.
    #[default]
    Decibel,
    /// `2^db`, the doubling convention of the old volume effect. Attenuates much harder.
    Binary,
}

impl GainBase {
    pub fn multiplier(self, decibels: f64) -> f64 {
        match self {
            GainBase::Decibel => db_to_amplitude(decibels),
            GainBase::Binary => 2f64.powf(decibels),
        }
    }
}

/// Gain parameters derived from a linear factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gain {
    decibels: f64,
    base: GainBase,
}

impl Gain {
    pub fn from_factor(factor: f64, base: GainBase) -> Result<Self> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(SndVolError::InvalidGain { factor });
        }
        Ok(Self {
            decibels: amplitude_to_db(factor),
            base,
        })
    }

    pub fn decibels(&self) -> f64 {
        self.decibels
    }

    pub fn multiplier(&self) -> f64 {
        self.base.multiplier(self.decibels)
    }

    /// Wraps a sample source so every sample passes through this gain.
    pub fn apply<I>(&self, source: I, format: AudioFormat) -> GainStage<I>
    where
        I: Iterator<Item = Result<Sample>>,
    {
        GainStage {
            source,
            multiplier: self.multiplier(),
            range: format.int_range(),
            clipped: 0,
        }
    }
}

/// Iterator adapter scaling each sample. Integer samples are rounded and
/// clamped to the bit depth of the stream.
pub struct GainStage<I> {
    source: I,
    multiplier: f64,
    range: (i64, i64),
    clipped: u64,
}

impl<I> GainStage<I> {
    /// Number of integer samples that had to be clamped so far.
    pub fn clipped(&self) -> u64 {
        self.clipped
    }

    fn scale(&mut self, sample: Sample) -> Sample {
        match sample {
            Sample::Int(value) => {
                let scaled = (f64::from(value) * self.multiplier).round();
                let (min, max) = self.range;
                if scaled < min as f64 || scaled > max as f64 {
                    self.clipped += 1;
                }
                Sample::Int(scaled.clamp(min as f64, max as f64) as i32)
            }
            Sample::Float(value) => Sample::Float((f64::from(value) * self.multiplier) as f32),
        }
    }
}

impl<I> Iterator for GainStage<I>
where
    I: Iterator<Item = Result<Sample>>,
{
    type Item = Result<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        let sample = self.source.next()?;
        Some(sample.map(|s| self.scale(s)))
    }
}
