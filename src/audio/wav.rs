//! WAV decoding and encoding

use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::Path;
use hound::{SampleFormat, WavIntoSamples, WavReader, WavSpec, WavWriter};
use crate::error::{SndVolError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    Int,
    Float,
}

impl SampleKind {
    pub fn name(&self) -> &'static str {
        match self {
            SampleKind::Int => "int",
            SampleKind::Float => "float",
        }
    }

    pub fn to_sample_format(self) -> SampleFormat {
        match self {
            SampleKind::Int => SampleFormat::Int,
            SampleKind::Float => SampleFormat::Float,
        }
    }
}

/// Format descriptor of a decoded stream. The encoder writes exactly this format back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub kind: SampleKind,
}

impl AudioFormat {
    pub fn from_wav_spec(spec: WavSpec) -> Self {
        let kind = match spec.sample_format {
            SampleFormat::Int => SampleKind::Int,
            SampleFormat::Float => SampleKind::Float,
        };
        Self {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            bits_per_sample: spec.bits_per_sample,
            kind,
        }
    }

    pub fn to_wav_spec(&self) -> WavSpec {
        WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
            sample_format: self.kind.to_sample_format(),
        }
    }

    /// Inclusive range of an integer sample at this bit depth.
    pub fn int_range(&self) -> (i64, i64) {
        let bits = u32::from(self.bits_per_sample.clamp(1, 32));
        let max = (1i64 << (bits - 1)) - 1;
        (-max - 1, max)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(SndVolError::decode("Sample rate cannot be 0"));
        }
        if self.channels == 0 {
            return Err(SndVolError::decode("Channel count cannot be 0"));
        }
        match (self.kind, self.bits_per_sample) {
            (SampleKind::Int, 8 | 16 | 24 | 32) | (SampleKind::Float, 32) => Ok(()),
            (kind, bits) => Err(SndVolError::decode(format!(
                "Unsupported sample format: {}-bit {}", bits, kind.name()
            ))),
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}Hz, {}ch, {}-bit {}",
               self.sample_rate, self.channels, self.bits_per_sample, self.kind.name())
    }
}

/// One interleaved sample as read from or written to a WAV file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    Int(i32),
    Float(f32),
}

/// Decoder over a borrowed, in-memory WAV payload.
pub struct WavDecoder<'a> {
    reader: WavReader<Cursor<&'a [u8]>>,
    format: AudioFormat,
}

impl<'a> WavDecoder<'a> {
    pub fn from_bytes(encoded: &'a [u8]) -> Result<Self> {
        let reader = WavReader::new(Cursor::new(encoded))
            .map_err(|e| SndVolError::decode(format!("Cannot create WAV reader: {}", e)))?;

        let format = AudioFormat::from_wav_spec(reader.spec());
        format.validate()?;

        Ok(Self { reader, format })
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> u32 {
        self.reader.duration()
    }

    pub fn into_stream(self) -> SampleStream<'a> {
        let samples = match self.format.kind {
            SampleKind::Int => StreamSamples::Int(self.reader.into_samples::<i32>()),
            SampleKind::Float => StreamSamples::Float(self.reader.into_samples::<f32>()),
        };
        SampleStream { samples }
    }
}

enum StreamSamples<'a> {
    Int(WavIntoSamples<Cursor<&'a [u8]>, i32>),
    Float(WavIntoSamples<Cursor<&'a [u8]>, f32>),
}

/// Decoded samples pulled lazily from the payload.
pub struct SampleStream<'a> {
    samples: StreamSamples<'a>,
}

impl Iterator for SampleStream<'_> {
    type Item = Result<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = match &mut self.samples {
            StreamSamples::Int(samples) => samples.next()?.map(Sample::Int),
            StreamSamples::Float(samples) => samples.next()?.map(Sample::Float),
        };
        Some(item.map_err(|e| SndVolError::decode(format!("Failed to read sample: {}", e))))
    }
}

/// Encoder writing a new WAV file in a fixed format.
pub struct WavEncoder {
    writer: WavWriter<BufWriter<File>>,
    format: AudioFormat,
    written: u64,
}

impl WavEncoder {
    pub fn create<P: AsRef<Path>>(path: P, format: AudioFormat) -> Result<Self> {
        let path = path.as_ref();
        let writer = WavWriter::create(path, format.to_wav_spec())
            .map_err(|e| SndVolError::encode(format!(
                "Cannot create output file {}: {}", path.display(), e
            )))?;

        Ok(Self { writer, format, written: 0 })
    }

    pub fn samples_written(&self) -> u64 {
        self.written
    }

    pub fn write(&mut self, sample: Sample) -> Result<()> {
        let result = match (self.format.kind, sample) {
            (SampleKind::Int, Sample::Int(value)) => self.writer.write_sample(value),
            (SampleKind::Float, Sample::Float(value)) => self.writer.write_sample(value),
            (kind, sample) => {
                return Err(SndVolError::encode(format!(
                    "Sample {:?} does not match {} output", sample, kind.name()
                )));
            }
        };
        result.map_err(|e| SndVolError::encode(format!("Failed to write sample: {}", e)))?;
        self.written += 1;
        Ok(())
    }

    /// Writes the final header sizes and closes the file.
    pub fn finalize(self) -> Result<()> {
        self.writer.finalize()
            .map_err(|e| SndVolError::encode(format!("Failed to finalize WAV writing: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn encode_in_memory(spec: WavSpec, samples: &[i32]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
            for &s in samples {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    fn mono16(sample_rate: u32) -> WavSpec {
        WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        }
    }

    #[test]
    fn test_int_range() {
        let mut format = AudioFormat::from_wav_spec(mono16(22050));
        assert_eq!(format.int_range(), (-32768, 32767));
        format.bits_per_sample = 8;
        assert_eq!(format.int_range(), (-128, 127));
        format.bits_per_sample = 24;
        assert_eq!(format.int_range(), (-8388608, 8388607));
        format.bits_per_sample = 32;
        assert_eq!(format.int_range(), (i64::from(i32::MIN), i64::from(i32::MAX)));
    }

    #[test]
    fn test_format_validation() {
        let format = AudioFormat::from_wav_spec(mono16(22050));
        assert!(format.validate().is_ok());

        let mut bad = format;
        bad.kind = SampleKind::Float;
        assert!(bad.validate().is_err());

        let mut bad = format;
        bad.bits_per_sample = 12;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_decode_reads_format_and_samples() {
        let bytes = encode_in_memory(mono16(22050), &[0, 1000, -1000, 32767]);
        let decoder = WavDecoder::from_bytes(&bytes).unwrap();
        assert_eq!(decoder.format().sample_rate, 22050);
        assert_eq!(decoder.format().channels, 1);
        assert_eq!(decoder.frames(), 4);

        let samples: Vec<Sample> = decoder.into_stream().collect::<Result<_>>().unwrap();
        assert_eq!(samples, vec![
            Sample::Int(0), Sample::Int(1000), Sample::Int(-1000), Sample::Int(32767),
        ]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = WavDecoder::from_bytes(b"definitely not a riff file").err().unwrap();
        assert!(matches!(err, SndVolError::Decode { .. }));

        let err = WavDecoder::from_bytes(&[]).err().unwrap();
        assert!(matches!(err, SndVolError::Decode { .. }));
    }

    #[test]
    fn test_encoder_preserves_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.wav");
        let format = AudioFormat::from_wav_spec(WavSpec {
            channels: 2,
            sample_rate: 11025,
            bits_per_sample: 8,
            sample_format: SampleFormat::Int,
        });

        let mut encoder = WavEncoder::create(&path, format).unwrap();
        for s in [-128, 0, 64, 127] {
            encoder.write(Sample::Int(s)).unwrap();
        }
        assert_eq!(encoder.samples_written(), 4);
        encoder.finalize().unwrap();

        let reader = WavReader::open(&path).unwrap();
        assert_eq!(AudioFormat::from_wav_spec(reader.spec()), format);
        let samples: Vec<i32> = reader.into_samples::<i32>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![-128, 0, 64, 127]);
    }

    #[test]
    fn test_encoder_rejects_mismatched_sample() {
        let dir = TempDir::new().unwrap();
        let format = AudioFormat::from_wav_spec(mono16(8000));
        let mut encoder = WavEncoder::create(dir.path().join("out.wav"), format).unwrap();
        let err = encoder.write(Sample::Float(0.5)).unwrap_err();
        assert!(matches!(err, SndVolError::Encode { .. }));
    }

    #[test]
    fn test_encoder_fails_on_missing_directory() {
        let dir = TempDir::new().unwrap();
        let format = AudioFormat::from_wav_spec(mono16(8000));
        let result = WavEncoder::create(dir.path().join("missing").join("out.wav"), format);
        assert!(matches!(result, Err(SndVolError::Encode { .. })));
    }
}
