//! Fixtures shared by the integration tests: synthetic PFS archives and WAV payloads.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::Path;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use hound::{SampleFormat, WavSpec, WavWriter};

pub const FILENAME_TABLE_CRC: u32 = 0x61580AC9;

pub struct PfsBuilder {
    entries: Vec<(String, Vec<u8>)>,
    block_size: usize,
    reverse_directory: bool,
    extra_names: Vec<String>,
}

impl PfsBuilder {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            block_size: 8192,
            reverse_directory: false,
            extra_names: Vec::new(),
        }
    }

    pub fn entry(mut self, name: &str, data: &[u8]) -> Self {
        self.entries.push((name.to_string(), data.to_vec()));
        self
    }

    pub fn block_size(mut self, size: usize) -> Self {
        self.block_size = size;
        self
    }

    /// Lists directory records in reverse data order.
    pub fn reverse_directory(mut self) -> Self {
        self.reverse_directory = true;
        self
    }

    /// Adds a name to the filename table without a matching entry.
    pub fn dangling_name(mut self, name: &str) -> Self {
        self.extra_names.push(name.to_string());
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = vec![0u8; 12];
        out[4..8].copy_from_slice(b"PFS ");
        out[8..12].copy_from_slice(&0x20000u32.to_le_bytes());

        let mut records = Vec::new();
        for (i, (_, data)) in self.entries.iter().enumerate() {
            let offset = out.len() as u32;
            self.write_blocks(&mut out, data);
            records.push((0x1000 + i as u32, offset, data.len() as u32));
        }

        let mut table = Vec::new();
        let names = self.entries.iter().map(|(n, _)| n.clone()).chain(self.extra_names.iter().cloned());
        let names: Vec<String> = names.collect();
        table.extend_from_slice(&(names.len() as u32).to_le_bytes());
        for name in &names {
            table.extend_from_slice(&(name.len() as u32 + 1).to_le_bytes());
            table.extend_from_slice(name.as_bytes());
            table.push(0);
        }
        let table_offset = out.len() as u32;
        self.write_blocks(&mut out, &table);

        if self.reverse_directory {
            records.reverse();
        }
        records.push((FILENAME_TABLE_CRC, table_offset, table.len() as u32));

        let directory_offset = out.len() as u32;
        out[0..4].copy_from_slice(&directory_offset.to_le_bytes());
        out.extend_from_slice(&(records.len() as u32).to_le_bytes());
        for (crc, offset, size) in records {
            out.extend_from_slice(&crc.to_le_bytes());
            out.extend_from_slice(&offset.to_le_bytes());
            out.extend_from_slice(&size.to_le_bytes());
        }
        out.extend_from_slice(b"STEVE");
        out.extend_from_slice(&0u32.to_le_bytes());
        out
    }

    pub fn write_to(&self, path: &Path) {
        std::fs::write(path, self.build()).unwrap();
    }

    fn write_blocks(&self, out: &mut Vec<u8>, data: &[u8]) {
        for chunk in data.chunks(self.block_size) {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(chunk).unwrap();
            let deflated = encoder.finish().unwrap();
            out.extend_from_slice(&(deflated.len() as u32).to_le_bytes());
            out.extend_from_slice(&(chunk.len() as u32).to_le_bytes());
            out.extend_from_slice(&deflated);
        }
    }
}

pub fn mono16(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

pub fn wav_bytes(spec: WavSpec, samples: &[i32]) -> Vec<u8> {
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

/// A short 16-bit sawtooth, loud enough that scaling is visible on every sample.
pub fn test_tone(len: usize) -> Vec<i32> {
    (0..len).map(|i| ((i % 200) as i32 - 100) * 300).collect()
}

pub fn read_wav(path: &Path) -> (WavSpec, Vec<i32>) {
    let reader = hound::WavReader::open(path).unwrap();
    let spec = reader.spec();
    (spec, reader.into_samples::<i32>().map(|s| s.unwrap()).collect())
}

/// Creates `<root>/sounds` and the given containers.
pub fn game_dir<S: AsRef<str>>(root: &Path, containers: &[(S, PfsBuilder)]) {
    std::fs::create_dir_all(root.join("sounds")).unwrap();
    for (name, builder) in containers {
        builder.write_to(&root.join(name.as_ref()));
    }
}

/// Scaled the way the transcoder does it for integer samples.
pub fn scaled(samples: &[i32], factor: f64) -> Vec<i32> {
    samples.iter().map(|&s| (f64::from(s) * factor).round() as i32).collect()
}
