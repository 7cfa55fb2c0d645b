//! PFS archive reader
//!
//! Layout (all little-endian):
//!
//! ```text
//! header     u32 directory_offset, b"PFS ", u32 version
//! directory  u32 count, count * (u32 crc, u32 data_offset, u32 inflated_size)
//! entry data repeated (u32 deflated_len, u32 inflated_len, zlib bytes)
//!            until inflated_size bytes have been produced
//! ```
//!
//! Entry names live in a special entry (crc `0x61580AC9`): `u32 count`, then
//! `u32 len` + NUL-terminated name per file. Names are listed in the order of
//! the remaining entries sorted by data offset.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use byteorder::{LittleEndian, ReadBytesExt};
use flate2::read::ZlibDecoder;
use crate::archive::Container;
use crate::error::{SndVolError, Result};

pub const MAGIC: [u8; 4] = *b"PFS ";
pub const FILENAME_TABLE_CRC: u32 = 0x61580AC9;
pub const KNOWN_VERSIONS: [u32; 2] = [0x10000, 0x20000];

const HEADER_SIZE: u64 = 12;
const RECORD_SIZE: u64 = 12;

/// A named entry located inside the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PfsEntry {
    pub name: String,
    pub crc: u32,
    pub offset: u32,
    pub size: u32,
}

#[derive(Debug, Clone, Copy)]
struct DirectoryRecord {
    crc: u32,
    offset: u32,
    size: u32,
}

/// Read-only PFS archive. Payloads are inflated on demand.
pub struct PfsArchive<R: Read + Seek> {
    reader: BufReader<R>,
    path: Option<PathBuf>,
    version: u32,
    length: u64,
    entries: Vec<PfsEntry>,
    names: Vec<String>,
}

impl PfsArchive<File> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut archive = Self::new(file)?;
        archive.path = Some(path.to_path_buf());
        log::debug!("Opened {} ({} entries, version {:#x})",
                    path.display(), archive.entries.len(), archive.version);
        Ok(archive)
    }
}

impl<R: Read + Seek> PfsArchive<R> {
    /// Parses header, directory and filename table from a reader.
    pub fn new(reader: R) -> Result<Self> {
        let mut reader = BufReader::new(reader);
        let length = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;

        if length < HEADER_SIZE {
            return Err(SndVolError::archive(format!("File too short for PFS header: {} bytes", length)));
        }

        let directory_offset = reader.read_u32::<LittleEndian>()?;
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(SndVolError::archive(format!("Invalid PFS magic: {:?}", magic)));
        }
        let version = reader.read_u32::<LittleEndian>()?;
        if !KNOWN_VERSIONS.contains(&version) {
            log::warn!("Unknown PFS version {:#x}, reading anyway", version);
        }

        let mut archive = Self {
            reader,
            path: None,
            version,
            length,
            entries: Vec::new(),
            names: Vec::new(),
        };
        let records = archive.read_directory(directory_offset)?;
        archive.entries = archive.name_records(records)?;
        archive.names = archive.entries.iter().map(|e| e.name.clone()).collect();

        Ok(archive)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn entries(&self) -> &[PfsEntry] {
        &self.entries
    }

    /// Inflates the payload of the entry named exactly `name`.
    pub fn find(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        match self.names.iter().position(|n| n == name) {
            Some(index) => self.read(index).map(Some),
            None => Ok(None),
        }
    }

    pub fn read(&mut self, index: usize) -> Result<Vec<u8>> {
        let entry = self.entries.get(index)
            .ok_or_else(|| SndVolError::archive(format!("Entry index {} out of range", index)))?;
        let (offset, size) = (entry.offset, entry.size);
        self.inflate(offset, size).map_err(|e| {
            let cause = match e {
                SndVolError::Archive { message } => message,
                other => other.to_string(),
            };
            SndVolError::archive(format!("Cannot read entry {}: {}", self.entries[index].name, cause))
        })
    }

    fn read_directory(&mut self, directory_offset: u32) -> Result<Vec<DirectoryRecord>> {
        let directory_offset = u64::from(directory_offset);
        if directory_offset + 4 > self.length {
            return Err(SndVolError::archive(format!(
                "Directory offset {} beyond end of file ({} bytes)", directory_offset, self.length
            )));
        }
        self.reader.seek(SeekFrom::Start(directory_offset))?;

        let count = u64::from(self.reader.read_u32::<LittleEndian>()?);
        if directory_offset + 4 + count * RECORD_SIZE > self.length {
            return Err(SndVolError::archive(format!("Directory of {} entries is truncated", count)));
        }

        (0..count)
            .map(|_| -> Result<DirectoryRecord> {
                Ok(DirectoryRecord {
                    crc: self.reader.read_u32::<LittleEndian>()?,
                    offset: self.reader.read_u32::<LittleEndian>()?,
                    size: self.reader.read_u32::<LittleEndian>()?,
                })
            })
            .collect()
    }

    fn name_records(&mut self, records: Vec<DirectoryRecord>) -> Result<Vec<PfsEntry>> {
        let table = records.iter()
            .find(|r| r.crc == FILENAME_TABLE_CRC)
            .copied()
            .ok_or_else(|| SndVolError::archive("Missing filename table"))?;

        let names = parse_filename_table(&self.inflate(table.offset, table.size)?)?;

        let mut files: Vec<DirectoryRecord> = records.into_iter()
            .filter(|r| r.crc != FILENAME_TABLE_CRC)
            .collect();
        files.sort_by_key(|r| r.offset);

        if names.len() != files.len() {
            return Err(SndVolError::archive(format!(
                "Filename table lists {} names for {} entries", names.len(), files.len()
            )));
        }

        Ok(names.into_iter()
            .zip(files)
            .map(|(name, r)| PfsEntry { name, crc: r.crc, offset: r.offset, size: r.size })
            .collect())
    }

    fn inflate(&mut self, offset: u32, size: u32) -> Result<Vec<u8>> {
        self.reader.seek(SeekFrom::Start(u64::from(offset)))?;

        let size = size as usize;
        let mut data = Vec::new();
        let mut deflated = Vec::new();

        while data.len() < size {
            let deflated_len = self.reader.read_u32::<LittleEndian>()?;
            let inflated_len = self.reader.read_u32::<LittleEndian>()? as usize;
            if u64::from(deflated_len) > self.length {
                return Err(SndVolError::archive(format!("Block length {} exceeds archive size", deflated_len)));
            }
            if inflated_len == 0 {
                return Err(SndVolError::archive("Empty block before end of entry"));
            }

            deflated.resize(deflated_len as usize, 0);
            self.reader.read_exact(&mut deflated)?;

            // one byte past the declared length is enough to detect an overrun
            let before = data.len();
            ZlibDecoder::new(deflated.as_slice())
                .take(inflated_len as u64 + 1)
                .read_to_end(&mut data)
                .map_err(|e| SndVolError::archive(format!("Corrupt block at {}: {}", offset, e)))?;
            if data.len() - before != inflated_len {
                return Err(SndVolError::archive(format!(
                    "Block inflated to {} bytes, expected {}", data.len() - before, inflated_len
                )));
            }
        }

        if data.len() != size {
            return Err(SndVolError::archive(format!(
                "Entry inflated to {} bytes, expected {}", data.len(), size
            )));
        }
        Ok(data)
    }
}

impl<R: Read + Seek> Container for PfsArchive<R> {
    fn entry_names(&self) -> &[String] {
        &self.names
    }

    fn read_entry(&mut self, index: usize) -> Result<Vec<u8>> {
        self.read(index)
    }
}

impl<R: Read + Seek> Drop for PfsArchive<R> {
    fn drop(&mut self) {
        if let Some(path) = &self.path {
            log::debug!("Closed {}", path.display());
        }
    }
}

fn parse_filename_table(table: &[u8]) -> Result<Vec<String>> {
    let mut cursor = table;
    let count = cursor.read_u32::<LittleEndian>()
        .map_err(|_| SndVolError::archive("Filename table is empty"))?;

    let mut names = Vec::new();
    for i in 0..count {
        let len = cursor.read_u32::<LittleEndian>()
            .map_err(|_| SndVolError::archive(format!("Filename table truncated at name {}", i)))? as usize;
        if len > cursor.len() {
            return Err(SndVolError::archive(format!("Filename table truncated at name {}", i)));
        }
        let (raw, rest) = cursor.split_at(len);
        cursor = rest;

        let raw = raw.strip_suffix(&[0u8]).unwrap_or(raw);
        let name = std::str::from_utf8(raw)
            .map_err(|_| SndVolError::archive(format!("Filename {} is not valid UTF-8", i)))?;
        names.push(name.to_string());
    }
    Ok(names)
}
