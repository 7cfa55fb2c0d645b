//! Archive Module
//!
//! Read-only access to the sound containers and the ordered search across them.

pub mod pfs;
pub mod resolver;

use std::fs::File;
use std::path::{Path, PathBuf};
use crate::error::Result;

pub use pfs::{PfsArchive, PfsEntry};
pub use resolver::{ArchiveResolver, Resolved, ScanMode};

/// An opened container of named payloads. Dropping it releases the container.
pub trait Container {
    fn entry_names(&self) -> &[String];

    fn read_entry(&mut self, index: usize) -> Result<Vec<u8>>;
}

/// Opens containers by their configured name.
pub trait ContainerSource {
    type Container: Container;

    fn open(&self, name: &str) -> Result<Self::Container>;

    /// Location reported in errors for a container name.
    fn locate(&self, name: &str) -> PathBuf {
        PathBuf::from(name)
    }
}

impl<S: ContainerSource + ?Sized> ContainerSource for &S {
    type Container = S::Container;

    fn open(&self, name: &str) -> Result<Self::Container> {
        (**self).open(name)
    }

    fn locate(&self, name: &str) -> PathBuf {
        (**self).locate(name)
    }
}

/// PFS files resolved relative to a root directory.
#[derive(Debug, Clone)]
pub struct PfsSource {
    root: PathBuf,
}

impl PfsSource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
}

impl ContainerSource for PfsSource {
    type Container = PfsArchive<File>;

    fn open(&self, name: &str) -> Result<Self::Container> {
        PfsArchive::open(self.locate(name))
    }

    fn locate(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}
