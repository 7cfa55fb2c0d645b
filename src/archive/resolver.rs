//! Ordered asset lookup across containers

use rayon::prelude::*;
use crate::archive::{Container, ContainerSource};
use crate::error::{SndVolError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// Open containers one at a time, stopping at the first match.
    #[default]
    Sequential,
    /// Scan all containers concurrently. The earliest container in the list still wins.
    Parallel,
}

/// Payload found by the resolver and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub container: String,
    pub container_index: usize,
    pub payload: Vec<u8>,
}

/// Searches a priority-ordered list of containers for an entry.
#[derive(Debug, Clone)]
pub struct ArchiveResolver<S> {
    source: S,
    containers: Vec<String>,
    mode: ScanMode,
}

impl<S: ContainerSource + Sync> ArchiveResolver<S> {
    pub fn new(source: S, containers: Vec<String>) -> Self {
        Self {
            source,
            containers,
            mode: ScanMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the payload of the first entry named exactly `target`.
    ///
    /// A container that fails to open aborts the search.
    pub fn resolve(&self, target: &str) -> Result<Resolved> {
        let found = match self.mode {
            ScanMode::Sequential => self.resolve_sequential(target)?,
            ScanMode::Parallel => self.resolve_parallel(target)?,
        };

        match found {
            Some((index, payload)) => {
                let container = self.containers[index].clone();
                log::info!("Found {} in {} ({} bytes)", target, container, payload.len());
                Ok(Resolved { container, container_index: index, payload })
            }
            None => Err(SndVolError::AssetNotFound {
                asset: target.to_string(),
                searched: self.containers.len(),
            }),
        }
    }

    fn resolve_sequential(&self, target: &str) -> Result<Option<(usize, Vec<u8>)>> {
        for (index, name) in self.containers.iter().enumerate() {
            if let Some(payload) = self.scan(name, target)? {
                return Ok(Some((index, payload)));
            }
        }
        Ok(None)
    }

    fn resolve_parallel(&self, target: &str) -> Result<Option<(usize, Vec<u8>)>> {
        self.containers
            .par_iter()
            .enumerate()
            .find_map_first(|(index, name)| match self.scan(name, target) {
                Ok(Some(payload)) => Some(Ok((index, payload))),
                Ok(None) => None,
                Err(e) => Some(Err(e)),
            })
            .transpose()
    }

    /// Opens one container, looks for the entry and releases the container before returning.
    fn scan(&self, name: &str, target: &str) -> Result<Option<Vec<u8>>> {
        log::debug!("Searching {}", name);
        let mut container = self.source.open(name)
            .map_err(|e| SndVolError::container_open(&self.source.locate(name), e))?;

        let Some(index) = container.entry_names().iter().position(|n| n == target) else {
            return Ok(None);
        };
        container.read_entry(index).map(Some)
    }
}
