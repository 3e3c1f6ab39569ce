//! Per-component single-flight guard.
//!
//! Two overlapping generations for the same component would interleave their
//! writes. The second caller gets [`GenerateError::Busy`] instead of waiting.
//! Entries are keyed by the resolved component directory, so projects sharing
//! a process do not block each other and two spellings of one path do.

use crate::error::{GenerateError, Result};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

static IN_FLIGHT: Lazy<SingleFlight> = Lazy::new(SingleFlight::new);

/// Guard shared by every orchestrator entry point in this process
pub fn global() -> &'static SingleFlight {
    &IN_FLIGHT
}

/// Set of component directories with a generation in progress
#[derive(Debug, Default)]
pub struct SingleFlight {
    active: DashMap<PathBuf, ()>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the component at `dir`; released when the returned guard drops.
    pub fn acquire(&self, dir: &Path, slug: &str) -> Result<FlightGuard<'_>> {
        let key = flight_key(dir);
        match self.active.entry(key.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                debug!(slug, "generation already in flight");
                Err(GenerateError::Busy(slug.to_string()))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(());
                Ok(FlightGuard {
                    owner: self,
                    dir: key,
                })
            }
        }
    }

    pub fn is_active(&self, dir: &Path) -> bool {
        self.active.contains_key(&flight_key(dir))
    }
}

/// Absolute, `.`/`..`-free form of `dir` with symlinks resolved on the part
/// that exists. The component directory itself may not exist yet.
fn flight_key(dir: &Path) -> PathBuf {
    let absolute = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(dir))
            .unwrap_or_else(|_| dir.to_path_buf())
    };

    let mut normal = PathBuf::new();
    for part in absolute.components() {
        match part {
            Component::CurDir => {}
            Component::ParentDir => {
                normal.pop();
            }
            other => normal.push(other),
        }
    }

    let mut missing = Vec::new();
    let mut existing = normal.as_path();
    loop {
        if let Ok(mut resolved) = existing.canonicalize() {
            resolved.extend(missing.iter().rev());
            return resolved;
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return normal,
        }
    }
}

/// Releases its directory on drop
#[derive(Debug)]
pub struct FlightGuard<'a> {
    owner: &'a SingleFlight,
    dir: PathBuf,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.owner.active.remove(&self.dir);
    }
}
