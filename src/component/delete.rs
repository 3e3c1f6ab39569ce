//! Removing a component's source and build output.

use super::{guard, validate_slug};
use crate::config::FactoryConfig;
use crate::error::{GenerateError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    AlreadyAbsent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteReport {
    pub slug: String,
    pub source: (PathBuf, Removal),
    pub build: (PathBuf, Removal),
}

impl DeleteReport {
    /// Whether anything existed before the call
    pub fn removed_anything(&self) -> bool {
        self.source.1 == Removal::Removed || self.build.1 == Removal::Removed
    }
}

/// Delete `<blocks_dir>/<slug>` and `<build_dir>/<slug>`.
///
/// Deleting twice is not an error; the second call reports both paths as
/// [`Removal::AlreadyAbsent`]. A component with a generation in flight is
/// left alone and [`GenerateError::Busy`] is returned.
pub fn delete_component(config: &FactoryConfig, slug: &str) -> Result<DeleteReport> {
    validate_slug(slug)?;
    let source = config.component_dir(slug);
    let build = config.build_output_dir(slug);
    let _flight = guard::global().acquire(&source, slug)?;
    let source_removal = remove_dir(&source)?;
    let build_removal = remove_dir(&build)?;
    Ok(DeleteReport {
        slug: slug.to_string(),
        source: (source, source_removal),
        build: (build, build_removal),
    })
}

fn remove_dir(path: &Path) -> Result<Removal> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => {
            info!(path = %path.display(), "removed directory");
            Ok(Removal::Removed)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "nothing to remove");
            Ok(Removal::AlreadyAbsent)
        }
        Err(e) => Err(GenerateError::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_then_delete_again() {
        let root = tempfile::tempdir().unwrap();
        let config = FactoryConfig::for_root(root.path());
        std::fs::create_dir_all(config.component_dir("hero")).unwrap();
        std::fs::write(config.component_dir("hero").join("edit.js"), "x").unwrap();

        let first = delete_component(&config, "hero").unwrap();
        assert_eq!(first.source.1, Removal::Removed);
        assert_eq!(first.build.1, Removal::AlreadyAbsent);
        assert!(first.removed_anything());
        assert!(!config.component_dir("hero").exists());

        let second = delete_component(&config, "hero").unwrap();
        assert_eq!(second.source.1, Removal::AlreadyAbsent);
        assert!(!second.removed_anything());
    }

    #[test]
    fn test_delete_is_refused_while_busy() {
        let root = tempfile::tempdir().unwrap();
        let config = FactoryConfig::for_root(root.path());
        let dir = config.component_dir("hero");
        std::fs::create_dir_all(&dir).unwrap();

        let flight = guard::global().acquire(&dir.join("."), "hero").unwrap();
        assert!(matches!(
            delete_component(&config, "hero"),
            Err(GenerateError::Busy(s)) if s == "hero"
        ));
        assert!(dir.is_dir());

        drop(flight);
        assert_eq!(delete_component(&config, "hero").unwrap().source.1, Removal::Removed);
    }

    #[test]
    fn test_delete_rejects_traversal() {
        let root = tempfile::tempdir().unwrap();
        let config = FactoryConfig::for_root(root.path());
        assert!(matches!(
            delete_component(&config, "../etc"),
            Err(GenerateError::InvalidSlug(_))
        ));
    }
}
