//! # Hot Reload Module
//!
//! Watches the blocks directory and regenerates a component whenever its
//! `config.json` is created or modified, so editing a schema by hand has the
//! same effect as `block-factory save`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use block_factory::hot_reload::watch_blocks;
//!
//! let watcher = watch_blocks(config, |slug, result| match result {
//!     Ok(report) => println!("{slug}: {:?}", report.outcome),
//!     Err(e) => eprintln!("{slug}: {e}"),
//! })?;
//!
//! // Keep watcher alive
//! std::mem::forget(watcher);
//! ```
//!
//! ## Reload Process
//!
//! 1. **Detection** - the watcher reports a create or modify event
//! 2. **Filter** - only `<blocks_dir>/<slug>/config.json` paths are kept
//! 3. **Regenerate** - [`regenerate`] runs without `force`
//! 4. **Callback** - the caller receives the slug and the result
//!
//! Regeneration writes the other artifacts of the component, which produces
//! more events; those are ignored by the filter. Editors that save in several
//! steps trigger repeated events for the same schema, and the freshness check
//! reports the repeats as skipped. Overlapping runs are rejected by the
//! single-flight guard with [`GenerateError::Busy`](crate::error::GenerateError::Busy).
//!
//! A schema that fails to parse is reported through the callback; the
//! artifacts from the last good schema stay in place.

use crate::component::{regenerate, ArtifactKind, GenerationReport};
use crate::config::FactoryConfig;
use crate::error::Result;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Slug of the component owning `path`, when `path` is a direct
/// `<blocks>/<slug>/config.json`.
pub fn schema_slug(blocks: &Path, path: &Path) -> Option<String> {
    if path.file_name()? != ArtifactKind::Schema.file_name() {
        return None;
    }
    let dir = path.parent()?;
    if dir.parent()? != blocks {
        return None;
    }
    dir.file_name()?.to_str().map(str::to_string)
}

/// Watch `config.blocks_path()` and regenerate components on schema changes.
///
/// The blocks directory is created if it does not exist yet. The callback
/// runs on the watcher thread.
pub fn watch_blocks<F>(config: FactoryConfig, mut on_regenerate: F) -> notify::Result<RecommendedWatcher>
where
    F: FnMut(&str, Result<GenerationReport>) + Send + 'static,
{
    let blocks = config.blocks_path();
    std::fs::create_dir_all(&blocks)?;
    let blocks = blocks.canonicalize().unwrap_or(blocks);
    let watch_root: PathBuf = blocks.clone();

    let mut watcher = RecommendedWatcher::new(
        move |res: std::result::Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    return;
                }
                let slugs: BTreeSet<String> = event
                    .paths
                    .iter()
                    .filter_map(|p| schema_slug(&blocks, p))
                    .collect();
                for slug in slugs {
                    info!(slug = %slug, "hot-reload: schema changed");
                    let result = regenerate(&config, &slug, false);
                    on_regenerate(&slug, result);
                }
            }
            Err(e) => warn!(error = %e, "watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(&watch_root, RecursiveMode::Recursive)?;
    Ok(watcher)
}
