//! # Component Orchestrator
//!
//! The only part of the crate that touches storage. A component lives in
//! `<blocks_dir>/<slug>/`:
//!
//! ```text
//! blocks/hero/
//! ├── config.json   # field schema, replaced wholesale on save
//! ├── block.json    # metadata; only `attributes` is regenerated
//! ├── edit.js       # editor UI
//! ├── render.php    # server render template
//! ├── style.scss    # schema css
//! ├── fields.md     # token reference
//! ├── index.js      # scaffolded once
//! ├── save.js       # scaffolded once
//! └── editor.scss   # scaffolded once
//! ```
//!
//! A component moves through [`ComponentState`]: scaffolding and saving write
//! the schema, generation writes the artifacts, and an external build
//! compiles them. Writes are independent: one failing write is reported in
//! the [`GenerationReport`] and the remaining writes still happen. There is
//! no rollback.

pub mod build;
pub mod delete;
pub mod freshness;
mod generate;
pub mod guard;
pub mod scaffold;

pub use build::{run_build, BuildReport};
pub use delete::{delete_component, DeleteReport, Removal};
pub use generate::{regenerate, regenerate_all, save_schema};
pub use scaffold::create_component;

use crate::error::{GenerateError, GenerateWarning, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Lifecycle of one component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentState {
    Unbuilt,
    SchemaWritten,
    ArtifactsGenerated,
    BuildCompiled,
    BuildFailed,
}

/// Overall result of a generation run that did not abort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every field generated and every artifact written
    FullyGenerated,
    /// Some fields were skipped or some writes failed
    PartiallyGenerated,
    /// Outputs were newer than the schema; nothing was written
    Skipped,
}

/// Files written by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Schema,
    Metadata,
    EditSource,
    RenderTemplate,
    Style,
    CheatSheet,
    EntryPoint,
    SaveSource,
    EditorStyle,
}

impl ArtifactKind {
    /// Artifacts whose timestamps decide whether a component is up to date
    pub const GENERATED: [ArtifactKind; 4] = [
        ArtifactKind::Metadata,
        ArtifactKind::EditSource,
        ArtifactKind::RenderTemplate,
        ArtifactKind::Style,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            ArtifactKind::Schema => "config.json",
            ArtifactKind::Metadata => "block.json",
            ArtifactKind::EditSource => "edit.js",
            ArtifactKind::RenderTemplate => "render.php",
            ArtifactKind::Style => "style.scss",
            ArtifactKind::CheatSheet => "fields.md",
            ArtifactKind::EntryPoint => "index.js",
            ArtifactKind::SaveSource => "save.js",
            ArtifactKind::EditorStyle => "editor.scss",
        }
    }

    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// A write that failed; later writes were still attempted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFailure {
    pub artifact: ArtifactKind,
    pub path: PathBuf,
    pub message: String,
}

/// What a save, regenerate or create did
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub slug: String,
    pub outcome: Outcome,
    pub state: ComponentState,
    pub written: Vec<(ArtifactKind, PathBuf)>,
    pub failed: Vec<WriteFailure>,
    pub warnings: Vec<GenerateWarning>,
    /// Field reference text, when it was rendered
    pub cheat_sheet: Option<String>,
}

impl GenerationReport {
    pub(crate) fn new(slug: &str) -> Self {
        GenerationReport {
            slug: slug.to_string(),
            outcome: Outcome::FullyGenerated,
            state: ComponentState::Unbuilt,
            written: Vec::new(),
            failed: Vec::new(),
            warnings: Vec::new(),
            cheat_sheet: None,
        }
    }

    pub(crate) fn skipped(slug: &str) -> Self {
        GenerationReport {
            outcome: Outcome::Skipped,
            state: ComponentState::ArtifactsGenerated,
            ..GenerationReport::new(slug)
        }
    }

    pub fn wrote(&self, artifact: ArtifactKind) -> bool {
        self.written.iter().any(|(kind, _)| *kind == artifact)
    }

    /// Write one artifact, recording the result instead of failing.
    pub(crate) fn write(&mut self, dir: &Path, artifact: ArtifactKind, contents: &str) {
        let path = artifact.path_in(dir);
        match std::fs::write(&path, contents) {
            Ok(()) => {
                info!(slug = %self.slug, artifact = %artifact, path = %path.display(), "wrote artifact");
                self.written.push((artifact, path));
            }
            Err(e) => {
                warn!(slug = %self.slug, artifact = %artifact, path = %path.display(), error = %e, "failed to write artifact");
                self.failed.push(WriteFailure {
                    artifact,
                    path,
                    message: e.to_string(),
                });
            }
        }
    }

    /// Derive state and outcome from what was written.
    pub(crate) fn finish(mut self) -> Self {
        let failed = |kind: ArtifactKind| self.failed.iter().any(|f| f.artifact == kind);
        self.state = if failed(ArtifactKind::Schema) {
            ComponentState::Unbuilt
        } else if ArtifactKind::GENERATED.iter().any(|k| failed(*k)) {
            ComponentState::SchemaWritten
        } else {
            ComponentState::ArtifactsGenerated
        };
        self.outcome = if self.failed.is_empty() && self.warnings.is_empty() {
            Outcome::FullyGenerated
        } else {
            Outcome::PartiallyGenerated
        };
        self
    }
}

/// Reject slugs that are empty or could reach outside the blocks directory.
pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.trim().is_empty() || slug.contains(['.', '/', '\\']) {
        return Err(GenerateError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}
