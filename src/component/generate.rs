use super::{freshness, guard, scaffold, validate_slug, ArtifactKind, GenerationReport};
use crate::config::FactoryConfig;
use crate::error::{GenerateError, Result};
use crate::generator::generate_artifacts;
use crate::linter::{lint_schema, reject_errors};
use crate::registry::builtin_registry;
use crate::schema::{load_schema, parse_schema, to_pretty_json, FieldSchema};
use std::path::Path;
use tracing::{debug, info, warn};

/// Replace a component's schema and regenerate everything derived from it.
///
/// Invalid schema JSON, linter errors and an unreadable `block.json` abort
/// before the first write.
pub fn save_schema(config: &FactoryConfig, slug: &str, raw_json: &str) -> Result<GenerationReport> {
    let dir = checked_dir(config, slug)?;
    let _flight = guard::global().acquire(&dir, slug)?;
    ensure_exists(&dir, slug)?;
    let schema = parse_schema(raw_json)?;
    generate_into(config, slug, &dir, &schema, None, GenerationReport::new(slug), true)
}

/// Regenerate from the persisted `config.json`.
///
/// Without `force`, a component whose outputs are all newer than its schema
/// is reported as [`Outcome::Skipped`](super::Outcome::Skipped).
pub fn regenerate(config: &FactoryConfig, slug: &str, force: bool) -> Result<GenerationReport> {
    let dir = checked_dir(config, slug)?;
    let _flight = guard::global().acquire(&dir, slug)?;
    ensure_exists(&dir, slug)?;
    if !force && freshness::is_up_to_date(&dir) {
        debug!(slug, "artifacts up to date, skipping");
        return Ok(GenerationReport::skipped(slug));
    }
    let schema = load_schema(&ArtifactKind::Schema.path_in(&dir))?;
    generate_into(config, slug, &dir, &schema, None, GenerationReport::new(slug), false)
}

/// Regenerate every component under the blocks directory, in slug order.
///
/// One component failing does not stop the others.
pub fn regenerate_all(
    config: &FactoryConfig,
    force: bool,
) -> Result<Vec<(String, Result<GenerationReport>)>> {
    let blocks = config.blocks_path();
    let entries = match std::fs::read_dir(&blocks) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %blocks.display(), "blocks directory does not exist");
            return Ok(Vec::new());
        }
        Err(e) => return Err(GenerateError::io(&blocks, e)),
    };

    let mut slugs: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| ArtifactKind::Schema.path_in(&entry.path()).is_file())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|slug| validate_slug(slug).is_ok())
        .collect();
    slugs.sort();

    Ok(slugs
        .into_iter()
        .map(|slug| {
            let result = regenerate(config, &slug, force);
            if let Err(e) = &result {
                warn!(slug = %slug, error = %e, "regeneration failed");
            }
            (slug, result)
        })
        .collect())
}

fn checked_dir(config: &FactoryConfig, slug: &str) -> Result<std::path::PathBuf> {
    validate_slug(slug)?;
    Ok(config.component_dir(slug))
}

/// Checked while holding the guard, so a concurrent delete cannot slip in.
fn ensure_exists(dir: &Path, slug: &str) -> Result<()> {
    if !dir.is_dir() {
        return Err(GenerateError::NotFound(slug.to_string()));
    }
    Ok(())
}

fn read_metadata(config: &FactoryConfig, slug: &str, dir: &Path) -> Result<String> {
    let path = ArtifactKind::Metadata.path_in(dir);
    match std::fs::read_to_string(&path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(slug, "no block.json yet, starting from defaults");
            Ok(to_pretty_json(&scaffold::default_metadata(config, slug, slug)))
        }
        Err(e) => Err(GenerateError::io(path, e)),
    }
}

/// Shared tail of create, save and regenerate. Caller holds the flight guard.
///
/// `metadata` overrides the `block.json` on disk; `report` may already hold
/// earlier writes.
pub(super) fn generate_into(
    config: &FactoryConfig,
    slug: &str,
    dir: &Path,
    schema: &FieldSchema,
    metadata: Option<String>,
    mut report: GenerationReport,
    write_schema: bool,
) -> Result<GenerationReport> {
    let registry = builtin_registry();
    reject_errors(&lint_schema(schema, registry))?;

    let metadata = match metadata {
        Some(text) => text,
        None => read_metadata(config, slug, dir)?,
    };
    let artifacts = generate_artifacts(slug, schema, &metadata, registry).map_err(|e| match e {
        GenerateError::InvalidMetadata { message, .. } => GenerateError::InvalidMetadata {
            path: ArtifactKind::Metadata.path_in(dir),
            message,
        },
        other => other,
    })?;

    if write_schema {
        report.write(dir, ArtifactKind::Schema, &to_pretty_json(schema));
    }
    report.write(dir, ArtifactKind::Metadata, &artifacts.block_json);
    report.write(dir, ArtifactKind::EditSource, &artifacts.edit_js);
    report.write(dir, ArtifactKind::RenderTemplate, &artifacts.render_php);
    report.write(dir, ArtifactKind::Style, &artifacts.style_scss);
    if let Some(cheat_sheet) = &artifacts.cheat_sheet {
        report.write(dir, ArtifactKind::CheatSheet, cheat_sheet);
    }

    report.warnings = artifacts.warnings;
    report.cheat_sheet = artifacts.cheat_sheet;

    let report = report.finish();
    info!(
        slug,
        outcome = ?report.outcome,
        written = report.written.len(),
        failed = report.failed.len(),
        "generation finished"
    );
    Ok(report)
}
