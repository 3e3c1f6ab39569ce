//! # Generator Module
//!
//! Pure code generation: a [`FieldSchema`] and the current `block.json` go in,
//! the text of every derived artifact comes out. Nothing here touches the
//! file system; writing is the orchestrator's job
//! ([`crate::component`]).
//!
//! ## Artifacts
//!
//! ```text
//! config.json ─┬─ attributes ──→ block.json  (attributes merged in place)
//!              ├─ ui ──────────→ edit.js     (sidebar controls + preview)
//!              ├─ interpolate ─→ render.php  (escaped server template)
//!              ├─ css ─────────→ style.scss  (passthrough)
//!              └─ cheatsheet ──→ fields.md   (token reference)
//! ```
//!
//! `edit.js`, `render.php` and `fields.md` are rendered through the Askama
//! templates in `templates/`. Field controls and the preview are built in
//! Rust and passed in as text, because JSX braces collide with the template
//! syntax.
//!
//! Generating twice from the same input yields byte-identical output.

pub mod attributes;
pub mod cheatsheet;
pub mod controls;
pub mod jsx;
mod templates;
pub mod ui;

pub use templates::*;

use crate::capability::CapabilitySet;
use crate::error::{GenerateError, GenerateWarning};
use crate::interpolate::{self, preview, server};
use crate::registry::FieldRegistry;
use crate::schema::FieldSchema;
use askama::Template;
use tracing::warn;

/// Shown in the editor when the schema has no template yet.
const EMPTY_PREVIEW: &str = "<p className=\"bf-block-empty\">Add a template to config.json to preview this block.</p>";

/// Text of every artifact derived from one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedArtifacts {
    pub block_json: String,
    pub edit_js: String,
    pub render_php: String,
    pub style_scss: String,
    /// `None` when the field reference could not be rendered
    pub cheat_sheet: Option<String>,
    pub capabilities: CapabilitySet,
    pub warnings: Vec<GenerateWarning>,
}

/// Generate all artifacts for a component.
///
/// `metadata` is the current `block.json` text; only its `attributes` are
/// replaced. Fails without producing anything when `metadata` is not a JSON
/// object or a template cannot be rendered.
pub fn generate_artifacts(
    slug: &str,
    schema: &FieldSchema,
    metadata: &str,
    registry: &FieldRegistry,
) -> Result<GeneratedArtifacts, GenerateError> {
    let fields = &schema.fields;
    let mut warnings = Vec::new();

    let (block_json, attr_warnings) = attributes::merge_into_metadata(metadata, fields, registry)?;
    push_unique(&mut warnings, attr_warnings);

    let ui = ui::generate(fields, registry);
    push_unique(&mut warnings, ui.warnings.iter().cloned());

    let nodes = interpolate::parse(schema.template(), fields, registry);
    let preview = if schema.template().trim().is_empty() {
        EMPTY_PREVIEW.to_string()
    } else {
        preview::render(&nodes)
    };
    let edit_js = ui::render_edit_source(slug, &ui, &preview)?;

    let mut render_php = RenderPhpTemplate {
        slug: slug.to_string(),
        body: server::render(&nodes),
    }
    .render()?;
    if !render_php.ends_with('\n') {
        render_php.push('\n');
    }

    let mut style_scss = schema.css().to_string();
    if !style_scss.is_empty() && !style_scss.ends_with('\n') {
        style_scss.push('\n');
    }

    let cheat_sheet = match cheatsheet::render(slug, fields) {
        Ok(text) => Some(text),
        Err(e) => {
            warn!(slug, error = %e, "field reference not rendered");
            push_unique(
                &mut warnings,
                [GenerateWarning::CheatSheet {
                    message: e.to_string(),
                }],
            );
            None
        }
    };

    Ok(GeneratedArtifacts {
        block_json,
        edit_js,
        render_php,
        style_scss,
        cheat_sheet,
        capabilities: ui.capabilities,
        warnings,
    })
}

/// Append warnings, skipping ones already reported by another generator.
fn push_unique(
    warnings: &mut Vec<GenerateWarning>,
    new: impl IntoIterator<Item = GenerateWarning>,
) {
    for warning in new {
        if !warnings.contains(&warning) {
            warnings.push(warning);
        }
    }
}
