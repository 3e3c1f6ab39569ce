//! Editor UI generation.
//!
//! Walks the field list in order, renders each field's sidebar controls
//! through its registry entry and collects the capabilities those controls
//! import. Repeaters get a restricted sub-generator that renders their
//! sub-fields in item scope and never recurses into another repeater.

use super::controls::{ControlContext, FieldScope};
use super::jsx::{Element, JsxNode};
use super::templates::EditJsTemplate;
use crate::capability::CapabilitySet;
use crate::error::{GenerateError, GenerateWarning};
use crate::registry::FieldRegistry;
use crate::schema::{Field, FieldType};
use askama::Template;
use tracing::warn;

/// Depth of the sidebar panels inside the generated `Edit` component.
const CONTROLS_DEPTH: usize = 3;
/// Depth of the preview inside the block wrapper `div`.
const PREVIEW_DEPTH: usize = 4;

/// Result of generating the editor UI for one schema.
#[derive(Debug, Clone, Default)]
pub struct UiOutput {
    /// One `InspectorControls` panel per rendered field
    pub body: Vec<JsxNode>,
    pub capabilities: CapabilitySet,
    pub warnings: Vec<GenerateWarning>,
}

impl UiOutput {
    /// The panels serialized at the depth `edit.js` expects.
    pub fn render_controls(&self) -> String {
        self.body.iter().map(|n| n.render(CONTROLS_DEPTH)).collect()
    }
}

/// Generate sidebar controls for every field.
///
/// Unknown field types are skipped with a warning; the remaining fields are
/// still generated.
pub fn generate(fields: &[Field], registry: &FieldRegistry) -> UiOutput {
    let mut out = UiOutput {
        capabilities: CapabilitySet::baseline(),
        ..UiOutput::default()
    };
    let block = FieldScope::Block;

    for field in fields {
        let entry = match registry.entry(field) {
            Ok(entry) => entry,
            Err(_) => {
                warn!(key = %field.key, type_tag = %field.type_tag, "skipping field with unknown type");
                out.warnings.push(GenerateWarning::UnknownFieldType {
                    key: field.key.clone(),
                    type_tag: field.type_tag.clone(),
                });
                continue;
            }
        };

        let item_controls = if entry.field_type == FieldType::Repeater {
            repeater_items(field, registry, &mut out)
        } else {
            Vec::new()
        };

        let label = field.display_label();
        let ctx = ControlContext {
            key: &field.key,
            label,
            scope: &block,
            item_controls: &item_controls,
        };
        let controls = (entry.render)(&ctx);
        out.capabilities.extend(entry.capabilities.iter().copied());
        out.body.push(settings_panel(&field.key, label, controls));
    }

    out
}

/// Controls for one repeater item, rendered in item scope.
fn repeater_items(field: &Field, registry: &FieldRegistry, out: &mut UiOutput) -> Vec<JsxNode> {
    if field.sub_fields.is_empty() {
        warn!(key = %field.key, "repeater has no sub-fields");
        out.warnings.push(GenerateWarning::EmptyRepeater {
            key: field.key.clone(),
        });
        return Vec::new();
    }

    let scope = FieldScope::item(field.key.as_str());
    let mut nodes = Vec::new();
    for sub in &field.sub_fields {
        let entry = match registry.entry(sub) {
            Ok(entry) if entry.field_type == FieldType::Repeater => {
                warn!(repeater = %field.key, key = %sub.key, "nested repeaters are not supported");
                out.warnings.push(GenerateWarning::NestedRepeater {
                    repeater: field.key.clone(),
                    key: sub.key.clone(),
                });
                continue;
            }
            Ok(entry) => entry,
            Err(_) => {
                warn!(repeater = %field.key, key = %sub.key, type_tag = %sub.type_tag, "skipping sub-field with unknown type");
                out.warnings.push(GenerateWarning::UnknownFieldType {
                    key: format!("{}.{}", field.key, sub.key),
                    type_tag: sub.type_tag.clone(),
                });
                continue;
            }
        };
        let ctx = ControlContext {
            key: &sub.key,
            label: sub.display_label(),
            scope: &scope,
            item_controls: &[],
        };
        nodes.extend((entry.render)(&ctx));
        out.capabilities.extend(entry.capabilities.iter().copied());
    }
    nodes
}

fn settings_panel(key: &str, label: &str, controls: Vec<JsxNode>) -> JsxNode {
    Element::new("InspectorControls")
        .str("key", format!("{key}-settings"))
        .child(
            Element::new("PanelBody")
                .str("title", format!("{label} Settings"))
                .expr("initialOpen", "true")
                .children(controls),
        )
        .into()
}

/// Render the complete `edit.js` source.
///
/// `preview` is the converted JSX of the block template; it is indented to
/// its place inside the block wrapper here.
pub fn render_edit_source(
    slug: &str,
    ui: &UiOutput,
    preview: &str,
) -> Result<String, GenerateError> {
    let mut source = EditJsTemplate {
        slug: slug.to_string(),
        imports: ui.capabilities.import_lines().join("\n"),
        controls: ui.render_controls(),
        preview: indent(preview, PREVIEW_DEPTH),
    }
    .render()?;
    if !source.ends_with('\n') {
        source.push('\n');
    }
    Ok(source)
}

fn indent(text: &str, depth: usize) -> String {
    let pad = "\t".repeat(depth);
    let mut out = String::new();
    for line in text.lines() {
        let line = line.trim_end();
        if !line.is_empty() {
            out.push_str(&pad);
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}
