//! Attribute schema synthesis and the `block.json` merge.

use crate::error::{GenerateError, GenerateWarning};
use crate::registry::{FieldRegistry, FieldTypeEntry};
use crate::schema::{to_pretty_json, Field, StorageType};
use serde_json::{json, Map, Value};
use tracing::warn;

/// Attribute definition for one field.
///
/// Array items are declared only as objects. Sub-field values are not typed
/// individually, since a cleared media sub-field stores `null` in its item.
fn definition(field: &Field, entry: &FieldTypeEntry) -> Value {
    let mut def = Map::new();
    def.insert("type".into(), json!(entry.storage.as_str()));

    if entry.storage == StorageType::Array {
        def.insert("default".into(), json!([]));
        def.insert("items".into(), json!({ "type": "object" }));
    } else if let Some(default) = &field.default {
        def.insert("default".into(), default.clone());
    }

    Value::Object(def)
}

/// Merge attribute definitions for `fields` into `existing`.
///
/// Every attribute a field produces is overwritten, so type changes made in
/// the schema reach `block.json`. Attributes no field produces are kept as
/// they are, in their original position.
pub fn synthesize(
    existing: &Map<String, Value>,
    fields: &[Field],
    registry: &FieldRegistry,
) -> (Map<String, Value>, Vec<GenerateWarning>) {
    let mut attributes = existing.clone();
    let mut warnings = Vec::new();

    for field in fields {
        let entry = match registry.entry(field) {
            Ok(entry) => entry,
            Err(_) => {
                warn!(key = %field.key, type_tag = %field.type_tag, "no attribute for field with unknown type");
                warnings.push(GenerateWarning::UnknownFieldType {
                    key: field.key.clone(),
                    type_tag: field.type_tag.clone(),
                });
                continue;
            }
        };
        attributes.insert(field.key.clone(), definition(field, entry));
        for companion in entry.companion_attributes(&field.key) {
            attributes.insert(companion, json!({ "type": "boolean", "default": false }));
        }
    }

    (attributes, warnings)
}

/// Replace the `attributes` object of a `block.json` document.
///
/// All other keys keep their values and order. The result uses four-space
/// indentation and leaves slashes unescaped.
pub fn merge_into_metadata(
    doc: &str,
    fields: &[Field],
    registry: &FieldRegistry,
) -> Result<(String, Vec<GenerateWarning>), GenerateError> {
    let mut meta: Value =
        serde_json::from_str(doc).map_err(|e| GenerateError::InvalidMetadata {
            path: "block.json".into(),
            message: e.to_string(),
        })?;
    let Some(object) = meta.as_object_mut() else {
        return Err(GenerateError::InvalidMetadata {
            path: "block.json".into(),
            message: "top level is not an object".into(),
        });
    };

    let existing = match object.get("attributes") {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };
    let (attributes, warnings) = synthesize(&existing, fields, registry);
    object.insert("attributes".into(), Value::Object(attributes));

    Ok((to_pretty_json(&meta), warnings))
}
