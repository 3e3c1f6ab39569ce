use super::types::FieldSchema;
use crate::error::{GenerateError, Result};
use serde::Serialize;
use std::path::Path;

/// Parse a field schema from its JSON text.
///
/// Invalid JSON is fatal for the run: callers must not write anything when
/// this returns an error.
pub fn parse_schema(raw: &str) -> Result<FieldSchema> {
    serde_json::from_str(raw).map_err(GenerateError::InvalidSchema)
}

/// Read and parse `config.json`.
pub fn load_schema(path: &Path) -> Result<FieldSchema> {
    let raw = std::fs::read_to_string(path).map_err(|e| GenerateError::io(path, e))?;
    parse_schema(&raw)
}

/// Serialize with four-space indentation, the layout block tooling expects for
/// `block.json` and `config.json`.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> String {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    if value.serialize(&mut ser).is_err() {
        return String::new();
    }
    let mut text = String::from_utf8(out).unwrap_or_default();
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;
    use serde_json::json;

    #[test]
    fn test_parse_schema_preserves_field_order_and_sub_fields() {
        let raw = r#"{
            "fields": [
                { "key": "title", "label": "Title", "type": "text" },
                { "key": "items", "label": "Items", "type": "repeater",
                  "subFields": [ { "key": "name", "label": "Name", "type": "text" } ] },
                { "key": "count", "label": "Count", "type": "number", "default": 3 }
            ],
            "template": "<h2>{{title}}</h2>"
        }"#;
        let schema = parse_schema(raw).unwrap();
        let keys: Vec<_> = schema.fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, ["title", "items", "count"]);
        assert_eq!(schema.fields[1].field_type(), Some(FieldType::Repeater));
        assert_eq!(schema.fields[1].sub_fields[0].key, "name");
        assert_eq!(schema.fields[2].default, Some(json!(3)));
        assert_eq!(schema.template(), "<h2>{{title}}</h2>");
        assert_eq!(schema.css(), "");
    }

    #[test]
    fn test_parse_schema_keeps_unknown_type_tags() {
        let schema = parse_schema(r#"{"fields":[{"key":"v","label":"V","type":"video"}]}"#).unwrap();
        assert_eq!(schema.fields[0].type_tag, "video");
        assert_eq!(schema.fields[0].field_type(), None);
    }

    #[test]
    fn test_parse_schema_rejects_invalid_json() {
        let err = parse_schema("{ fields: [").unwrap_err();
        assert!(matches!(err, GenerateError::InvalidSchema(_)));
    }

    #[test]
    fn test_unknown_top_level_keys_survive_a_save() {
        let schema = parse_schema(r#"{"fields":[],"editorNotes":"keep me"}"#).unwrap();
        let text = to_pretty_json(&schema);
        assert!(text.contains("\"editorNotes\": \"keep me\""));
    }

    #[test]
    fn test_to_pretty_json_uses_four_spaces_and_unescaped_slashes() {
        let text = to_pretty_json(&json!({ "editorScript": "file:./index.js" }));
        assert_eq!(text, "{\n    \"editorScript\": \"file:./index.js\"\n}\n");
    }
}
