use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// The closed set of field type tags a schema may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Range,
    Email,
    Url,
    Image,
    File,
    Gallery,
    Date,
    Time,
    Datetime,
    Color,
    Button,
    ContentEditor,
    Repeater,
    Relational,
    Icon,
}

impl FieldType {
    /// Every type, in registry order.
    pub const ALL: [FieldType; 18] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Number,
        FieldType::Range,
        FieldType::Email,
        FieldType::Url,
        FieldType::Image,
        FieldType::File,
        FieldType::Gallery,
        FieldType::Date,
        FieldType::Time,
        FieldType::Datetime,
        FieldType::Color,
        FieldType::Button,
        FieldType::ContentEditor,
        FieldType::Repeater,
        FieldType::Relational,
        FieldType::Icon,
    ];

    /// The tag as written in `config.json`.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Number => "number",
            FieldType::Range => "range",
            FieldType::Email => "email",
            FieldType::Url => "url",
            FieldType::Image => "image",
            FieldType::File => "file",
            FieldType::Gallery => "gallery",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::Datetime => "datetime",
            FieldType::Color => "color",
            FieldType::Button => "button",
            FieldType::ContentEditor => "contentEditor",
            FieldType::Repeater => "repeater",
            FieldType::Relational => "relational",
            FieldType::Icon => "icon",
        }
    }

    /// Attribute storage category in block.json.
    pub fn storage(&self) -> StorageType {
        match self {
            FieldType::Repeater | FieldType::Gallery => StorageType::Array,
            FieldType::Image | FieldType::File | FieldType::Button => StorageType::Object,
            FieldType::Number | FieldType::Range | FieldType::Relational => StorageType::Number,
            _ => StorageType::String,
        }
    }

    /// Types that may be used as `{{#key}}` loop sources.
    pub fn is_loopable(&self) -> bool {
        matches!(self, FieldType::Repeater | FieldType::Gallery)
    }

    /// Types whose value is a media object with a secondary `_alt` value.
    pub fn has_alt(&self) -> bool {
        matches!(self, FieldType::Image | FieldType::File)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or(())
    }
}

/// JSON type used to persist an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageType {
    String,
    Number,
    Object,
    Array,
}

impl StorageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::String => "string",
            StorageType::Number => "number",
            StorageType::Object => "object",
            StorageType::Array => "array",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared data point of a component.
///
/// The type is kept as the raw tag so that an unknown tag only costs the field
/// itself at generation time instead of failing the whole schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Attribute key, lowercase alphanumerics and underscore
    pub key: String,
    /// Display label shown in the editor sidebar
    #[serde(default)]
    pub label: String,
    /// Type tag, see [`FieldType`]
    #[serde(rename = "type")]
    pub type_tag: String,
    /// Optional default attribute value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Item schema, only meaningful for repeaters
    #[serde(default, rename = "subFields", skip_serializing_if = "Vec::is_empty")]
    pub sub_fields: Vec<Field>,
}

impl Field {
    pub fn new(key: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Field {
            key: key.into(),
            label: label.into(),
            type_tag: field_type.as_str().to_string(),
            default: None,
            sub_fields: Vec::new(),
        }
    }

    pub fn with_sub_fields(mut self, sub_fields: Vec<Field>) -> Self {
        self.sub_fields = sub_fields;
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Parsed type, `None` for tags outside the closed set.
    pub fn field_type(&self) -> Option<FieldType> {
        self.type_tag.parse().ok()
    }

    /// Label, falling back to the key when the author left it blank.
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.key
        } else {
            &self.label
        }
    }
}

/// The persisted schema document of a component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
    /// Keys this crate does not interpret, carried through on save
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FieldSchema {
    pub fn new(fields: Vec<Field>) -> Self {
        FieldSchema {
            fields,
            ..Default::default()
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn template(&self) -> &str {
        self.template.as_deref().unwrap_or_default()
    }

    pub fn css(&self) -> &str {
        self.css.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_categories() {
        assert_eq!(FieldType::Repeater.storage(), StorageType::Array);
        assert_eq!(FieldType::Gallery.storage(), StorageType::Array);
        assert_eq!(FieldType::Image.storage(), StorageType::Object);
        assert_eq!(FieldType::Button.storage(), StorageType::Object);
        assert_eq!(FieldType::Relational.storage(), StorageType::Number);
        assert_eq!(FieldType::Range.storage(), StorageType::Number);
        assert_eq!(FieldType::ContentEditor.storage(), StorageType::String);
        assert_eq!(FieldType::Icon.storage(), StorageType::String);
    }

    #[test]
    fn test_type_tags_round_trip_through_from_str() {
        for t in FieldType::ALL {
            assert_eq!(t.as_str().parse::<FieldType>(), Ok(t));
        }
        assert!("contenteditor".parse::<FieldType>().is_err());
        assert!("video".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_display_label_falls_back_to_key() {
        let field = Field::new("hero_title", "  ", FieldType::Text);
        assert_eq!(field.display_label(), "hero_title");
    }
}
