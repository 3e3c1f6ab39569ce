//! # Field Type Registry
//!
//! Static table mapping every field type tag to what the generators need:
//! its attribute storage type, the UI capabilities its controls import, the
//! function that renders those controls, and the escaping rule its template
//! placeholders use.
//!
//! The type set is closed, so the table is built once with
//! [`FieldRegistry::builtin`] and handed to the generators by reference.
//! There is no runtime registration.

use crate::capability::Capability;
use crate::error::GenerateError;
use crate::generator::controls::{self, ControlContext};
use crate::generator::jsx::JsxNode;
use crate::schema::{Field, FieldType, StorageType};
use once_cell::sync::Lazy;
use std::collections::HashMap;

static BUILTIN: Lazy<FieldRegistry> = Lazy::new(FieldRegistry::builtin);

/// Process-wide instance of the built-in table.
pub fn builtin_registry() -> &'static FieldRegistry {
    &BUILTIN
}

/// How a placeholder for a field is escaped in the render template and bound
/// in the editor preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeRule {
    /// HTML with a permissive tag allowlist (`wp_kses_post`); composite values
    /// are JSON-encoded first
    Html,
    /// Rich text: same server escaping as [`EscapeRule::Html`], rendered as
    /// markup in the preview
    Rich,
    /// URL context (`esc_url`)
    Url,
    /// Attribute context (`esc_attr`)
    Attr,
    /// Media object: `{{key}}` is its URL, `{{key_alt}}` its alt text
    Media,
    /// Button object rendered as a link
    Link,
    /// Only usable as a `{{#key}}` loop source
    LoopOnly,
}

/// Renders the sidebar controls of one field.
pub type RenderFn = fn(&ControlContext<'_>) -> Vec<JsxNode>;

/// Everything the generators know about one field type.
#[derive(Debug, Clone, Copy)]
pub struct FieldTypeEntry {
    pub field_type: FieldType,
    pub storage: StorageType,
    pub capabilities: &'static [Capability],
    pub escape: EscapeRule,
    pub render: RenderFn,
}

impl FieldTypeEntry {
    /// Extra attributes a field of this type needs besides its own key.
    ///
    /// Only `contentEditor` has one: the `is_html_mode_<key>` toggle state.
    pub fn companion_attributes(&self, key: &str) -> Vec<String> {
        match self.field_type {
            FieldType::ContentEditor => vec![html_mode_key(key)],
            _ => Vec::new(),
        }
    }
}

/// Key of the boolean attribute tracking a content editor's HTML mode.
pub fn html_mode_key(key: &str) -> String {
    format!("is_html_mode_{key}")
}

/// Immutable lookup table from type tag to [`FieldTypeEntry`].
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    entries: HashMap<&'static str, FieldTypeEntry>,
}

use Capability as C;

const TEXT_CAPS: &[Capability] = &[C::InspectorControls, C::TextControl];
const MEDIA_CAPS: &[Capability] = &[
    C::InspectorControls,
    C::MediaUpload,
    C::MediaUploadCheck,
    C::Button,
];

impl FieldRegistry {
    /// The built-in table covering every [`FieldType`].
    pub fn builtin() -> Self {
        let entries = FieldType::ALL
            .into_iter()
            .map(|field_type| (field_type.as_str(), Self::entry_for(field_type)))
            .collect();
        FieldRegistry { entries }
    }

    fn entry_for(field_type: FieldType) -> FieldTypeEntry {
        let (capabilities, escape, render): (&'static [Capability], EscapeRule, RenderFn) =
            match field_type {
                FieldType::Text => (TEXT_CAPS, EscapeRule::Html, controls::text),
                FieldType::Textarea => (
                    &[C::InspectorControls, C::TextareaControl],
                    EscapeRule::Html,
                    controls::textarea,
                ),
                FieldType::Number => (TEXT_CAPS, EscapeRule::Attr, controls::number),
                FieldType::Range => (
                    &[C::InspectorControls, C::RangeControl],
                    EscapeRule::Attr,
                    controls::range,
                ),
                FieldType::Email => (TEXT_CAPS, EscapeRule::Html, controls::email),
                FieldType::Url => (TEXT_CAPS, EscapeRule::Url, controls::url),
                FieldType::Image => (MEDIA_CAPS, EscapeRule::Media, controls::image),
                FieldType::File => (MEDIA_CAPS, EscapeRule::Media, controls::file),
                FieldType::Gallery => (MEDIA_CAPS, EscapeRule::LoopOnly, controls::gallery),
                FieldType::Date => (
                    &[C::InspectorControls, C::DatePicker],
                    EscapeRule::Attr,
                    controls::date,
                ),
                FieldType::Time => (TEXT_CAPS, EscapeRule::Attr, controls::time),
                FieldType::Datetime => (
                    &[C::InspectorControls, C::DatePicker, C::TextControl],
                    EscapeRule::Attr,
                    controls::datetime,
                ),
                FieldType::Color => (
                    &[C::InspectorControls, C::ColorPalette],
                    EscapeRule::Attr,
                    controls::color,
                ),
                FieldType::Button => (TEXT_CAPS, EscapeRule::Link, controls::button),
                FieldType::ContentEditor => (
                    &[
                        C::InspectorControls,
                        C::RichText,
                        C::ToggleControl,
                        C::TextareaControl,
                    ],
                    EscapeRule::Rich,
                    controls::content_editor,
                ),
                FieldType::Repeater => (
                    &[C::InspectorControls, C::Button],
                    EscapeRule::LoopOnly,
                    controls::repeater,
                ),
                FieldType::Relational => (TEXT_CAPS, EscapeRule::Attr, controls::relational),
                FieldType::Icon => (TEXT_CAPS, EscapeRule::Attr, controls::icon),
            };
        FieldTypeEntry {
            field_type,
            storage: field_type.storage(),
            capabilities,
            escape,
            render,
        }
    }

    /// Look up a type tag.
    pub fn lookup(&self, type_tag: &str) -> Option<&FieldTypeEntry> {
        self.entries.get(type_tag)
    }

    /// Look up the entry for a field, failing with
    /// [`GenerateError::UnknownFieldType`] for tags outside the closed set.
    pub fn entry(&self, field: &Field) -> Result<&FieldTypeEntry, GenerateError> {
        self.lookup(&field.type_tag)
            .ok_or_else(|| GenerateError::UnknownFieldType {
                key: field.key.clone(),
                type_tag: field.type_tag.clone(),
            })
    }

    /// Escaping rule for a field; unknown types fall back to HTML.
    pub fn escape_rule(&self, field: &Field) -> EscapeRule {
        self.lookup(&field.type_tag)
            .map(|e| e.escape)
            .unwrap_or(EscapeRule::Html)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
