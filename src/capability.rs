//! UI capabilities that generated `edit.js` files import.
//!
//! Capabilities live in exactly one of two namespaces and the generated import
//! statements must keep them apart: block-editing primitives come from
//! `@wordpress/block-editor`, generic form controls from `@wordpress/components`.

use std::collections::BTreeSet;
use std::fmt;

/// Package a capability is imported from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityNamespace {
    BlockEditor,
    Components,
}

impl CapabilityNamespace {
    pub fn package(&self) -> &'static str {
        match self {
            CapabilityNamespace::BlockEditor => "@wordpress/block-editor",
            CapabilityNamespace::Components => "@wordpress/components",
        }
    }
}

/// A named UI primitive. Declaration order is the import order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    // @wordpress/block-editor
    UseBlockProps,
    InspectorControls,
    RichText,
    MediaUpload,
    MediaUploadCheck,
    // @wordpress/components
    PanelBody,
    Button,
    TextControl,
    TextareaControl,
    RangeControl,
    ToggleControl,
    DatePicker,
    ColorPalette,
}

impl Capability {
    /// Capabilities every generated block uses regardless of its fields.
    pub const BASELINE: [Capability; 2] = [Capability::UseBlockProps, Capability::PanelBody];

    /// Media pickers, pulled in by image, file and gallery fields.
    pub const MEDIA: [Capability; 2] = [Capability::MediaUpload, Capability::MediaUploadCheck];

    pub fn name(&self) -> &'static str {
        match self {
            Capability::UseBlockProps => "useBlockProps",
            Capability::InspectorControls => "InspectorControls",
            Capability::RichText => "RichText",
            Capability::MediaUpload => "MediaUpload",
            Capability::MediaUploadCheck => "MediaUploadCheck",
            Capability::PanelBody => "PanelBody",
            Capability::Button => "Button",
            Capability::TextControl => "TextControl",
            Capability::TextareaControl => "TextareaControl",
            Capability::RangeControl => "RangeControl",
            Capability::ToggleControl => "ToggleControl",
            Capability::DatePicker => "DatePicker",
            Capability::ColorPalette => "ColorPalette",
        }
    }

    pub fn namespace(&self) -> CapabilityNamespace {
        match self {
            Capability::UseBlockProps
            | Capability::InspectorControls
            | Capability::RichText
            | Capability::MediaUpload
            | Capability::MediaUploadCheck => CapabilityNamespace::BlockEditor,
            _ => CapabilityNamespace::Components,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Deduplicated capabilities, segregated by namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    pub editor: BTreeSet<Capability>,
    pub controls: BTreeSet<Capability>,
}

impl CapabilitySet {
    /// A set seeded with [`Capability::BASELINE`].
    pub fn baseline() -> Self {
        let mut set = CapabilitySet::default();
        set.extend(Capability::BASELINE);
        set
    }

    pub fn insert(&mut self, capability: Capability) {
        match capability.namespace() {
            CapabilityNamespace::BlockEditor => self.editor.insert(capability),
            CapabilityNamespace::Components => self.controls.insert(capability),
        };
    }

    pub fn extend(&mut self, capabilities: impl IntoIterator<Item = Capability>) {
        for capability in capabilities {
            self.insert(capability);
        }
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.editor.contains(&capability) || self.controls.contains(&capability)
    }

    /// One grouped import line per non-empty namespace, editor first.
    pub fn import_lines(&self) -> Vec<String> {
        [
            (CapabilityNamespace::BlockEditor, &self.editor),
            (CapabilityNamespace::Components, &self.controls),
        ]
        .into_iter()
        .filter(|(_, set)| !set.is_empty())
        .map(|(ns, set)| {
            let names: Vec<&str> = set.iter().map(Capability::name).collect();
            format!("import {{ {} }} from '{}';", names.join(", "), ns.package())
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_routes_by_namespace() {
        let mut set = CapabilitySet::default();
        set.insert(Capability::MediaUpload);
        set.insert(Capability::TextControl);
        assert!(set.editor.contains(&Capability::MediaUpload));
        assert!(set.controls.contains(&Capability::TextControl));
        assert!(!set.controls.contains(&Capability::MediaUpload));
    }

    #[test]
    fn test_baseline_import_lines() {
        let lines = CapabilitySet::baseline().import_lines();
        assert_eq!(
            lines,
            vec![
                "import { useBlockProps } from '@wordpress/block-editor';".to_string(),
                "import { PanelBody } from '@wordpress/components';".to_string(),
            ]
        );
    }

    #[test]
    fn test_duplicates_collapse() {
        let mut set = CapabilitySet::baseline();
        set.extend(Capability::MEDIA);
        set.extend(Capability::MEDIA);
        let editor = &set.import_lines()[0];
        assert_eq!(editor.matches("MediaUploadCheck").count(), 1);
        assert_eq!(
            editor,
            "import { useBlockProps, MediaUpload, MediaUploadCheck } from '@wordpress/block-editor';"
        );
    }
}
