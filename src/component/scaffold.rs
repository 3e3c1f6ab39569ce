//! Creating a new component directory from a display name.

use super::generate::generate_into;
use super::{guard, validate_slug, ArtifactKind, GenerationReport};
use crate::config::FactoryConfig;
use crate::error::{GenerateError, Result};
use crate::generator::{EditorScssTemplate, IndexJsTemplate, SaveJsTemplate};
use crate::schema::{to_pretty_json, FieldSchema};
use askama::Template;
use serde_json::{json, Value};
use tracing::info;

/// Lowercase slug: runs of anything but ASCII alphanumerics become one `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// `hero-banner` -> `HeroBanner`
pub fn pascal_case(slug: &str) -> String {
    slug.split(['-', '_', ' '])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Starting `block.json` for a component. `attributes` is filled in by
/// generation.
pub fn default_metadata(config: &FactoryConfig, slug: &str, title: &str) -> Value {
    json!({
        "$schema": "https://schemas.wp.org/trunk/block.json",
        "apiVersion": 3,
        "name": config.block_name(slug),
        "version": "0.1.0",
        "title": title,
        "category": "widgets",
        "icon": config.default_icon,
        "description": format!("{title} block created by block-factory."),
        "supports": { "html": false },
        "textdomain": config.namespace,
        "editorScript": "file:./index.js",
        "editorStyle": "file:./index.css",
        "style": "file:./style-index.css",
        "render": "file:./render.php",
        "attributes": {}
    })
}

/// Scaffold `<blocks_dir>/<slug>/` and generate its initial artifacts.
///
/// Fails with [`GenerateError::AlreadyExists`] rather than touching an
/// existing directory.
pub fn create_component(
    config: &FactoryConfig,
    name: &str,
    icon: Option<&str>,
) -> Result<GenerationReport> {
    let title = name.trim();
    let slug = slugify(title);
    validate_slug(&slug)?;

    let dir = config.component_dir(&slug);
    let _flight = guard::global().acquire(&dir, &slug)?;
    if dir.exists() {
        return Err(GenerateError::AlreadyExists(slug));
    }
    std::fs::create_dir_all(&dir).map_err(|e| GenerateError::io(&dir, e))?;
    info!(slug = %slug, path = %dir.display(), "created component directory");

    let mut metadata = default_metadata(config, &slug, title);
    if let Some(icon) = icon.filter(|i| !i.trim().is_empty()) {
        metadata["icon"] = json!(icon.trim());
    }

    let pascal = pascal_case(&slug);
    let index_js = IndexJsTemplate {
        title: title.to_string(),
        pascal,
    }
    .render()?;
    let save_js = SaveJsTemplate {
        title: title.to_string(),
    }
    .render()?;
    let editor_scss = EditorScssTemplate {
        title: title.to_string(),
        namespace_class: config.block_name(&slug).replace('/', "-"),
    }
    .render()?;

    let schema = FieldSchema::default();
    let mut report = GenerationReport::new(&slug);
    report.write(&dir, ArtifactKind::EntryPoint, &with_newline(index_js));
    report.write(&dir, ArtifactKind::SaveSource, &with_newline(save_js));
    report.write(&dir, ArtifactKind::EditorStyle, &with_newline(editor_scss));
    report.write(&dir, ArtifactKind::Schema, &to_pretty_json(&schema));

    generate_into(
        config,
        &slug,
        &dir,
        &schema,
        Some(to_pretty_json(&metadata)),
        report,
        false,
    )
}

fn with_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ComponentState, Outcome};

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hero Banner"), "hero-banner");
        assert_eq!(slugify("  CTA -- Box!  "), "cta-box");
        assert_eq!(slugify("Étude"), "tude");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("hero-banner"), "HeroBanner");
        assert_eq!(pascal_case("cta"), "Cta");
    }

    #[test]
    fn test_default_metadata() {
        let config = FactoryConfig::for_root("/srv");
        let meta = default_metadata(&config, "hero", "Hero");
        assert_eq!(meta["name"], "block-factory/hero");
        assert_eq!(meta["icon"], "editor-code");
        assert_eq!(meta["render"], "file:./render.php");
        assert!(meta["attributes"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_create_component() {
        let root = tempfile::tempdir().unwrap();
        let config = FactoryConfig::for_root(root.path());
        let report = create_component(&config, "Hero Banner", Some("star-filled")).unwrap();

        assert_eq!(report.slug, "hero-banner");
        assert_eq!(report.outcome, Outcome::FullyGenerated);
        assert_eq!(report.state, ComponentState::ArtifactsGenerated);

        let dir = config.component_dir("hero-banner");
        for kind in [
            ArtifactKind::EntryPoint,
            ArtifactKind::SaveSource,
            ArtifactKind::EditorStyle,
            ArtifactKind::Schema,
            ArtifactKind::Metadata,
            ArtifactKind::EditSource,
            ArtifactKind::RenderTemplate,
            ArtifactKind::Style,
        ] {
            assert!(kind.path_in(&dir).is_file(), "{kind} missing");
        }

        let meta: Value =
            serde_json::from_str(&std::fs::read_to_string(dir.join("block.json")).unwrap()).unwrap();
        assert_eq!(meta["icon"], "star-filled");
        assert_eq!(meta["title"], "Hero Banner");

        let index = std::fs::read_to_string(dir.join("index.js")).unwrap();
        assert!(index.contains("import HeroBannerEdit from './edit';"));
        let editor = std::fs::read_to_string(dir.join("editor.scss")).unwrap();
        assert!(editor.contains(".wp-block-block-factory-hero-banner"));
    }

    #[test]
    fn test_create_existing_is_rejected() {
        let root = tempfile::tempdir().unwrap();
        let config = FactoryConfig::for_root(root.path());
        create_component(&config, "Card", None).unwrap();
        assert!(matches!(
            create_component(&config, "card", None),
            Err(GenerateError::AlreadyExists(slug)) if slug == "card"
        ));
    }

    #[test]
    fn test_create_claims_the_directory_before_checking_it() {
        let root = tempfile::tempdir().unwrap();
        let config = FactoryConfig::for_root(root.path());
        let dir = config.component_dir("banner");
        let flight = guard::global().acquire(&dir, "banner").unwrap();
        assert!(matches!(
            create_component(&config, "Banner", None),
            Err(GenerateError::Busy(slug)) if slug == "banner"
        ));
        assert!(!dir.exists());
        drop(flight);
        assert!(create_component(&config, "Banner", None).is_ok());
    }

    #[test]
    fn test_create_requires_a_usable_name() {
        let root = tempfile::tempdir().unwrap();
        let config = FactoryConfig::for_root(root.path());
        assert!(matches!(
            create_component(&config, "???", None),
            Err(GenerateError::InvalidSlug(_))
        ));
    }
}
