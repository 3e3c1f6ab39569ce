//! Integration tests for the component orchestrator: save, regenerate,
//! delete and their failure modes against a scratch project directory.

use block_factory::component::{
    delete_component, regenerate, regenerate_all, save_schema, ArtifactKind, ComponentState,
    Outcome, Removal,
};
use block_factory::error::{GenerateError, GenerateWarning};
use serde_json::Value;

mod common;
use common::project::{age, artifact, fixture, read, temp_project, with_component};

#[test]
fn test_save_writes_every_artifact() {
    let (_root, config, slug) = with_component("Team");
    let report = save_schema(&config, &slug, &fixture("team.json")).unwrap();

    assert_eq!(report.outcome, Outcome::FullyGenerated);
    assert_eq!(report.state, ComponentState::ArtifactsGenerated);
    for kind in [
        ArtifactKind::Schema,
        ArtifactKind::Metadata,
        ArtifactKind::EditSource,
        ArtifactKind::RenderTemplate,
        ArtifactKind::Style,
        ArtifactKind::CheatSheet,
    ] {
        assert!(report.wrote(kind), "{kind} not written");
    }
    assert!(report.cheat_sheet.as_deref().unwrap().contains("`{{hero_alt}}`"));
    assert_eq!(read(&config, &slug, "style.scss"), ".team h2 { margin: 0; }\n");
}

#[test]
fn test_array_fields_get_array_definitions() {
    let (_root, config, slug) = with_component("Team");
    save_schema(&config, &slug, &fixture("team.json")).unwrap();

    let meta: Value = serde_json::from_str(&read(&config, &slug, "block.json")).unwrap();
    let attrs = &meta["attributes"];
    for key in ["members", "photos"] {
        assert_eq!(attrs[key]["type"], "array", "{key}");
        assert_eq!(attrs[key]["default"], serde_json::json!([]), "{key}");
    }
    assert_eq!(attrs["members"]["items"]["type"], "object");
    assert_eq!(attrs["is_html_mode_intro"]["type"], "boolean");
    assert_eq!(attrs["is_html_mode_intro"]["default"], false);
    // scaffolded keys survive the merge
    assert_eq!(meta["name"], "block-factory/team");
    assert_eq!(meta["title"], "Team");
}

#[test]
fn test_saving_twice_is_byte_identical() {
    let (_root, config, slug) = with_component("Team");
    let schema = fixture("team.json");
    save_schema(&config, &slug, &schema).unwrap();
    let first: Vec<String> = ArtifactKind::GENERATED
        .iter()
        .map(|k| read(&config, &slug, k.file_name()))
        .collect();

    save_schema(&config, &slug, &schema).unwrap();
    let second: Vec<String> = ArtifactKind::GENERATED
        .iter()
        .map(|k| read(&config, &slug, k.file_name()))
        .collect();
    assert_eq!(first, second);
}

#[test]
fn test_title_token_in_both_targets() {
    let (_root, config, slug) = with_component("Team");
    save_schema(&config, &slug, &fixture("team.json")).unwrap();

    let php = read(&config, &slug, "render.php");
    assert!(php.contains("<h2><?php echo wp_kses_post( $attributes['title'] ?? '' ); ?></h2>"));
    assert!(php.contains("foreach ( $attributes['members'] as $item )"));
    assert!(php.contains("esc_attr( $item['avatar']['alt'] ?? '' )"));
    assert!(php.contains("foreach ( $attributes['photos'] as $image )"));

    let js = read(&config, &slug, "edit.js");
    assert!(js.contains("<h2>{ attributes.title ?? '' }</h2>"));
    assert!(js.contains("className=\"team\""));
    assert!(!js.contains("class=\""));
}

#[test]
fn test_warnings_make_a_partial_generation() {
    let (_root, config, slug) = with_component("Grid");
    let report = save_schema(&config, &slug, &fixture("warnings_only.json")).unwrap();

    assert_eq!(report.outcome, Outcome::PartiallyGenerated);
    assert_eq!(report.state, ComponentState::ArtifactsGenerated);
    assert!(report.failed.is_empty());
    assert!(report.warnings.contains(&GenerateWarning::UnknownFieldType {
        key: "clip".into(),
        type_tag: "video".into(),
    }));
    assert!(report.warnings.contains(&GenerateWarning::NestedRepeater {
        repeater: "rows".into(),
        key: "cells".into(),
    }));
    let meta: Value = serde_json::from_str(&read(&config, &slug, "block.json")).unwrap();
    assert!(meta["attributes"].get("clip").is_none());
    assert_eq!(meta["attributes"]["rows"]["type"], "array");
}

#[test]
fn test_invalid_json_writes_nothing() {
    let (_root, config, slug) = with_component("Team");
    let before = read(&config, &slug, "edit.js");
    let schema_before = read(&config, &slug, "config.json");

    let err = save_schema(&config, &slug, "{\"fields\": [").unwrap_err();
    assert!(matches!(err, GenerateError::InvalidSchema(_)));
    assert_eq!(read(&config, &slug, "edit.js"), before);
    assert_eq!(read(&config, &slug, "config.json"), schema_before);
}

#[test]
fn test_lint_errors_write_nothing() {
    let (_root, config, slug) = with_component("Team");
    let schema_before = read(&config, &slug, "config.json");

    let err = save_schema(&config, &slug, &fixture("duplicate_keys.json")).unwrap_err();
    match err {
        GenerateError::Rejected { issues } => {
            assert!(issues.iter().any(|i| i.contains("duplicate_key")));
            assert!(issues.iter().any(|i| i.contains("key_format")));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(read(&config, &slug, "config.json"), schema_before);
}

#[test]
fn test_malformed_metadata_aborts_before_writing() {
    let (_root, config, slug) = with_component("Team");
    std::fs::write(artifact(&config, &slug, "block.json"), "[1, 2").unwrap();
    let schema_before = read(&config, &slug, "config.json");

    let err = save_schema(&config, &slug, &fixture("team.json")).unwrap_err();
    match err {
        GenerateError::InvalidMetadata { path, .. } => {
            assert_eq!(path, artifact(&config, &slug, "block.json"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(read(&config, &slug, "config.json"), schema_before);
    assert_eq!(read(&config, &slug, "block.json"), "[1, 2");
}

#[cfg(unix)]
#[test]
fn test_failed_write_does_not_stop_later_writes() {
    let (_root, config, slug) = with_component("Team");
    let edit = artifact(&config, &slug, "edit.js");
    std::fs::remove_file(&edit).unwrap();
    std::fs::create_dir(&edit).unwrap();

    let report = save_schema(&config, &slug, &fixture("team.json")).unwrap();
    assert_eq!(report.outcome, Outcome::PartiallyGenerated);
    assert_eq!(report.state, ComponentState::SchemaWritten);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].artifact, ArtifactKind::EditSource);
    assert!(report.wrote(ArtifactKind::RenderTemplate));
    assert!(report.wrote(ArtifactKind::Style));
    assert!(read(&config, &slug, "render.php").contains("$attributes['title']"));
}

#[test]
fn test_regenerate_skips_fresh_outputs() {
    let (_root, config, slug) = with_component("Team");
    save_schema(&config, &slug, &fixture("team.json")).unwrap();
    age(&artifact(&config, &slug, "config.json"), 60);

    let report = regenerate(&config, &slug, false).unwrap();
    assert_eq!(report.outcome, Outcome::Skipped);
    assert!(report.written.is_empty());

    let forced = regenerate(&config, &slug, true).unwrap();
    assert_eq!(forced.outcome, Outcome::FullyGenerated);
    assert!(!forced.wrote(ArtifactKind::Schema));
    assert!(forced.wrote(ArtifactKind::EditSource));
}

#[test]
fn test_regenerate_picks_up_hand_edited_schema() {
    let (_root, config, slug) = with_component("Team");
    for kind in ArtifactKind::GENERATED {
        age(&artifact(&config, &slug, kind.file_name()), 60);
    }
    std::fs::write(artifact(&config, &slug, "config.json"), fixture("team.json")).unwrap();

    let report = regenerate(&config, &slug, false).unwrap();
    assert_eq!(report.outcome, Outcome::FullyGenerated);
    assert!(read(&config, &slug, "edit.js").contains("members-settings"));
}

#[test]
fn test_regenerate_all_reports_each_component() {
    let (_root, config) = temp_project();
    for name in ["Alpha", "Beta"] {
        block_factory::component::create_component(&config, name, None).unwrap();
    }
    std::fs::write(artifact(&config, "beta", "config.json"), "not json").unwrap();

    let results = regenerate_all(&config, true).unwrap();
    let slugs: Vec<&str> = results.iter().map(|(s, _)| s.as_str()).collect();
    assert_eq!(slugs, vec!["alpha", "beta"]);
    assert!(results[0].1.is_ok());
    assert!(matches!(results[1].1, Err(GenerateError::InvalidSchema(_))));
}

#[test]
fn test_unknown_component() {
    let (_root, config) = temp_project();
    assert!(matches!(
        save_schema(&config, "ghost", "{}"),
        Err(GenerateError::NotFound(s)) if s == "ghost"
    ));
    assert!(matches!(
        regenerate(&config, "../ghost", true),
        Err(GenerateError::InvalidSlug(_))
    ));
}

#[test]
fn test_delete_and_repeat_delete() {
    let (_root, config, slug) = with_component("Team");
    let build = config.build_output_dir(&slug);
    std::fs::create_dir_all(&build).unwrap();
    std::fs::write(build.join("index.js"), "compiled").unwrap();

    let report = delete_component(&config, &slug).unwrap();
    assert_eq!(report.source.1, Removal::Removed);
    assert_eq!(report.build.1, Removal::Removed);
    assert!(!config.component_dir(&slug).exists());
    assert!(!build.exists());

    let again = delete_component(&config, &slug).unwrap();
    assert_eq!(again.source.1, Removal::AlreadyAbsent);
    assert_eq!(again.build.1, Removal::AlreadyAbsent);
}
