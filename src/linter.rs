//! # Schema Linter Module
//!
//! Checks a field schema before anything is generated from it. Error-level
//! issues block a save: generating from a schema with duplicate or malformed
//! keys would silently drop fields or emit invalid code.
//!
//! ## Checks Performed
//!
//! 1. **Key format** - Keys must be non-empty lowercase alphanumerics and underscores
//! 2. **Duplicate keys** - Top-level keys and sub-field keys within a repeater must be unique
//! 3. **Companion collisions** - A key must not shadow a content editor's `is_html_mode_<key>`
//! 4. **Field types** - Unknown type tags and nested or empty repeaters
//! 5. **Template tokens** - Loops over non-loop fields, unterminated loops, unresolved tokens
//! 6. **Loop markup** - A loop body must open and close its own HTML tags
//!
//! ## Usage
//!
//! ```rust,ignore
//! use block_factory::linter::{lint_file, print_lint_issues};
//!
//! let issues = lint_file(Path::new("blocks/hero/config.json"), &registry)?;
//! print_lint_issues(&issues);
//! ```

use crate::error::{GenerateError, Result};
use crate::interpolate::jsx_markup::is_void;
use crate::interpolate::scanner::{self, Segment, TOKEN};
use crate::interpolate::{self, Node};
use crate::registry::{html_mode_key, FieldRegistry};
use crate::schema::{load_schema, Field, FieldSchema, FieldType};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;

/// An HTML open or close tag, capturing the slash, the name and a self-closing slash.
static HTML_TAG: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r#"<(/?)([A-Za-z][A-Za-z0-9:-]*)(?:[^>"']|"[^"]*"|'[^']*')*?(/?)>"#)
        .expect("tag pattern is valid")
});
use std::path::Path;


/// Severity level for lint issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Error - Blocks saving and generation
    Error,
    /// Warning - The field or token is skipped, the rest is generated
    Warning,
    /// Info - Best practice suggestion
    Info,
}

impl fmt::Display for LintSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LintSeverity::Error => "error",
            LintSeverity::Warning => "warning",
            LintSeverity::Info => "info",
        })
    }
}

/// A lint issue found in a field schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintIssue {
    /// Where the issue occurred (e.g., "field:title", "field:items.name", "template")
    pub location: String,
    /// Severity of the issue
    pub severity: LintSeverity,
    /// Type of lint issue (e.g., "duplicate_key", "unknown_type")
    pub kind: String,
    /// Human-readable description of the problem
    pub message: String,
    /// Optional suggestion for how to fix it
    pub suggestion: Option<String>,
}

impl LintIssue {
    /// Create a new lint issue
    pub fn new(
        location: impl Into<String>,
        severity: LintSeverity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LintIssue {
            location: location.into(),
            severity,
            kind: kind.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Add a suggestion for fixing the issue
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.location, self.message)
    }
}

/// Lint a `config.json` file
pub fn lint_file(path: &Path, registry: &FieldRegistry) -> Result<Vec<LintIssue>> {
    let schema = load_schema(path)?;
    Ok(lint_schema(&schema, registry))
}

/// Lint a parsed schema
pub fn lint_schema(schema: &FieldSchema, registry: &FieldRegistry) -> Vec<LintIssue> {
    let mut issues = Vec::new();

    lint_keys(&mut issues, &schema.fields, None);
    lint_companions(&mut issues, &schema.fields);
    for field in &schema.fields {
        lint_field(&mut issues, field, registry);
    }
    lint_template(&mut issues, schema, registry);

    issues
}

fn location(parent: Option<&str>, key: &str) -> String {
    match parent {
        Some(parent) => format!("field:{parent}.{key}"),
        None => format!("field:{key}"),
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Lowercase the key and replace every other character with `_`
pub fn suggest_key(key: &str) -> String {
    let mut result = String::with_capacity(key.len());
    for ch in key.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
        } else if !result.ends_with('_') {
            result.push('_');
        }
    }
    result.trim_matches('_').to_string()
}

fn lint_keys(issues: &mut Vec<LintIssue>, fields: &[Field], parent: Option<&str>) {
    let mut seen = HashSet::new();
    for (i, field) in fields.iter().enumerate() {
        if field.key.is_empty() {
            let loc = match parent {
                Some(parent) => format!("field:{parent}[{i}]"),
                None => format!("field:[{i}]"),
            };
            issues.push(LintIssue::new(
                loc,
                LintSeverity::Error,
                "missing_key",
                "Field has no key",
            ));
            continue;
        }
        if !is_valid_key(&field.key) {
            let suggestion = suggest_key(&field.key);
            let mut issue = LintIssue::new(
                location(parent, &field.key),
                LintSeverity::Error,
                "key_format",
                format!(
                    "Key '{}' must contain only lowercase letters, digits and underscores",
                    field.key
                ),
            );
            if !suggestion.is_empty() {
                issue = issue.with_suggestion(format!("Rename to '{suggestion}'"));
            }
            issues.push(issue);
        }
        if !seen.insert(field.key.as_str()) {
            issues.push(
                LintIssue::new(
                    location(parent, &field.key),
                    LintSeverity::Error,
                    "duplicate_key",
                    format!("Key '{}' is declared more than once", field.key),
                )
                .with_suggestion("Give each field a unique key"),
            );
        }
    }
}

fn lint_companions(issues: &mut Vec<LintIssue>, fields: &[Field]) {
    let keys: HashSet<&str> = fields.iter().map(|f| f.key.as_str()).collect();
    for field in fields {
        if field.field_type() != Some(FieldType::ContentEditor) {
            continue;
        }
        let companion = html_mode_key(&field.key);
        if keys.contains(companion.as_str()) {
            issues.push(LintIssue::new(
                location(None, &companion),
                LintSeverity::Error,
                "companion_collision",
                format!(
                    "Key '{companion}' is reserved for the HTML mode toggle of '{}'",
                    field.key
                ),
            ));
        }
    }
}

fn lint_field(issues: &mut Vec<LintIssue>, field: &Field, registry: &FieldRegistry) {
    let loc = location(None, &field.key);

    if registry.lookup(&field.type_tag).is_none() {
        issues.push(unknown_type(loc, field));
        return;
    }

    if field.label.trim().is_empty() {
        issues.push(
            LintIssue::new(
                loc.clone(),
                LintSeverity::Info,
                "missing_label",
                "Field has no label; the key is shown in the editor instead",
            )
            .with_suggestion("Add a \"label\""),
        );
    }

    if field.field_type() != Some(FieldType::Repeater) {
        if !field.sub_fields.is_empty() {
            issues.push(LintIssue::new(
                loc,
                LintSeverity::Info,
                "sub_fields_ignored",
                format!("subFields are only used by repeaters, not '{}'", field.type_tag),
            ));
        }
        return;
    }

    if field.sub_fields.is_empty() {
        issues.push(
            LintIssue::new(
                loc,
                LintSeverity::Warning,
                "empty_repeater",
                "Repeater has no sub-fields; items cannot be edited",
            )
            .with_suggestion("Add at least one entry to \"subFields\""),
        );
        return;
    }

    lint_keys(issues, &field.sub_fields, Some(&field.key));
    for sub in &field.sub_fields {
        let sub_loc = location(Some(&field.key), &sub.key);
        match registry.lookup(&sub.type_tag).map(|e| e.field_type) {
            None => issues.push(unknown_type(sub_loc, sub)),
            Some(FieldType::Repeater) => issues.push(
                LintIssue::new(
                    sub_loc,
                    LintSeverity::Warning,
                    "nested_repeater",
                    "Repeaters cannot contain repeaters; this sub-field is skipped",
                )
                .with_suggestion("Move it to a top-level repeater"),
            ),
            Some(_) => {}
        }
    }
}

fn unknown_type(loc: String, field: &Field) -> LintIssue {
    let known: Vec<&str> = FieldType::ALL.iter().map(FieldType::as_str).collect();
    LintIssue::new(
        loc,
        LintSeverity::Warning,
        "unknown_type",
        format!("Unknown field type '{}'; the field is skipped", field.type_tag),
    )
    .with_suggestion(format!("Use one of: {}", known.join(", ")))
}

fn lint_template(issues: &mut Vec<LintIssue>, schema: &FieldSchema, registry: &FieldRegistry) {
    let template = schema.template();
    if template.is_empty() {
        return;
    }
    lint_loops(issues, template, &schema.fields, None);

    let mut unresolved = Vec::new();
    collect_unresolved(&interpolate::parse(template, &schema.fields, registry), &mut unresolved);
    let mut reported = HashSet::new();
    for token in unresolved {
        if reported.insert(token.clone()) {
            issues.push(LintIssue::new(
                "template",
                LintSeverity::Info,
                "unresolved_token",
                format!("'{{{{{token}}}}}' does not match a field and is output as written"),
            ));
        }
    }
}

/// Check loop blocks at one nesting level.
fn lint_loops(issues: &mut Vec<LintIssue>, text: &str, fields: &[Field], item: Option<&Field>) {
    for segment in scanner::segments(text) {
        match segment {
            Segment::Text(text) => {
                if let Some(key) = unterminated_loop(text) {
                    issues.push(
                        LintIssue::new(
                            "template",
                            LintSeverity::Warning,
                            "unterminated_loop",
                            format!("'{{{{#{key}}}}}' has no matching '{{{{/{key}}}}}'"),
                        )
                        .with_suggestion(format!("Close the loop with {{{{/{key}}}}}")),
                    );
                }
            }
            Segment::Loop { key, body, .. } => {
                let scope = item.map(|r| r.sub_fields.as_slice()).unwrap_or(fields);
                let target = scope.iter().rev().find(|f| f.key == key);
                let loopable = match (item, target.and_then(Field::field_type)) {
                    (None, Some(t)) => t.is_loopable(),
                    (Some(_), Some(FieldType::Gallery)) => true,
                    _ => false,
                };
                if !loopable {
                    issues.push(LintIssue::new(
                        "template",
                        LintSeverity::Warning,
                        "loop_key_not_loopable",
                        format!(
                            "'{{{{#{key}}}}}' does not refer to a repeater or gallery here; the block is output as written"
                        ),
                    ));
                    continue;
                }
                if let Some(tag) = unbalanced_tag(body) {
                    issues.push(
                        LintIssue::new(
                            "template",
                            LintSeverity::Warning,
                            "loop_unbalanced_markup",
                            format!(
                                "<{tag}> is not opened and closed inside '{{{{#{key}}}}}'; the editor preview will not compile"
                            ),
                        )
                        .with_suggestion(format!(
                            "Move {{{{#{key}}}}} and {{{{/{key}}}}} so the loop wraps whole elements"
                        )),
                    );
                }
                if let (None, Some(field)) = (item, target) {
                    if field.field_type() == Some(FieldType::Repeater) {
                        lint_loops(issues, body, fields, Some(field));
                    }
                }
            }
        }
    }
}

/// First tag in `markup` that is closed without being opened, or left open.
fn unbalanced_tag(markup: &str) -> Option<String> {
    let mut without_comments = String::with_capacity(markup.len());
    let mut rest = markup;
    while let Some(start) = rest.find("<!--") {
        without_comments.push_str(&rest[..start]);
        rest = match rest[start..].find("-->") {
            Some(end) => &rest[start + end + 3..],
            None => "",
        };
    }
    without_comments.push_str(rest);

    let mut open: Vec<String> = Vec::new();
    for caps in HTML_TAG.captures_iter(&without_comments) {
        let name = caps[2].to_ascii_lowercase();
        if is_void(&name) || !caps[3].is_empty() {
            continue;
        }
        if caps[1].is_empty() {
            open.push(name);
        } else if open.last() == Some(&name) {
            open.pop();
        } else {
            return Some(name);
        }
    }
    open.pop()
}

fn unterminated_loop(text: &str) -> Option<&str> {
    let start = text.find("{{#")? + 3;
    let rest = &text[start..];
    let end = rest.find("}}")?;
    let key = &rest[..end];
    (!key.is_empty() && key.chars().all(|c| c.is_alphanumeric() || c == '_')).then_some(key)
}

fn collect_unresolved(nodes: &[Node], out: &mut Vec<String>) {
    for node in nodes {
        match node {
            Node::Text(text) => {
                out.extend(TOKEN.captures_iter(text).map(|c| c[1].to_string()));
            }
            Node::Loop { body, .. } => collect_unresolved(body, out),
            Node::Value { .. } => {}
        }
    }
}

/// Whether any issue blocks generation
pub fn has_errors(issues: &[LintIssue]) -> bool {
    issues.iter().any(|i| i.severity == LintSeverity::Error)
}

/// Turn error-level issues into [`GenerateError::Rejected`]
pub fn reject_errors(issues: &[LintIssue]) -> Result<()> {
    if !has_errors(issues) {
        return Ok(());
    }
    Err(GenerateError::Rejected {
        issues: issues
            .iter()
            .filter(|i| i.severity == LintSeverity::Error)
            .map(ToString::to_string)
            .collect(),
    })
}

/// Print lint issues in a formatted way
pub fn print_lint_issues(issues: &[LintIssue]) {
    if issues.is_empty() {
        println!("✅ No lint issues found!");
        return;
    }

    let count = |severity| issues.iter().filter(|i| i.severity == severity).count();
    println!("\n📋 Lint Results:");
    println!(
        "   {} error(s), {} warning(s), {} info(s)\n",
        count(LintSeverity::Error),
        count(LintSeverity::Warning),
        count(LintSeverity::Info)
    );

    for (severity, heading) in [
        (LintSeverity::Error, "❌ Errors (must fix):"),
        (LintSeverity::Warning, "⚠️  Warnings (should fix):"),
        (LintSeverity::Info, "ℹ️  Info (best practices):"),
    ] {
        let group: Vec<_> = issues.iter().filter(|i| i.severity == severity).collect();
        if group.is_empty() {
            continue;
        }
        println!("{heading}");
        for issue in group {
            println!("   [{}] {}", issue.kind, issue.location);
            println!("      {}", issue.message);
            if let Some(suggestion) = &issue.suggestion {
                println!("      💡 Suggestion: {}", suggestion);
            }
        }
        println!();
    }
}
