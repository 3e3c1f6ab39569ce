//! Field reference (`fields.md`) listing the tokens each field exposes.

use super::templates::{CheatSheetLoop, CheatSheetRow, FieldsMdTemplate};
use crate::error::GenerateError;
use crate::schema::{Field, FieldType};
use askama::Template;

fn code(token: &str) -> String {
    format!("`{token}`")
}

fn tokens(field: &Field) -> String {
    let key = &field.key;
    match field.field_type() {
        Some(FieldType::Repeater) | Some(FieldType::Gallery) => {
            code(&format!("{{{{#{key}}}}}...{{{{/{key}}}}}"))
        }
        Some(t) if t.has_alt() => format!(
            "{} (URL), {}",
            code(&format!("{{{{{key}}}}}")),
            code(&format!("{{{{{key}_alt}}}}"))
        ),
        Some(FieldType::Button) => format!("{} (link)", code(&format!("{{{{{key}}}}}"))),
        Some(_) => code(&format!("{{{{{key}}}}}")),
        None => format!("unsupported type `{}`", field.type_tag),
    }
}

/// Tokens of one repeater item, one per line.
fn item_lines(repeater: &Field) -> Vec<String> {
    repeater
        .sub_fields
        .iter()
        .filter_map(|sub| {
            let key = &sub.key;
            match sub.field_type()? {
                FieldType::Repeater => None,
                FieldType::Gallery => Some(format!(
                    "{{{{#{key}}}}}<img src=\"{{{{url}}}}\" alt=\"{{{{alt}}}}\">{{{{/{key}}}}}"
                )),
                t if t.has_alt() => Some(format!("{{{{{key}}}}} {{{{{key}_alt}}}}")),
                _ => Some(format!("{{{{{key}}}}}")),
            }
        })
        .collect()
}

fn loop_example(field: &Field) -> Option<CheatSheetLoop> {
    let key = &field.key;
    let example = match field.field_type()? {
        FieldType::Gallery => format!(
            "{{{{#{key}}}}}\n  <img src=\"{{{{url}}}}\" alt=\"{{{{alt}}}}\" data-id=\"{{{{id}}}}\">\n{{{{/{key}}}}}"
        ),
        FieldType::Repeater => {
            let mut lines = vec![format!("{{{{#{key}}}}}")];
            lines.extend(item_lines(field).into_iter().map(|l| format!("  {l}")));
            lines.push(format!("{{{{/{key}}}}}"));
            lines.join("\n")
        }
        _ => return None,
    };
    Some(CheatSheetLoop {
        label: format!("{} loop", field.display_label()),
        example,
    })
}

/// Render the field reference for a component.
pub fn render(slug: &str, fields: &[Field]) -> Result<String, GenerateError> {
    let rows = fields
        .iter()
        .map(|f| CheatSheetRow {
            label: f.display_label().replace('|', "\\|"),
            key: f.key.clone(),
            type_tag: f.type_tag.clone(),
            tokens: tokens(f),
        })
        .collect();
    let loops = fields.iter().filter_map(loop_example).collect();
    Ok(FieldsMdTemplate {
        slug: slug.to_string(),
        rows,
        loops,
    }
    .render()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_per_type() {
        assert_eq!(tokens(&Field::new("title", "T", FieldType::Text)), "`{{title}}`");
        assert_eq!(
            tokens(&Field::new("hero", "H", FieldType::Image)),
            "`{{hero}}` (URL), `{{hero_alt}}`"
        );
        assert_eq!(
            tokens(&Field::new("items", "I", FieldType::Repeater)),
            "`{{#items}}...{{/items}}`"
        );
    }

    #[test]
    fn test_render_lists_fields_and_loops() {
        let fields = vec![
            Field::new("title", "Title", FieldType::Text),
            Field::new("items", "Items", FieldType::Repeater).with_sub_fields(vec![
                Field::new("name", "Name", FieldType::Text),
                Field::new("avatar", "Avatar", FieldType::Image),
            ]),
        ];
        let md = render("team", &fields).unwrap();
        assert!(md.starts_with("# team field reference"));
        assert!(md.contains("| Title | `title` | text | `{{title}}` |"));
        assert!(md.contains("## Items loop"));
        assert!(md.contains("{{#items}}\n  {{name}}\n  {{avatar}} {{avatar_alt}}\n{{/items}}"));
    }
}
