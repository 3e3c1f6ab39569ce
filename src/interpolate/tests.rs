#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::registry::FieldRegistry;
use crate::schema::{Field, FieldType};

fn fields() -> Vec<Field> {
    vec![
        Field::new("title", "Title", FieldType::Text),
        Field::new("link", "Link", FieldType::Url),
        Field::new("hero", "Hero", FieldType::Image),
        Field::new("body", "Body", FieldType::ContentEditor),
        Field::new("cta", "CTA", FieldType::Button),
        Field::new("photos", "Photos", FieldType::Gallery),
        Field::new("items", "Items", FieldType::Repeater).with_sub_fields(vec![
            Field::new("name", "Name", FieldType::Text),
            Field::new("avatar", "Avatar", FieldType::Image),
            Field::new("shots", "Shots", FieldType::Gallery),
        ]),
    ]
}

fn both(template: &str) -> (String, String) {
    let nodes = parse(template, &fields(), &FieldRegistry::builtin());
    (server::render(&nodes), preview::render(&nodes))
}

#[test]
fn test_simple_token_in_both_targets() {
    let (php, jsx) = both("<h2>{{title}}</h2>");
    assert_eq!(
        php,
        "<h2><?php echo wp_kses_post( $attributes['title'] ?? '' ); ?></h2>"
    );
    assert_eq!(jsx, "<h2>{ attributes.title ?? '' }</h2>");
}

#[test]
fn test_url_and_media_escaping() {
    let (php, jsx) = both(r#"<a href="{{link}}"><img src="{{hero}}" alt="{{hero_alt}}"></a>"#);
    assert!(php.contains("href=\"<?php echo esc_url( $attributes['link'] ?? '' ); ?>\""));
    assert!(php.contains("src=\"<?php echo esc_url( $attributes['hero']['url'] ?? '' ); ?>\""));
    assert!(php.contains("alt=\"<?php echo esc_attr( $attributes['hero']['alt'] ?? '' ); ?>\""));
    assert_eq!(
        jsx,
        "<a href={ attributes.link ?? '' }><img src={ attributes.hero?.url ?? '' } alt={ attributes.hero?.alt ?? '' } /></a>"
    );
}

#[test]
fn test_exact_key_wins_over_alt_suffix() {
    let mut fields = fields();
    fields.push(Field::new("hero_alt", "Hero alt", FieldType::Text));
    let nodes = parse("{{hero_alt}}", &fields, &FieldRegistry::builtin());
    assert_eq!(
        nodes,
        vec![Node::Value {
            binding: Binding::new(Var::Attributes, "hero_alt"),
            kind: ValueKind::Html,
        }]
    );
}

#[test]
fn test_repeater_loop_expands_sub_fields() {
    let (php, jsx) = both("<ul>{{#items}}<li>{{name}}</li>{{/items}}</ul>");
    assert_eq!(
        php,
        "<ul><?php if ( ! empty( $attributes['items'] ) && is_array( $attributes['items'] ) ) : foreach ( $attributes['items'] as $item ) : ?><li><?php echo wp_kses_post( $item['name'] ?? '' ); ?></li><?php endforeach; endif; ?></ul>"
    );
    assert!(jsx.contains(
        "( Array.isArray( attributes.items ) ? attributes.items : [] ).map( ( item, index ) => ("
    ));
    assert!(jsx.contains("<li>{ item.name ?? '' }</li>"));
}

#[test]
fn test_loop_body_falls_back_to_top_level_fields() {
    let (php, _) = both("{{#items}}{{title}}{{/items}}");
    assert!(php.contains("wp_kses_post( $attributes['title'] ?? '' )"));
}

#[test]
fn test_gallery_loop_binds_image() {
    let (php, jsx) = both(r#"{{#photos}}<img src="{{url}}" alt="{{alt}}" data-id="{{id}}">{{/photos}}"#);
    assert!(php.contains("foreach ( $attributes['photos'] as $image )"));
    assert!(php.contains("esc_url( $image['url'] ?? '' )"));
    assert!(php.contains("esc_attr( $image['alt'] ?? '' )"));
    assert!(php.contains("esc_attr( $image['id'] ?? '' )"));
    assert!(jsx.contains(".map( ( image, imageIndex ) => ("));
    assert!(jsx.contains("src={ image.url ?? '' }"));
}

#[test]
fn test_nested_gallery_inside_repeater() {
    let (php, _) = both("{{#items}}{{#shots}}{{url}}{{/shots}}{{/items}}");
    assert!(php.contains("foreach ( $attributes['items'] as $item )"));
    assert!(php.contains("foreach ( $item['shots'] as $image )"));
    assert_eq!(php.matches("endforeach").count(), 2);
}

#[test]
fn test_item_alt_token() {
    let (php, _) = both("{{#items}}{{avatar_alt}}{{/items}}");
    assert!(php.contains("esc_attr( $item['avatar']['alt'] ?? '' )"));
}

#[test]
fn test_unresolved_loop_is_kept_verbatim() {
    let template = "<div>{{#title}}<b>{{title}}</b>{{/title}}</div>";
    let nodes = parse(template, &fields(), &FieldRegistry::builtin());
    assert_eq!(nodes, vec![Node::Text(template.to_string())]);
    assert_eq!(server::render(&nodes), template);
}

#[test]
fn test_unknown_loop_key_is_kept_verbatim() {
    let template = "{{#missing}}{{title}}{{/missing}}";
    let (php, _) = both(template);
    assert_eq!(php, template);
}

#[test]
fn test_unresolved_tokens_stay_literal() {
    let (php, jsx) = both("<p>{{nope}} {{photos}}</p>");
    assert_eq!(php, "<p>{{nope}} {{photos}}</p>");
    assert!(jsx.contains("{ '{' }{ '{' }nope{ '}' }{ '}' }"));
}

#[test]
fn test_unterminated_loop_is_literal_and_tokens_still_resolve() {
    let (php, _) = both("{{#items}}<p>{{title}}</p>");
    assert!(php.starts_with("{{#items}}<p><?php echo wp_kses_post( $attributes['title'] ?? '' ); ?>"));
}

#[test]
fn test_rich_and_link_preview_forms() {
    let (php, jsx) = both("<div>{{body}}</div>{{cta}}");
    assert!(php.contains("wp_kses_post( $attributes['body'] ?? '' )"));
    assert!(php.contains("<a href=\"<?php echo esc_url( $attributes['cta']['url'] ?? '' ); ?>\">"));
    assert!(jsx.contains("<span dangerouslySetInnerHTML={ { __html: attributes.body ?? '' } } />"));
    assert!(jsx.contains("<a href={ attributes.cta?.url ?? '' }>{ attributes.cta?.text ?? '' }</a>"));
}

#[test]
fn test_unknown_sub_field_type_json_encodes() {
    let mut fields = fields();
    fields.push(
        Field::new("rows", "Rows", FieldType::Repeater).with_sub_fields(vec![Field {
            key: "clip".into(),
            label: "Clip".into(),
            type_tag: "video".into(),
            default: None,
            sub_fields: vec![],
        }]),
    );
    let nodes = parse("{{#rows}}{{clip}}{{/rows}}", &fields, &FieldRegistry::builtin());
    let php = server::render(&nodes);
    assert!(php.contains("is_array( $item['clip'] ?? '' ) ? wp_json_encode( $item['clip'] )"));
}

#[test]
fn test_parse_is_deterministic() {
    let template = "<h2>{{title}}</h2>{{#items}}<p>{{name}}</p>{{/items}}";
    let a = parse(template, &fields(), &FieldRegistry::builtin());
    let b = parse(template, &fields(), &FieldRegistry::builtin());
    assert_eq!(a, b);
    assert_eq!(preview::render(&a), preview::render(&b));
}

#[test]
fn test_loop_only_sub_field_hides_top_level_field() {
    let mut fields = fields();
    fields.push(Field::new("shots", "Shots", FieldType::Text));
    let nodes = parse("{{#items}}<p>{{shots}}</p>{{/items}}", &fields, &FieldRegistry::builtin());
    let php = server::render(&nodes);
    let jsx = preview::render(&nodes);
    assert!(php.contains("<p>{{shots}}</p>"), "{php}");
    assert!(!php.contains("$attributes['shots']"));
    assert!(!jsx.contains("attributes.shots"));

    let nodes = parse("<p>{{shots}}</p>", &fields, &FieldRegistry::builtin());
    assert!(server::render(&nodes).contains("$attributes['shots']"));
}

/// Split `text` into the parts before, inside and after one delimited body.
fn split_body<'t>(text: &'t str, open: &str, close: &str) -> (&'t str, &'t str, &'t str) {
    let at = text.find(open).expect("loop opener");
    let start = at + open.len();
    let end = start + text[start..].find(close).expect("loop closer");
    (&text[..at], &text[start..end], &text[end + close.len()..])
}

#[test]
fn test_item_binding_sits_inside_the_loop_body() {
    let (php, jsx) = both("<h2>{{title}}</h2>{{#items}}<p>{{name}}</p>{{/items}}<footer>{{title}}</footer>");

    let (before, body, after) = split_body(
        &php,
        "foreach ( $attributes['items'] as $item ) : ?>",
        "<?php endforeach; endif; ?>",
    );
    assert_eq!(body, "<p><?php echo wp_kses_post( $item['name'] ?? '' ); ?></p>");
    assert!(!before.contains("$item"));
    assert!(!after.contains("$item"));
    assert!(after.contains("$attributes['title']"));

    let (before, body, after) = split_body(
        &jsx,
        ".map( ( item, index ) => (",
        ") ) }",
    );
    assert!(body.contains("<p>{ item.name ?? '' }</p>"), "{body}");
    assert!(!before.contains("item.name"));
    assert!(!after.contains("item."));
    assert!(after.contains("attributes.title"));
}
