//! Sidebar controls for each field type.
//!
//! Every function here returns the inner controls of one field. Reads and
//! writes go through a [`FieldScope`], which is how the same control works
//! both as a block attribute and as a property of a repeater item.

use super::jsx::{arrow, arrow_expr, js_string, Element, JsxNode};
use crate::registry::html_mode_key;

/// Where a control reads its value from and writes it back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldScope {
    /// `attributes[key]`, written with `setAttributes`
    Block,
    /// `attributes[repeater][index][key]`, written copy-on-write
    Item { repeater: String },
}

impl FieldScope {
    pub fn item(repeater: impl Into<String>) -> Self {
        FieldScope::Item {
            repeater: repeater.into(),
        }
    }

    /// Expression reading `key` in this scope.
    pub fn value(&self, key: &str) -> String {
        match self {
            FieldScope::Block => member("attributes", key),
            FieldScope::Item { .. } => member("item", key),
        }
    }

    /// Statements storing `value` under `key` in this scope.
    ///
    /// Item writes never touch the existing array: a copy is made, the
    /// target index is replaced with a new object, and the copy is stored.
    pub fn set(&self, key: &str, value: &str) -> Vec<String> {
        match self {
            FieldScope::Block => vec![format!(
                "setAttributes( {{ {}: {value} }} );",
                object_key(key)
            )],
            FieldScope::Item { repeater } => vec![
                format!("const next = [ ...{} ];", member("attributes", repeater)),
                format!(
                    "next[ index ] = {{ ...next[ index ], {}: {value} }};",
                    object_key(key)
                ),
                format!("setAttributes( {{ {}: next }} );", object_key(repeater)),
            ],
        }
    }

    /// `( param ) => { ...store value... }`
    pub fn handler(&self, param: &str, key: &str, value: &str) -> String {
        arrow(param, &self.set(key, value))
    }

    /// React key prefix so sibling controls stay distinct.
    fn react_key(&self, key: &str) -> String {
        match self {
            FieldScope::Block => key.to_string(),
            FieldScope::Item { repeater } => format!("{repeater}-{key}"),
        }
    }
}

/// `obj.key`, or `obj[ 'key' ]` when the key is not a plain identifier.
pub fn member(object: &str, key: &str) -> String {
    if is_identifier(key) {
        format!("{object}.{key}")
    } else {
        format!("{object}[ {} ]", js_string(key))
    }
}

/// Object literal key, quoted when it is not a plain identifier.
pub fn object_key(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        js_string(key)
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Inputs to a field's render function.
#[derive(Debug, Clone)]
pub struct ControlContext<'a> {
    pub key: &'a str,
    pub label: &'a str,
    pub scope: &'a FieldScope,
    /// Controls for one repeater item; empty for every other type
    pub item_controls: &'a [JsxNode],
}

impl ControlContext<'_> {
    fn value(&self) -> String {
        self.scope.value(self.key)
    }

    fn handler(&self, param: &str, value: &str) -> String {
        self.scope.handler(param, self.key, value)
    }

    fn text_like(&self, input_type: Option<&str>, label: &str, value: &str) -> JsxNode {
        let mut el = Element::new("TextControl").str("label", label);
        if let Some(t) = input_type {
            el = el.str("type", t);
        }
        el.expr("value", format!("{} ?? ''", self.value()))
            .expr("onChange", self.handler("value", value))
            .into()
    }
}

fn caption(label: &str) -> JsxNode {
    Element::new("p")
        .expr("style", "{ fontWeight: 'bold' }")
        .child(JsxNode::text(label))
        .into()
}

pub fn text(ctx: &ControlContext<'_>) -> Vec<JsxNode> {
    vec![ctx.text_like(None, ctx.label, "value")]
}

pub fn email(ctx: &ControlContext<'_>) -> Vec<JsxNode> {
    vec![ctx.text_like(Some("email"), ctx.label, "value")]
}

pub fn url(ctx: &ControlContext<'_>) -> Vec<JsxNode> {
    vec![ctx.text_like(Some("url"), ctx.label, "value")]
}

pub fn time(ctx: &ControlContext<'_>) -> Vec<JsxNode> {
    vec![ctx.text_like(Some("time"), ctx.label, "value")]
}

pub fn number(ctx: &ControlContext<'_>) -> Vec<JsxNode> {
    vec![ctx.text_like(
        Some("number"),
        ctx.label,
        "value === '' ? undefined : parseFloat( value )",
    )]
}

pub fn relational(ctx: &ControlContext<'_>) -> Vec<JsxNode> {
    let label = format!("{} (Post ID)", ctx.label);
    vec![ctx.text_like(
        Some("number"),
        &label,
        "value === '' ? undefined : parseInt( value, 10 )",
    )]
}

pub fn icon(ctx: &ControlContext<'_>) -> Vec<JsxNode> {
    vec![Element::new("TextControl")
        .str("label", format!("{} (Icon Class/Name)", ctx.label))
        .str("help", "Example: dashicons dashicons-star-filled")
        .expr("value", format!("{} ?? ''", ctx.value()))
        .expr("onChange", ctx.handler("value", "value"))
        .into()]
}

pub fn textarea(ctx: &ControlContext<'_>) -> Vec<JsxNode> {
    vec![Element::new("TextareaControl")
        .str("label", ctx.label)
        .expr("value", format!("{} ?? ''", ctx.value()))
        .expr("onChange", ctx.handler("value", "value"))
        .into()]
}

pub fn range(ctx: &ControlContext<'_>) -> Vec<JsxNode> {
    vec![Element::new("RangeControl")
        .str("label", ctx.label)
        .expr("value", ctx.value())
        .expr("onChange", ctx.handler("value", "value"))
        .expr("min", "0")
        .expr("max", "100")
        .expr("step", "1")
        .into()]
}

pub fn date(ctx: &ControlContext<'_>) -> Vec<JsxNode> {
    vec![
        caption(ctx.label),
        Element::new("DatePicker")
            .expr("currentDate", ctx.value())
            .expr("onChange", ctx.handler("value", "value"))
            .into(),
    ]
}

pub fn datetime(ctx: &ControlContext<'_>) -> Vec<JsxNode> {
    let value = ctx.value();
    let on_date = arrow(
        "date",
        &[
            format!("const current = {value} ? new Date( {value} ) : new Date();"),
            "const merged = new Date( date );".to_string(),
            "merged.setHours( current.getHours(), current.getMinutes(), current.getSeconds() );"
                .to_string(),
        ]
        .into_iter()
        .chain(ctx.scope.set(ctx.key, "merged.toISOString()"))
        .collect::<Vec<_>>(),
    );
    let on_time = arrow(
        "time",
        &[
            format!("const base = {value} ? new Date( {value} ) : new Date();"),
            "const [ hours, minutes ] = time.split( ':' );".to_string(),
            "base.setHours( Number( hours ), Number( minutes ) );".to_string(),
        ]
        .into_iter()
        .chain(ctx.scope.set(ctx.key, "base.toISOString()"))
        .collect::<Vec<_>>(),
    );
    vec![
        caption(ctx.label),
        Element::new("DatePicker")
            .expr("currentDate", value.clone())
            .expr("onChange", on_date)
            .into(),
        Element::new("TextControl")
            .str("label", "Time (HH:MM)")
            .str("type", "time")
            .expr(
                "value",
                format!("{value} ? new Date( {value} ).toTimeString().slice( 0, 5 ) : ''"),
            )
            .expr("onChange", on_time)
            .into(),
    ]
}

pub fn color(ctx: &ControlContext<'_>) -> Vec<JsxNode> {
    vec![
        caption(ctx.label),
        Element::new("ColorPalette")
            .expr("value", ctx.value())
            .expr("onChange", ctx.handler("value", "value"))
            .into(),
    ]
}

pub fn button(ctx: &ControlContext<'_>) -> Vec<JsxNode> {
    let value = ctx.value();
    let part = |prop: &str, label: String| -> JsxNode {
        Element::new("TextControl")
            .str("label", label)
            .expr("value", format!("( {value} || {{}} ).{prop} ?? ''"))
            .expr(
                "onChange",
                ctx.handler(prop, &format!("{{ ...( {value} || {{}} ), {prop} }}")),
            )
            .into()
    };
    vec![
        part("text", format!("{} Text", ctx.label)),
        part("url", format!("{} URL", ctx.label)),
    ]
}

pub fn content_editor(ctx: &ControlContext<'_>) -> Vec<JsxNode> {
    let html_key = html_mode_key(ctx.key);
    let html_mode = ctx.scope.value(&html_key);
    let toggle = Element::new("ToggleControl")
        .str("label", "Enable HTML/Text View")
        .expr("checked", format!("!! {html_mode}"))
        .expr(
            "onChange",
            ctx.scope.handler("isChecked", &html_key, "isChecked"),
        )
        .expr(
            "help",
            format!("{html_mode} ? 'Editing in HTML/Text mode.' : 'Editing in Visual mode.'"),
        );
    let source = Element::new("TextareaControl")
        .str("label", format!("{} (HTML/Text)", ctx.label))
        .expr("value", format!("{} ?? ''", ctx.value()))
        .expr("onChange", ctx.handler("value", "value"))
        .expr("rows", "10");
    let visual = Element::new("div")
        .expr("style", "{ padding: '10px', border: '1px solid #ddd' }")
        .child(caption(&format!("{} (Visual)", ctx.label)))
        .child(
            Element::new("RichText")
                .str("tagName", "div")
                .expr("value", format!("{} ?? ''", ctx.value()))
                .expr("allowedFormats", "[ 'core/bold', 'core/italic', 'core/link' ]")
                .expr("onChange", ctx.handler("value", "value"))
                .str("placeholder", "Enter rich content here..."),
        );
    vec![
        toggle.into(),
        JsxNode::either(html_mode, source, visual),
    ]
}

fn media_picker(
    ctx: &ControlContext<'_>,
    allowed_types: &str,
    noun: &str,
    stored: &str,
) -> Element {
    let value = ctx.value();
    let open_button = format!(
        "( {{ open }} ) => (\n\t<Button onClick={{ open }} variant=\"secondary\">\n\t\t{{ {value} ? 'Change {noun}' : 'Select {noun}' }}\n\t</Button>\n)"
    );
    Element::new("MediaUploadCheck").child(
        Element::new("MediaUpload")
            .expr("onSelect", ctx.handler("media", stored))
            .expr("allowedTypes", allowed_types)
            .expr("value", format!("{value}?.id"))
            .expr("render", open_button),
    )
}

fn remove_button(ctx: &ControlContext<'_>, noun: &str) -> JsxNode {
    JsxNode::when(
        ctx.value(),
        Element::new("Button")
            .flag("isDestructive")
            .expr("onClick", ctx.handler("", "null"))
            .child(JsxNode::text(format!("Remove {noun}"))),
    )
}

pub fn image(ctx: &ControlContext<'_>) -> Vec<JsxNode> {
    let value = ctx.value();
    vec![
        media_picker(
            ctx,
            "[ 'image' ]",
            "Image",
            "{ id: media.id, url: media.url, alt: media.alt ?? '' }",
        )
        .into(),
        JsxNode::when(
            format!("{value}?.url"),
            Element::new("img")
                .expr("src", format!("{value}.url"))
                .expr("alt", format!("{value}.alt ?? ''"))
                .expr("style", "{ maxWidth: '100%', height: 'auto' }"),
        ),
        remove_button(ctx, "Image"),
    ]
}

pub fn file(ctx: &ControlContext<'_>) -> Vec<JsxNode> {
    let value = ctx.value();
    vec![
        media_picker(
            ctx,
            "[ 'application/pdf', 'application/msword', 'text', 'application/zip' ]",
            "File",
            "{ id: media.id, url: media.url, alt: media.alt ?? '', filename: media.filename ?? '' }",
        )
        .into(),
        JsxNode::when(
            format!("{value}?.url"),
            Element::new("p")
                .child(JsxNode::text("Selected File: "))
                .child(Element::new("strong").child(JsxNode::expr(format!(
                    "{value}.filename || {value}.url.split( '/' ).pop()"
                )))),
        ),
        remove_button(ctx, "File"),
    ]
}

pub fn gallery(ctx: &ControlContext<'_>) -> Vec<JsxNode> {
    let value = ctx.value();
    let open_button = format!(
        "( {{ open }} ) => (\n\t<Button onClick={{ open }} variant=\"primary\">\n\t\t{{ {value}?.length ? 'Edit Gallery (' + {value}.length + ')' : 'Create Gallery' }}\n\t</Button>\n)"
    );
    let picker = Element::new("MediaUploadCheck").child(
        Element::new("MediaUpload")
            .expr(
                "onSelect",
                ctx.handler(
                    "media",
                    "media.map( ( image ) => ( { id: image.id, url: image.url, alt: image.alt ?? '' } ) )",
                ),
            )
            .expr("allowedTypes", "[ 'image' ]")
            .flag("multiple")
            .flag("gallery")
            .expr(
                "value",
                format!(
                    "Array.isArray( {value} ) ? {value}.map( {} ) : []",
                    arrow_expr("image", "image.id")
                ),
            )
            .expr("render", open_button),
    );
    let thumbnails = Element::new("div")
        .expr("style", "{ marginTop: '10px' }")
        .child(JsxNode::Map {
            list: value.clone(),
            item: "image".into(),
            index: "i".into(),
            body: Box::new(
                Element::new("img")
                    .expr("key", "image.id ?? i")
                    .expr("src", "image.url")
                    .expr("alt", "image.alt ?? ''")
                    .expr(
                        "style",
                        "{ width: '50px', height: '50px', objectFit: 'cover', margin: '5px' }",
                    )
                    .into(),
            ),
        });
    vec![
        picker.into(),
        JsxNode::when(format!("Array.isArray( {value} )"), thumbnails),
    ]
}

/// The repeater shell: one bordered panel per item holding
/// `ctx.item_controls`, with move, remove and add buttons.
///
/// Only meaningful in [`FieldScope::Block`]; the item generator never
/// renders a repeater.
pub fn repeater(ctx: &ControlContext<'_>) -> Vec<JsxNode> {
    let items = ctx.value();
    let key = object_key(ctx.key);
    let list = format!("( Array.isArray( {items} ) ? {items} : [] )");

    let swap = |offset: &str| -> String {
        arrow(
            "",
            &[
                format!("const next = [ ...{items} ];"),
                format!(
                    "[ next[ index {offset} ], next[ index ] ] = [ next[ index ], next[ index {offset} ] ];"
                ),
                format!("setAttributes( {{ {key}: next }} );"),
            ],
        )
    };

    let mut card = Element::new("div")
        .expr("key", "index")
        .expr(
            "style",
            "{ border: '1px solid #ccc', padding: '10px', margin: '10px 0' }",
        )
        .child(
            Element::new("p")
                .expr(
                    "style",
                    "{ fontWeight: 'bold', borderBottom: '1px solid #eee', paddingBottom: '5px' }",
                )
                .child(JsxNode::text(format!("{} Item #", ctx.label)))
                .child(JsxNode::expr("index + 1")),
        );
    if ctx.item_controls.is_empty() {
        card = card.child(
            Element::new("p")
                .expr("style", "{ color: 'red' }")
                .child(JsxNode::text(
                    "Please define sub-fields in the block structure.",
                )),
        );
    } else {
        card = card.children(ctx.item_controls.iter().cloned());
    }
    card = card
        .child(
            Element::new("Button")
                .str("icon", "arrow-up-alt2")
                .str("label", "Move up")
                .expr("disabled", "index === 0")
                .expr("onClick", swap("- 1")),
        )
        .child(
            Element::new("Button")
                .str("icon", "arrow-down-alt2")
                .str("label", "Move down")
                .expr("disabled", format!("index === {items}.length - 1"))
                .expr("onClick", swap("+ 1")),
        )
        .child(
            Element::new("Button")
                .flag("isDestructive")
                .expr(
                    "onClick",
                    arrow(
                        "",
                        &[format!(
                            "setAttributes( {{ {key}: {items}.filter( ( _, i ) => i !== index ) }} );"
                        )],
                    ),
                )
                .child(JsxNode::text("Remove Item")),
        );

    let add = Element::new("Button")
        .str("variant", "primary")
        .expr(
            "onClick",
            arrow(
                "",
                &[format!("setAttributes( {{ {key}: [ ...{list}, {{}} ] }} );")],
            ),
        )
        .child(JsxNode::text(format!("Add {} Item", ctx.label)));

    vec![
        JsxNode::Map {
            list,
            item: "item".into(),
            index: "index".into(),
            body: Box::new(card.into()),
        },
        add.into(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(nodes: &[JsxNode]) -> String {
        nodes.iter().map(|n| n.render(0)).collect()
    }

    fn ctx<'a>(key: &'a str, label: &'a str, scope: &'a FieldScope) -> ControlContext<'a> {
        ControlContext {
            key,
            label,
            scope,
            item_controls: &[],
        }
    }

    #[test]
    fn test_block_scope_writes_with_set_attributes() {
        let scope = FieldScope::Block;
        let out = render(&text(&ctx("title", "Title", &scope)));
        assert!(out.contains("value={ attributes.title ?? '' }"));
        assert!(out.contains("setAttributes( { title: value } );"));
    }

    #[test]
    fn test_item_scope_writes_copy_on_write() {
        let scope = FieldScope::item("items");
        let out = render(&text(&ctx("name", "Name", &scope)));
        assert!(out.contains("value={ item.name ?? '' }"));
        assert!(out.contains("const next = [ ...attributes.items ];"));
        assert!(out.contains("next[ index ] = { ...next[ index ], name: value };"));
        assert!(out.contains("setAttributes( { items: next } );"));
        assert!(!out.contains("attributes.items[ index ] ="));
    }

    #[test]
    fn test_member_quotes_non_identifiers() {
        assert_eq!(member("attributes", "title"), "attributes.title");
        assert_eq!(member("attributes", "2col"), "attributes[ \"2col\" ]");
        assert_eq!(object_key("2col"), "\"2col\"");
    }

    #[test]
    fn test_content_editor_uses_companion_toggle() {
        let scope = FieldScope::Block;
        let out = render(&content_editor(&ctx("body", "Body", &scope)));
        assert!(out.contains("attributes.is_html_mode_body"));
        assert!(out.contains("setAttributes( { is_html_mode_body: isChecked } );"));
        assert!(out.contains("<RichText"));
        assert!(out.contains("<TextareaControl"));
    }

    #[test]
    fn test_repeater_move_buttons_are_bounds_checked() {
        let scope = FieldScope::Block;
        let out = render(&repeater(&ctx("items", "Items", &scope)));
        assert!(out.contains("disabled={ index === 0 }"));
        assert!(out.contains("disabled={ index === attributes.items.length - 1 }"));
        assert!(out.contains(
            "setAttributes( { items: [ ...( Array.isArray( attributes.items ) ? attributes.items : [] ), {} ] } );"
        ));
        assert!(out.contains("attributes.items.filter( ( _, i ) => i !== index )"));
        assert!(out.contains("Please define sub-fields"));
    }

    #[test]
    fn test_image_stores_media_subset() {
        let scope = FieldScope::Block;
        let out = render(&image(&ctx("hero", "Hero", &scope)));
        assert!(out.contains("<MediaUploadCheck>"));
        assert!(out.contains("allowedTypes={ [ 'image' ] }"));
        assert!(out.contains("setAttributes( { hero: { id: media.id, url: media.url, alt: media.alt ?? '' } } );"));
        assert!(out.contains("Remove Image"));
    }
}
