//! HTML to JSX conversion for the editor preview.
//!
//! The preview renderer serializes the node tree to markup in which every
//! value and loop boundary is a marker (`\u{E000}<n>\u{E001}`) pointing into
//! a [`Piece`] table. This module then walks the markup once, rewriting it
//! into JSX and expanding each marker according to whether it sits in text
//! or inside an attribute value.

use crate::generator::jsx::{escape_text, js_string};

pub(crate) const MARK_OPEN: char = '\u{E000}';
pub(crate) const MARK_CLOSE: char = '\u{E001}';

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// How a value appears in element content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ElementForm {
    /// Emitted as `{ expr }`
    Expr(String),
    /// Emitted as-is
    Markup(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Piece {
    Value {
        element: ElementForm,
        /// Expression used inside attribute values
        attr: String,
    },
    LoopStart {
        list: String,
        item: &'static str,
        index: &'static str,
    },
    LoopEnd,
}

pub(crate) fn marker(index: usize) -> String {
    format!("{MARK_OPEN}{index}{MARK_CLOSE}")
}

/// Remove marker characters from template text so they cannot be confused
/// with real markers.
pub(crate) fn strip_marker_chars(text: &str) -> String {
    text.replace([MARK_OPEN, MARK_CLOSE], "")
}

/// Remove whole markers, index included, then any stray marker characters.
fn strip_markers(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(MARK_OPEN) {
        out.push_str(&rest[..start]);
        let after = &rest[start + MARK_OPEN.len_utf8()..];
        let digits = after.len() - after.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        rest = after[digits..].strip_prefix(MARK_CLOSE).unwrap_or(after);
    }
    out.push_str(rest);
    strip_marker_chars(&out)
}

#[derive(Debug, PartialEq, Eq)]
enum Chunk<'a> {
    Text(&'a str),
    Piece(usize),
}

/// Split a string into literal text and marker references.
fn chunks(s: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut rest = s;
    while let Some(start) = rest.find(MARK_OPEN) {
        let after = &rest[start + MARK_OPEN.len_utf8()..];
        let parsed = after
            .find(MARK_CLOSE)
            .and_then(|end| after[..end].parse::<usize>().ok().map(|n| (n, end)));
        match parsed {
            Some((n, end)) => {
                if start > 0 {
                    out.push(Chunk::Text(&rest[..start]));
                }
                out.push(Chunk::Piece(n));
                rest = &after[end + MARK_CLOSE.len_utf8()..];
            }
            None => {
                out.push(Chunk::Text(&rest[..start]));
                rest = after;
            }
        }
    }
    if !rest.is_empty() {
        out.push(Chunk::Text(rest));
    }
    out
}

fn loop_list(list: &str) -> String {
    format!("( Array.isArray( {list} ) ? {list} : [] )")
}

struct Converter<'p> {
    pieces: &'p [Piece],
    out: String,
    open_loops: usize,
}

/// Convert marked-up HTML to JSX.
pub(crate) fn to_jsx(markup: &str, pieces: &[Piece]) -> String {
    let mut conv = Converter {
        pieces,
        out: String::with_capacity(markup.len()),
        open_loops: 0,
    };
    let mut rest = markup;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("<!--") {
            let (comment, tail) = match after.find("-->") {
                Some(end) => (&after[..end], &after[end + 3..]),
                None => (after, ""),
            };
            conv.comment(comment);
            rest = tail;
            continue;
        }
        if rest.starts_with("</") {
            if let Some((name, len)) = closing_tag(rest) {
                if !is_void(name) {
                    conv.out.push_str(&format!("</{name}>"));
                }
                rest = &rest[len..];
                continue;
            }
        } else if rest.starts_with('<') {
            if let Some((tag, len)) = open_tag(rest) {
                conv.open_tag(&tag);
                rest = &rest[len..];
                continue;
            }
        }

        let first = rest.chars().next().map(char::len_utf8).unwrap_or(1);
        let end = rest[first..]
            .find('<')
            .map(|i| i + first)
            .unwrap_or(rest.len());
        conv.text(&rest[..end]);
        rest = &rest[end..];
    }

    while conv.open_loops > 0 {
        conv.close_loop();
    }
    conv.out
}

impl Converter<'_> {
    fn comment(&mut self, comment: &str) {
        let body = strip_markers(comment).replace("*/", "* /");
        self.out.push_str(&format!("{{/* {} */}}", body.trim()));
    }

    fn text(&mut self, text: &str) {
        for chunk in chunks(text) {
            match chunk {
                Chunk::Text(t) => self.out.push_str(&escape_text(t)),
                Chunk::Piece(n) => self.text_piece(n),
            }
        }
    }

    fn text_piece(&mut self, n: usize) {
        match self.pieces.get(n) {
            Some(Piece::Value { element, .. }) => match element {
                ElementForm::Expr(expr) => self.out.push_str(&format!("{{ {expr} }}")),
                ElementForm::Markup(markup) => self.out.push_str(markup),
            },
            Some(Piece::LoopStart { list, item, index }) => {
                self.out.push_str(&format!(
                    "{{ {}.map( ( {item}, {index} ) => (\n<Fragment key={{ {index} }}>\n",
                    loop_list(list)
                ));
                self.open_loops += 1;
            }
            Some(Piece::LoopEnd) => {
                if self.open_loops > 0 {
                    self.close_loop();
                }
            }
            None => {}
        }
    }

    fn close_loop(&mut self) {
        self.out.push_str("\n</Fragment>\n) ) }");
        self.open_loops -= 1;
    }

    fn open_tag(&mut self, tag: &Tag<'_>) {
        self.out.push('<');
        self.out.push_str(tag.name);
        for (name, value) in &tag.attrs {
            if let Some(attr) = self.attribute(name, *value) {
                self.out.push(' ');
                self.out.push_str(&attr);
            }
        }
        if tag.self_closing || is_void(tag.name) {
            self.out.push_str(" />");
        } else {
            self.out.push('>');
        }
    }

    fn attribute(&self, name: &str, value: Option<&str>) -> Option<String> {
        if name.contains(MARK_OPEN) || name.to_ascii_lowercase().starts_with("on") {
            return None;
        }
        let jsx_name = jsx_attr_name(name);
        let Some(value) = value else {
            return Some(jsx_name);
        };
        if jsx_name == "style" {
            return Some(format!("style={{ {{ {} }} }}", self.style_object(value)));
        }

        let parts = chunks(value);
        let has_pieces = parts.iter().any(|c| matches!(c, Chunk::Piece(_)));
        if !has_pieces {
            return Some(format!("{jsx_name}={}", quote_markup_attr(value)));
        }
        if let [Chunk::Piece(n)] = parts.as_slice() {
            if let Some(Piece::Value { attr, .. }) = self.pieces.get(*n) {
                return Some(format!("{jsx_name}={{ {attr} }}"));
            }
        }
        Some(format!("{jsx_name}={{ `{}` }}", self.template_literal(&parts)))
    }

    /// Body of a JS template literal for mixed text and markers.
    fn template_literal(&self, parts: &[Chunk<'_>]) -> String {
        let mut out = String::new();
        let mut depth = 0usize;
        for part in parts {
            match part {
                Chunk::Text(t) => out.push_str(&escape_template(t)),
                Chunk::Piece(n) => match self.pieces.get(*n) {
                    Some(Piece::Value { attr, .. }) => out.push_str(&format!("${{ {attr} }}")),
                    Some(Piece::LoopStart { list, item, .. }) => {
                        out.push_str(&format!("${{ {}.map( ( {item} ) => `", loop_list(list)));
                        depth += 1;
                    }
                    Some(Piece::LoopEnd) if depth > 0 => {
                        out.push_str("` ).join( '' ) }");
                        depth -= 1;
                    }
                    _ => {}
                },
            }
        }
        for _ in 0..depth {
            out.push_str("` ).join( '' ) }");
        }
        out
    }

    /// `color: red; background-image: url(x)` as object literal entries.
    fn style_object(&self, style: &str) -> String {
        let entries: Vec<String> = style
            .split(';')
            .filter_map(|decl| {
                let (prop, value) = decl.split_once(':')?;
                let prop = prop.trim();
                if prop.is_empty() || prop.contains(MARK_OPEN) {
                    return None;
                }
                let value = value.trim();
                let parts = chunks(value);
                let rendered = if parts.iter().any(|c| matches!(c, Chunk::Piece(_))) {
                    format!("`{}`", self.template_literal(&parts))
                } else {
                    js_string(value)
                };
                Some(format!("{}: {rendered}", style_key(prop)))
            })
            .collect();
        entries.join(", ")
    }
}

/// A parsed start tag.
#[derive(Debug, PartialEq, Eq)]
struct Tag<'a> {
    name: &'a str,
    attrs: Vec<(&'a str, Option<&'a str>)>,
    self_closing: bool,
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == ':' || c == '_' || c == '.'
}

/// Parse a start tag at the beginning of `s`; `None` when it is not one.
fn open_tag(s: &str) -> Option<(Tag<'_>, usize)> {
    let body = s.strip_prefix('<')?;
    if !body.chars().next()?.is_ascii_alphabetic() {
        return None;
    }
    let name_len = body.find(|c: char| !is_name_char(c)).unwrap_or(body.len());
    let name = &body[..name_len];
    let mut attrs = Vec::new();
    let mut pos = 1 + name_len;

    loop {
        let rest = &s[pos..];
        let trimmed = rest.trim_start();
        pos += rest.len() - trimmed.len();
        let rest = &s[pos..];

        if rest.is_empty() {
            return None;
        }
        if rest.starts_with("/>") {
            return Some((
                Tag {
                    name,
                    attrs,
                    self_closing: true,
                },
                pos + 2,
            ));
        }
        if rest.starts_with('>') {
            return Some((
                Tag {
                    name,
                    attrs,
                    self_closing: false,
                },
                pos + 1,
            ));
        }

        let attr_len = rest
            .find(|c: char| c.is_whitespace() || c == '=' || c == '>' || c == '/')
            .unwrap_or(rest.len());
        if attr_len == 0 {
            // stray '/' or '=' inside the tag
            pos += 1;
            continue;
        }
        let attr_name = &rest[..attr_len];
        pos += attr_len;

        let rest = &s[pos..];
        let after_ws = rest.trim_start();
        let Some(value_part) = after_ws.strip_prefix('=') else {
            attrs.push((attr_name, None));
            continue;
        };
        let value_part_trimmed = value_part.trim_start();
        pos += rest.len() - value_part_trimmed.len();
        let rest = &s[pos..];

        let (value, consumed) = match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let inner = &rest[1..];
                let end = inner.find(quote)?;
                (&inner[..end], end + 2)
            }
            Some(_) => {
                let end = rest
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(rest.len());
                (&rest[..end], end)
            }
            None => return None,
        };
        attrs.push((attr_name, Some(value)));
        pos += consumed;
    }
}

/// Parse `</name>` at the beginning of `s`.
fn closing_tag(s: &str) -> Option<(&str, usize)> {
    let body = s.strip_prefix("</")?;
    if !body.chars().next()?.is_ascii_alphabetic() {
        return None;
    }
    let name_len = body.find(|c: char| !is_name_char(c)).unwrap_or(body.len());
    let after = &body[name_len..];
    let trimmed = after.trim_start();
    trimmed.strip_prefix('>')?;
    let consumed = 2 + name_len + (after.len() - trimmed.len()) + 1;
    Some((&body[..name_len], consumed))
}

pub(crate) fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name.to_ascii_lowercase().as_str())
}

/// React prop name for an HTML attribute.
fn jsx_attr_name(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    let mapped = match lower.as_str() {
        "class" => "className",
        "for" => "htmlFor",
        "tabindex" => "tabIndex",
        "readonly" => "readOnly",
        "maxlength" => "maxLength",
        "colspan" => "colSpan",
        "rowspan" => "rowSpan",
        "srcset" => "srcSet",
        "crossorigin" => "crossOrigin",
        "autoplay" => "autoPlay",
        "autocomplete" => "autoComplete",
        "frameborder" => "frameBorder",
        "allowfullscreen" => "allowFullScreen",
        "playsinline" => "playsInline",
        "datetime" => "dateTime",
        "contenteditable" => "contentEditable",
        "spellcheck" => "spellCheck",
        "novalidate" => "noValidate",
        "enctype" => "encType",
        _ => {
            if lower.starts_with("data-") || lower.starts_with("aria-") {
                return name.to_string();
            }
            if name.contains(['-', ':']) {
                return camel_case(name, false);
            }
            return name.to_string();
        }
    };
    mapped.to_string()
}

fn camel_case(name: &str, capitalize_first: bool) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = capitalize_first;
    for c in name.chars() {
        if c == '-' || c == ':' {
            upper = !out.is_empty() || capitalize_first;
            continue;
        }
        if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Style property as an object key: `background-color` → `backgroundColor`,
/// `-webkit-transition` → `WebkitTransition`, custom properties quoted.
fn style_key(prop: &str) -> String {
    if prop.starts_with("--") {
        return js_string(prop);
    }
    match prop.strip_prefix('-') {
        Some(vendor) => camel_case(vendor, true),
        None => camel_case(&prop.to_ascii_lowercase(), false),
    }
}

/// Plain attribute string. JSX attribute strings keep HTML entities, so the
/// value is only turned into an expression when it cannot be quoted.
fn quote_markup_attr(value: &str) -> String {
    if !value.contains('"') {
        format!("\"{value}\"")
    } else if !value.contains('\'') {
        format!("'{value}'")
    } else {
        format!("{{ {} }}", js_string(value))
    }
}

fn escape_template(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(expr: &str) -> Piece {
        Piece::Value {
            element: ElementForm::Expr(expr.to_string()),
            attr: expr.to_string(),
        }
    }

    #[test]
    fn test_class_and_for_are_renamed() {
        let jsx = to_jsx(r#"<label class="a" for="b">x</label>"#, &[]);
        assert_eq!(jsx, r#"<label className="a" htmlFor="b">x</label>"#);
    }

    #[test]
    fn test_void_elements_self_close() {
        assert_eq!(to_jsx("<br><img src=\"a.png\">", &[]), "<br /><img src=\"a.png\" />");
        assert_eq!(to_jsx("<hr/>", &[]), "<hr />");
        assert_eq!(to_jsx("<br></br>", &[]), "<br />");
    }

    #[test]
    fn test_comments_and_braces() {
        assert_eq!(to_jsx("<!-- note -->", &[]), "{/* note */}");
        assert_eq!(to_jsx("<p>a {b}</p>", &[]), "<p>a { '{' }b{ '}' }</p>");
    }

    #[test]
    fn test_markers_inside_comments_are_dropped() {
        let pieces = vec![value("attributes.title ?? ''"), value("attributes.link ?? ''")];
        let markup = format!("<!-- heading {} -->{}", marker(0), marker(1));
        assert_eq!(
            to_jsx(&markup, &pieces),
            "{/* heading */}{ attributes.link ?? '' }"
        );
        assert_eq!(strip_markers(&format!("a{}b{}c", marker(12), MARK_CLOSE)), "abc");
    }

    #[test]
    fn test_style_string_becomes_object() {
        let jsx = to_jsx(r#"<div style="background-color: red; --gap: 4px">x</div>"#, &[]);
        assert_eq!(
            jsx,
            r#"<div style={ { backgroundColor: "red", "--gap": "4px" } }>x</div>"#
        );
    }

    #[test]
    fn test_marker_in_text_and_attribute() {
        let pieces = vec![value("attributes.title ?? ''"), value("attributes.link ?? ''")];
        let markup = format!("<a href=\"{}\">{}</a>", marker(1), marker(0));
        assert_eq!(
            to_jsx(&markup, &pieces),
            "<a href={ attributes.link ?? '' }>{ attributes.title ?? '' }</a>"
        );
    }

    #[test]
    fn test_mixed_attribute_uses_template_literal() {
        let pieces = vec![value("attributes.size ?? ''")];
        let markup = format!("<div class=\"box box-{}\"></div>", marker(0));
        assert_eq!(
            to_jsx(&markup, &pieces),
            "<div className={ `box box-${ attributes.size ?? '' }` }></div>"
        );
    }

    #[test]
    fn test_loop_markers_map_with_fragment() {
        let pieces = vec![
            Piece::LoopStart {
                list: "attributes.items".into(),
                item: "item",
                index: "index",
            },
            value("item.name ?? ''"),
            Piece::LoopEnd,
        ];
        let markup = format!("<ul>{}<li>{}</li>{}</ul>", marker(0), marker(1), marker(2));
        let jsx = to_jsx(&markup, &pieces);
        assert!(jsx.starts_with(
            "<ul>{ ( Array.isArray( attributes.items ) ? attributes.items : [] ).map( ( item, index ) => (\n<Fragment key={ index }>\n<li>"
        ));
        assert!(jsx.ends_with("</li>\n</Fragment>\n) ) }</ul>"));
    }

    #[test]
    fn test_event_handlers_are_dropped() {
        assert_eq!(to_jsx("<button onclick=\"go()\">Go</button>", &[]), "<button>Go</button>");
    }

    #[test]
    fn test_stray_angle_bracket_is_text() {
        assert_eq!(to_jsx("a < b", &[]), "a &lt; b");
        assert_eq!(to_jsx("<p class=\"x", &[]), "&lt;p class=\"x");
    }

    #[test]
    fn test_boolean_and_hyphenated_attributes() {
        assert_eq!(
            to_jsx("<input disabled data-id=\"3\" stroke-width=\"2\">", &[]),
            "<input disabled data-id=\"3\" strokeWidth=\"2\" />"
        );
    }
}
