//! # Template Interpolation Engine
//!
//! A block template is plain markup with three kinds of tokens:
//!
//! - `{{key}}` for a field value,
//! - `{{key_alt}}` for the alt text of an image or file field,
//! - `{{#key}}...{{/key}}` to repeat a fragment per repeater item or gallery image.
//!
//! [`parse`] resolves tokens against the field list once and produces a
//! [`Node`] tree. Two renderers serialize that tree: [`server::render`] for
//! the escaped PHP render template and [`preview::render`] for the JSX
//! preview shown in the editor. Both read the same tree, so they agree on
//! which tokens resolved.
//!
//! Parsing never fails. Tokens that do not resolve stay in the output as
//! written, and a loop whose key is not a repeater or gallery is kept
//! verbatim together with everything inside it.
//!
//! Inside a loop body a name is looked up in the current gallery image
//! (`url`, `alt`, `id`), then in the current repeater item, then among the
//! top-level fields.

pub(crate) mod jsx_markup;
pub mod preview;
pub(crate) mod scanner;
pub mod server;
#[cfg(test)]
mod tests;

use crate::registry::{EscapeRule, FieldRegistry};
use crate::schema::{Field, FieldType};
use scanner::{Segment, TOKEN};

/// Variable a value is read from at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Var {
    /// The block's attributes
    Attributes,
    /// The current repeater item
    Item,
    /// The current gallery image
    Image,
}

/// A key read from a [`Var`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub var: Var,
    pub key: String,
}

impl Binding {
    fn new(var: Var, key: &str) -> Self {
        Binding {
            var,
            key: key.to_string(),
        }
    }
}

/// How a resolved value is escaped and presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Html,
    Rich,
    Url,
    Attr,
    /// `url` of a media object
    MediaUrl,
    /// `alt` of a media object
    MediaAlt,
    /// Button object rendered as an anchor
    Link,
    /// Value of an unknown type; composite values are JSON-encoded
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopKind {
    Repeater,
    Gallery,
}

impl LoopKind {
    /// Variable bound to the current element inside the loop.
    pub fn element_var(&self) -> Var {
        match self {
            LoopKind::Repeater => Var::Item,
            LoopKind::Gallery => Var::Image,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Value { binding: Binding, kind: ValueKind },
    Loop {
        kind: LoopKind,
        source: Binding,
        body: Vec<Node>,
    },
}

/// Result of looking a token up in one level of the scope chain.
enum Lookup {
    Bound(Binding, ValueKind),
    /// A field has the name but is never expanded as a plain token
    Shadowed,
    Missing,
}

/// Lookup scope while parsing one nesting level.
#[derive(Clone, Copy)]
struct Scope<'a> {
    fields: &'a [Field],
    registry: &'a FieldRegistry,
    item: Option<&'a Field>,
    in_gallery: bool,
}

/// Resolve every token of `template` against `fields`.
pub fn parse(template: &str, fields: &[Field], registry: &FieldRegistry) -> Vec<Node> {
    let scope = Scope {
        fields,
        registry,
        item: None,
        in_gallery: false,
    };
    let mut nodes = Vec::new();
    parse_level(template, scope, &mut nodes);
    nodes
}

fn parse_level(text: &str, scope: Scope<'_>, out: &mut Vec<Node>) {
    for segment in scanner::segments(text) {
        match segment {
            Segment::Text(text) => resolve_tokens(text, scope, out),
            Segment::Loop { key, body, raw } => match scope.loop_source(key) {
                Some((kind, source, inner)) => {
                    let mut nodes = Vec::new();
                    parse_level(body, inner, &mut nodes);
                    out.push(Node::Loop {
                        kind,
                        source,
                        body: nodes,
                    });
                }
                None => push_text(out, raw),
            },
        }
    }
}

fn resolve_tokens(text: &str, scope: Scope<'_>, out: &mut Vec<Node>) {
    let mut last = 0;
    for caps in TOKEN.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if let Some((binding, kind)) = scope.resolve(name.as_str()) {
            push_text(out, &text[last..whole.start()]);
            out.push(Node::Value { binding, kind });
            last = whole.end();
        }
    }
    push_text(out, &text[last..]);
}

/// Append text, merging with a preceding text node.
fn push_text(out: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text(prev)) = out.last_mut() {
        prev.push_str(text);
    } else {
        out.push(Node::Text(text.to_string()));
    }
}

fn find<'a>(fields: &'a [Field], key: &str) -> Option<&'a Field> {
    fields.iter().rev().find(|f| f.key == key)
}

impl<'a> Scope<'a> {
    /// Resolve a loop key to its kind, source and the scope of its body.
    ///
    /// Top-level repeaters and galleries loop at the top level only; inside a
    /// repeater body the one nested loop allowed is over a gallery sub-field.
    fn loop_source(&self, key: &str) -> Option<(LoopKind, Binding, Scope<'a>)> {
        if self.in_gallery {
            return None;
        }
        match self.item {
            Some(repeater) => {
                let sub = find(&repeater.sub_fields, key)?;
                (sub.field_type() == Some(FieldType::Gallery)).then(|| {
                    (
                        LoopKind::Gallery,
                        Binding::new(Var::Item, key),
                        Scope {
                            in_gallery: true,
                            ..*self
                        },
                    )
                })
            }
            None => {
                let field = find(self.fields, key)?;
                match field.field_type()? {
                    FieldType::Repeater => Some((
                        LoopKind::Repeater,
                        Binding::new(Var::Attributes, key),
                        Scope {
                            item: Some(field),
                            ..*self
                        },
                    )),
                    FieldType::Gallery => Some((
                        LoopKind::Gallery,
                        Binding::new(Var::Attributes, key),
                        Scope {
                            in_gallery: true,
                            ..*self
                        },
                    )),
                    _ => None,
                }
            }
        }
    }

    /// Walk the scope chain for a simple token.
    ///
    /// A sub-field of the current item hides a top-level field of the same
    /// name, even when the sub-field itself cannot be expanded.
    fn resolve(&self, name: &str) -> Option<(Binding, ValueKind)> {
        if self.in_gallery {
            let kind = match name {
                "url" => Some(ValueKind::Url),
                "alt" | "id" => Some(ValueKind::Attr),
                _ => None,
            };
            if let Some(kind) = kind {
                return Some((Binding::new(Var::Image, name), kind));
            }
        }
        if let Some(item) = self.item {
            match self.resolve_in(&item.sub_fields, Var::Item, name) {
                Lookup::Bound(binding, kind) => return Some((binding, kind)),
                Lookup::Shadowed => return None,
                Lookup::Missing => {}
            }
        }
        match self.resolve_in(self.fields, Var::Attributes, name) {
            Lookup::Bound(binding, kind) => Some((binding, kind)),
            Lookup::Shadowed | Lookup::Missing => None,
        }
    }

    /// Exact key first, then `<key>_alt` of an image or file field.
    fn resolve_in(&self, fields: &[Field], var: Var, name: &str) -> Lookup {
        if let Some(field) = find(fields, name) {
            return match self.value_kind(field) {
                Some(kind) => Lookup::Bound(Binding::new(var, name), kind),
                None => Lookup::Shadowed,
            };
        }
        let alt = name
            .strip_suffix("_alt")
            .and_then(|base| find(fields, base))
            .filter(|field| field.field_type().is_some_and(|t| t.has_alt()));
        match alt {
            Some(field) => Lookup::Bound(Binding::new(var, &field.key), ValueKind::MediaAlt),
            None => Lookup::Missing,
        }
    }

    /// `None` for loop-only types, which are never expanded as plain tokens.
    fn value_kind(&self, field: &Field) -> Option<ValueKind> {
        let Some(entry) = self.registry.lookup(&field.type_tag) else {
            return Some(ValueKind::Json);
        };
        match entry.escape {
            EscapeRule::Html => Some(ValueKind::Html),
            EscapeRule::Rich => Some(ValueKind::Rich),
            EscapeRule::Url => Some(ValueKind::Url),
            EscapeRule::Attr => Some(ValueKind::Attr),
            EscapeRule::Media => Some(ValueKind::MediaUrl),
            EscapeRule::Link => Some(ValueKind::Link),
            EscapeRule::LoopOnly => None,
        }
    }
}
