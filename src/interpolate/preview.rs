//! JSX preview target.
//!
//! Values read straight from the editor's `attributes`, so the preview
//! updates as the sidebar controls change. Missing values render as empty
//! strings and loops over missing or non-array values render nothing.

use super::jsx_markup::{marker, strip_marker_chars, to_jsx, ElementForm, Piece};
use super::{Binding, LoopKind, Node, ValueKind, Var};
use crate::generator::controls::member;

/// Serialize a node tree to JSX.
pub fn render(nodes: &[Node]) -> String {
    let mut markup = String::new();
    let mut pieces = Vec::new();
    write_nodes(nodes, &mut markup, &mut pieces);
    to_jsx(&markup, &pieces)
}

fn write_nodes(nodes: &[Node], markup: &mut String, pieces: &mut Vec<Piece>) {
    for node in nodes {
        match node {
            Node::Text(text) => markup.push_str(&strip_marker_chars(text)),
            Node::Value { binding, kind } => {
                markup.push_str(&marker(pieces.len()));
                pieces.push(value_piece(binding, *kind));
            }
            Node::Loop { kind, source, body } => {
                let (item, index) = loop_vars(*kind);
                markup.push_str(&marker(pieces.len()));
                pieces.push(Piece::LoopStart {
                    list: access(source),
                    item,
                    index,
                });
                write_nodes(body, markup, pieces);
                markup.push_str(&marker(pieces.len()));
                pieces.push(Piece::LoopEnd);
            }
        }
    }
}

fn loop_vars(kind: LoopKind) -> (&'static str, &'static str) {
    match kind {
        LoopKind::Repeater => ("item", "index"),
        LoopKind::Gallery => ("image", "imageIndex"),
    }
}

/// `attributes.key`, `item.key` or `image.key`.
pub fn access(binding: &Binding) -> String {
    let object = match binding.var {
        Var::Attributes => "attributes",
        Var::Item => "item",
        Var::Image => "image",
    };
    member(object, &binding.key)
}

fn value_piece(binding: &Binding, kind: ValueKind) -> Piece {
    let v = access(binding);
    let expr = |e: String| Piece::Value {
        element: ElementForm::Expr(e.clone()),
        attr: e,
    };
    match kind {
        ValueKind::Html | ValueKind::Url | ValueKind::Attr => expr(format!("{v} ?? ''")),
        ValueKind::MediaUrl => expr(format!("{v}?.url ?? ''")),
        ValueKind::MediaAlt => expr(format!("{v}?.alt ?? ''")),
        ValueKind::Json => expr(format!(
            "( {v} !== null && typeof {v} === 'object' ? JSON.stringify( {v} ) : {v} ?? '' )"
        )),
        ValueKind::Rich => Piece::Value {
            element: ElementForm::Markup(format!(
                "<span dangerouslySetInnerHTML={{ {{ __html: {v} ?? '' }} }} />"
            )),
            attr: format!("{v} ?? ''"),
        },
        ValueKind::Link => Piece::Value {
            element: ElementForm::Markup(format!(
                "<a href={{ {v}?.url ?? '' }}>{{ {v}?.text ?? '' }}</a>"
            )),
            attr: format!("{v}?.url ?? ''"),
        },
    }
}
