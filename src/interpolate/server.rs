//! PHP render template target.
//!
//! Every value is echoed through the WordPress escaping function for its
//! context and falls back to an empty string when the attribute is absent.
//! Loops are guarded so a missing or non-array source renders nothing.

use super::{Binding, LoopKind, Node, ValueKind, Var};

/// Serialize a node tree to PHP template markup.
pub fn render(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node);
    }
    out
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Text(text) => out.push_str(text),
        Node::Value { binding, kind } => out.push_str(&value(binding, *kind)),
        Node::Loop { kind, source, body } => {
            out.push_str(&loop_header(*kind, source));
            for child in body {
                write_node(out, child);
            }
            out.push_str("<?php endforeach; endif; ?>");
        }
    }
}

fn variable(var: Var) -> &'static str {
    match var {
        Var::Attributes => "$attributes",
        Var::Item => "$item",
        Var::Image => "$image",
    }
}

/// `$attributes['key']`
pub fn access(binding: &Binding) -> String {
    format!("{}['{}']", variable(binding.var), binding.key)
}

fn echo(expr: String) -> String {
    format!("<?php echo {expr}; ?>")
}

fn value(binding: &Binding, kind: ValueKind) -> String {
    let v = access(binding);
    match kind {
        ValueKind::Html | ValueKind::Rich => echo(format!("wp_kses_post( {v} ?? '' )")),
        ValueKind::Url => echo(format!("esc_url( {v} ?? '' )")),
        ValueKind::Attr => echo(format!("esc_attr( {v} ?? '' )")),
        ValueKind::MediaUrl => echo(format!("esc_url( {v}['url'] ?? '' )")),
        ValueKind::MediaAlt => echo(format!("esc_attr( {v}['alt'] ?? '' )")),
        ValueKind::Link => format!(
            "<a href=\"{}\">{}</a>",
            echo(format!("esc_url( {v}['url'] ?? '' )")),
            echo(format!("esc_html( {v}['text'] ?? '' )")),
        ),
        ValueKind::Json => echo(format!(
            "wp_kses_post( is_array( {v} ?? '' ) ? wp_json_encode( {v} ) : ( {v} ?? '' ) )"
        )),
    }
}

fn loop_header(kind: LoopKind, source: &Binding) -> String {
    let list = access(source);
    format!(
        "<?php if ( ! empty( {list} ) && is_array( {list} ) ) : foreach ( {list} as {} ) : ?>",
        variable(kind.element_var())
    )
}
