//! Minimal JSX syntax tree used to build `edit.js` bodies.
//!
//! Controls are assembled as [`JsxNode`] values and serialized once, so label
//! quoting and indentation are handled in a single place instead of in every
//! field template.

const INDENT: &str = "\t";

/// A JSX prop value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    /// String literal, quoted or wrapped in an expression as needed
    Str(String),
    /// Arbitrary JS expression, rendered as `{ expr }`
    Expr(String),
    /// Boolean shorthand (`isDestructive`)
    Flag,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    pub name: String,
    pub value: PropValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub props: Vec<Prop>,
    pub children: Vec<JsxNode>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            props: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn str(mut self, name: &str, value: impl Into<String>) -> Self {
        self.props.push(Prop {
            name: name.to_string(),
            value: PropValue::Str(value.into()),
        });
        self
    }

    pub fn expr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.props.push(Prop {
            name: name.to_string(),
            value: PropValue::Expr(value.into()),
        });
        self
    }

    pub fn flag(mut self, name: &str) -> Self {
        self.props.push(Prop {
            name: name.to_string(),
            value: PropValue::Flag,
        });
        self
    }

    pub fn child(mut self, node: impl Into<JsxNode>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = JsxNode>) -> Self {
        self.children.extend(nodes);
        self
    }
}

/// A node in the generated component body.
#[derive(Debug, Clone, PartialEq)]
pub enum JsxNode {
    Element(Element),
    /// `{ expr }`
    Expr(String),
    /// Literal text; braces are escaped on output
    Text(String),
    /// `{ condition && ( node ) }`
    When {
        condition: String,
        then: Box<JsxNode>,
    },
    /// `{ condition ? ( a ) : ( b ) }`
    Either {
        condition: String,
        then: Box<JsxNode>,
        otherwise: Box<JsxNode>,
    },
    /// `{ list.map( ( item, index ) => ( ... ) ) }`
    Map {
        list: String,
        item: String,
        index: String,
        body: Box<JsxNode>,
    },
}

impl From<Element> for JsxNode {
    fn from(el: Element) -> Self {
        JsxNode::Element(el)
    }
}

impl JsxNode {
    pub fn text(text: impl Into<String>) -> Self {
        JsxNode::Text(text.into())
    }

    pub fn expr(expr: impl Into<String>) -> Self {
        JsxNode::Expr(expr.into())
    }

    pub fn when(condition: impl Into<String>, then: impl Into<JsxNode>) -> Self {
        JsxNode::When {
            condition: condition.into(),
            then: Box::new(then.into()),
        }
    }

    pub fn either(
        condition: impl Into<String>,
        then: impl Into<JsxNode>,
        otherwise: impl Into<JsxNode>,
    ) -> Self {
        JsxNode::Either {
            condition: condition.into(),
            then: Box::new(then.into()),
            otherwise: Box::new(otherwise.into()),
        }
    }

    /// Serialize at the given indentation depth.
    pub fn render(&self, depth: usize) -> String {
        let mut out = String::new();
        self.write(&mut out, depth);
        out
    }

    fn write(&self, out: &mut String, depth: usize) {
        let pad = INDENT.repeat(depth);
        match self {
            JsxNode::Element(el) => write_element(out, el, depth),
            JsxNode::Expr(expr) => {
                out.push_str(&pad);
                out.push_str("{ ");
                out.push_str(&indent_continuation(expr, depth));
                out.push_str(" }\n");
            }
            JsxNode::Text(text) => {
                out.push_str(&pad);
                out.push_str(&escape_text(text));
                out.push('\n');
            }
            JsxNode::When { condition, then } => {
                out.push_str(&format!("{pad}{{ {condition} && (\n"));
                then.write(out, depth + 1);
                out.push_str(&format!("{pad}) }}\n"));
            }
            JsxNode::Either {
                condition,
                then,
                otherwise,
            } => {
                out.push_str(&format!("{pad}{{ {condition} ? (\n"));
                then.write(out, depth + 1);
                out.push_str(&format!("{pad}) : (\n"));
                otherwise.write(out, depth + 1);
                out.push_str(&format!("{pad}) }}\n"));
            }
            JsxNode::Map {
                list,
                item,
                index,
                body,
            } => {
                out.push_str(&format!(
                    "{pad}{{ {list}.map( ( {item}, {index} ) => (\n"
                ));
                body.write(out, depth + 1);
                out.push_str(&format!("{pad}) ) }}\n"));
            }
        }
    }
}

fn write_element(out: &mut String, el: &Element, depth: usize) {
    let pad = INDENT.repeat(depth);
    out.push_str(&pad);
    out.push('<');
    out.push_str(&el.name);

    match el.props.as_slice() {
        [] => {}
        [prop] => {
            out.push(' ');
            out.push_str(&render_prop(prop, depth));
        }
        props => {
            let prop_pad = INDENT.repeat(depth + 1);
            for prop in props {
                out.push('\n');
                out.push_str(&prop_pad);
                out.push_str(&render_prop(prop, depth + 1));
            }
            out.push('\n');
            out.push_str(&pad);
        }
    }

    if el.children.is_empty() {
        out.push_str(if el.props.len() > 1 { "/>\n" } else { " />\n" });
        return;
    }

    out.push_str(">\n");
    for child in &el.children {
        child.write(out, depth + 1);
    }
    out.push_str(&format!("{pad}</{}>\n", el.name));
}

fn render_prop(prop: &Prop, depth: usize) -> String {
    match &prop.value {
        PropValue::Flag => prop.name.clone(),
        PropValue::Str(value) => format!("{}={}", prop.name, quote_attr(value)),
        PropValue::Expr(expr) => {
            format!("{}={{ {} }}", prop.name, indent_continuation(expr, depth))
        }
    }
}

/// Quote a JSX string attribute. JSX attribute strings have no escape
/// sequences, so anything that needs escaping becomes a JS string expression.
pub fn quote_attr(value: &str) -> String {
    let plain = value
        .chars()
        .all(|c| !matches!(c, '"' | '\\' | '{' | '}' | '&' | '<' | '>') && !c.is_control());
    if plain {
        format!("\"{value}\"")
    } else {
        format!("{{ {} }}", js_string(value))
    }
}

/// A JS string literal for arbitrary text.
pub fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "''".to_string())
}

/// Escape characters that JSX text children cannot contain literally.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '{' => out.push_str("{ '{' }"),
            '}' => out.push_str("{ '}' }"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Indent every line after the first so multi-line expressions line up with
/// the element they belong to.
fn indent_continuation(expr: &str, depth: usize) -> String {
    let pad = INDENT.repeat(depth);
    let mut lines = expr.lines();
    let mut out = lines.next().unwrap_or_default().to_string();
    for line in lines {
        out.push('\n');
        if !line.is_empty() {
            out.push_str(&pad);
        }
        out.push_str(line);
    }
    out
}

/// An arrow function with a statement body.
///
/// ```rust,ignore
/// arrow("value", &["setAttributes( { title: value } );"])
/// // ( value ) => {
/// //     setAttributes( { title: value } );
/// // }
/// ```
pub fn arrow(params: &str, statements: &[String]) -> String {
    let head = if params.is_empty() {
        "() => {".to_string()
    } else {
        format!("( {params} ) => {{")
    };
    let mut out = head;
    for stmt in statements {
        for line in stmt.lines() {
            out.push('\n');
            out.push_str(INDENT);
            out.push_str(line);
        }
    }
    out.push_str("\n}");
    out
}

/// An arrow function returning a single expression.
pub fn arrow_expr(params: &str, expr: &str) -> String {
    if params.is_empty() {
        format!("() => {expr}")
    } else {
        format!("( {params} ) => {expr}")
    }
}
