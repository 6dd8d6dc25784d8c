//! Parse tree to [`Value`] transformation.
//!
//! One small transformer per rule group (numbers, booleans, strings, paths,
//! sequences, records) so each can be exercised on its own, combined into
//! the two entry-point transformers [`value`] and [`components`]. The parse
//! trees are typed, so every tree the parser can produce is handled here.

use indexmap::IndexMap;

use super::ast::{ComponentNode, FieldNode, Node, PathNode, Sign, Span};
use super::grammar::Grammar;
use super::value::{Record, Value};
use crate::types::{Component, TypeName};

/// Transform a tree produced by the value grammar.
pub fn value(src: &str, node: &Node) -> Value {
    match node {
        Node::Number { sign, magnitude } => number(src, *sign, *magnitude),
        Node::Boolean(flag) => boolean(*flag),
        Node::String(span) => Value::String(string(src, *span)),
        Node::Path(path) => Value::Path(type_name(src, path)),
        Node::Tuple(items) => Value::Tuple(sequence(src, items)),
        Node::Array(items) => Value::Array(sequence(src, items)),
        Node::Record { name, fields } => Value::Record(record(src, name, fields)),
    }
}

/// Transform a tree produced by the component record array grammar.
pub fn components(src: &str, nodes: &[ComponentNode]) -> Vec<Component> {
    nodes.iter().map(|node| component(src, node)).collect()
}

/// Integer when the magnitude fits, real otherwise; the sign is applied to
/// the parsed magnitude.
pub fn number(src: &str, sign: Option<Sign>, magnitude: Span) -> Value {
    let text = magnitude.slice(src);
    let negative = sign == Some(Sign::Minus);

    if let Ok(unsigned) = text.parse::<u64>() {
        let signed = if negative {
            0i64.checked_sub_unsigned(unsigned)
        } else {
            i64::try_from(unsigned).ok()
        };
        if let Some(num) = signed {
            return Value::Integer(num);
        }
    }

    // The grammar only admits digits, one fraction and one exponent here.
    let real = text.parse::<f64>().unwrap_or(f64::NAN);
    Value::Real(if negative { -real } else { real })
}

/// Boolean literal.
pub fn boolean(flag: bool) -> Value {
    Value::Boolean(flag)
}

/// Decode the escapes in a string body. Unknown escapes are kept verbatim.
pub fn string(src: &str, body: Span) -> String {
    let lexicon = Grammar::value().lexicon();
    let raw = body.slice(src);
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some(escaped) => match lexicon.unescape(escaped) {
                Some(decoded) => out.push(decoded),
                None => {
                    out.push('\\');
                    out.push(escaped);
                }
            },
            None => out.push('\\'),
        }
    }
    out
}

/// Dotted type name.
pub fn type_name(src: &str, path: &PathNode) -> TypeName {
    TypeName::from_node(src, path)
}

/// Elements of a tuple or an array, in order.
pub fn sequence(src: &str, items: &[Node]) -> Vec<Value> {
    items.iter().map(|item| value(src, item)).collect()
}

/// Record with fields in declaration order. A repeated field keeps its
/// first position and takes the last value.
pub fn record(src: &str, name: &PathNode, fields: &[FieldNode]) -> Record {
    let mut map = IndexMap::with_capacity(fields.len());
    for field in fields {
        let key = field.name.slice(src).to_string();
        if map.insert(key, value(src, &field.value)).is_some() {
            tracing::warn!(field = field.name.slice(src), "duplicate record field");
        }
    }
    Record {
        type_name: type_name(src, name),
        fields: map,
    }
}

/// Fixed-shape component record.
pub fn component(src: &str, node: &ComponentNode) -> Component {
    let [is_final, is_flow, is_stream, is_replaceable] = node.flags;
    Component {
        class_name: type_name(src, &node.class_name),
        name: node.name.slice(src).to_string(),
        comment: string(src, node.comment),
        protected: string(src, node.protected),
        is_final,
        is_flow,
        is_stream,
        is_replaceable,
        variability: string(src, node.variability),
        inner_outer: string(src, node.inner_outer),
        input_output: string(src, node.input_output),
        dimensions: dimensions(src, &node.dimensions),
    }
}

/// Dimension expressions as their verbatim source text.
pub fn dimensions(src: &str, spans: &[Span]) -> Vec<String> {
    spans.iter().map(|span| span.slice(src).to_string()).collect()
}
