//! Codec for the value literals printed by the OpenModelica compiler.
//!
//! Replies from the compiler's scripting interface are a small dialect of
//! Modelica literal syntax. This module provides the grammar, the parser
//! driving it, and the transformer that turns parse trees into [`Value`]s.

pub(crate) mod ast;
pub(crate) mod grammar;
/// Formatting of Rust values as literals accepted by the compiler.
pub mod literal;
pub(crate) mod parser;
pub(crate) mod transform;
/// Decoded value model.
pub mod value;

pub use literal::{Literal, quote_string};
pub use value::{Record, Value, ValueKind};

use grammar::Grammar;
use parser::Parser;

use thiserror::Error;

use crate::types::Component;

pub(crate) type Result<T> = std::result::Result<T, NoMatch>;

/// The input does not satisfy the grammar of the requested entry point.
///
/// Carries the furthest byte offset the parser reached and what it expected
/// there; no partial result is ever attached. Callers only see it as the
/// source of [`CallError::MalformedReply`](crate::protocol::CallError).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no match at byte {offset}: expected {expected}")]
pub struct NoMatch {
    /// Byte offset of the furthest failure.
    pub offset: usize,
    /// Short description of what the grammar expected.
    pub expected: &'static str,
}

/// Decode a single generic value literal.
pub(crate) fn decode_value(input: &str) -> Result<Value> {
    let tree = Parser::new(Grammar::value()).parse(input)?;
    Ok(transform::value(input, &tree))
}

/// Decode an array of component records.
pub(crate) fn decode_components(input: &str) -> Result<Vec<Component>> {
    let tree = Parser::new(Grammar::components()).parse(input)?;
    Ok(transform::components(input, &tree))
}
