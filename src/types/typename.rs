//! Dotted type names such as `Modelica.Blocks.Sources.Step`.
//!
//! Segments are kept in their source form: a quoted identifier keeps its
//! quotes, so a segment containing a literal `.` survives a round trip
//! through [`TypeName::parse`] and [`fmt::Display`]. A name that starts with
//! `.` is root-qualified; the root is kept as an empty first segment.
//!
//! Composition keeps the left operand's root and drops the right one's, so
//! `A` joined with `.B` is `A.B`. Only the first segment can ever be empty.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::codec::ast::PathNode;
use crate::codec::grammar;

/// A string that is not a valid dotted type name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed type name {input:?}: expected {expected} at byte {offset}")]
pub struct MalformedPathError {
    /// The rejected input.
    pub input: String,
    /// Byte offset where lexing failed.
    pub offset: usize,
    /// What the name grammar expected there.
    pub expected: &'static str,
}

impl MalformedPathError {
    fn new(input: &str, offset: usize, expected: &'static str) -> Self {
        Self {
            input: input.to_string(),
            offset,
            expected,
        }
    }
}

/// Ordered, non-empty sequence of identifier segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TypeName {
    segments: Vec<String>,
}

impl TypeName {
    /// Parse a dotted name, preserving a leading root marker.
    pub fn parse(text: &str) -> Result<Self, MalformedPathError> {
        let node = grammar::type_path(text)
            .map_err(|err| MalformedPathError::new(text, err.offset, err.expected))?;
        Ok(Self::from_node(text, &node))
    }

    pub(crate) fn from_node(src: &str, node: &PathNode) -> Self {
        let mut segments = Vec::with_capacity(node.segments.len() + usize::from(node.rooted));
        if node.rooted {
            segments.push(String::new());
        }
        segments.extend(node.segments.iter().map(|span| span.slice(src).to_string()));
        Self { segments }
    }

    /// Single-segment name for an arbitrary identifier, quoting it when it
    /// is not a plain identifier. The empty string names nothing and is
    /// rejected.
    pub fn quoted(name: &str) -> Result<Self, MalformedPathError> {
        if name.is_empty() {
            return Err(MalformedPathError::new(name, 0, "non-empty identifier"));
        }
        let plain = name
            .bytes()
            .next()
            .is_some_and(|b| b.is_ascii_alphabetic() || b == b'_')
            && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_');
        let segment = if plain {
            name.to_string()
        } else {
            let mut quoted = String::with_capacity(name.len() + 2);
            quoted.push('\'');
            for ch in name.chars() {
                if ch == '\'' || ch == '\\' {
                    quoted.push('\\');
                }
                quoted.push(ch);
            }
            quoted.push('\'');
            quoted
        };
        Ok(Self {
            segments: vec![segment],
        })
    }

    /// Fold fragments (names or dotted strings) into one name, in order.
    pub fn from_fragments<I>(fragments: I) -> Result<Self, MalformedPathError>
    where
        I: IntoIterator,
        I::Item: IntoTypeName,
    {
        let mut fragments = fragments.into_iter();
        let Some(first) = fragments.next() else {
            return Err(MalformedPathError::new("", 0, "at least one fragment"));
        };
        let mut name = first.into_type_name()?;
        for fragment in fragments {
            name.append(&fragment.into_type_name()?);
        }
        Ok(name)
    }

    /// New name made of this name's segments followed by `other`'s.
    ///
    /// A root marker on `other` is dropped; the result is rooted exactly
    /// when `self` is. Joining is associative.
    pub fn join(&self, other: &TypeName) -> TypeName {
        let mut joined = self.clone();
        joined.append(other);
        joined
    }

    /// Parse `other` and join it onto this name.
    pub fn join_str(&self, other: &str) -> Result<TypeName, MalformedPathError> {
        Ok(self.join(&TypeName::parse(other)?))
    }

    /// Append `other`'s segments in place, without its root marker.
    pub fn append(&mut self, other: &TypeName) {
        let root = usize::from(other.is_rooted());
        self.segments.extend(other.segments[root..].iter().cloned());
    }

    /// All segments, including an empty root segment if present.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether the name starts at the root (`.A.B`).
    pub fn is_rooted(&self) -> bool {
        self.segments.first().is_some_and(String::is_empty)
    }

    /// Final segment.
    pub fn last_identifier(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Name without its final segment, if anything named remains.
    pub fn parent(&self) -> Option<TypeName> {
        let parent = &self.segments[..self.segments.len().saturating_sub(1)];
        if parent.iter().all(String::is_empty) {
            return None;
        }
        Some(TypeName {
            segments: parent.to_vec(),
        })
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl FromStr for TypeName {
    type Err = MalformedPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeName::parse(s)
    }
}

impl From<TypeName> for String {
    fn from(name: TypeName) -> String {
        name.to_string()
    }
}

impl TryFrom<String> for TypeName {
    type Error = MalformedPathError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        TypeName::parse(&text)
    }
}

/// Anything that can be turned into a [`TypeName`] fragment.
pub trait IntoTypeName {
    /// Convert, parsing when the fragment is text.
    fn into_type_name(self) -> Result<TypeName, MalformedPathError>;
}

impl IntoTypeName for TypeName {
    fn into_type_name(self) -> Result<TypeName, MalformedPathError> {
        Ok(self)
    }
}

impl IntoTypeName for &TypeName {
    fn into_type_name(self) -> Result<TypeName, MalformedPathError> {
        Ok(self.clone())
    }
}

impl IntoTypeName for &str {
    fn into_type_name(self) -> Result<TypeName, MalformedPathError> {
        TypeName::parse(self)
    }
}

impl IntoTypeName for String {
    fn into_type_name(self) -> Result<TypeName, MalformedPathError> {
        TypeName::parse(&self)
    }
}
