use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::literal::quote_string;
use crate::types::TypeName;

/// Decoded reply value.
///
/// Tuples and arrays are distinct variants because they come from distinct
/// productions; nothing about their contents tells them apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    /// Integer literal.
    Integer(i64),
    /// Real literal.
    Real(f64),
    /// `true` or `false`.
    Boolean(bool),
    /// String literal with escapes decoded.
    String(String),
    /// Bare type name.
    Path(TypeName),
    /// `( ... )`
    Tuple(Vec<Value>),
    /// `{ ... }`
    Array(Vec<Value>),
    /// Named record with ordered fields.
    Record(Record),
}

/// Record value: type name plus fields in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Record type.
    pub type_name: TypeName,
    /// Fields keyed by identifier.
    pub fields: IndexMap<String, Value>,
}

impl Record {
    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Discriminant of a [`Value`], for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// [`Value::Integer`]
    Integer,
    /// [`Value::Real`]
    Real,
    /// [`Value::Boolean`]
    Boolean,
    /// [`Value::String`]
    String,
    /// [`Value::Path`]
    Path,
    /// [`Value::Tuple`]
    Tuple,
    /// [`Value::Array`]
    Array,
    /// [`Value::Record`]
    Record,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Integer => "integer",
            ValueKind::Real => "real",
            ValueKind::Boolean => "boolean",
            ValueKind::String => "string",
            ValueKind::Path => "type name",
            ValueKind::Tuple => "tuple",
            ValueKind::Array => "array",
            ValueKind::Record => "record",
        };
        f.write_str(name)
    }
}

impl Value {
    /// Which variant this is.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) => ValueKind::Integer,
            Value::Real(_) => ValueKind::Real,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::String(_) => ValueKind::String,
            Value::Path(_) => ValueKind::Path,
            Value::Tuple(_) => ValueKind::Tuple,
            Value::Array(_) => ValueKind::Array,
            Value::Record(_) => ValueKind::Record,
        }
    }

    /// Boolean payload.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Integer payload.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(num) => Some(*num),
            _ => None,
        }
    }

    /// Numeric payload; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Real(num) => Some(*num),
            Value::Integer(num) => Some(*num as f64),
            _ => None,
        }
    }

    /// Convenience accessor for string references.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(text) => Some(text),
            _ => None,
        }
    }

    /// Type name payload.
    pub fn as_path(&self) -> Option<&TypeName> {
        match self {
            Value::Path(name) => Some(name),
            _ => None,
        }
    }

    /// Elements of a tuple or an array.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(items) | Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Record payload.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Take the string payload.
    pub fn into_string(self) -> Result<String, Value> {
        match self {
            Value::String(text) => Ok(text),
            other => Err(other),
        }
    }

    /// Take the elements of a tuple or an array.
    pub fn into_sequence(self) -> Result<Vec<Value>, Value> {
        match self {
            Value::Tuple(items) | Value::Array(items) => Ok(items),
            other => Err(other),
        }
    }
}

/// Writes the canonical literal form, which parses back to an equal value.
///
/// Non-finite reals have no literal form and print as Rust does.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(num) => write!(f, "{num}"),
            Value::Real(num) => write!(f, "{num:?}"),
            Value::Boolean(flag) => write!(f, "{flag}"),
            Value::String(text) => f.write_str(&quote_string(text)),
            Value::Path(name) => write!(f, "{name}"),
            Value::Tuple(items) => write_items(f, "(", items, ")"),
            Value::Array(items) => write_items(f, "{", items, "}"),
            Value::Record(record) => {
                write!(f, "{}(", record.type_name)?;
                for (idx, (name, value)) in record.fields.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name} = {value}")?;
                }
                f.write_str(")")
            }
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, open: &str, items: &[Value], close: &str) -> fmt::Result {
    f.write_str(open)?;
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(close)
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Boolean(flag)
    }
}

impl From<i64> for Value {
    fn from(num: i64) -> Self {
        Value::Integer(num)
    }
}

impl From<f64> for Value {
    fn from(num: f64) -> Self {
        Value::Real(num)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::String(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::String(text)
    }
}

impl From<TypeName> for Value {
    fn from(name: TypeName) -> Self {
        Value::Path(name)
    }
}
