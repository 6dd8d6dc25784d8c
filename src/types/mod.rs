//! Typed wrappers built on top of decoded primitives.

/// Fixed-shape component record.
pub mod component;
/// Dotted type names.
pub mod typename;

pub use component::Component;
pub use typename::{IntoTypeName, MalformedPathError, TypeName};
