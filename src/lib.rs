//! omc-codec – value codec and reply protocol for the OpenModelica compiler
//!
//! The compiler's scripting interface answers every call with text written in
//! a small dialect of Modelica literal syntax. This crate provides:
//! - A grammar and parser for that dialect, with a dedicated entry point for
//!   the fixed-shape component records returned by component queries
//! - A transformer from parse trees into typed [`Value`]s
//! - Typed wrappers for dotted type names and components
//! - A call encoder and the classifier that sorts raw replies into values,
//!   compiler errors, empty results and malformed replies

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Decoded value model and literal formatting
pub mod codec;
/// Codec configuration
pub mod config;
/// Call encoding, reply classification and the session seam
pub mod protocol;
/// Type names and component records
pub mod types;

// Re-export key types for convenience
pub use codec::Value;
pub use config::CodecConfig;
pub use protocol::{
    Call, CallError, CallStyle, Interactive, Session, classify_components, classify_value,
};
pub use types::{Component, TypeName};

/// Current version of omc-codec
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
