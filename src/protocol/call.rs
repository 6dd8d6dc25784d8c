use serde::{Deserialize, Serialize};
use std::fmt;

use crate::codec::Literal;

/// How a call is laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStyle {
    /// `name(a, b, key=value)`
    #[default]
    Parenthesized,
    /// `name a, b, key=value`
    Command,
}

/// One operation invocation: a name plus rendered argument literals.
///
/// Only arguments that were explicitly added are rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    name: String,
    positional: Vec<String>,
    keywords: Vec<(String, String)>,
}

impl Call {
    /// Start a call to `name` with no arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            positional: Vec::new(),
            keywords: Vec::new(),
        }
    }

    /// Append a positional argument.
    pub fn arg<T: Literal + ?Sized>(mut self, value: &T) -> Self {
        self.positional.push(value.to_literal());
        self
    }

    /// Append a keyword argument.
    pub fn kwarg<T: Literal + ?Sized>(mut self, key: impl Into<String>, value: &T) -> Self {
        self.keywords.push((key.into(), value.to_literal()));
        self
    }

    /// Append a keyword argument only when a value is supplied.
    pub fn opt_kwarg<T: Literal>(self, key: impl Into<String>, value: Option<&T>) -> Self {
        match value {
            Some(value) => self.kwarg(key, value),
            None => self,
        }
    }

    /// Append an already-rendered positional literal.
    pub fn raw_arg(mut self, literal: impl Into<String>) -> Self {
        self.positional.push(literal.into());
        self
    }

    /// Append an already-rendered keyword literal.
    pub fn raw_kwarg(mut self, key: impl Into<String>, literal: impl Into<String>) -> Self {
        self.keywords.push((key.into(), literal.into()));
        self
    }

    /// Operation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the call in the given style.
    pub fn encode(&self, style: CallStyle) -> String {
        let args = self.arguments();
        match style {
            CallStyle::Parenthesized => format!("{}({})", self.name, args),
            CallStyle::Command if args.is_empty() => self.name.clone(),
            CallStyle::Command => format!("{} {}", self.name, args),
        }
    }

    fn arguments(&self) -> String {
        self.positional
            .iter()
            .cloned()
            .chain(
                self.keywords
                    .iter()
                    .map(|(key, value)| format!("{key}={value}")),
            )
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode(CallStyle::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeName;

    #[test]
    fn renders_positional_then_keyword_arguments() {
        let class = TypeName::parse("Modelica.Blocks").unwrap();
        let call = Call::new("getClassNames")
            .arg(&class)
            .kwarg("recursive", &true)
            .kwarg("sort", &false);
        assert_eq!(
            call.encode(CallStyle::Parenthesized),
            "getClassNames(Modelica.Blocks, recursive=true, sort=false)"
        );
        assert_eq!(
            call.encode(CallStyle::Command),
            "getClassNames Modelica.Blocks, recursive=true, sort=false"
        );
    }

    #[test]
    fn omitted_optional_keywords_are_not_rendered() {
        let call = Call::new("simulate")
            .arg(&TypeName::parse("M").unwrap())
            .opt_kwarg("stopTime", None::<&f64>)
            .opt_kwarg("method", Some(&"dassl".to_string()));
        assert_eq!(call.to_string(), "simulate(M, method=\"dassl\")");
    }

    #[test]
    fn strings_are_requoted() {
        let call = Call::new("loadString").arg("model M \"doc\" end M;");
        assert_eq!(call.to_string(), "loadString(\"model M \\\"doc\\\" end M;\")");
    }

    #[test]
    fn no_arguments() {
        let call = Call::new("getVersion");
        assert_eq!(call.encode(CallStyle::Parenthesized), "getVersion()");
        assert_eq!(call.encode(CallStyle::Command), "getVersion");
    }
}
