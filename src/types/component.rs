use serde::{Deserialize, Serialize};

use super::TypeName;

/// One element of a class, as reported by the component query.
///
/// Dimensions are the verbatim source text of each subscript. They may be
/// arbitrary expressions and are never evaluated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    /// Declared class of the component.
    pub class_name: TypeName,
    /// Component identifier.
    pub name: String,
    /// Description string.
    pub comment: String,
    /// `"public"` or `"protected"`.
    pub protected: String,
    /// Declared `final`.
    pub is_final: bool,
    /// Declared `flow`.
    pub is_flow: bool,
    /// Declared `stream`.
    pub is_stream: bool,
    /// Declared `replaceable`.
    pub is_replaceable: bool,
    /// `"parameter"`, `"constant"`, `"discrete"` or empty.
    pub variability: String,
    /// Inner/outer prefix.
    pub inner_outer: String,
    /// `"input"`, `"output"` or the compiler's placeholder.
    pub input_output: String,
    /// Raw dimension expressions.
    pub dimensions: Vec<String>,
}

impl Component {
    /// Whether the component sits in a protected section.
    pub fn is_protected(&self) -> bool {
        self.protected == "protected"
    }

    /// Whether the component is declared with any dimensions.
    pub fn is_array(&self) -> bool {
        !self.dimensions.is_empty()
    }

    /// Whether the component is a parameter.
    pub fn is_parameter(&self) -> bool {
        self.variability == "parameter"
    }
}
