use super::value::Value;
use crate::types::TypeName;

/// Formats a Rust value as a literal the compiler accepts as a call
/// argument.
pub trait Literal {
    /// Literal text for this value.
    fn to_literal(&self) -> String;
}

/// Quote `text` as a string literal, escaping backslashes, double quotes
/// and the control characters that have a named escape.
pub fn quote_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\u{0b}' => out.push_str("\\v"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

impl Literal for bool {
    fn to_literal(&self) -> String {
        self.to_string()
    }
}

impl Literal for i64 {
    fn to_literal(&self) -> String {
        self.to_string()
    }
}

impl Literal for i32 {
    fn to_literal(&self) -> String {
        self.to_string()
    }
}

impl Literal for usize {
    fn to_literal(&self) -> String {
        self.to_string()
    }
}

impl Literal for f64 {
    fn to_literal(&self) -> String {
        format!("{self:?}")
    }
}

impl Literal for str {
    fn to_literal(&self) -> String {
        quote_string(self)
    }
}

impl Literal for String {
    fn to_literal(&self) -> String {
        quote_string(self)
    }
}

impl Literal for TypeName {
    fn to_literal(&self) -> String {
        self.to_string()
    }
}

impl Literal for Value {
    fn to_literal(&self) -> String {
        self.to_string()
    }
}

impl<T: Literal> Literal for [T] {
    fn to_literal(&self) -> String {
        let items: Vec<String> = self.iter().map(Literal::to_literal).collect();
        format!("{{{}}}", items.join(", "))
    }
}

impl<T: Literal> Literal for Vec<T> {
    fn to_literal(&self) -> String {
        self.as_slice().to_literal()
    }
}

impl<T: Literal + ?Sized> Literal for &T {
    fn to_literal(&self) -> String {
        (**self).to_literal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_are_quoted_and_escaped() {
        assert_eq!("plain".to_literal(), "\"plain\"");
        assert_eq!("a\\b\"c\nd".to_literal(), "\"a\\\\b\\\"c\\nd\"");
        assert_eq!(quote_string("it's"), "\"it's\"");
    }

    #[test]
    fn scalars_use_literal_syntax() {
        assert_eq!(true.to_literal(), "true");
        assert_eq!((-4i64).to_literal(), "-4");
        assert_eq!(1.0f64.to_literal(), "1.0");
    }

    #[test]
    fn slices_become_arrays() {
        let names = vec![
            TypeName::parse("A.B").unwrap(),
            TypeName::parse("C").unwrap(),
        ];
        assert_eq!(names.to_literal(), "{A.B, C}");
        assert_eq!(Vec::<i64>::new().to_literal(), "{}");
        assert_eq!(["x", "y"].as_slice().to_literal(), "{\"x\", \"y\"}");
    }
}
