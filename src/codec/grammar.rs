//! Grammar of the value literals printed by the compiler.
//!
//! Each production is a function over a [`Cursor`]. The two entry points,
//! [`ValueLiteral`] and [`ComponentRecordArray`], share the lexical rules
//! (numbers, strings, identifiers, paths) but have distinct top-level
//! productions. Grammars are built once and never mutated afterwards.

use std::marker::PhantomData;
use std::sync::OnceLock;

use super::ast::{ComponentNode, FieldNode, Node, PathNode, Sign, Span};
use super::parser::Cursor;
use super::{NoMatch, Result};

/// Backslash escapes decoded inside string literals, as `(escape, decoded)`.
pub const ESCAPES: [(char, char); 9] = [
    ('\\', '\\'),
    ('\'', '\''),
    ('"', '"'),
    ('a', '\u{07}'),
    ('b', '\u{08}'),
    ('f', '\u{0c}'),
    ('n', '\n'),
    ('t', '\t'),
    ('v', '\u{0b}'),
];

const IDENT_START: u8 = 0b01;
const IDENT_CONTINUE: u8 = 0b10;

/// Character classes and escape tables shared by every production.
#[derive(Debug)]
pub struct Lexicon {
    classes: [u8; 256],
    escapes: [Option<char>; 128],
}

impl Lexicon {
    fn build() -> Self {
        let mut classes = [0u8; 256];
        for byte in (b'a'..=b'z').chain(b'A'..=b'Z').chain([b'_']) {
            classes[byte as usize] = IDENT_START | IDENT_CONTINUE;
        }
        for byte in b'0'..=b'9' {
            classes[byte as usize] = IDENT_CONTINUE;
        }

        let mut escapes = [None; 128];
        for (escape, decoded) in ESCAPES {
            escapes[escape as usize] = Some(decoded);
        }

        Self { classes, escapes }
    }

    /// Whether `byte` may start a plain identifier.
    pub fn is_ident_start(&self, byte: u8) -> bool {
        self.classes[byte as usize] & IDENT_START != 0
    }

    /// Whether `byte` may continue a plain identifier.
    pub fn is_ident_continue(&self, byte: u8) -> bool {
        self.classes[byte as usize] & IDENT_CONTINUE != 0
    }

    /// Decoded character for `\<ch>`, or `None` for an unknown escape.
    pub fn unescape(&self, ch: char) -> Option<char> {
        self.escapes.get(ch as usize).copied().flatten()
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A top-level production a [`Grammar`] can be instantiated for.
pub trait Entry: sealed::Sealed {
    /// Rule name used in diagnostics.
    const NAME: &'static str;
    /// Parse tree produced by this entry point.
    type Tree;
    /// Run the top-level production at the cursor.
    fn root(cursor: &mut Cursor<'_>) -> Result<Self::Tree>;
}

/// Entry point for a single generic value.
#[derive(Debug, Clone, Copy)]
pub struct ValueLiteral;

/// Entry point for the array of fixed-shape component records.
#[derive(Debug, Clone, Copy)]
pub struct ComponentRecordArray;

impl sealed::Sealed for ValueLiteral {}
impl sealed::Sealed for ComponentRecordArray {}

impl Entry for ValueLiteral {
    const NAME: &'static str = "value_literal";
    type Tree = Node;

    fn root(cursor: &mut Cursor<'_>) -> Result<Node> {
        value(cursor)
    }
}

impl Entry for ComponentRecordArray {
    const NAME: &'static str = "component_record_array";
    type Tree = Vec<ComponentNode>;

    fn root(cursor: &mut Cursor<'_>) -> Result<Vec<ComponentNode>> {
        component_record_array(cursor)
    }
}

/// Grammar instantiated for one entry point.
#[derive(Debug)]
pub struct Grammar<E> {
    lexicon: Lexicon,
    entry: PhantomData<fn() -> E>,
}

static VALUE_GRAMMAR: OnceLock<Grammar<ValueLiteral>> = OnceLock::new();
static COMPONENT_GRAMMAR: OnceLock<Grammar<ComponentRecordArray>> = OnceLock::new();

impl<E: Entry> Grammar<E> {
    fn build() -> Self {
        tracing::debug!(entry = E::NAME, "building grammar");
        Self {
            lexicon: Lexicon::build(),
            entry: PhantomData,
        }
    }

    pub(crate) fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }
}

impl Grammar<ValueLiteral> {
    /// The generic value grammar, built on first use.
    pub fn value() -> &'static Self {
        VALUE_GRAMMAR.get_or_init(Self::build)
    }
}

impl Grammar<ComponentRecordArray> {
    /// The component record array grammar, built on first use.
    pub fn components() -> &'static Self {
        COMPONENT_GRAMMAR.get_or_init(Self::build)
    }
}

/// Parse `input` as exactly one type path, with no surrounding whitespace.
pub(crate) fn type_path(input: &str) -> Result<PathNode> {
    let mut cursor = Cursor::new(input, Grammar::value().lexicon());
    let node = path(&mut cursor)?;
    if !cursor.eof() {
        return Err(cursor.error("end of type name"));
    }
    Ok(node)
}

fn value(c: &mut Cursor<'_>) -> Result<Node> {
    c.skip_ws();
    match c.current() {
        None => Err(c.error("value")),
        Some(b'+' | b'-' | b'0'..=b'9') => number(c),
        Some(b'"') => string(c).map(Node::String),
        Some(b'(') => sequence(c, b')').map(Node::Tuple),
        Some(b'{') => sequence(c, b'}').map(Node::Array),
        Some(_) => named(c),
    }
}

fn number(c: &mut Cursor<'_>) -> Result<Node> {
    let sign = match c.current() {
        Some(b'+') => Some(Sign::Plus),
        Some(b'-') => Some(Sign::Minus),
        _ => None,
    };
    if sign.is_some() {
        c.advance();
        c.skip_ws();
    }
    let magnitude = unsigned_number(c)?;
    Ok(Node::Number { sign, magnitude })
}

fn unsigned_number(c: &mut Cursor<'_>) -> Result<Span> {
    let start = c.index();
    if c.take_while(|b| b.is_ascii_digit()) == 0 {
        return Err(c.error("digits"));
    }
    if c.current() == Some(b'.') {
        c.advance();
        c.take_while(|b| b.is_ascii_digit());
    }
    if matches!(c.current(), Some(b'e' | b'E')) {
        let mark = c.index();
        c.advance();
        if matches!(c.current(), Some(b'+' | b'-')) {
            c.advance();
        }
        if c.take_while(|b| b.is_ascii_digit()) == 0 {
            c.reset(mark);
        }
    }
    Ok(Span::new(start, c.index()))
}

/// Returns the span between the quotes.
fn string(c: &mut Cursor<'_>) -> Result<Span> {
    if c.current() != Some(b'"') {
        return Err(c.error("string"));
    }
    c.advance();
    let start = c.index();
    while let Some(ch) = c.current() {
        match ch {
            b'"' => {
                let span = Span::new(start, c.index());
                c.advance();
                return Ok(span);
            }
            b'\\' => {
                c.advance();
                if c.eof() {
                    break;
                }
                c.advance();
            }
            _ => c.advance(),
        }
    }
    Err(c.error("closing quote"))
}

fn identifier(c: &mut Cursor<'_>) -> Result<Span> {
    let start = c.index();
    match c.current() {
        Some(delim @ (b'\'' | b'`')) => {
            c.advance();
            loop {
                match c.current() {
                    None => return Err(c.error("closing identifier quote")),
                    Some(b'\\') => {
                        c.advance();
                        if c.eof() {
                            return Err(c.error("closing identifier quote"));
                        }
                        c.advance();
                    }
                    Some(ch) if ch == delim => {
                        c.advance();
                        break;
                    }
                    Some(_) => c.advance(),
                }
            }
            if c.index() - start == 2 {
                c.reset(start);
                return Err(c.error("non-empty quoted identifier"));
            }
        }
        Some(ch) if c.lexicon().is_ident_start(ch) => {
            let lexicon = c.lexicon();
            c.take_while(|b| lexicon.is_ident_continue(b));
        }
        _ => return Err(c.error("identifier")),
    }
    Ok(Span::new(start, c.index()))
}

fn path(c: &mut Cursor<'_>) -> Result<PathNode> {
    let rooted = c.current() == Some(b'.');
    if rooted {
        c.advance();
    }
    let mut segments = vec![identifier(c)?];
    while c.current() == Some(b'.') {
        c.advance();
        segments.push(identifier(c)?);
    }
    Ok(PathNode { rooted, segments })
}

/// Booleans, bare paths and both record forms all start with a path.
fn named(c: &mut Cursor<'_>) -> Result<Node> {
    let name = path(c)?;
    if !name.rooted && name.segments.len() == 1 {
        match name.segments[0].slice(c.src()) {
            "true" => return Ok(Node::Boolean(true)),
            "false" => return Ok(Node::Boolean(false)),
            "record" => {
                let mark = c.index();
                c.skip_ws();
                if c.index() > mark && starts_path(c) {
                    return record_block(c);
                }
                c.reset(mark);
            }
            _ => {}
        }
    }

    let mark = c.index();
    if c.eat(b'(') {
        let fields = record_fields(c)?;
        return Ok(Node::Record { name, fields });
    }
    c.reset(mark);
    Ok(Node::Path(name))
}

fn starts_path(c: &Cursor<'_>) -> bool {
    match c.current() {
        Some(b'.' | b'\'' | b'`') => true,
        Some(ch) => c.lexicon().is_ident_start(ch),
        None => false,
    }
}

fn sequence(c: &mut Cursor<'_>, close: u8) -> Result<Vec<Node>> {
    let expected = if close == b')' { "`,` or `)`" } else { "`,` or `}`" };
    // opening delimiter
    c.advance();
    let mut items = Vec::new();
    if c.eat(close) {
        return Ok(items);
    }
    loop {
        items.push(value(c)?);
        if c.eat(b',') {
            continue;
        }
        c.expect(close, expected)?;
        return Ok(items);
    }
}

fn field(c: &mut Cursor<'_>) -> Result<FieldNode> {
    c.skip_ws();
    let name = identifier(c)?;
    c.expect(b'=', "`=`")?;
    let value = value(c)?;
    Ok(FieldNode { name, value })
}

/// `Path(name = value, ...)`, after the opening parenthesis.
fn record_fields(c: &mut Cursor<'_>) -> Result<Vec<FieldNode>> {
    let mut fields = Vec::new();
    if c.eat(b')') {
        return Ok(fields);
    }
    loop {
        fields.push(field(c)?);
        if c.eat(b',') {
            continue;
        }
        c.expect(b')', "`,` or `)`")?;
        return Ok(fields);
    }
}

/// `record Path name = value, ... end Path;`, after the `record` keyword.
fn record_block(c: &mut Cursor<'_>) -> Result<Node> {
    let name = path(c)?;
    let mut fields = Vec::new();
    c.skip_ws();
    if !at_keyword(c, "end") {
        loop {
            fields.push(field(c)?);
            if !c.eat(b',') {
                break;
            }
        }
        c.skip_ws();
        if !at_keyword(c, "end") {
            return Err(c.error("`end`"));
        }
    }
    c.reset(c.index() + "end".len());
    c.skip_ws();
    let closing_at = c.index();
    let closing = path(c)?;
    if !same_path(c.src(), &name, &closing) {
        c.reset(closing_at);
        return Err(c.error("record name matching its opening"));
    }
    c.expect(b';', "`;`")?;
    Ok(Node::Record { name, fields })
}

fn at_keyword(c: &Cursor<'_>, keyword: &str) -> bool {
    let rest = &c.src().as_bytes()[c.index()..];
    rest.starts_with(keyword.as_bytes())
        && rest
            .get(keyword.len())
            .is_none_or(|&b| !c.lexicon().is_ident_continue(b))
}

fn same_path(src: &str, a: &PathNode, b: &PathNode) -> bool {
    a.rooted == b.rooted
        && a.segments.len() == b.segments.len()
        && a.segments
            .iter()
            .zip(&b.segments)
            .all(|(x, y)| x.slice(src) == y.slice(src))
}

fn component_record_array(c: &mut Cursor<'_>) -> Result<Vec<ComponentNode>> {
    c.expect(b'{', "`{`")?;
    let mut items = Vec::new();
    if c.eat(b'}') {
        return Ok(items);
    }
    loop {
        items.push(component_record(c)?);
        if c.eat(b',') {
            continue;
        }
        c.expect(b'}', "`,` or `}`")?;
        return Ok(items);
    }
}

fn component_record(c: &mut Cursor<'_>) -> Result<ComponentNode> {
    c.expect(b'{', "`{`")?;
    c.skip_ws();
    let class_name = path(c)?;
    c.expect(b',', "`,`")?;
    c.skip_ws();
    let name = identifier(c)?;
    let comment = next_string(c)?;
    let protected = next_string(c)?;

    let mut flags = [false; 4];
    for flag in &mut flags {
        c.expect(b',', "`,`")?;
        *flag = boolean(c)?;
    }

    let variability = next_string(c)?;
    let inner_outer = next_string(c)?;
    let input_output = next_string(c)?;
    c.expect(b',', "`,`")?;
    let dimensions = dimensions(c)?;
    c.expect(b'}', "`}`")?;

    Ok(ComponentNode {
        class_name,
        name,
        comment,
        protected,
        flags,
        variability,
        inner_outer,
        input_output,
        dimensions,
    })
}

fn next_string(c: &mut Cursor<'_>) -> Result<Span> {
    c.expect(b',', "`,`")?;
    c.skip_ws();
    string(c)
}

fn boolean(c: &mut Cursor<'_>) -> Result<bool> {
    c.skip_ws();
    let at = c.index();
    let word = identifier(c)?;
    match word.slice(c.src()) {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => {
            c.reset(at);
            Err(c.error("`true` or `false`"))
        }
    }
}

fn dimensions(c: &mut Cursor<'_>) -> Result<Vec<Span>> {
    c.expect(b'{', "`{`")?;
    let mut dims = Vec::new();
    if c.eat(b'}') {
        return Ok(dims);
    }
    loop {
        dims.push(raw_dimension(c)?);
        if c.eat(b',') {
            continue;
        }
        c.expect(b'}', "`,` or `}`")?;
        return Ok(dims);
    }
}

/// Captures one dimension expression verbatim, up to the next top-level
/// `,` or `}`. Every closer must match the innermost open bracket; strings
/// and quoted identifiers are skipped whole.
fn raw_dimension(c: &mut Cursor<'_>) -> Result<Span> {
    c.skip_ws();
    let start = c.index();
    // Closers still owed, innermost last.
    let mut open: Vec<u8> = Vec::new();
    while let Some(ch) = c.current() {
        match ch {
            b'"' => {
                string(c)?;
                continue;
            }
            b'\'' | b'`' => {
                identifier(c)?;
                continue;
            }
            b'(' => open.push(b')'),
            b'[' => open.push(b']'),
            b'{' => open.push(b'}'),
            b',' | b'}' if open.is_empty() => break,
            b')' | b']' | b'}' => {
                if open.pop() != Some(ch) {
                    return Err(c.error("matching closing bracket"));
                }
            }
            _ => {}
        }
        c.advance();
    }
    if !open.is_empty() {
        return Err(c.error("closing bracket"));
    }

    let bytes = c.src().as_bytes();
    let mut end = c.index();
    while end > start && bytes[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    if end == start {
        return Err(NoMatch {
            offset: start,
            expected: "dimension expression",
        });
    }
    Ok(Span::new(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Parser;

    fn parse(text: &str) -> Result<Node> {
        Parser::new(Grammar::value()).parse(text)
    }

    #[test]
    fn sign_is_a_separate_token() {
        let tree = parse("- 12").expect("parse");
        assert_eq!(
            tree,
            Node::Number {
                sign: Some(Sign::Minus),
                magnitude: Span::new(2, 4)
            }
        );
    }

    #[test]
    fn exponent_without_digits_is_not_consumed() {
        assert!(parse("1e").is_err());
        assert!(parse("1e+").is_err());
        assert!(parse("1e-3").is_ok());
        assert!(parse("2.").is_ok());
    }

    #[test]
    fn booleans_are_case_sensitive() {
        assert_eq!(parse("false").unwrap(), Node::Boolean(false));
        assert!(matches!(parse("True").unwrap(), Node::Path(_)));
        assert!(matches!(parse("'true'").unwrap(), Node::Path(_)));
        assert!(matches!(parse("trueish").unwrap(), Node::Path(_)));
    }

    #[test]
    fn tuple_and_array_delimiters_do_not_mix() {
        assert!(matches!(parse("(1, 2)").unwrap(), Node::Tuple(items) if items.len() == 2));
        assert!(matches!(parse("{1, 2}").unwrap(), Node::Array(items) if items.len() == 2));
        assert!(parse("(1, 2}").is_err());
        assert!(parse("{1, 2)").is_err());
        assert!(parse("{1, 2,}").is_err());
    }

    #[test]
    fn record_requires_assignments() {
        assert!(matches!(parse("A.B(x = 1)").unwrap(), Node::Record { .. }));
        assert!(matches!(parse("NONE()").unwrap(), Node::Record { fields, .. } if fields.is_empty()));
        assert!(parse("A.B(1)").is_err());
    }

    #[test]
    fn record_block_names_must_match() {
        let ok = "record R\n  a = 1,\n  b = \"x\"\nend R;";
        assert!(matches!(parse(ok).unwrap(), Node::Record { fields, .. } if fields.len() == 2));
        assert!(parse("record R a = 1 end S;").is_err());
        assert!(parse("record R end R;").is_ok());
        assert!(matches!(parse("record").unwrap(), Node::Path(_)));
    }

    #[test]
    fn unterminated_string_fails() {
        assert!(parse("\"abc").is_err());
        assert!(parse("\"abc\\\"").is_err());
    }

    #[test]
    fn quoted_identifiers_may_hold_dots() {
        let tree = parse("A.'b.c'.D").expect("parse");
        let Node::Path(path) = tree else {
            panic!("expected path");
        };
        assert_eq!(path.segments.len(), 3);
        assert!(parse("A.''").is_err());
    }

    #[test]
    fn dimensions_capture_nested_expressions() {
        let text = "{{Real, x, \"\", \"public\", false, false, false, false, \
                    \"\", \"\", \"\", {size(a, 1), {1, 2}, \"s,t\"}}}";
        let tree = Parser::new(Grammar::components()).parse(text).expect("parse");
        let dims: Vec<&str> = tree[0].dimensions.iter().map(|s| s.slice(text)).collect();
        assert_eq!(dims, vec!["size(a, 1)", "{1, 2}", "\"s,t\""]);
    }

    #[test]
    fn unbalanced_dimension_fails() {
        let text = "{{Real, x, \"\", \"\", false, false, false, false, \"\", \"\", \"\", {n)}}}";
        assert!(Parser::new(Grammar::components()).parse(text).is_err());
    }

    fn parse_dimensions(dims: &str) -> Result<Vec<ComponentNode>> {
        let text = format!(
            "{{{{Real, x, \"\", \"\", false, false, false, false, \"\", \"\", \"\", {dims}}}}}"
        );
        Parser::new(Grammar::components()).parse(&text)
    }

    #[test]
    fn mismatched_dimension_brackets_fail() {
        // `}` cannot close the `(` opened by `size`
        let err = parse_dimensions("{size(a, 1}, n}").unwrap_err();
        assert_eq!(err.expected, "matching closing bracket");
        assert_eq!(err.offset, 69);

        let err = parse_dimensions("{(]}").unwrap_err();
        assert_eq!(err.expected, "matching closing bracket");

        assert!(parse_dimensions("{[(1)]}").is_ok());
        assert!(parse_dimensions("{f({1}, [2])}").is_ok());
    }

    #[test]
    fn grammars_are_built_once() {
        assert!(std::ptr::eq(Grammar::value(), Grammar::value()));
        assert!(std::ptr::eq(Grammar::components(), Grammar::components()));
        assert_eq!(ComponentRecordArray::NAME, "component_record_array");
    }
}
