/// Byte range into the source text a tree was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Offset of the first byte.
    pub start: usize,
    /// Offset one past the last byte.
    pub end: usize,
}

impl Span {
    /// Construct a span covering `start..end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Borrow the text this span covers.
    ///
    /// Spans are always produced on ASCII delimiters, so slicing the source
    /// they came from cannot split a character.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// Sign token preceding an unsigned numeric literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// `+`
    Plus,
    /// `-`
    Minus,
}

/// Dotted type path as it appeared in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathNode {
    /// Whether the path started with a `.` root marker.
    pub rooted: bool,
    /// Identifier spans, quotes included for quoted identifiers.
    pub segments: Vec<Span>,
}

/// `name = value` pair inside a record.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldNode {
    /// Field identifier.
    pub name: Span,
    /// Field value.
    pub value: Node,
}

/// Parse tree of the generic value grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Optional sign followed by an unsigned magnitude.
    Number {
        /// Sign token, if any.
        sign: Option<Sign>,
        /// Unsigned digits, fraction and exponent.
        magnitude: Span,
    },
    /// `true` or `false`.
    Boolean(bool),
    /// String contents between the quotes, escapes still encoded.
    String(Span),
    /// Bare type path.
    Path(PathNode),
    /// `( ... )`
    Tuple(Vec<Node>),
    /// `{ ... }`
    Array(Vec<Node>),
    /// Type-path prefixed record.
    Record {
        /// Record type name.
        name: PathNode,
        /// Fields in declaration order.
        fields: Vec<FieldNode>,
    },
}

/// Parse tree of one fixed-shape component record.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentNode {
    /// Class of the component.
    pub class_name: PathNode,
    /// Component identifier.
    pub name: Span,
    /// Comment string contents.
    pub comment: Span,
    /// Protection string contents.
    pub protected: Span,
    /// `final`, `flow`, `stream`, `replaceable` flags in that order.
    pub flags: [bool; 4],
    /// Variability string contents.
    pub variability: Span,
    /// Inner/outer string contents.
    pub inner_outer: Span,
    /// Input/output string contents.
    pub input_output: Span,
    /// Verbatim dimension expressions.
    pub dimensions: Vec<Span>,
}
