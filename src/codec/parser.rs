use super::grammar::{Entry, Grammar, Lexicon};
use super::{NoMatch, Result};

/// Runs one grammar entry point against complete input strings.
///
/// The parser borrows an immutable grammar and keeps no state between calls,
/// so a single instance can be shared freely across threads.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'g, E: Entry> {
    grammar: &'g Grammar<E>,
}

impl<'g, E: Entry> Parser<'g, E> {
    /// Create a parser for the given grammar.
    pub fn new(grammar: &'g Grammar<E>) -> Self {
        Self { grammar }
    }

    /// Parse the whole of `input`, failing if anything is left over.
    pub fn parse(&self, input: &str) -> Result<E::Tree> {
        let mut cursor = Cursor::new(input, self.grammar.lexicon());
        cursor.skip_ws();
        let tree = E::root(&mut cursor)?;
        cursor.skip_ws();
        if !cursor.eof() {
            return Err(cursor.error("end of input"));
        }
        Ok(tree)
    }
}

/// Position within the input plus the lexical tables of the active grammar.
pub struct Cursor<'a> {
    src: &'a str,
    bytes: &'a [u8],
    index: usize,
    lexicon: &'a Lexicon,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(src: &'a str, lexicon: &'a Lexicon) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            index: 0,
            lexicon,
        }
    }

    pub(crate) fn src(&self) -> &'a str {
        self.src
    }

    pub(crate) fn lexicon(&self) -> &'a Lexicon {
        self.lexicon
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn reset(&mut self, index: usize) {
        self.index = index;
    }

    pub(crate) fn eof(&self) -> bool {
        self.index >= self.bytes.len()
    }

    pub(crate) fn current(&self) -> Option<u8> {
        self.bytes.get(self.index).copied()
    }

    pub(crate) fn advance(&mut self) {
        if self.index < self.bytes.len() {
            self.index += 1;
        }
    }

    pub(crate) fn skip_ws(&mut self) {
        while let Some(ch) = self.current() {
            if ch.is_ascii_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Consume `byte` if it is next, ignoring leading whitespace.
    pub(crate) fn eat(&mut self, byte: u8) -> bool {
        self.skip_ws();
        if self.current() == Some(byte) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Like [`Cursor::eat`] but a missing byte is a failure.
    pub(crate) fn expect(&mut self, byte: u8, expected: &'static str) -> Result<()> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(self.error(expected))
        }
    }

    /// Advance while `pred` holds; returns how many bytes were consumed.
    pub(crate) fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> usize {
        let start = self.index;
        while let Some(ch) = self.current() {
            if pred(ch) {
                self.advance();
            } else {
                break;
            }
        }
        self.index - start
    }

    pub(crate) fn error(&self, expected: &'static str) -> NoMatch {
        NoMatch {
            offset: self.index,
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ast::Node;

    #[test]
    fn rejects_trailing_garbage() {
        let parser = Parser::new(Grammar::value());
        let err = parser.parse("1 2").unwrap_err();
        assert_eq!(err.offset, 2);
        assert_eq!(err.expected, "end of input");
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let parser = Parser::new(Grammar::value());
        let tree = parser.parse("  \n true \t").expect("parse");
        assert_eq!(tree, Node::Boolean(true));
    }

    #[test]
    fn empty_input_is_no_match() {
        let parser = Parser::new(Grammar::value());
        assert!(parser.parse("").is_err());
        assert!(parser.parse("   ").is_err());
    }

    #[test]
    fn parser_is_reusable_across_threads() {
        let parser = Parser::new(Grammar::value());
        std::thread::scope(|scope| {
            for n in 0..4 {
                scope.spawn(move || {
                    let text = format!("{{{n}, {n}}}");
                    assert!(parser.parse(&text).is_ok());
                });
            }
        });
    }
}
