//! Classification of raw compiler replies.
//!
//! A reply is, in this order: a value of the expected shape, an error
//! message printed by the compiler, intentionally empty, or malformed.

use thiserror::Error;

use super::session::SessionError;
use crate::codec::{self, NoMatch, Value, ValueKind};
use crate::types::Component;

/// Failures a caller of the protocol can observe.
#[derive(Debug, Error)]
pub enum CallError {
    /// The compiler answered with its own error message.
    #[error("{0}")]
    Compiler(String),

    /// The reply is neither a value, an error message, nor empty.
    #[error("malformed reply {reply:?}: {source}")]
    MalformedReply {
        /// Verbatim reply.
        reply: String,
        /// Why the grammar rejected it.
        #[source]
        source: NoMatch,
    },

    /// The session could not deliver the call or its reply.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// A well-formed value had the wrong shape for a typed query.
    #[error("expected {expected}, found {found}")]
    UnexpectedValue {
        /// Shape the query needed.
        expected: &'static str,
        /// Shape that arrived.
        found: ValueKind,
    },

    /// A typed query received a blank reply.
    #[error("expected {expected}, found an empty reply")]
    MissingValue {
        /// Shape the query needed.
        expected: &'static str,
    },
}

/// Convenience result alias for protocol operations.
pub type CallResult<T> = std::result::Result<T, CallError>;

/// Terminal states of the classifier, used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The reply decoded.
    Success,
    /// The reply is a compiler error message.
    ReportedError,
    /// The reply is blank.
    EmptyOk,
    /// The reply is none of the above.
    Malformed,
}

impl Outcome {
    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::ReportedError => "reported_error",
            Outcome::EmptyOk => "empty_ok",
            Outcome::Malformed => "malformed",
        }
    }
}

/// Classify `reply` using `decode` as the expected entry point.
///
/// Returns `Ok(None)` for a blank reply.
pub(crate) fn classify<T>(
    reply: &str,
    decode: impl FnOnce(&str) -> codec::Result<T>,
) -> CallResult<Option<T>> {
    let (outcome, result) = match decode(reply) {
        Ok(value) => (Outcome::Success, Ok(Some(value))),
        Err(_) if reply.trim_start().starts_with("Error") => (
            Outcome::ReportedError,
            Err(CallError::Compiler(reply.to_string())),
        ),
        Err(_) if reply.trim().is_empty() => (Outcome::EmptyOk, Ok(None)),
        Err(source) => (
            Outcome::Malformed,
            Err(CallError::MalformedReply {
                reply: reply.to_string(),
                source,
            }),
        ),
    };

    match outcome {
        Outcome::ReportedError => tracing::warn!(reply, "compiler reported an error"),
        _ => tracing::debug!(outcome = outcome.as_str(), "classified reply"),
    }
    result
}

/// Classify a reply expected to hold one generic value.
pub fn classify_value(reply: &str) -> CallResult<Option<Value>> {
    classify(reply, codec::decode_value)
}

/// Classify a reply expected to hold an array of component records.
pub fn classify_components(reply: &str) -> CallResult<Option<Vec<Component>>> {
    classify(reply, codec::decode_components)
}

/// Terminal state a classification result corresponds to, or `None` for
/// errors raised outside the classifier.
pub fn outcome_of<T>(result: &CallResult<Option<T>>) -> Option<Outcome> {
    match result {
        Ok(Some(_)) => Some(Outcome::Success),
        Ok(None) => Some(Outcome::EmptyOk),
        Err(CallError::Compiler(_)) => Some(Outcome::ReportedError),
        Err(CallError::MalformedReply { .. }) => Some(Outcome::Malformed),
        Err(
            CallError::Session(_)
            | CallError::UnexpectedValue { .. }
            | CallError::MissingValue { .. },
        ) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_reply_succeeds() {
        assert_eq!(classify_value("true").unwrap(), Some(Value::Boolean(true)));
    }

    #[test]
    fn error_prefix_is_reported() {
        let err = classify_value("Error: something failed").unwrap_err();
        assert!(matches!(&err, CallError::Compiler(text) if text == "Error: something failed"));
        assert_eq!(err.to_string(), "Error: something failed");

        let err = classify_value("\n  Error: indented").unwrap_err();
        assert!(matches!(err, CallError::Compiler(text) if text == "\n  Error: indented"));
    }

    #[test]
    fn blank_reply_is_empty() {
        assert_eq!(classify_value("").unwrap(), None);
        assert_eq!(classify_value(" \n\t").unwrap(), None);
        assert_eq!(classify_components("\n").unwrap(), None);
    }

    #[test]
    fn anything_else_is_malformed() {
        let err = classify_value("not-a-valid-literal!!").unwrap_err();
        assert!(matches!(err, CallError::MalformedReply { .. }));
    }

    #[test]
    fn parse_success_wins_over_error_prefix() {
        // A bare identifier starting with `Error` is a valid type name.
        let value = classify_value("ErrorLevel.warning").unwrap();
        assert_eq!(value.unwrap().as_path().unwrap().to_string(), "ErrorLevel.warning");
    }

    #[test]
    fn outcome_names_terminal_state() {
        assert_eq!(outcome_of(&classify_value("1")), Some(Outcome::Success));
        assert_eq!(outcome_of(&classify_value("")), Some(Outcome::EmptyOk));
        assert_eq!(outcome_of(&classify_value("Error")), Some(Outcome::Success));
        assert_eq!(outcome_of(&classify_value("Error:")), Some(Outcome::ReportedError));
        assert_eq!(outcome_of(&classify_value("?")), Some(Outcome::Malformed));
    }
}
