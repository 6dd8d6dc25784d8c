//! Driving calls through a compiler session.
//!
//! The process that actually talks to the compiler lives outside this crate;
//! it is modelled by the [`Session`] trait and only ever hands back fully
//! received reply strings.

use std::io;
use thiserror::Error;

use super::call::Call;
use super::reply::{CallError, CallResult, classify_components, classify_value};
use crate::codec::Value;
use crate::config::CodecConfig;
use crate::types::{Component, TypeName};

/// Transport failures reported by a [`Session`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// IO error talking to the compiler process.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The compiler process is no longer running.
    #[error("compiler session closed")]
    Closed,

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// Something that evaluates one expression and returns the raw reply.
pub trait Session {
    /// Send `expression` and wait for the complete reply text.
    fn send_expression(&mut self, expression: &str) -> Result<String, SessionError>;
}

impl<S: Session + ?Sized> Session for &mut S {
    fn send_expression(&mut self, expression: &str) -> Result<String, SessionError> {
        (**self).send_expression(expression)
    }
}

/// Call encoder, session and reply classifier wired together.
pub struct Interactive<S> {
    session: S,
    config: CodecConfig,
}

impl<S: Session> Interactive<S> {
    /// Wrap a session with the default configuration.
    pub fn new(session: S) -> Self {
        Self::with_config(session, CodecConfig::default())
    }

    /// Wrap a session with an explicit configuration.
    pub fn with_config(session: S, config: CodecConfig) -> Self {
        Self { session, config }
    }

    /// Active configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Borrow the underlying session.
    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    /// Release the underlying session.
    pub fn into_inner(self) -> S {
        self.session
    }

    /// Send a call and return the raw reply.
    pub fn call_raw(&mut self, call: &Call) -> CallResult<String> {
        let expression = call.encode(self.config.call_style);
        if self.config.log_calls {
            tracing::debug!(operation = call.name(), %expression, "sending call");
        }
        let reply = self.session.send_expression(&expression)?;
        tracing::trace!(reply = %self.config.preview(&reply), "received reply");
        Ok(reply)
    }

    /// Send a call whose reply is one generic value.
    pub fn call_value(&mut self, call: &Call) -> CallResult<Option<Value>> {
        let reply = self.call_raw(call)?;
        classify_value(&reply)
    }

    /// Send a call whose reply is an array of component records.
    pub fn call_components(&mut self, call: &Call) -> CallResult<Option<Vec<Component>>> {
        let reply = self.call_raw(call)?;
        classify_components(&reply)
    }

    /// Send a call whose value, if any, is not needed.
    pub fn call_void(&mut self, call: &Call) -> CallResult<()> {
        let reply = self.call_raw(call)?;
        classify_value(&reply).map(|_| ())
    }

    /// Compiler version string.
    pub fn get_version(&mut self) -> CallResult<String> {
        let value = self.call_value(&Call::new("getVersion"))?;
        match value {
            Some(Value::String(text)) => Ok(text),
            other => Err(unexpected("string", other)),
        }
    }

    /// Names of the classes nested in `class`, or of all top-level classes.
    pub fn get_class_names(
        &mut self,
        class: Option<&TypeName>,
        recursive: bool,
    ) -> CallResult<Vec<TypeName>> {
        let mut call = Call::new("getClassNames");
        if let Some(class) = class {
            call = call.arg(class);
        }
        if recursive {
            call = call.kwarg("recursive", &true);
        }

        match self.call_value(&call)? {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::Path(name) => Ok(name),
                    other => Err(unexpected("type name", Some(other))),
                })
                .collect(),
            other => Err(unexpected("array", other)),
        }
    }

    /// Components declared in `class`.
    pub fn get_components(&mut self, class: &TypeName) -> CallResult<Vec<Component>> {
        let call = Call::new("getComponents").arg(class);
        Ok(self.call_components(&call)?.unwrap_or_default())
    }
}

fn unexpected(expected: &'static str, found: Option<Value>) -> CallError {
    match found {
        Some(value) => CallError::UnexpectedValue {
            expected,
            found: value.kind(),
        },
        None => CallError::MissingValue { expected },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct Scripted {
        sent: Vec<String>,
        replies: VecDeque<String>,
    }

    impl Scripted {
        fn reply(text: &str) -> Self {
            Self {
                sent: Vec::new(),
                replies: VecDeque::from([text.to_string()]),
            }
        }
    }

    impl Session for Scripted {
        fn send_expression(&mut self, expression: &str) -> Result<String, SessionError> {
            self.sent.push(expression.to_string());
            self.replies.pop_front().ok_or(SessionError::Closed)
        }
    }

    #[test]
    fn class_names_decode_paths() {
        let mut omc = Interactive::new(Scripted::reply("{Modelica.Blocks,Modelica.Icons}\n"));
        let base = TypeName::parse("Modelica").unwrap();
        let names = omc.get_class_names(Some(&base), true).unwrap();
        assert_eq!(names.len(), 2);
        assert_eq!(names[1].to_string(), "Modelica.Icons");
        assert_eq!(
            omc.into_inner().sent,
            vec!["getClassNames(Modelica, recursive=true)"]
        );
    }

    #[test]
    fn wrong_shape_is_unexpected_value() {
        let mut omc = Interactive::new(Scripted::reply("42"));
        let err = omc.get_version().unwrap_err();
        assert!(matches!(
            err,
            CallError::UnexpectedValue {
                expected: "string",
                found: crate::codec::ValueKind::Integer
            }
        ));
    }

    #[test]
    fn closed_session_surfaces_as_session_error() {
        let mut omc = Interactive::new(Scripted::default());
        let err = omc.call_void(&Call::new("quit")).unwrap_err();
        assert!(matches!(err, CallError::Session(SessionError::Closed)));
    }

    #[test]
    fn void_call_accepts_blank_reply() {
        let mut omc = Interactive::new(Scripted::reply("\n"));
        omc.call_void(&Call::new("clear")).unwrap();
    }
}
