//! Request/reply protocol spoken with the compiler's scripting interface.
//!
//! Outgoing calls are rendered by [`Call`]; incoming replies go through the
//! classifier in [`reply`], which is the only place parse failures are
//! turned into caller-visible outcomes.

/// Call encoder.
pub mod call;
/// Reply classifier and outward-facing errors.
pub mod reply;
/// Session seam and the driver combining encoder, session and classifier.
pub mod session;

pub use call::{Call, CallStyle};
pub use reply::{CallError, CallResult, Outcome, classify_components, classify_value, outcome_of};
pub use session::{Interactive, Session, SessionError};
