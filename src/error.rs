//! Host-facing error type.
//!
//! Every way a login attempt can fail (missing authorization code, state
//! token mismatch, failed code exchange, failed profile fetch) surfaces to
//! the host as the single [`AuthenticationFailed`] value. The host only
//! decides whether to show the login form again; the underlying cause is
//! recorded in `tracing` output, never in the error itself.

use thiserror::Error;

/// A login attempt did not produce a user.
///
/// Carries an optional human-readable message for hosts that display one.
/// Deliberately opaque: no error codes and no transient/permanent split, so
/// a forged callback is indistinguishable from a mistyped one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("authentication did not produce a user{}", .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct AuthenticationFailed {
    message: Option<String>,
}

impl AuthenticationFailed {
    /// Creates a failure without a display message.
    #[must_use]
    pub fn new() -> Self {
        Self { message: None }
    }

    /// Creates a failure carrying a message the host may show to the user.
    #[must_use]
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// The optional display message.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
