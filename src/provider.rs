//! Host authentication contract.
//!
//! The wiki host drives logins through [`AuthenticationProvider`]: `login`
//! starts an attempt and yields the redirect, `get_user` completes it from
//! the provider's callback. The host persists the attempt's key and secret
//! across the browser round-trip (typically in its session store) and hands
//! them back unchanged.
//!
//! # Flow
//!
//! 1. **login** - build the authorization URL carrying a fresh state token;
//!    the host redirects the browser to it.
//! 2. **redirect** - the provider sends the browser back with `code` and
//!    `state` in the query string.
//! 3. **get_user** - validate the state token, exchange the code, fetch the
//!    profile and hand the host a [`NormalizedUser`].

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use url::Url;
use url::form_urlencoded;

use crate::error::AuthenticationFailed;

/// Contract between the host's pluggable login framework and one provider.
#[async_trait]
pub trait AuthenticationProvider: Send + Sync {
    /// Begins a login attempt.
    ///
    /// Returns the authorization URL to redirect the browser to, together
    /// with the anti-forgery state token and an opaque correlation key. The
    /// host must round-trip both values verbatim into
    /// [`get_user`](Self::get_user).
    async fn login(&self) -> Result<LoginAttempt, AuthenticationFailed>;

    /// Completes a login attempt from the provider's callback.
    ///
    /// `key` and `secret` are the values returned by `login`; `callback`
    /// carries the query parameters of the inbound redirect. Every failure
    /// mode collapses into [`AuthenticationFailed`].
    async fn get_user(
        &self,
        key: &str,
        secret: &str,
        callback: &CallbackParams,
    ) -> Result<NormalizedUser, AuthenticationFailed>;

    /// Called when the host ends the user's session. Providers holding
    /// provider-side session state clean it up here.
    async fn logout(&self, user: &NormalizedUser);

    /// Called after the host has persisted a new account, with the
    /// host-assigned user id. Providers storing extra profile data attach it
    /// here.
    async fn save_extra_attributes(&self, user_id: u64);
}

/// One started login attempt.
///
/// The host stores `key` and `secret` and supplies both, unchanged, to the
/// completion call. Both values are opaque to the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginAttempt {
    /// Opaque correlation identifier for this attempt.
    pub key: String,

    /// Anti-forgery state token; the callback's `state` must match it.
    pub secret: String,

    /// Where to send the browser.
    pub authorization_url: Url,
}

/// Query parameters of the provider's callback redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackParams {
    /// The authorization code; absent when the user denied consent or the
    /// provider reported an error instead.
    #[serde(default)]
    pub code: Option<String>,

    /// The echoed state token.
    #[serde(default)]
    pub state: Option<String>,
}

impl CallbackParams {
    /// Creates callback parameters from explicit values.
    #[must_use]
    pub fn new(code: Option<String>, state: Option<String>) -> Self {
        Self { code, state }
    }

    /// Parses `code` and `state` out of a raw callback query string.
    ///
    /// Percent-encoding is decoded and parameters other than `code` and
    /// `state` are ignored. A present-but-empty parameter stays present as
    /// `Some("")`, which the completion phase rejects like any other bad
    /// state.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "code" => params.code = Some(value.into_owned()),
                "state" => params.state = Some(value.into_owned()),
                _ => {}
            }
        }
        params
    }

    /// Parses callback parameters out of a full callback URL.
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        Self::from_query(url.query().unwrap_or_default())
    }
}

/// The user record handed to the host after a completed login.
///
/// The host consumes it to create or update an account; the provider keeps
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedUser {
    /// Stable login name, the provider-assigned id.
    pub name: String,

    /// Host-legal display name.
    pub realname: String,

    /// Email address, when the provider shared one.
    pub email: Option<String>,
}

/// Generates a fresh anti-forgery state token.
///
/// 32 random bytes, base64url-encoded without padding (43 characters).
#[must_use]
pub fn generate_state_token() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    // `gen` is reserved in Rust 2024, hence the raw identifier
    let bytes: [u8; 32] = rng.r#gen();
    URL_SAFE_NO_PAD.encode(bytes)
}
