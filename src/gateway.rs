//! Delegated OAuth2 capability.
//!
//! The provider never speaks HTTP itself. Everything on the wire, exchanging
//! the authorization code and fetching the resource owner, sits behind
//! [`OAuth2Gateway`] so hosts and tests can substitute their own
//! implementation. [`crate::discord::DiscordOAuthClient`] is the default.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Token exchange and profile fetch against the identity provider.
#[async_trait]
pub trait OAuth2Gateway: Send + Sync {
    /// Exchanges an authorization code for an access token.
    async fn exchange_code(&self, code: &str) -> Result<AccessToken, GatewayError>;

    /// Fetches the resource owner's profile with the given token.
    async fn fetch_resource_owner(
        &self,
        token: &AccessToken,
    ) -> Result<RemoteIdentity, GatewayError>;
}

/// Token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    /// The access token itself.
    pub access_token: String,
    /// Token type, `Bearer` for Discord.
    pub token_type: String,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Refresh token, when the provider issues one.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Scopes actually granted.
    #[serde(default)]
    pub scope: Option<String>,
}

/// The resource owner's profile as the provider reports it.
///
/// Only the fields the login flow consumes; everything else in the profile
/// response is ignored, and nothing here is persisted by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteIdentity {
    /// Provider-assigned stable identifier.
    pub id: String,
    /// Provider username, free-form and not host-legal.
    pub username: String,
    /// Email address, when the granted scopes include one.
    #[serde(default)]
    pub email: Option<String>,
}

/// Errors from the delegated OAuth2 exchange.
///
/// Internal to the crate's wiring: by the time a failure reaches the host it
/// has collapsed into [`crate::error::AuthenticationFailed`], with the cause
/// kept in the logs.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport-level failure talking to the provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider answered the code exchange with an OAuth error body.
    #[error("Provider rejected the code exchange: {error} - {description}")]
    Rejected {
        /// OAuth error code, e.g. `invalid_grant`.
        error: String,
        /// Provider-supplied description, possibly empty.
        description: String,
    },

    /// Token endpoint failure without a parseable OAuth error body.
    #[error("Token exchange failed: {0}")]
    TokenEndpoint(String),

    /// Resource-owner endpoint failure or unusable profile body.
    #[error("Profile fetch failed: {0}")]
    ResourceOwner(String),
}

impl GatewayError {
    /// Creates a `Rejected` error from an OAuth error body.
    #[must_use]
    pub fn rejected(error: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Rejected {
            error: error.into(),
            description: description.into(),
        }
    }

    /// Returns `true` for transport-level failures.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Returns `true` when the provider itself refused the exchange.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}
