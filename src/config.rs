//! Provider configuration.
//!
//! [`ProviderConfig`] carries the OAuth2 client credentials and the endpoint
//! set for one registered Discord application. Endpoints default to
//! Discord's public API; the overrides exist for proxies and tests.

use serde::{Deserialize, Serialize};
use url::Url;

/// Discord's authorization endpoint.
pub const DISCORD_AUTHORIZATION_URI: &str = "https://discord.com/api/oauth2/authorize";

/// Discord's token endpoint.
pub const DISCORD_TOKEN_URI: &str = "https://discord.com/api/oauth2/token";

/// Discord's resource-owner (profile) endpoint.
pub const DISCORD_RESOURCE_OWNER_URI: &str = "https://discord.com/api/users/@me";

/// Configuration for the Discord login provider.
///
/// Supplied once by the host when wiring the provider into its
/// authentication framework, and immutable afterwards.
///
/// # Example
///
/// ```
/// use url::Url;
/// use wikiauth_discord::ProviderConfig;
///
/// let config = ProviderConfig::new("client-id", "client-secret")
///     .with_redirect_uri(Url::parse("https://wiki.example.org/oauth/callback")?);
///
/// assert_eq!(config.authorization_endpoint().domain(), Some("discord.com"));
/// # Ok::<(), url::ParseError>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// OAuth client ID of the registered application.
    pub client_id: String,

    /// OAuth client secret of the registered application.
    pub client_secret: String,

    /// Redirect URI Discord sends the browser back to. When unset, Discord
    /// falls back to the redirect registered with the application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<Url>,

    /// Override for the authorization endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_uri: Option<Url>,

    /// Override for the token endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_uri: Option<Url>,

    /// Override for the resource-owner endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_owner_uri: Option<Url>,
}

impl ProviderConfig {
    /// Creates a configuration with the required client credentials.
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: None,
            authorization_uri: None,
            token_uri: None,
            resource_owner_uri: None,
        }
    }

    /// Sets the redirect URI.
    #[must_use]
    pub fn with_redirect_uri(mut self, uri: Url) -> Self {
        self.redirect_uri = Some(uri);
        self
    }

    /// Overrides the authorization endpoint.
    #[must_use]
    pub fn with_authorization_uri(mut self, uri: Url) -> Self {
        self.authorization_uri = Some(uri);
        self
    }

    /// Overrides the token endpoint.
    #[must_use]
    pub fn with_token_uri(mut self, uri: Url) -> Self {
        self.token_uri = Some(uri);
        self
    }

    /// Overrides the resource-owner endpoint.
    #[must_use]
    pub fn with_resource_owner_uri(mut self, uri: Url) -> Self {
        self.resource_owner_uri = Some(uri);
        self
    }

    /// The authorization endpoint: the override, or Discord's default.
    #[must_use]
    pub fn authorization_endpoint(&self) -> Url {
        self.authorization_uri
            .clone()
            .unwrap_or_else(|| default_endpoint(DISCORD_AUTHORIZATION_URI))
    }

    /// The token endpoint: the override, or Discord's default.
    #[must_use]
    pub fn token_endpoint(&self) -> Url {
        self.token_uri
            .clone()
            .unwrap_or_else(|| default_endpoint(DISCORD_TOKEN_URI))
    }

    /// The resource-owner endpoint: the override, or Discord's default.
    #[must_use]
    pub fn resource_owner_endpoint(&self) -> Url {
        self.resource_owner_uri
            .clone()
            .unwrap_or_else(|| default_endpoint(DISCORD_RESOURCE_OWNER_URI))
    }
}

fn default_endpoint(uri: &str) -> Url {
    Url::parse(uri).expect("default Discord endpoints are valid URLs")
}
