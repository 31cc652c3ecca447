//! # wikiauth-discord
//!
//! Discord login provider for wiki hosts with a pluggable authentication
//! framework.
//!
//! This crate provides:
//! - The host-facing [`provider::AuthenticationProvider`] contract
//! - A Discord implementation driving the OAuth2 authorization-code flow
//! - Anti-forgery state token generation and validation
//! - Display-name derivation honoring the host's naming rules
//! - A swappable gateway seam for the token and profile endpoints
//!
//! ## Overview
//!
//! The host drives one authorization-code flow per login attempt. `login`
//! returns the authorization URL together with a state token and an opaque
//! correlation key; the host stores both, redirects the browser, and hands
//! them back unchanged when Discord calls back. `get_user` validates the
//! callback, exchanges the code, fetches the profile and returns a
//! [`provider::NormalizedUser`]: stable login name from the provider id, a
//! host-legal display name derived from the profile username, and the email
//! address. Sessions and account persistence stay with the host.
//!
//! ## Modules
//!
//! - [`provider`] - Host-facing contract and attempt/callback types
//! - [`config`] - Client credentials and endpoint configuration
//! - [`host`] - Site settings consulted for the host's naming rules
//! - [`realname`] - Display-name derivation
//! - [`gateway`] - Delegated token-exchange and profile-fetch capability
//! - [`discord`] - The Discord provider and its reqwest-backed gateway
//! - [`error`] - Uniform host-facing failure

pub mod config;
pub mod discord;
pub mod error;
pub mod gateway;
pub mod host;
pub mod provider;
pub mod realname;

pub use config::{
    DISCORD_AUTHORIZATION_URI, DISCORD_RESOURCE_OWNER_URI, DISCORD_TOKEN_URI, ProviderConfig,
};
pub use discord::{DiscordAuthProvider, DiscordOAuthClient};
pub use error::AuthenticationFailed;
pub use gateway::{AccessToken, GatewayError, OAuth2Gateway, RemoteIdentity};
pub use host::{INVALID_USERNAME_CHARS, LEGAL_TITLE_CHARS, SiteConfig, StaticSiteConfig};
pub use provider::{
    AuthenticationProvider, CallbackParams, LoginAttempt, NormalizedUser, generate_state_token,
};
pub use realname::derive_realname;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use wikiauth_discord::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::ProviderConfig;
    pub use crate::discord::{DiscordAuthProvider, DiscordOAuthClient};
    pub use crate::error::AuthenticationFailed;
    pub use crate::gateway::{AccessToken, GatewayError, OAuth2Gateway, RemoteIdentity};
    pub use crate::host::{SiteConfig, StaticSiteConfig};
    pub use crate::provider::{
        AuthenticationProvider, CallbackParams, LoginAttempt, NormalizedUser,
    };
}
