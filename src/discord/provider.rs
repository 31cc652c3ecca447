//! The Discord authentication provider.
//!
//! Orchestrates one authorization-code flow per login attempt and normalizes
//! the resulting profile into the host's user record. The provider itself is
//! stateless; the host holds the attempt's key and secret across the
//! redirect.

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;
use uuid::Uuid;

use super::client::DiscordOAuthClient;
use crate::config::ProviderConfig;
use crate::error::AuthenticationFailed;
use crate::gateway::{GatewayError, OAuth2Gateway, RemoteIdentity};
use crate::host::SiteConfig;
use crate::provider::{
    AuthenticationProvider, CallbackParams, LoginAttempt, NormalizedUser, generate_state_token,
};
use crate::realname::derive_realname;

/// Scopes requested on every login: who the user is, plus their email.
const SCOPES: [&str; 2] = ["identify", "email"];

/// Prompt behavior: skip the consent screen for already-authorized users.
const PROMPT: &str = "none";

/// Message shown by hosts when the code exchange or profile fetch fails.
const EXCHANGE_FAILED_MESSAGE: &str = "Could not fetch a user profile from Discord";

/// Discord implementation of the host's [`AuthenticationProvider`] contract.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use wikiauth_discord::{
///     AuthenticationProvider, DiscordAuthProvider, ProviderConfig, StaticSiteConfig,
/// };
///
/// let site = Arc::new(StaticSiteConfig::new());
/// let provider = DiscordAuthProvider::new(
///     ProviderConfig::new("client-id", "client-secret"),
///     site,
/// );
///
/// let attempt = provider.login().await?;
/// // Store attempt.key and attempt.secret, redirect to attempt.authorization_url,
/// // then complete with provider.get_user(...) once the callback arrives.
/// ```
pub struct DiscordAuthProvider {
    config: ProviderConfig,
    gateway: Arc<dyn OAuth2Gateway>,
    site: Arc<dyn SiteConfig>,
}

impl DiscordAuthProvider {
    /// Creates a provider backed by the default [`DiscordOAuthClient`].
    #[must_use]
    pub fn new(config: ProviderConfig, site: Arc<dyn SiteConfig>) -> Self {
        let gateway: Arc<dyn OAuth2Gateway> = Arc::new(DiscordOAuthClient::new(config.clone()));
        Self {
            config,
            gateway,
            site,
        }
    }

    /// Creates a provider on a caller-supplied gateway (for proxies or test
    /// doubles).
    #[must_use]
    pub fn with_gateway(
        config: ProviderConfig,
        gateway: Arc<dyn OAuth2Gateway>,
        site: Arc<dyn SiteConfig>,
    ) -> Self {
        Self {
            config,
            gateway,
            site,
        }
    }

    /// Builds the authorization URL carrying `state`.
    fn authorization_url(&self, state: &str) -> Url {
        let mut url = self.config.authorization_endpoint();
        {
            let mut params = url.query_pairs_mut();
            params.append_pair("response_type", "code");
            params.append_pair("client_id", &self.config.client_id);
            if let Some(redirect) = &self.config.redirect_uri {
                params.append_pair("redirect_uri", redirect.as_str());
            }
            params.append_pair("scope", &SCOPES.join(" "));
            params.append_pair("state", state);
            params.append_pair("prompt", PROMPT);
        }
        url
    }

    /// Runs the delegated half of the flow: code for token, token for
    /// profile.
    async fn fetch_identity(&self, code: &str) -> Result<RemoteIdentity, GatewayError> {
        let token = self.gateway.exchange_code(code).await?;
        self.gateway.fetch_resource_owner(&token).await
    }
}

#[async_trait]
impl AuthenticationProvider for DiscordAuthProvider {
    async fn login(&self) -> Result<LoginAttempt, AuthenticationFailed> {
        let secret = generate_state_token();
        let authorization_url = self.authorization_url(&secret);
        let key = Uuid::new_v4().to_string();

        tracing::debug!(
            "Started login attempt {} towards {}",
            key,
            authorization_url.as_str().split('?').next().unwrap_or("")
        );

        Ok(LoginAttempt {
            key,
            secret,
            authorization_url,
        })
    }

    async fn get_user(
        &self,
        key: &str,
        secret: &str,
        callback: &CallbackParams,
    ) -> Result<NormalizedUser, AuthenticationFailed> {
        let Some(code) = callback.code.as_deref() else {
            tracing::debug!("Callback for attempt {} carried no authorization code", key);
            return Err(AuthenticationFailed::new());
        };

        // Absent, empty and mismatched state all fail identically.
        match callback.state.as_deref() {
            Some(state) if !state.is_empty() && state == secret => {}
            _ => {
                tracing::warn!("State token mismatch on callback for attempt {}", key);
                return Err(AuthenticationFailed::new());
            }
        }

        let identity = match self.fetch_identity(code).await {
            Ok(identity) => identity,
            Err(err) => {
                tracing::warn!("Completing login attempt {} failed: {}", key, err);
                return Err(AuthenticationFailed::with_message(EXCHANGE_FAILED_MESSAGE));
            }
        };

        tracing::info!(
            "Authenticated Discord user {} for login attempt {}",
            identity.id,
            key
        );

        let realname = derive_realname(self.site.as_ref(), &identity.id, &identity.username);
        Ok(NormalizedUser {
            name: identity.id,
            realname,
            email: identity.email,
        })
    }

    async fn logout(&self, _user: &NormalizedUser) {
        // No provider-side session to clear.
    }

    async fn save_extra_attributes(&self, _user_id: u64) {
        // No extra profile data is kept outside the host.
    }
}
