//! Reqwest-backed OAuth2 gateway for Discord.
//!
//! Talks to the token and resource-owner endpoints from the
//! [`ProviderConfig`]; the endpoint overrides point it at proxies or mock
//! servers.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::ProviderConfig;
use crate::gateway::{AccessToken, GatewayError, OAuth2Gateway, RemoteIdentity};

/// Timeout applied to token and profile requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The default [`OAuth2Gateway`] implementation.
pub struct DiscordOAuthClient {
    config: ProviderConfig,
    http_client: reqwest::Client,
}

impl DiscordOAuthClient {
    /// Creates a client with a 30-second request timeout.
    #[must_use]
    pub fn new(config: ProviderConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    /// Creates a client on a caller-supplied `reqwest::Client` (for shared
    /// connection pools or custom timeouts).
    #[must_use]
    pub fn with_http_client(config: ProviderConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }
}

#[async_trait]
impl OAuth2Gateway for DiscordOAuthClient {
    /// Exchanges an authorization code for an access token.
    async fn exchange_code(&self, code: &str) -> Result<AccessToken, GatewayError> {
        let token_endpoint = self.config.token_endpoint();

        // Build request body
        let mut params = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];

        // The redirect must match the one used in the authorization request
        let redirect_binding;
        if let Some(redirect) = &self.config.redirect_uri {
            redirect_binding = redirect.to_string();
            params.push(("redirect_uri", &redirect_binding));
        }

        tracing::debug!(
            "Exchanging authorization code with token endpoint: {}",
            token_endpoint
        );

        let response = self
            .http_client
            .post(token_endpoint.as_str())
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            // Try to parse OAuth error
            if let Ok(oauth_error) = serde_json::from_str::<OAuthErrorResponse>(&body) {
                return Err(GatewayError::rejected(
                    oauth_error.error,
                    oauth_error.error_description.unwrap_or_default(),
                ));
            }

            return Err(GatewayError::TokenEndpoint(format!(
                "HTTP {} - {}",
                status, body
            )));
        }

        let token: AccessToken = response.json().await.map_err(|e| {
            GatewayError::TokenEndpoint(format!("Failed to parse token response: {}", e))
        })?;

        Ok(token)
    }

    /// Fetches the resource owner's profile with a bearer request.
    async fn fetch_resource_owner(
        &self,
        token: &AccessToken,
    ) -> Result<RemoteIdentity, GatewayError> {
        let endpoint = self.config.resource_owner_endpoint();

        tracing::debug!("Fetching resource owner from {}", endpoint);

        let response = self
            .http_client
            .get(endpoint.as_str())
            .bearer_auth(&token.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatewayError::ResourceOwner(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let identity: RemoteIdentity = response.json().await.map_err(|e| {
            GatewayError::ResourceOwner(format!("Failed to parse profile response: {}", e))
        })?;

        Ok(identity)
    }
}

/// OAuth error response body from the token endpoint.
#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: String,
    error_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> ProviderConfig {
        ProviderConfig::new("client-123", "secret-456")
            .with_redirect_uri(Url::parse("https://wiki.example.org/callback").unwrap())
            .with_token_uri(Url::parse(&format!("{}/oauth2/token", server.uri())).unwrap())
            .with_resource_owner_uri(Url::parse(&format!("{}/users/@me", server.uri())).unwrap())
    }

    fn bearer(value: &str) -> AccessToken {
        AccessToken {
            access_token: value.to_string(),
            token_type: "Bearer".to_string(),
            expires_in: Some(604_800),
            refresh_token: None,
            scope: Some("identify email".to_string()),
        }
    }

    #[tokio::test]
    async fn test_exchange_code_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=test-code"))
            .and(body_string_contains("client_id=client-123"))
            .and(body_string_contains("client_secret=secret-456"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "mock-access-token",
                "token_type": "Bearer",
                "expires_in": 604800,
                "refresh_token": "mock-refresh-token",
                "scope": "identify email"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = DiscordOAuthClient::new(config_for(&server));
        let token = client.exchange_code("test-code").await.unwrap();

        assert_eq!(token.access_token, "mock-access-token");
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, Some(604_800));
    }

    #[tokio::test]
    async fn test_exchange_code_sends_redirect_uri() {
        let server = MockServer::start().await;

        // The redirect URI is form-encoded in the request body.
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .and(body_string_contains("redirect_uri=https%3A%2F%2Fwiki.example.org%2Fcallback"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "mock-access-token",
                "token_type": "Bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = DiscordOAuthClient::new(config_for(&server));
        client.exchange_code("test-code").await.unwrap();
    }

    #[tokio::test]
    async fn test_exchange_code_oauth_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "Invalid \"code\" in request."
            })))
            .mount(&server)
            .await;

        let client = DiscordOAuthClient::new(config_for(&server));
        let err = client.exchange_code("expired-code").await.unwrap_err();

        assert!(err.is_rejection());
        assert!(err.to_string().contains("invalid_grant"));
    }

    #[tokio::test]
    async fn test_exchange_code_unparseable_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let client = DiscordOAuthClient::new(config_for(&server));
        let err = client.exchange_code("test-code").await.unwrap_err();

        assert!(matches!(err, GatewayError::TokenEndpoint(_)));
        assert!(err.to_string().contains("502"));
    }

    #[tokio::test]
    async fn test_fetch_resource_owner_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/@me"))
            .and(header("authorization", "Bearer mock-access-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "80351110224678912",
                "username": "Nelly",
                "discriminator": "1337",
                "avatar": "8342729096ea3675442027381ff50dfe",
                "email": "nelly@example.com"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = DiscordOAuthClient::new(config_for(&server));
        let identity = client
            .fetch_resource_owner(&bearer("mock-access-token"))
            .await
            .unwrap();

        assert_eq!(identity.id, "80351110224678912");
        assert_eq!(identity.username, "Nelly");
        assert_eq!(identity.email.as_deref(), Some("nelly@example.com"));
    }

    #[tokio::test]
    async fn test_fetch_resource_owner_unauthorized() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/@me"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "message": "401: Unauthorized",
                "code": 0
            })))
            .mount(&server)
            .await;

        let client = DiscordOAuthClient::new(config_for(&server));
        let err = client.fetch_resource_owner(&bearer("revoked")).await.unwrap_err();

        assert!(matches!(err, GatewayError::ResourceOwner(_)));
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_fetch_resource_owner_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/@me"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = DiscordOAuthClient::new(config_for(&server));
        let err = client.fetch_resource_owner(&bearer("t")).await.unwrap_err();

        assert!(err.to_string().contains("Failed to parse profile response"));
    }
}
