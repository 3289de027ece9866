//! UAA client: password and refresh-token grants.

use async_trait::async_trait;
use serde::Deserialize;
use skiff_core::Authenticator;
use skiff_domain::{TokenPair, Warned};
use tracing::instrument;

use crate::http::{Gateway, Request};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: String,
}

impl From<TokenResponse> for TokenPair {
    fn from(value: TokenResponse) -> Self {
        TokenPair::new(value.access_token, value.refresh_token)
    }
}

/// Client for `{authorization_endpoint}/oauth/token`.
#[derive(Debug, Clone)]
pub struct UaaClient {
    gateway: Gateway,
    client_id: String,
    client_secret: String,
}

impl UaaClient {
    /// `gateway` must decode errors with the UAA dialect.
    pub fn new(
        gateway: Gateway,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self { gateway, client_id: client_id.into(), client_secret: client_secret.into() }
    }

    fn token_request(&self) -> Request {
        Request::post("/oauth/token").basic_auth(&self.client_id, &self.client_secret)
    }

    #[instrument(skip(self, password))]
    pub async fn password_grant(&self, username: &str, password: &str) -> Warned<TokenPair> {
        let request = self.token_request().form([
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
        ]);
        self.gateway.perform_request_for_json::<TokenResponse>(request).await.map(TokenPair::from)
    }

    #[instrument(skip_all)]
    pub async fn refresh_grant(&self, refresh_token: &str) -> Warned<TokenPair> {
        let request = self
            .token_request()
            .form([("grant_type", "refresh_token"), ("refresh_token", refresh_token)]);
        self.gateway.perform_request_for_json::<TokenResponse>(request).await.map(TokenPair::from)
    }
}

#[async_trait]
impl Authenticator for UaaClient {
    async fn authenticate(&self, username: &str, password: &str) -> Warned<TokenPair> {
        self.password_grant(username, password).await
    }
}
