//! Shared helpers for the gateway and client integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use skiff_domain::{Error, Result, Warned, Warnings};
use skiff_infra::errors::{uaa, v2, v3, ErrorDecoder};
use skiff_infra::{AccessTokenProvider, Gateway, GatewayBuilder};
use wiremock::MockServer;

pub const WARNINGS: &str = "X-Cf-Warnings";

/// Token provider whose refresh either swaps in `refreshed` or fails.
pub struct StaticTokens {
    token: Mutex<String>,
    refreshed: Option<String>,
    refresh_warnings: Vec<String>,
    refreshes: AtomicUsize,
}

impl StaticTokens {
    pub fn new(token: &str) -> Self {
        Self {
            token: Mutex::new(token.to_string()),
            refreshed: None,
            refresh_warnings: Vec::new(),
            refreshes: AtomicUsize::new(0),
        }
    }

    pub fn refreshing_to(mut self, token: &str) -> Self {
        self.refreshed = Some(token.to_string());
        self
    }

    pub fn with_refresh_warnings(mut self, warnings: &[&str]) -> Self {
        self.refresh_warnings = warnings.iter().map(|w| w.to_string()).collect();
        self
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokens {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.lock().clone())
    }

    async fn refresh(&self) -> Warned<()> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        let warnings = Warnings::from_iter(self.refresh_warnings.iter().cloned());
        match &self.refreshed {
            Some(token) => {
                *self.token.lock() = token.clone();
                Warned::ok((), warnings)
            }
            None => Warned::err(
                Error::InvalidToken { description: "refresh token expired".into() },
                warnings,
            ),
        }
    }
}

pub fn builder(server: &MockServer, decoder: ErrorDecoder) -> GatewayBuilder {
    Gateway::builder(decoder)
        .base_url(server.uri())
        .request_timeout(Duration::from_secs(5))
}

pub fn v2_gateway(server: &MockServer, tokens: Arc<dyn AccessTokenProvider>) -> Gateway {
    builder(server, v2::decode).token_provider(tokens).build().unwrap()
}

pub fn v3_gateway(server: &MockServer, tokens: Arc<dyn AccessTokenProvider>) -> Gateway {
    builder(server, v3::decode).token_provider(tokens).build().unwrap()
}

pub fn uaa_gateway(server: &MockServer) -> Gateway {
    builder(server, uaa::decode).build().unwrap()
}

pub fn tokens() -> Arc<StaticTokens> {
    Arc::new(StaticTokens::new("some-token"))
}

/// A v2 resource envelope.
pub fn v2_resource(guid: &str, entity: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "metadata": {"guid": guid, "url": format!("/v2/things/{guid}")},
        "entity": entity,
    })
}

/// A v2 index page.
pub fn v2_page(resources: Vec<serde_json::Value>, next_url: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "total_results": resources.len(),
        "total_pages": 1,
        "next_url": next_url,
        "prev_url": null,
        "resources": resources,
    })
}
