//! Configuration view
//!
//! A read-only snapshot of the persisted CLI configuration plus the runtime
//! settings read from the environment. Loading and saving live in
//! `skiff_infra::config`.

use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DIAL_TIMEOUT_SECS, DEFAULT_JOB_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_STAGING_TIMEOUT_SECS, DEFAULT_UAA_CLIENT, DEFAULT_UAA_CLIENT_SECRET,
};
use crate::errors::{Error, Result};
use crate::types::TokenPair;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationFields {
    #[serde(rename = "GUID")]
    pub guid: String,
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpaceFields {
    #[serde(rename = "GUID")]
    pub guid: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "AllowSSH")]
    pub allow_ssh: bool,
}

/// Persisted CLI state: target, tokens, targeted org and space.
///
/// Tokens are opaque here. Only the token source replaces them.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Config {
    pub target: String,
    #[serde(rename = "APIVersion")]
    pub api_version: String,
    pub authorization_endpoint: String,
    pub doppler_endpoint: String,
    pub access_token: String,
    pub refresh_token: String,
    #[serde(rename = "UAAOAuthClient")]
    pub uaa_oauth_client: String,
    #[serde(rename = "UAAOAuthClientSecret")]
    pub uaa_oauth_client_secret: String,
    pub organization_fields: OrganizationFields,
    pub space_fields: SpaceFields,
    #[serde(rename = "SSLDisabled")]
    pub ssl_disabled: bool,
    pub locale: String,
    #[serde(rename = "MinCLIVersion")]
    pub min_cli_version: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("target", &self.target)
            .field("api_version", &self.api_version)
            .field("authorization_endpoint", &self.authorization_endpoint)
            .field("doppler_endpoint", &self.doppler_endpoint)
            .field("logged_in", &self.is_logged_in())
            .field("organization_fields", &self.organization_fields)
            .field("space_fields", &self.space_fields)
            .field("ssl_disabled", &self.ssl_disabled)
            .field("locale", &self.locale)
            .finish()
    }
}

impl Config {
    pub fn has_target(&self) -> bool {
        !self.target.is_empty()
    }

    pub fn is_logged_in(&self) -> bool {
        !self.access_token.is_empty() || !self.refresh_token.is_empty()
    }

    pub fn has_targeted_org(&self) -> bool {
        !self.organization_fields.guid.is_empty()
    }

    pub fn has_targeted_space(&self) -> bool {
        !self.space_fields.guid.is_empty()
    }

    pub fn tokens(&self) -> TokenPair {
        TokenPair::new(self.access_token.clone(), self.refresh_token.clone())
    }

    pub fn set_tokens(&mut self, tokens: &TokenPair) {
        self.access_token = tokens.access_token.clone();
        self.refresh_token = tokens.refresh_token.clone();
    }

    pub fn unset_org_and_space(&mut self) {
        self.organization_fields = OrganizationFields::default();
        self.space_fields = SpaceFields::default();
    }

    /// UAA client id and secret, defaulting to the public `cf` client.
    pub fn uaa_client_credentials(&self) -> (&str, &str) {
        if self.uaa_oauth_client.is_empty() {
            (DEFAULT_UAA_CLIENT, DEFAULT_UAA_CLIENT_SECRET)
        } else {
            (&self.uaa_oauth_client, &self.uaa_oauth_client_secret)
        }
    }

    /// User name claim of the current access token.
    pub fn current_user(&self) -> Result<String> {
        let payload = self
            .access_token
            .split('.')
            .nth(1)
            .ok_or_else(|| config_error("access token is not a JWT"))?;
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| config_error(format!("access token payload is not base64: {e}")))?;
        let claims: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| config_error(format!("access token payload is not JSON: {e}")))?;
        claims
            .get("user_name")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| config_error("access token has no user_name claim"))
    }
}

fn config_error(message: impl Into<String>) -> Error {
    Error::Config { message: message.into() }
}

/// Runtime knobs read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub dial_timeout: Duration,
    pub request_timeout: Duration,
    pub job_timeout: Duration,
    pub staging_timeout: Duration,
    pub trace: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dial_timeout: Duration::from_secs(DEFAULT_DIAL_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            job_timeout: Duration::from_secs(DEFAULT_JOB_TIMEOUT_SECS),
            staging_timeout: Duration::from_secs(DEFAULT_STAGING_TIMEOUT_SECS),
            trace: false,
        }
    }
}
