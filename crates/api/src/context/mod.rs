//! Application context - dependency injection container

use std::path::{Path, PathBuf};
use std::sync::Arc;

use skiff_core::actions::check_target;
use skiff_core::{Actor, Clients};
use skiff_domain::{ApiInfo, Config, Error, Result, Settings, Warned, Warnings};
use skiff_infra::errors::{uaa, v2, v3};
use skiff_infra::{
    config, get_root_info, log_stream_base_url, AccessTokenProvider, ErrorDecoder, Gateway,
    InsecureNotice, LogClient, UaaClient, UaaTokenSource, V2Client, V3Client,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Application context - holds the actor and the state it was built from
pub struct AppContext {
    pub config: Config,
    pub settings: Settings,
    pub info: ApiInfo,
    actor: Actor,
    tokens: Arc<UaaTokenSource>,
    cancel: CancellationToken,
    config_path: PathBuf,
}

/// Shared gateway settings for one target.
struct GatewayFactory<'a> {
    settings: &'a Settings,
    skip_ssl_validation: bool,
    notice: InsecureNotice,
    cancel: CancellationToken,
}

impl GatewayFactory<'_> {
    fn build(
        &self,
        base_url: &str,
        decoder: ErrorDecoder,
        tokens: Option<Arc<dyn AccessTokenProvider>>,
    ) -> Result<Gateway> {
        let mut builder = Gateway::builder(decoder)
            .base_url(base_url)
            .dial_timeout(self.settings.dial_timeout)
            .request_timeout(self.settings.request_timeout)
            .skip_ssl_validation(self.skip_ssl_validation)
            .cancellation(self.cancel.clone())
            .insecure_notice(self.notice.clone())
            .trace(self.settings.trace);
        if let Some(tokens) = tokens {
            builder = builder.token_provider(tokens);
        }
        builder.build()
    }
}

impl AppContext {
    /// Create a context from the config file and environment.
    ///
    /// Fetches the controller root document, so the returned warnings are
    /// the first batch of the process.
    pub async fn new() -> Warned<Self> {
        let loaded = config::config_path().and_then(|path| {
            let config = config::load_from_file(&path)?;
            let settings = config::load_settings()?;
            Ok((path, config, settings))
        });
        match loaded {
            Ok((path, config, settings)) => Self::from_parts(config, settings, path).await,
            Err(err) => Warned::err(err, Warnings::new()),
        }
    }

    /// Create a context for an explicit config and settings.
    ///
    /// `config_path` is where [`AppContext::shutdown`] writes the config back.
    /// Fails with `NoApiTargeted` when the config has no target.
    #[instrument(skip(config, settings), fields(endpoint = %config.target))]
    pub async fn from_parts(
        config: Config,
        settings: Settings,
        config_path: PathBuf,
    ) -> Warned<Self> {
        let mut warnings = Warnings::new();
        let result = Self::build(config, settings, config_path, &mut warnings).await;
        Warned::new(result, warnings)
    }

    async fn build(
        config: Config,
        settings: Settings,
        config_path: PathBuf,
        warnings: &mut Warnings,
    ) -> Result<Self> {
        if !config.has_target() {
            return Err(Error::NoApiTargeted);
        }

        let cancel = CancellationToken::new();
        let factory = GatewayFactory {
            settings: &settings,
            skip_ssl_validation: config.ssl_disabled,
            notice: if config.ssl_disabled {
                InsecureNotice::armed()
            } else {
                InsecureNotice::disarmed()
            },
            cancel: cancel.clone(),
        };

        let root = factory.build(&config.target, v2::decode, None)?;
        let info = warnings.absorb(get_root_info(&root).await)?;
        debug!(api_version = %info.api_version, v3_version = %info.v3_version, "fetched root info");

        let uaa_endpoint =
            first_non_empty(&info.authorization_endpoint, &config.authorization_endpoint)
                .ok_or_else(|| Error::Config {
                    message: "no authorization endpoint advertised".into(),
                })?;
        let (client_id, client_secret) = config.uaa_client_credentials();
        let uaa_client = Arc::new(UaaClient::new(
            factory.build(uaa_endpoint, uaa::decode, None)?,
            client_id,
            client_secret,
        ));
        let tokens = Arc::new(UaaTokenSource::new(uaa_client.clone(), config.tokens()));
        let provider: Arc<dyn AccessTokenProvider> = tokens.clone();

        let logging_endpoint = log_stream_base_url(
            first_non_empty(&info.logging_endpoint, &config.doppler_endpoint)
                .unwrap_or(&config.target),
        );

        let v2_client = Arc::new(V2Client::new(factory.build(
            &config.target,
            v2::decode,
            Some(provider.clone()),
        )?));
        let v3_client = Arc::new(V3Client::new(
            factory.build(&config.target, v3::decode, Some(provider.clone()))?,
            info.v3_version.clone(),
        ));
        let logs = Arc::new(LogClient::new(factory.build(
            &logging_endpoint,
            v2::decode,
            Some(provider),
        )?));

        let clients = Clients {
            v2: v2_client.clone(),
            v2_jobs: v2_client,
            v3: v3_client.clone(),
            v3_jobs: v3_client,
            uaa: uaa_client,
            tokens: tokens.clone(),
            logs,
        };
        let actor = Actor::new(clients, &settings, cancel.clone());

        info!(endpoint = %config.target, "context ready");
        Ok(Self { config, settings, info, actor, tokens, cancel, config_path })
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Abort every in-flight request, poll and stream.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Target preconditions against the loaded config.
    pub fn check_target(&self, need_org: bool, need_space: bool) -> Result<()> {
        check_target(&self.config, need_org, need_space)
    }

    /// Password grant. A successful login clears the targeted org and space.
    pub async fn authenticate(&mut self, username: &str, password: &str) -> Warned<()> {
        let outcome = self.actor.authenticate(username, password).await;
        if outcome.is_ok() {
            self.config.set_tokens(&self.tokens.tokens());
            self.config.unset_org_and_space();
        }
        outcome
    }

    /// Write the current tokens and root info back to the config file.
    ///
    /// This is the only place the config file is written.
    pub fn shutdown(mut self) -> Result<()> {
        self.config.set_tokens(&self.tokens.tokens());
        self.config.api_version = self.info.api_version.clone();
        if !self.info.authorization_endpoint.is_empty() {
            self.config.authorization_endpoint = self.info.authorization_endpoint.clone();
        }
        if !self.info.logging_endpoint.is_empty() {
            self.config.doppler_endpoint = self.info.logging_endpoint.clone();
        }
        config::save_to_file(&self.config, &self.config_path)?;
        debug!(path = %self.config_path.display(), "config saved");
        Ok(())
    }
}

fn first_non_empty<'a>(preferred: &'a str, fallback: &'a str) -> Option<&'a str> {
    [preferred, fallback].into_iter().find(|value| !value.is_empty())
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &self.config)
            .field("info", &self.info)
            .field("config_path", &self.config_path)
            .finish_non_exhaustive()
    }
}
