//! The HTTP gateway: the one place where requests are sent.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client as ReqwestClient, StatusCode};
use serde::de::DeserializeOwned;
use skiff_domain::constants::{
    BEARER_PREFIX, DEFAULT_DIAL_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use skiff_domain::{Error, Result, Warned, Warnings};
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace, warn};
use url::Url;

use super::request::{Request, RequestBody};
use super::streaming::{BodyReader, BodySink};
use super::warnings::{parse_warnings, InsecureNotice};
use crate::api::auth::AccessTokenProvider;
use crate::errors::{into_domain, ErrorDecoder};

const REDACTED: &str = "[PRIVATE DATA HIDDEN]";

/// Buffered response returned by [`Gateway::perform_request`].
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Response {
    /// Value of the `Location` header, if present.
    pub fn location(&self) -> Option<&str> {
        self.headers.get(reqwest::header::LOCATION).and_then(|value| value.to_str().ok())
    }
}

/// HTTP execution engine for one API dialect.
#[derive(Clone)]
pub struct Gateway {
    client: ReqwestClient,
    base_url: Url,
    decoder: ErrorDecoder,
    tokens: Option<Arc<dyn AccessTokenProvider>>,
    request_timeout: Duration,
    cancel: CancellationToken,
    notice: InsecureNotice,
    trace: bool,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.tokens.is_some())
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Gateway {
    /// Start building a gateway that decodes errors with `decoder`.
    pub fn builder(decoder: ErrorDecoder) -> GatewayBuilder {
        GatewayBuilder::new(decoder)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends `request` and buffers the whole response body.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn perform_request(&self, request: Request) -> Warned<Response> {
        let mut warnings = self.notice.start_batch();
        let result = self.execute_with_refresh(&request, &mut warnings).await;
        Warned::new(result, warnings)
    }

    /// Sends `request` and decodes the JSON body into `T`.
    pub async fn perform_request_for_json<T: DeserializeOwned>(
        &self,
        request: Request,
    ) -> Warned<T> {
        let (result, warnings) = self.perform_request(request).await.into_parts();
        let decoded = result.and_then(|response| {
            serde_json::from_slice::<T>(&response.body).map_err(into_domain)
        });
        Warned::new(decoded, warnings)
    }

    /// Sends `request` and hands the response body to `sink` as it arrives.
    ///
    /// Streaming requests are never retried, including on a 401.
    #[instrument(skip(self, request, sink), fields(method = %request.method, path = %request.path))]
    pub async fn perform_request_for_streaming_body(
        &self,
        request: Request,
        sink: &mut dyn BodySink,
    ) -> Warned<()> {
        let mut warnings = self.notice.start_batch();
        let result = self.stream_steps(&request, sink, &mut warnings).await;
        Warned::new(result, warnings)
    }

    async fn stream_steps(
        &self,
        request: &Request,
        sink: &mut dyn BodySink,
        warnings: &mut Warnings,
    ) -> Result<()> {
        let response = self.send(request, false).await?;
        warnings.append(parse_warnings(response.headers()));

        let status = response.status();
        if !status.is_success() {
            let body = self.guard(async { response.bytes().await.map_err(into_domain) }).await?;
            self.dump_response(status, &body);
            return Err((self.decoder)(status.as_u16(), &body));
        }

        let reader = BodyReader::from_response(response, self.request_timeout);
        self.guard(sink.consume(reader)).await
    }

    async fn execute_with_refresh(
        &self,
        request: &Request,
        warnings: &mut Warnings,
    ) -> Result<Response> {
        match self.execute_once(request, warnings).await {
            Err(Error::InvalidToken { description }) if request.authenticated => {
                warn!(path = %request.path, "access token rejected, refreshing");
                let refreshed = match &self.tokens {
                    Some(tokens) => warnings.absorb(tokens.refresh().await),
                    None => Err(Error::Unauthenticated),
                };
                if let Err(err) = refreshed {
                    warn!(error = %err, "token refresh failed");
                    return Err(Error::InvalidToken { description });
                }

                match self.execute_once(request, warnings).await {
                    Err(Error::Unauthorized { message }) => {
                        Err(Error::InvalidToken { description: message })
                    }
                    other => other,
                }
            }
            other => other,
        }
    }

    async fn execute_once(&self, request: &Request, warnings: &mut Warnings) -> Result<Response> {
        let response = self.send(request, true).await?;
        let status = response.status();
        let headers = response.headers().clone();
        warnings.append(parse_warnings(&headers));

        let body = self.guard(async { response.bytes().await.map_err(into_domain) }).await?;
        self.dump_response(status, &body);

        if status.is_success() {
            Ok(Response { status, headers, body })
        } else {
            Err((self.decoder)(status.as_u16(), &body))
        }
    }

    async fn send(&self, request: &Request, buffered: bool) -> Result<reqwest::Response> {
        let outgoing = self.build(request, buffered).await?;
        let method = outgoing.method().clone();
        let url = outgoing.url().clone();
        self.dump_request(&outgoing);

        debug!(%method, %url, "sending HTTP request");
        let response = self
            .guard(async {
                let pending = self.client.execute(outgoing);
                if buffered {
                    pending.await.map_err(into_domain)
                } else {
                    // Only the response head is bounded here; the body has its idle deadline.
                    tokio::time::timeout(self.request_timeout, pending)
                        .await
                        .map_err(|_| Error::Request { cause: "request timed out".into() })?
                        .map_err(into_domain)
                }
            })
            .await;

        match &response {
            Ok(response) => {
                let status = response.status();
                debug!(%method, %url, %status, "received HTTP response");
            }
            Err(err) => debug!(%method, %url, error = %err, "HTTP request failed"),
        }
        response
    }

    async fn build(&self, request: &Request, buffered: bool) -> Result<reqwest::Request> {
        let url = request.url(&self.base_url)?;
        let mut builder = self.client.request(request.method.clone(), url);
        builder = builder.header(ACCEPT, "application/json");

        if request.authenticated {
            let tokens = self.tokens.as_ref().ok_or(Error::Unauthenticated)?;
            let token = tokens.access_token().await?;
            builder = builder.header(AUTHORIZATION, format!("{BEARER_PREFIX}{token}"));
        }

        if let Some((username, password)) = &request.basic_auth {
            builder = builder.basic_auth(username, Some(password));
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(bytes) => {
                builder.header(CONTENT_TYPE, "application/json").body(bytes.clone())
            }
            RequestBody::Form(pairs) => builder.form(pairs),
            RequestBody::File { field, path } => {
                let file = tokio::fs::File::open(path).await.map_err(into_domain)?;
                let length = file.metadata().await.map_err(into_domain)?.len();
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| field.clone());
                let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
                let part = Part::stream_with_length(body, length)
                    .file_name(file_name)
                    .mime_str("application/zip")
                    .map_err(into_domain)?;
                builder.multipart(Form::new().part(field.clone(), part))
            }
        };

        if buffered && !request.is_streaming_upload() {
            builder = builder.timeout(self.request_timeout);
        }

        builder.build().map_err(into_domain)
    }

    /// Runs `operation` unless cancellation fires first.
    async fn guard<T>(&self, operation: impl Future<Output = Result<T>>) -> Result<T> {
        if self.cancel.is_cancelled() {
            return Err(Error::RequestAborted);
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Error::RequestAborted),
            result = operation => result,
        }
    }

    fn dump_request(&self, request: &reqwest::Request) {
        if !self.trace {
            return;
        }
        let headers = redacted_headers(request.headers());
        let body = request
            .body()
            .and_then(|body| body.as_bytes())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default();
        trace!(method = %request.method(), url = %request.url(), ?headers, %body, "REQUEST");
    }

    fn dump_response(&self, status: StatusCode, body: &[u8]) {
        if self.trace {
            trace!(%status, body = %String::from_utf8_lossy(body), "RESPONSE");
        }
    }
}

fn redacted_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let value = if *name == AUTHORIZATION {
                REDACTED.to_string()
            } else {
                value.to_str().unwrap_or_default().to_string()
            };
            (name.to_string(), value)
        })
        .collect()
}

/// `skiff/<version> (<os>; <arch>)`
pub fn default_user_agent() -> String {
    format!(
        "skiff/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Builder for [`Gateway`].
pub struct GatewayBuilder {
    base_url: Option<String>,
    decoder: ErrorDecoder,
    user_agent: String,
    dial_timeout: Duration,
    request_timeout: Duration,
    skip_ssl_validation: bool,
    tokens: Option<Arc<dyn AccessTokenProvider>>,
    cancel: CancellationToken,
    notice: InsecureNotice,
    trace: bool,
}

impl GatewayBuilder {
    fn new(decoder: ErrorDecoder) -> Self {
        Self {
            base_url: None,
            decoder,
            user_agent: default_user_agent(),
            dial_timeout: Duration::from_secs(DEFAULT_DIAL_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            skip_ssl_validation: false,
            tokens: None,
            cancel: CancellationToken::new(),
            notice: InsecureNotice::disarmed(),
            trace: false,
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    pub fn dial_timeout(mut self, timeout: Duration) -> Self {
        self.dial_timeout = timeout;
        self
    }

    /// Overall deadline for buffered requests and the idle deadline for streams.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn skip_ssl_validation(mut self, skip: bool) -> Self {
        self.skip_ssl_validation = skip;
        self
    }

    pub fn token_provider(mut self, tokens: Arc<dyn AccessTokenProvider>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn insecure_notice(mut self, notice: InsecureNotice) -> Self {
        self.notice = notice;
        self
    }

    pub fn trace(mut self, enabled: bool) -> Self {
        self.trace = enabled;
        self
    }

    pub fn build(self) -> Result<Gateway> {
        let raw = self
            .base_url
            .ok_or_else(|| Error::Config { message: "gateway requires a base URL".into() })?;
        let base_url = Url::parse(&raw).map_err(into_domain)?;

        let mut builder = ReqwestClient::builder()
            .connect_timeout(self.dial_timeout)
            .user_agent(self.user_agent)
            .no_proxy();

        if self.skip_ssl_validation {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(into_domain)?;

        Ok(Gateway {
            client,
            base_url,
            decoder: self.decoder,
            tokens: self.tokens,
            request_timeout: self.request_timeout,
            cancel: self.cancel,
            notice: self.notice,
            trace: self.trace,
        })
    }
}
