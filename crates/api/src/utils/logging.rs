use std::time::Duration;

use anyhow::Context;
use skiff_domain::{Error, Warned};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the tracing filter directive.
pub const LOG_FILTER_ENV: &str = "SKIFF_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Output shape of the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Install the global subscriber. Logs go to stderr so command output on
/// stdout stays clean.
///
/// The filter is read from `SKIFF_LOG` and falls back to `warn`. Fails when a
/// subscriber is already installed or the directive does not parse.
pub fn init_tracing(format: LogFormat) -> anyhow::Result<()> {
    let filter = env_filter(std::env::var(LOG_FILTER_ENV).ok().as_deref())?;
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).without_time())
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    }
    .context("failed to install tracing subscriber")
}

fn env_filter(directive: Option<&str>) -> anyhow::Result<EnvFilter> {
    match directive.map(str::trim).filter(|d| !d.is_empty()) {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid {LOG_FILTER_ENV} directive: {directive}")),
        None => Ok(EnvFilter::new(DEFAULT_FILTER)),
    }
}

/// Stable label for an error, suitable for log fields.
#[inline]
pub fn error_label(error: &Error) -> &'static str {
    match error {
        Error::InvalidToken { .. } => "invalid_token",
        Error::BadCredentials => "bad_credentials",
        Error::Unauthorized { .. } => "unauthorized",
        Error::Forbidden { .. } => "forbidden",
        Error::ResourceNotFound { .. } | Error::NotFound { .. } => "not_found",
        Error::MultipleEntitiesFound { .. } => "multiple_entities",
        Error::NameTaken { .. } => "name_taken",
        Error::UnprocessableEntity { .. } => "unprocessable_entity",
        Error::BadRequest { .. } => "bad_request",
        Error::NotStaged { .. } => "not_staged",
        Error::ServiceUnavailable { .. } => "service_unavailable",
        Error::Http { .. } => "http",
        Error::Request { .. } => "request",
        Error::RequestAborted => "aborted",
        Error::Decode { .. } => "decode",
        Error::JobFailed { .. } => "job_failed",
        Error::JobTimeout { .. } => "job_timeout",
        Error::ApiVersionTooLow { .. } => "api_version_too_low",
        Error::NoApiTargeted => "no_api_targeted",
        Error::Unauthenticated => "unauthenticated",
        Error::NoOrgTargeted => "no_org_targeted",
        Error::NoSpaceTargeted => "no_space_targeted",
        Error::Config { .. } => "config",
    }
}

/// Log the outcome of an action with structured fields.
///
/// `action` should be a stable identifier such as `"delete_organization"`.
/// Warnings are counted, not logged; the command layer prints them.
pub fn log_action_outcome<T>(action: &str, elapsed: Duration, outcome: &Warned<T>) {
    let duration_ms = elapsed.as_millis() as u64;
    let warnings = outcome.warnings.len();

    match &outcome.result {
        Ok(_) => info!(action, duration_ms, warnings, "action_succeeded"),
        Err(err) => warn!(
            action,
            duration_ms,
            warnings,
            category = %err.category(),
            error = error_label(err),
            "action_failed"
        ),
    }
}

/// Process exit code for a finished action: `0` on success, otherwise the
/// error's code.
pub fn exit_code<T>(outcome: &Warned<T>) -> i32 {
    match &outcome.result {
        Ok(_) => 0,
        Err(err) => err.exit_code(),
    }
}
