//! Bounded exponential job polling

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use skiff_domain::constants::{
    DEFAULT_JOB_TIMEOUT_SECS, POLL_INITIAL_INTERVAL_MS, POLL_MAX_INTERVAL_MS, POLL_MULTIPLIER,
    UNKNOWN_JOB_FAILURE,
};
use skiff_domain::{Error, Job, JobState, Result, Warned, Warnings};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::JobPolling;
use crate::ports::JobSource;

/// Polling cadence and overall deadline.
#[derive(Debug, Clone, PartialEq)]
pub struct PollConfig {
    pub initial_interval: Duration,
    pub multiplier: f64,
    pub max_interval: Duration,
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_JOB_TIMEOUT_SECS))
    }
}

impl PollConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            initial_interval: Duration::from_millis(POLL_INITIAL_INTERVAL_MS),
            multiplier: POLL_MULTIPLIER,
            max_interval: Duration::from_millis(POLL_MAX_INTERVAL_MS),
            timeout,
        }
    }

    /// Delay before the poll with index `attempt` (0-based), capped at
    /// `max_interval`.
    pub fn interval_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let delay = self.initial_interval.as_millis() as f64 * self.multiplier.powi(exponent);
        let delay_ms = delay.min(self.max_interval.as_millis() as f64) as u64;
        Duration::from_millis(delay_ms)
    }
}

/// Polls a [`JobSource`] until the job reaches a terminal state.
pub struct JobPoller {
    source: Arc<dyn JobSource>,
    config: PollConfig,
    cancel: CancellationToken,
}

impl JobPoller {
    pub fn new(source: Arc<dyn JobSource>, config: PollConfig) -> Self {
        Self { source, config, cancel: CancellationToken::new() }
    }

    /// Abort polling with `Error::RequestAborted` when `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    async fn drive(&self, job: Job, warnings: &mut Warnings) -> Result<()> {
        let deadline = Instant::now() + self.config.timeout;
        let mut current = job;
        let mut attempt = 0u32;
        let mut last_poll = false;

        loop {
            match current.state {
                JobState::Finished => return Ok(()),
                JobState::Failed => {
                    let cause =
                        current.error.unwrap_or_else(|| UNKNOWN_JOB_FAILURE.to_string());
                    return Err(Error::JobFailed { guid: current.guid, cause });
                }
                JobState::Queued | JobState::Running => {}
            }

            if last_poll {
                warn!(job_guid = %current.guid, "job polling deadline reached");
                return Err(Error::JobTimeout { guid: current.guid });
            }

            let interval = self.config.interval_for(attempt);
            let remaining = deadline.saturating_duration_since(Instant::now());
            // The poll after a sleep that reaches the deadline is the last one.
            last_poll = remaining <= interval;
            self.pause(interval.min(remaining)).await?;

            current = warnings.absorb(self.source.get_job(&current.guid).await)?;
            attempt = attempt.saturating_add(1);
            debug!(job_guid = %current.guid, state = %current.state, attempt, "polled job");
        }
    }

    async fn pause(&self, duration: Duration) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(Error::RequestAborted);
        }
        tokio::select! {
            _ = self.cancel.cancelled() => Err(Error::RequestAborted),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }
}

#[async_trait]
impl JobPolling for JobPoller {
    #[instrument(skip(self, job), fields(job_guid = %job.guid))]
    async fn poll_job(&self, job: Job) -> Warned<()> {
        let mut warnings = Warnings::new();
        let result = self.drive(job, &mut warnings).await;
        Warned::new(result, warnings)
    }
}
