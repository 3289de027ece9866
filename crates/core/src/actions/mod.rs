//! Action Layer
//!
//! Each action is a small orchestration over the API clients and the job
//! engine. Every action returns a [`Warned`](skiff_domain::Warned) record:
//! warnings from every sub-call are concatenated in call order, on the
//! success path and on the error path, and the first failing sub-call
//! short-circuits the rest. Partial failures are never rolled back.

pub mod application;
pub mod auth;
pub mod logs;
pub mod lookup;
pub mod organization;
pub mod quota;
pub mod space;
pub mod target;
pub mod v3;
pub mod version;

use std::sync::Arc;

use skiff_domain::Settings;
use tokio_util::sync::CancellationToken;

pub use logs::LogStream;
pub use target::check_target;
pub use v3::DeployedApplication;
pub use version::check_minimum_version;

use crate::jobs::{DropletStaging, JobPoller, JobPolling, PackageProcessing, PollConfig};
use crate::ports::{
    Authenticator, CloudControllerV2, CloudControllerV3, JobSource, LogSource, TokenStore,
};

fn poller(
    source: Arc<dyn JobSource>,
    config: PollConfig,
    cancel: &CancellationToken,
) -> Arc<dyn JobPolling> {
    Arc::new(JobPoller::new(source, config).with_cancellation(cancel.clone()))
}

/// The API clients an [`Actor`] orchestrates.
#[derive(Clone)]
pub struct Clients {
    pub v2: Arc<dyn CloudControllerV2>,
    pub v2_jobs: Arc<dyn JobSource>,
    pub v3: Arc<dyn CloudControllerV3>,
    pub v3_jobs: Arc<dyn JobSource>,
    pub uaa: Arc<dyn Authenticator>,
    pub tokens: Arc<dyn TokenStore>,
    pub logs: Arc<dyn LogSource>,
}

/// Exposes the verbs consumed by commands.
pub struct Actor {
    v2: Arc<dyn CloudControllerV2>,
    v3: Arc<dyn CloudControllerV3>,
    uaa: Arc<dyn Authenticator>,
    tokens: Arc<dyn TokenStore>,
    logs: Arc<dyn LogSource>,
    v2_jobs: Arc<dyn JobPolling>,
    v3_jobs: Arc<dyn JobPolling>,
    staging: Arc<dyn JobPolling>,
    package_processing: Arc<dyn JobPolling>,
}

impl Actor {
    /// Create an actor whose pollers use the timeouts in `settings` and stop
    /// when `cancel` fires.
    pub fn new(clients: Clients, settings: &Settings, cancel: CancellationToken) -> Self {
        let jobs = PollConfig::with_timeout(settings.job_timeout);
        let staging = PollConfig::with_timeout(settings.staging_timeout);
        let droplets: Arc<dyn JobSource> = Arc::new(DropletStaging::new(clients.v3.clone()));
        let packages: Arc<dyn JobSource> = Arc::new(PackageProcessing::new(clients.v3.clone()));

        Self {
            v2_jobs: poller(clients.v2_jobs, jobs.clone(), &cancel),
            v3_jobs: poller(clients.v3_jobs, jobs.clone(), &cancel),
            staging: poller(droplets, staging, &cancel),
            package_processing: poller(packages, jobs, &cancel),
            v2: clients.v2,
            v3: clients.v3,
            uaa: clients.uaa,
            tokens: clients.tokens,
            logs: clients.logs,
        }
    }

    /// Replace the poller used for v2 jobs.
    pub fn with_v2_job_poller(mut self, poller: Arc<dyn JobPolling>) -> Self {
        self.v2_jobs = poller;
        self
    }

    /// Replace the poller used for v3 jobs.
    pub fn with_v3_job_poller(mut self, poller: Arc<dyn JobPolling>) -> Self {
        self.v3_jobs = poller;
        self
    }

    /// Replace the poller that follows droplet staging.
    pub fn with_staging_poller(mut self, poller: Arc<dyn JobPolling>) -> Self {
        self.staging = poller;
        self
    }

    /// Replace the poller that waits for uploaded packages.
    pub fn with_package_poller(mut self, poller: Arc<dyn JobPolling>) -> Self {
        self.package_processing = poller;
        self
    }
}
