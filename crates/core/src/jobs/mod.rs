//! Async Job Engine
//!
//! Drives server-side jobs (deletes, stagings, package processing) to a
//! terminal state with bounded exponential polling and cancellation.

pub mod poller;
pub mod staging;

use async_trait::async_trait;
use skiff_domain::{Job, Warned};

pub use poller::{JobPoller, PollConfig};
pub use staging::{droplet_job, package_job, DropletStaging, PackageProcessing};

/// Drives a job to a terminal state.
#[async_trait]
pub trait JobPolling: Send + Sync {
    /// Returns once `job` finishes, fails, or the deadline fires. The
    /// warnings are the concatenation of every poll's warnings.
    async fn poll_job(&self, job: Job) -> Warned<()>;
}
