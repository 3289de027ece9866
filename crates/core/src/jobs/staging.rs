//! Job adapters over droplet staging and package processing
//!
//! Staging and package processing have no job resource of their own. These
//! adapters present the droplet and the package as jobs so the poller can
//! drive them like any other server-side task.

use std::sync::Arc;

use async_trait::async_trait;
use skiff_domain::{Droplet, DropletState, Job, JobState, Package, PackageState, Warned};

use crate::ports::{CloudControllerV3, JobSource};

pub fn droplet_job(droplet: &Droplet) -> Job {
    let state = match droplet.state {
        DropletState::Staged => JobState::Finished,
        DropletState::Failed | DropletState::Expired => JobState::Failed,
        DropletState::Staging
        | DropletState::Copying
        | DropletState::AwaitingUpload
        | DropletState::ProcessingUpload => JobState::Running,
    };
    Job { guid: droplet.guid.clone(), state, error: droplet.error.clone() }
}

pub fn package_job(package: &Package) -> Job {
    let state = match package.state {
        PackageState::Ready => JobState::Finished,
        PackageState::Failed | PackageState::Expired => JobState::Failed,
        PackageState::AwaitingUpload | PackageState::ProcessingUpload | PackageState::Copying => {
            JobState::Running
        }
    };
    Job { guid: package.guid.clone(), state, error: None }
}

/// Follows a droplet until staging completes.
pub struct DropletStaging {
    v3: Arc<dyn CloudControllerV3>,
}

impl DropletStaging {
    pub fn new(v3: Arc<dyn CloudControllerV3>) -> Self {
        Self { v3 }
    }
}

#[async_trait]
impl JobSource for DropletStaging {
    async fn get_job(&self, guid: &str) -> Warned<Job> {
        self.v3.get_droplet(guid).await.map(|droplet| droplet_job(&droplet))
    }
}

/// Follows an uploaded package until it is ready to stage.
pub struct PackageProcessing {
    v3: Arc<dyn CloudControllerV3>,
}

impl PackageProcessing {
    pub fn new(v3: Arc<dyn CloudControllerV3>) -> Self {
        Self { v3 }
    }
}

#[async_trait]
impl JobSource for PackageProcessing {
    async fn get_job(&self, guid: &str) -> Warned<Job> {
        self.v3.get_package(guid).await.map(|package| package_job(&package))
    }
}
