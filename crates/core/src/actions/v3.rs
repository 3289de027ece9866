//! v3 application, package and droplet actions

use std::path::Path;

use skiff_domain::constants::{MIN_V3_CREATE_FROM_SOURCE_VERSION, MIN_V3_STAGE_VERSION};
use skiff_domain::{
    Application, Droplet, Error, Query, QueryKey, ResourceKind, Result, Warned, Warnings,
};
use tracing::{info, instrument};

use super::{check_minimum_version, lookup, Actor};
use crate::jobs::{droplet_job, package_job};

/// Result of deploying an application from local source bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedApplication {
    pub application: Application,
    pub droplet: Droplet,
}

impl Actor {
    #[instrument(skip(self))]
    pub async fn get_v3_application_by_name_and_space(
        &self,
        name: &str,
        space_guid: &str,
    ) -> Warned<Application> {
        lookup::find_by_name(
            ResourceKind::Application,
            name,
            |name| {
                vec![
                    Query::single(QueryKey::Names, name),
                    Query::single(QueryKey::SpaceGuids, space_guid),
                ]
            },
            |queries| async move { self.v3.get_applications(&queries).await },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn create_v3_application(&self, name: &str, space_guid: &str) -> Warned<Application> {
        self.v3.create_application(name, space_guid).await
    }

    /// Resolve the application, delete it and wait for the deletion job.
    #[instrument(skip(self))]
    pub async fn delete_v3_application(&self, name: &str, space_guid: &str) -> Warned<()> {
        let mut warnings = Warnings::new();
        let result = self.delete_v3_application_steps(name, space_guid, &mut warnings).await;
        Warned::new(result, warnings)
    }

    async fn delete_v3_application_steps(
        &self,
        name: &str,
        space_guid: &str,
        warnings: &mut Warnings,
    ) -> Result<()> {
        let app =
            warnings.absorb(self.get_v3_application_by_name_and_space(name, space_guid).await)?;
        let job = warnings.absorb(self.v3.delete_application(&app.guid).await)?;
        warnings.absorb(self.v3_jobs.poll_job(job).await)?;
        info!(app_guid = %app.guid, "application deleted");
        Ok(())
    }

    /// Stage `package_guid` for the named application and return the
    /// resulting droplet. Requires v3 API 3.27.0; the gate is checked before
    /// any request is issued.
    #[instrument(skip(self))]
    pub async fn stage_package(
        &self,
        app_name: &str,
        space_guid: &str,
        package_guid: &str,
    ) -> Warned<Droplet> {
        let mut warnings = Warnings::new();
        let result =
            self.stage_package_steps(app_name, space_guid, package_guid, &mut warnings).await;
        Warned::new(result, warnings)
    }

    async fn stage_package_steps(
        &self,
        app_name: &str,
        space_guid: &str,
        package_guid: &str,
        warnings: &mut Warnings,
    ) -> Result<Droplet> {
        check_minimum_version(self.v3.api_version(), MIN_V3_STAGE_VERSION)?;
        warnings.absorb(self.get_v3_application_by_name_and_space(app_name, space_guid).await)?;
        self.stage_and_follow(package_guid, warnings).await
    }

    async fn stage_and_follow(&self, package_guid: &str, warnings: &mut Warnings) -> Result<Droplet> {
        let staged = self.v3.stage_package(package_guid).await.map_err(|err| match err {
            Error::ResourceNotFound { .. } => {
                Error::not_found_by_guid(ResourceKind::Package, package_guid)
            }
            other => other,
        });
        let droplet = warnings.absorb(staged)?;
        warnings.absorb(self.staging.poll_job(droplet_job(&droplet)).await)?;
        let droplet = warnings.absorb(self.v3.get_droplet(&droplet.guid).await)?;
        info!(droplet_guid = %droplet.guid, "package staged");
        Ok(droplet)
    }

    /// Create an application from the zipped bits at `bits`: create the
    /// app, create and upload a package, wait for it, stage it, assign the
    /// droplet and start the app.
    #[instrument(skip(self, bits), fields(bits = %bits.display()))]
    pub async fn create_application_from_source(
        &self,
        app_name: &str,
        space_guid: &str,
        bits: &Path,
    ) -> Warned<DeployedApplication> {
        let mut warnings = Warnings::new();
        let result =
            self.create_from_source_steps(app_name, space_guid, bits, &mut warnings).await;
        Warned::new(result, warnings)
    }

    async fn create_from_source_steps(
        &self,
        app_name: &str,
        space_guid: &str,
        bits: &Path,
        warnings: &mut Warnings,
    ) -> Result<DeployedApplication> {
        check_minimum_version(self.v3.api_version(), MIN_V3_CREATE_FROM_SOURCE_VERSION)?;

        let app = warnings.absorb(self.v3.create_application(app_name, space_guid).await)?;
        let package = warnings.absorb(self.v3.create_package(&app.guid).await)?;
        let package = warnings.absorb(self.v3.upload_package(&package.guid, bits).await)?;
        warnings.absorb(self.package_processing.poll_job(package_job(&package)).await)?;

        let droplet = self.stage_and_follow(&package.guid, warnings).await?;
        warnings.absorb(self.v3.set_application_droplet(&app.guid, &droplet.guid).await)?;
        let application = warnings.absorb(self.v3.start_application(&app.guid).await)?;

        info!(app_guid = %application.guid, droplet_guid = %droplet.guid, "application started");
        Ok(DeployedApplication { application, droplet })
    }
}
