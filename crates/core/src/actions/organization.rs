//! Organization actions

use skiff_domain::{Error, Organization, ResourceKind, Result, Warned, Warnings};
use tracing::{info, instrument};

use super::{lookup, Actor};

impl Actor {
    /// Fetch an organization by GUID. A server 404 becomes `NotFound`.
    #[instrument(skip(self))]
    pub async fn get_organization(&self, guid: &str) -> Warned<Organization> {
        self.v2.get_organization(guid).await.map_err(|err| match err {
            Error::ResourceNotFound { .. } => {
                Error::not_found_by_guid(ResourceKind::Organization, guid)
            }
            other => other,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_organization_by_name(&self, name: &str) -> Warned<Organization> {
        lookup::find_by_name(
            ResourceKind::Organization,
            name,
            lookup::v2_name_filter,
            |filters| async move { self.v2.get_organizations(&filters).await },
        )
        .await
    }

    /// Every organization visible to the current user.
    #[instrument(skip(self))]
    pub async fn get_organizations(&self) -> Warned<Vec<Organization>> {
        self.v2.get_organizations(&[]).await
    }

    /// Create an organization, assigning the quota named `quota_name` when
    /// one is given.
    #[instrument(skip(self))]
    pub async fn create_organization(&self, name: &str, quota_name: &str) -> Warned<Organization> {
        let mut warnings = Warnings::new();
        let result = self.create_organization_steps(name, quota_name, &mut warnings).await;
        Warned::new(result, warnings)
    }

    async fn create_organization_steps(
        &self,
        name: &str,
        quota_name: &str,
        warnings: &mut Warnings,
    ) -> Result<Organization> {
        let quota_guid = if quota_name.is_empty() {
            String::new()
        } else {
            warnings.absorb(self.get_organization_quota_by_name(quota_name).await)?.guid
        };

        let org = warnings.absorb(self.v2.create_organization(name, &quota_guid).await)?;
        info!(org_guid = %org.guid, "organization created");
        Ok(org)
    }

    /// Resolve the organization, delete it recursively and wait for the job.
    #[instrument(skip(self))]
    pub async fn delete_organization(&self, name: &str) -> Warned<()> {
        let mut warnings = Warnings::new();
        let result = self.delete_organization_steps(name, &mut warnings).await;
        Warned::new(result, warnings)
    }

    async fn delete_organization_steps(&self, name: &str, warnings: &mut Warnings) -> Result<()> {
        let org = warnings.absorb(self.get_organization_by_name(name).await)?;
        let job = warnings.absorb(self.v2.delete_organization(&org.guid).await)?;
        warnings.absorb(self.v2_jobs.poll_job(job).await)?;
        info!(org_guid = %org.guid, "organization deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn grant_org_manager_by_username(&self, org_guid: &str, username: &str) -> Warned<()> {
        self.v2.update_organization_manager_by_username(org_guid, username).await
    }
}
