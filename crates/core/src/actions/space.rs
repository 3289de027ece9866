//! Space actions

use skiff_domain::{Filter, FilterType, ResourceKind, Result, Space, Warned, Warnings};
use tracing::{info, instrument};

use super::{lookup, Actor};

impl Actor {
    #[instrument(skip(self))]
    pub async fn get_space_by_organization_and_name(
        &self,
        org_guid: &str,
        name: &str,
    ) -> Warned<Space> {
        lookup::find_by_name(
            ResourceKind::Space,
            name,
            |name| {
                vec![
                    Filter::equal(FilterType::Name, name),
                    Filter::equal(FilterType::OrganizationGuid, org_guid),
                ]
            },
            |filters| async move { self.v2.get_spaces(&filters).await },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_organization_spaces(&self, org_guid: &str) -> Warned<Vec<Space>> {
        self.v2.get_spaces(&[Filter::equal(FilterType::OrganizationGuid, org_guid)]).await
    }

    /// Resolve the organization and the space, delete the space recursively
    /// and wait for the job.
    #[instrument(skip(self))]
    pub async fn delete_space_by_name(&self, space_name: &str, org_name: &str) -> Warned<()> {
        let mut warnings = Warnings::new();
        let result = self.delete_space_steps(space_name, org_name, &mut warnings).await;
        Warned::new(result, warnings)
    }

    async fn delete_space_steps(
        &self,
        space_name: &str,
        org_name: &str,
        warnings: &mut Warnings,
    ) -> Result<()> {
        let org = warnings.absorb(self.get_organization_by_name(org_name).await)?;
        let space =
            warnings.absorb(self.get_space_by_organization_and_name(&org.guid, space_name).await)?;
        let job = warnings.absorb(self.v2.delete_space(&space.guid).await)?;
        warnings.absorb(self.v2_jobs.poll_job(job).await)?;
        info!(space_guid = %space.guid, "space deleted");
        Ok(())
    }
}
