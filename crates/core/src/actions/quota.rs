//! Organization quota actions

use skiff_domain::{Error, OrganizationQuota, ResourceKind, Warned};
use tracing::instrument;

use super::{lookup, Actor};

impl Actor {
    #[instrument(skip(self))]
    pub async fn get_organization_quota(&self, guid: &str) -> Warned<OrganizationQuota> {
        self.v2.get_organization_quota(guid).await.map_err(|err| match err {
            Error::ResourceNotFound { .. } => {
                Error::not_found_by_guid(ResourceKind::OrganizationQuota, guid)
            }
            other => other,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_organization_quota_by_name(&self, name: &str) -> Warned<OrganizationQuota> {
        lookup::find_by_name(
            ResourceKind::OrganizationQuota,
            name,
            lookup::v2_name_filter,
            |filters| async move { self.v2.get_organization_quotas(&filters).await },
        )
        .await
    }
}
