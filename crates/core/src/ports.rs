//! Port interfaces for the API clients
//!
//! These traits define the boundaries between the action layer and the
//! infrastructure clients. Every method returns its warnings alongside its
//! result; implementations pass the gateway's warnings through verbatim.

use std::path::Path;

use async_trait::async_trait;
use skiff_domain::{
    Application, Droplet, Filter, Job, LogMessage, Organization, OrganizationQuota, Package,
    Query, Space, TokenPair, Warned,
};
use tokio::sync::mpsc;

/// Controller API v2 surface
#[async_trait]
pub trait CloudControllerV2: Send + Sync {
    /// `GET /v2/organizations/{guid}`
    async fn get_organization(&self, guid: &str) -> Warned<Organization>;

    /// `GET /v2/organizations`, following every page
    async fn get_organizations(&self, filters: &[Filter]) -> Warned<Vec<Organization>>;

    /// `POST /v2/organizations`
    async fn create_organization(&self, name: &str, quota_guid: &str) -> Warned<Organization>;

    /// `DELETE /v2/organizations/{guid}?recursive=true&async=true`
    async fn delete_organization(&self, guid: &str) -> Warned<Job>;

    /// `PUT /v2/organizations/{guid}/managers`
    async fn update_organization_manager_by_username(
        &self,
        org_guid: &str,
        username: &str,
    ) -> Warned<()>;

    /// `GET /v2/quota_definitions/{guid}`
    async fn get_organization_quota(&self, guid: &str) -> Warned<OrganizationQuota>;

    /// `GET /v2/quota_definitions`
    async fn get_organization_quotas(&self, filters: &[Filter]) -> Warned<Vec<OrganizationQuota>>;

    /// `GET /v2/spaces`
    async fn get_spaces(&self, filters: &[Filter]) -> Warned<Vec<Space>>;

    /// `DELETE /v2/spaces/{guid}?recursive=true&async=true`
    async fn delete_space(&self, guid: &str) -> Warned<Job>;

    /// `GET /v2/apps`
    async fn get_applications(&self, filters: &[Filter]) -> Warned<Vec<Application>>;

    /// `POST /v2/apps/{guid}/restage`
    async fn restage_application(&self, guid: &str) -> Warned<Application>;
}

/// Controller API v3 surface
#[async_trait]
pub trait CloudControllerV3: Send + Sync {
    /// v3 version advertised by the controller root, cached at connect time.
    fn api_version(&self) -> &str;

    async fn get_applications(&self, queries: &[Query]) -> Warned<Vec<Application>>;

    async fn create_application(&self, name: &str, space_guid: &str) -> Warned<Application>;

    /// Returns the deletion job named by the `Location` header.
    async fn delete_application(&self, guid: &str) -> Warned<Job>;

    async fn start_application(&self, guid: &str) -> Warned<Application>;

    async fn set_application_droplet(&self, app_guid: &str, droplet_guid: &str) -> Warned<()>;

    /// Creates an empty bits package for the application.
    async fn create_package(&self, app_guid: &str) -> Warned<Package>;

    async fn get_package(&self, guid: &str) -> Warned<Package>;

    /// Streams the zipped bits at `bits` to the package upload endpoint.
    async fn upload_package(&self, guid: &str, bits: &Path) -> Warned<Package>;

    /// `POST /v3/packages/{guid}/droplets`
    async fn stage_package(&self, package_guid: &str) -> Warned<Droplet>;

    async fn get_droplet(&self, guid: &str) -> Warned<Droplet>;
}

/// Anything the job engine can poll for the current state of a job
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn get_job(&self, guid: &str) -> Warned<Job>;
}

/// UAA password grant
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, username: &str, password: &str) -> Warned<TokenPair>;
}

/// Write access to the token pair held by the token source
pub trait TokenStore: Send + Sync {
    fn store_tokens(&self, tokens: TokenPair);
}

/// Streaming application logs
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Streams decoded log lines for `app_guid` into `sink` until the server
    /// closes the stream, the receiver is dropped, or the request fails.
    async fn stream_logs(&self, app_guid: &str, sink: mpsc::Sender<LogMessage>) -> Warned<()>;
}
