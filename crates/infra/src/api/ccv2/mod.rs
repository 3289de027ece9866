//! Controller API v2 client
//!
//! A thin typed facade over the v2 gateway. Warnings and errors come back
//! exactly as the gateway produced them.

mod resources;

use async_trait::async_trait;
use skiff_core::{CloudControllerV2, JobSource};
use skiff_domain::{
    Application, Filter, Job, Organization, OrganizationQuota, Space, Warned, Warnings,
};
use tracing::instrument;

use self::resources::{
    ApplicationEntity, CreateOrganizationBody, JobEntity, ManagerBody, OrganizationEntity,
    QuotaEntity, Resource, SpaceEntity, V2Page,
};
use crate::http::{Gateway, Request};

/// Client for `/v2` endpoints.
#[derive(Debug, Clone)]
pub struct V2Client {
    gateway: Gateway,
}

impl V2Client {
    /// `gateway` must decode errors with the v2 dialect.
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    async fn get_resource<E, T>(&self, path: String) -> Warned<T>
    where
        E: serde::de::DeserializeOwned + Send,
        T: From<Resource<E>> + Send,
    {
        let request = Request::get(path).authenticated();
        self.gateway.perform_request_for_json::<Resource<E>>(request).await.map(T::from)
    }

    async fn send_for_resource<E, T>(&self, request: Request) -> Warned<T>
    where
        E: serde::de::DeserializeOwned + Send,
        T: From<Resource<E>> + Send,
    {
        self.gateway.perform_request_for_json::<Resource<E>>(request).await.map(T::from)
    }

    async fn send_json<B, E, T>(&self, request: Request, body: &B) -> Warned<T>
    where
        B: serde::Serialize + Sync,
        E: serde::de::DeserializeOwned + Send,
        T: From<Resource<E>> + Send,
    {
        match request.json(body) {
            Ok(request) => self.send_for_resource::<E, T>(request.authenticated()).await,
            Err(err) => Warned::err(err, Warnings::new()),
        }
    }
}

#[async_trait]
impl CloudControllerV2 for V2Client {
    #[instrument(skip(self))]
    async fn get_organization(&self, guid: &str) -> Warned<Organization> {
        self.get_resource::<OrganizationEntity, _>(format!("/v2/organizations/{guid}")).await
    }

    #[instrument(skip(self, filters))]
    async fn get_organizations(&self, filters: &[Filter]) -> Warned<Vec<Organization>> {
        let request = Request::get("/v2/organizations")
            .filters(filters)
            .query_param("order-by", "name")
            .authenticated();
        self.gateway.get_all_pages::<V2Page<OrganizationEntity>>(request).await
    }

    #[instrument(skip(self))]
    async fn create_organization(&self, name: &str, quota_guid: &str) -> Warned<Organization> {
        let body = CreateOrganizationBody { name, quota_definition_guid: quota_guid };
        self.send_json::<_, OrganizationEntity, _>(Request::post("/v2/organizations"), &body).await
    }

    #[instrument(skip(self))]
    async fn delete_organization(&self, guid: &str) -> Warned<Job> {
        let request = Request::delete(format!("/v2/organizations/{guid}"))
            .query_param("recursive", "true")
            .query_param("async", "true")
            .authenticated();
        self.send_for_resource::<JobEntity, _>(request).await
    }

    #[instrument(skip(self))]
    async fn update_organization_manager_by_username(
        &self,
        org_guid: &str,
        username: &str,
    ) -> Warned<()> {
        let request = match Request::put(format!("/v2/organizations/{org_guid}/managers"))
            .json(&ManagerBody { username })
        {
            Ok(request) => request.authenticated(),
            Err(err) => return Warned::err(err, Warnings::new()),
        };
        self.gateway.perform_request(request).await.map(|_| ())
    }

    #[instrument(skip(self))]
    async fn get_organization_quota(&self, guid: &str) -> Warned<OrganizationQuota> {
        self.get_resource::<QuotaEntity, _>(format!("/v2/quota_definitions/{guid}")).await
    }

    #[instrument(skip(self, filters))]
    async fn get_organization_quotas(&self, filters: &[Filter]) -> Warned<Vec<OrganizationQuota>> {
        let request = Request::get("/v2/quota_definitions").filters(filters).authenticated();
        self.gateway.get_all_pages::<V2Page<QuotaEntity>>(request).await
    }

    #[instrument(skip(self, filters))]
    async fn get_spaces(&self, filters: &[Filter]) -> Warned<Vec<Space>> {
        let request = Request::get("/v2/spaces")
            .filters(filters)
            .query_param("order-by", "name")
            .authenticated();
        self.gateway.get_all_pages::<V2Page<SpaceEntity>>(request).await
    }

    #[instrument(skip(self))]
    async fn delete_space(&self, guid: &str) -> Warned<Job> {
        let request = Request::delete(format!("/v2/spaces/{guid}"))
            .query_param("recursive", "true")
            .query_param("async", "true")
            .authenticated();
        self.send_for_resource::<JobEntity, _>(request).await
    }

    #[instrument(skip(self, filters))]
    async fn get_applications(&self, filters: &[Filter]) -> Warned<Vec<Application>> {
        let request = Request::get("/v2/apps").filters(filters).authenticated();
        self.gateway.get_all_pages::<V2Page<ApplicationEntity>>(request).await
    }

    #[instrument(skip(self))]
    async fn restage_application(&self, guid: &str) -> Warned<Application> {
        let request = Request::post(format!("/v2/apps/{guid}/restage")).authenticated();
        self.send_for_resource::<ApplicationEntity, _>(request).await
    }
}

#[async_trait]
impl JobSource for V2Client {
    #[instrument(skip(self))]
    async fn get_job(&self, guid: &str) -> Warned<Job> {
        self.get_resource::<JobEntity, _>(format!("/v2/jobs/{guid}")).await
    }
}
