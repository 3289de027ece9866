//! Controller API v3 client

mod resources;

use std::path::Path;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use skiff_core::{CloudControllerV3, JobSource};
use skiff_domain::{
    Application, Droplet, Error, Job, JobState, Package, PackageType, Query, Warned, Warnings,
};
use tracing::{debug, instrument};

use self::resources::{
    guid_from_href, ApplicationResource, CreateApplicationBody, CreateApplicationRelationships,
    CreatePackageBody, CreatePackageRelationships, CurrentDropletBody, DropletResource,
    JobResource, PackageResource, Relationship, RelationshipData, V3Page,
};
use super::info::get_root_info;
use crate::http::{Gateway, Request};

/// Client for `/v3` endpoints.
///
/// The v3 version is read once, when the client is created, so version gates
/// never issue a request.
#[derive(Debug, Clone)]
pub struct V3Client {
    gateway: Gateway,
    api_version: String,
}

impl V3Client {
    /// `gateway` must decode errors with the v3 dialect.
    pub fn new(gateway: Gateway, api_version: impl Into<String>) -> Self {
        Self { gateway, api_version: api_version.into() }
    }

    /// Reads the controller root document and caches its v3 version.
    pub async fn connect(gateway: Gateway) -> Warned<Self> {
        let (info, warnings) = get_root_info(&gateway).await.into_parts();
        Warned::new(info.map(|info| Self::new(gateway, info.v3_version)), warnings)
    }

    async fn send<W, T>(&self, request: Request) -> Warned<T>
    where
        W: DeserializeOwned + Send,
        T: From<W> + Send,
    {
        self.gateway.perform_request_for_json::<W>(request.authenticated()).await.map(T::from)
    }

    async fn send_json<B, W, T>(&self, request: Request, body: &B) -> Warned<T>
    where
        B: Serialize + Sync,
        W: DeserializeOwned + Send,
        T: From<W> + Send,
    {
        match request.json(body) {
            Ok(request) => self.send::<W, T>(request).await,
            Err(err) => Warned::err(err, Warnings::new()),
        }
    }
}

#[async_trait]
impl CloudControllerV3 for V3Client {
    fn api_version(&self) -> &str {
        &self.api_version
    }

    #[instrument(skip(self, queries))]
    async fn get_applications(&self, queries: &[Query]) -> Warned<Vec<Application>> {
        let request = Request::get("/v3/apps").queries(queries).authenticated();
        self.gateway.get_all_pages::<V3Page<ApplicationResource>>(request).await
    }

    #[instrument(skip(self))]
    async fn create_application(&self, name: &str, space_guid: &str) -> Warned<Application> {
        let body = CreateApplicationBody {
            name,
            relationships: CreateApplicationRelationships { space: Relationship::to(space_guid) },
        };
        self.send_json::<_, ApplicationResource, _>(Request::post("/v3/apps"), &body).await
    }

    #[instrument(skip(self))]
    async fn delete_application(&self, guid: &str) -> Warned<Job> {
        let request = Request::delete(format!("/v3/apps/{guid}")).authenticated();
        let (response, warnings) = self.gateway.perform_request(request).await.into_parts();
        let job = response.and_then(|response| {
            let location = response.location().ok_or_else(|| Error::Decode {
                message: "delete response has no Location header".into(),
            })?;
            debug!(%location, "application deletion job");
            Ok(Job::new(guid_from_href(location), JobState::Queued))
        });
        Warned::new(job, warnings)
    }

    #[instrument(skip(self))]
    async fn start_application(&self, guid: &str) -> Warned<Application> {
        let request = Request::post(format!("/v3/apps/{guid}/actions/start"));
        self.send::<ApplicationResource, _>(request).await
    }

    #[instrument(skip(self))]
    async fn set_application_droplet(&self, app_guid: &str, droplet_guid: &str) -> Warned<()> {
        let body = CurrentDropletBody { data: RelationshipData { guid: droplet_guid.to_string() } };
        let request = match Request::patch(format!(
            "/v3/apps/{app_guid}/relationships/current_droplet"
        ))
        .json(&body)
        {
            Ok(request) => request.authenticated(),
            Err(err) => return Warned::err(err, Warnings::new()),
        };
        self.gateway.perform_request(request).await.map(|_| ())
    }

    #[instrument(skip(self))]
    async fn create_package(&self, app_guid: &str) -> Warned<Package> {
        let body = CreatePackageBody {
            package_type: PackageType::Bits,
            relationships: CreatePackageRelationships { app: Relationship::to(app_guid) },
        };
        self.send_json::<_, PackageResource, Package>(Request::post("/v3/packages"), &body)
            .await
            .map(|mut package| {
                if package.app_guid.is_empty() {
                    package.app_guid = app_guid.to_string();
                }
                package
            })
    }

    #[instrument(skip(self))]
    async fn get_package(&self, guid: &str) -> Warned<Package> {
        self.send::<PackageResource, _>(Request::get(format!("/v3/packages/{guid}"))).await
    }

    #[instrument(skip(self, bits), fields(bits = %bits.display()))]
    async fn upload_package(&self, guid: &str, bits: &Path) -> Warned<Package> {
        let request = Request::post(format!("/v3/packages/{guid}/upload")).file("bits", bits);
        self.send::<PackageResource, _>(request).await
    }

    #[instrument(skip(self))]
    async fn stage_package(&self, package_guid: &str) -> Warned<Droplet> {
        let request = Request::post(format!("/v3/packages/{package_guid}/droplets"));
        self.send_json::<_, DropletResource, _>(request, &serde_json::json!({})).await
    }

    #[instrument(skip(self))]
    async fn get_droplet(&self, guid: &str) -> Warned<Droplet> {
        self.send::<DropletResource, _>(Request::get(format!("/v3/droplets/{guid}"))).await
    }
}

#[async_trait]
impl JobSource for V3Client {
    #[instrument(skip(self))]
    async fn get_job(&self, guid: &str) -> Warned<Job> {
        self.send::<JobResource, _>(Request::get(format!("/v3/jobs/{guid}"))).await
    }
}
