//! v2 wire shapes and their lifting into domain entities.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use skiff_domain::{
    Application, ApplicationState, Job, JobState, Organization, OrganizationQuota, Space,
};

use crate::http::Page;

#[derive(Debug, Deserialize)]
pub(crate) struct Metadata {
    pub guid: String,
}

/// `{metadata: {...}, entity: {...}}`
#[derive(Debug, Deserialize)]
pub(crate) struct Resource<E> {
    pub metadata: Metadata,
    pub entity: E,
}

/// `{total_results, total_pages, next_url, resources}`
#[derive(Debug, Deserialize)]
pub(crate) struct V2Page<E> {
    #[serde(default)]
    pub next_url: Option<String>,
    #[serde(default = "Vec::new")]
    pub resources: Vec<Resource<E>>,
}

impl<E: Entity> Page for V2Page<E> {
    type Item = E::Domain;

    fn into_parts(self) -> (Vec<Self::Item>, Option<String>) {
        (self.resources.into_iter().map(E::Domain::from).collect(), self.next_url)
    }
}

/// A v2 entity shape and the domain type it lifts into.
pub(crate) trait Entity: DeserializeOwned + Send + Sized {
    type Domain: From<Resource<Self>> + Send;
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrganizationEntity {
    pub name: String,
    #[serde(default)]
    pub quota_definition_guid: String,
}

impl Entity for OrganizationEntity {
    type Domain = Organization;
}

impl From<Resource<OrganizationEntity>> for Organization {
    fn from(value: Resource<OrganizationEntity>) -> Self {
        Organization {
            guid: value.metadata.guid,
            name: value.entity.name,
            quota_definition_guid: value.entity.quota_definition_guid,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateOrganizationBody<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub quota_definition_guid: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ManagerBody<'a> {
    pub username: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuotaEntity {
    pub name: String,
    pub memory_limit: Option<i64>,
    pub total_services: Option<i64>,
    pub total_routes: Option<i64>,
}

impl Entity for QuotaEntity {
    type Domain = OrganizationQuota;
}

impl From<Resource<QuotaEntity>> for OrganizationQuota {
    fn from(value: Resource<QuotaEntity>) -> Self {
        let entity = value.entity;
        OrganizationQuota {
            guid: value.metadata.guid,
            name: entity.name,
            // -1 means unlimited
            memory_limit_mb: entity.memory_limit.and_then(|mb| u64::try_from(mb).ok()),
            total_services: entity.total_services,
            total_routes: entity.total_routes,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SpaceEntity {
    pub name: String,
    #[serde(default)]
    pub organization_guid: String,
    #[serde(default)]
    pub allow_ssh: bool,
}

impl Entity for SpaceEntity {
    type Domain = Space;
}

impl From<Resource<SpaceEntity>> for Space {
    fn from(value: Resource<SpaceEntity>) -> Self {
        Space {
            guid: value.metadata.guid,
            name: value.entity.name,
            organization_guid: value.entity.organization_guid,
            allow_ssh: value.entity.allow_ssh,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApplicationEntity {
    pub name: String,
    #[serde(default)]
    pub space_guid: String,
    pub state: ApplicationState,
    pub instances: Option<u32>,
}

impl Entity for ApplicationEntity {
    type Domain = Application;
}

impl From<Resource<ApplicationEntity>> for Application {
    fn from(value: Resource<ApplicationEntity>) -> Self {
        Application {
            guid: value.metadata.guid,
            name: value.entity.name,
            space_guid: value.entity.space_guid,
            state: value.entity.state,
            instances: value.entity.instances,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetails {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JobEntity {
    pub guid: String,
    pub status: JobState,
    pub error: Option<String>,
    pub error_details: Option<ErrorDetails>,
}

impl From<Resource<JobEntity>> for Job {
    fn from(value: Resource<JobEntity>) -> Self {
        let entity = value.entity;
        let error = entity
            .error_details
            .map(|details| details.description)
            .filter(|description| !description.is_empty())
            .or(entity.error);
        let guid = if entity.guid.is_empty() { value.metadata.guid } else { entity.guid };
        Job { guid, state: entity.status, error }
    }
}
