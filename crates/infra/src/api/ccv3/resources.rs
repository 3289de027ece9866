//! v3 wire shapes and their lifting into domain entities.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use skiff_domain::{
    Application, ApplicationState, Droplet, DropletState, Job, JobState, Package, PackageState,
    PackageType,
};

use crate::http::Page;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Link {
    #[serde(default)]
    pub href: String,
}

impl Link {
    /// Last path segment of the link, which is the GUID for resource links.
    pub fn guid(&self) -> String {
        guid_from_href(&self.href)
    }
}

pub(crate) fn guid_from_href(href: &str) -> String {
    let path = href.split(['?', '#']).next().unwrap_or_default();
    path.trim_end_matches('/').rsplit('/').next().unwrap_or_default().to_string()
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Pagination {
    pub next: Option<Link>,
}

/// `{pagination: {..., next: {href}}, resources: [...]}`
#[derive(Debug, Deserialize)]
pub(crate) struct V3Page<T> {
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default = "Vec::new")]
    pub resources: Vec<T>,
}

impl<T: Wire> Page for V3Page<T> {
    type Item = T::Domain;

    fn into_parts(self) -> (Vec<Self::Item>, Option<String>) {
        let next = self.pagination.next.map(|link| link.href);
        (self.resources.into_iter().map(T::Domain::from).collect(), next)
    }
}

/// A v3 resource shape and the domain type it lifts into.
pub(crate) trait Wire: DeserializeOwned + Send + Sized {
    type Domain: From<Self> + Send;
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct RelationshipData {
    pub guid: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Relationship {
    pub data: RelationshipData,
}

impl Relationship {
    pub fn to(guid: &str) -> Self {
        Self { data: RelationshipData { guid: guid.to_string() } }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApplicationRelationships {
    pub space: Relationship,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApplicationResource {
    pub guid: String,
    pub name: String,
    pub state: ApplicationState,
    pub relationships: Option<ApplicationRelationships>,
}

impl Wire for ApplicationResource {
    type Domain = Application;
}

impl From<ApplicationResource> for Application {
    fn from(value: ApplicationResource) -> Self {
        Application {
            guid: value.guid,
            name: value.name,
            space_guid: value
                .relationships
                .map(|relationships| relationships.space.data.guid)
                .unwrap_or_default(),
            state: value.state,
            instances: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateApplicationRelationships {
    pub space: Relationship,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateApplicationBody<'a> {
    pub name: &'a str,
    pub relationships: CreateApplicationRelationships,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreatePackageRelationships {
    pub app: Relationship,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreatePackageBody {
    #[serde(rename = "type")]
    pub package_type: PackageType,
    pub relationships: CreatePackageRelationships,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AppLinks {
    #[serde(default)]
    pub app: Link,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PackageResource {
    pub guid: String,
    #[serde(rename = "type")]
    pub package_type: PackageType,
    pub state: PackageState,
    #[serde(default)]
    pub links: AppLinks,
}

impl From<PackageResource> for Package {
    fn from(value: PackageResource) -> Self {
        Package {
            guid: value.guid,
            app_guid: value.links.app.guid(),
            state: value.state,
            package_type: value.package_type,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DropletResource {
    pub guid: String,
    pub state: DropletState,
    pub created_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
    #[serde(default)]
    pub links: AppLinks,
}

impl From<DropletResource> for Droplet {
    fn from(value: DropletResource) -> Self {
        Droplet {
            guid: value.guid,
            app_guid: value.links.app.guid(),
            state: value.state,
            created_at: value.created_at,
            error: value.error.filter(|error| !error.is_empty()),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CurrentDropletBody {
    pub data: RelationshipData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JobError {
    #[serde(default)]
    pub detail: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JobResource {
    pub guid: String,
    pub state: JobState,
    #[serde(default)]
    pub errors: Vec<JobError>,
}

impl From<JobResource> for Job {
    fn from(value: JobResource) -> Self {
        let error = value.errors.into_iter().next().map(|error| error.detail);
        Job { guid: value.guid, state: value.state, error }
    }
}
