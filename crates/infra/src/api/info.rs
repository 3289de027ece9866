//! Controller root document (`GET /`).

use serde::Deserialize;
use skiff_domain::{ApiInfo, Warned};
use tracing::instrument;

use crate::http::{Gateway, Request};

#[derive(Debug, Default, Deserialize)]
struct RootResponse {
    #[serde(default)]
    links: RootLinks,
}

#[derive(Debug, Default, Deserialize)]
struct RootLinks {
    cloud_controller_v2: Option<Link>,
    cloud_controller_v3: Option<Link>,
    uaa: Option<Link>,
    login: Option<Link>,
    logging: Option<Link>,
}

#[derive(Debug, Deserialize)]
struct Link {
    #[serde(default)]
    href: String,
    meta: Option<LinkMeta>,
}

#[derive(Debug, Deserialize)]
struct LinkMeta {
    #[serde(default)]
    version: String,
}

fn version(link: &Option<Link>) -> String {
    link.as_ref()
        .and_then(|link| link.meta.as_ref())
        .map(|meta| meta.version.clone())
        .unwrap_or_default()
}

fn href(link: &Option<Link>) -> String {
    link.as_ref().map(|link| link.href.clone()).unwrap_or_default()
}

impl From<RootResponse> for ApiInfo {
    fn from(value: RootResponse) -> Self {
        let links = value.links;
        let authorization_endpoint = match href(&links.uaa) {
            uaa if uaa.is_empty() => href(&links.login),
            uaa => uaa,
        };
        ApiInfo {
            api_version: version(&links.cloud_controller_v2),
            v3_version: version(&links.cloud_controller_v3),
            authorization_endpoint,
            logging_endpoint: href(&links.logging),
        }
    }
}

/// Reads the endpoints and versions the controller advertises.
#[instrument(skip(gateway), fields(api = %gateway.base_url()))]
pub async fn get_root_info(gateway: &Gateway) -> Warned<ApiInfo> {
    gateway.perform_request_for_json::<RootResponse>(Request::get("/")).await.map(ApiInfo::from)
}
