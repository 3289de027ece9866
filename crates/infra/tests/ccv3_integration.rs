//! Integration tests for the v3 controller client
//!
//! **Coverage:**
//! - `connect` caches the advertised v3 version
//! - Named query parameters and `pagination.next.href`
//! - Async delete reads the job from the `Location` header
//! - Package creation, multipart upload and staging
//! - v3 error dialect through the client

#![allow(dead_code)]

#[path = "support.rs"]
mod support;

use std::io::Write;

use skiff_core::{CloudControllerV3, JobSource};
use skiff_domain::{DropletState, Error, JobState, PackageState, Query, QueryKey};
use skiff_infra::V3Client;
use support::{tokens, v3_gateway, WARNINGS};
use wiremock::matchers::{body_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> V3Client {
    V3Client::new(v3_gateway(server, tokens()), "3.63.0")
}

fn app_json(guid: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "guid": guid,
        "name": name,
        "state": "STOPPED",
        "relationships": {"space": {"data": {"guid": "space-guid"}}}
    })
}

#[tokio::test]
async fn connect_reads_v3_version_from_root() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).insert_header(WARNINGS, "root").set_body_json(
            serde_json::json!({
                "links": {
                    "cloud_controller_v3": {"href": format!("{}/v3", server.uri()), "meta": {"version": "3.26.0"}}
                }
            }),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let warned = V3Client::connect(v3_gateway(&server, tokens())).await;

    assert_eq!(warned.warnings, ["root"]);
    assert_eq!(warned.result.unwrap().api_version(), "3.26.0");
}

#[tokio::test]
async fn get_applications_uses_named_queries_and_pages() {
    let server = MockServer::start().await;
    let next = format!("{}/v3/apps?names=some-app&space_guids=space-guid&page=2", server.uri());
    Mock::given(method("GET"))
        .and(path("/v3/apps"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).insert_header(WARNINGS, "page-2").set_body_json(
            serde_json::json!({"pagination": {"next": null}, "resources": [app_json("app-2", "some-app")]}),
        ))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3/apps"))
        .and(query_param("names", "some-app"))
        .and(query_param("space_guids", "space-guid"))
        .respond_with(ResponseTemplate::new(200).insert_header(WARNINGS, "page-1").set_body_json(
            serde_json::json!({
                "pagination": {"total_results": 2, "next": {"href": next}},
                "resources": [app_json("app-1", "some-app")]
            }),
        ))
        .mount(&server)
        .await;

    let warned = client(&server)
        .get_applications(&[
            Query::single(QueryKey::Names, "some-app"),
            Query::single(QueryKey::SpaceGuids, "space-guid"),
        ])
        .await;

    let apps = warned.result.unwrap();
    assert_eq!(apps.iter().map(|a| a.guid.as_str()).collect::<Vec<_>>(), ["app-1", "app-2"]);
    assert_eq!(apps[0].space_guid, "space-guid");
    assert_eq!(warned.warnings, ["page-1", "page-2"]);
}

#[tokio::test]
async fn delete_application_returns_location_job() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v3/apps/app-guid"))
        .respond_with(
            ResponseTemplate::new(202)
                .insert_header("Location", format!("{}/v3/jobs/job-guid", server.uri()).as_str())
                .insert_header(WARNINGS, "delete-warning"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let warned = client(&server).delete_application("app-guid").await;

    let job = warned.result.unwrap();
    assert_eq!(job.guid, "job-guid");
    assert_eq!(job.state, JobState::Queued);
    assert_eq!(warned.warnings, ["delete-warning"]);
}

#[tokio::test]
async fn delete_without_location_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let err = client(&server).delete_application("app-guid").await.result.unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[tokio::test]
async fn get_job_reads_v3_states() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/jobs/job-guid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "guid": "job-guid",
            "state": "COMPLETE",
            "errors": []
        })))
        .mount(&server)
        .await;

    let job = client(&server).get_job("job-guid").await.result.unwrap();
    assert!(job.is_finished());
}

#[tokio::test]
async fn create_package_posts_bits_relationship() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/packages"))
        .and(body_json(serde_json::json!({
            "type": "bits",
            "relationships": {"app": {"data": {"guid": "app-guid"}}}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "guid": "package-guid",
            "type": "bits",
            "state": "AWAITING_UPLOAD"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let package = client(&server).create_package("app-guid").await.result.unwrap();

    assert_eq!(package.guid, "package-guid");
    assert_eq!(package.app_guid, "app-guid");
    assert_eq!(package.state, PackageState::AwaitingUpload);
}

#[tokio::test]
async fn upload_package_streams_the_file_as_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/packages/package-guid/upload"))
        .and(body_string_contains("name=\"bits\""))
        .and(body_string_contains("zip-bytes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "guid": "package-guid",
            "type": "bits",
            "state": "PROCESSING_UPLOAD",
            "links": {"app": {"href": "https://api.example.com/v3/apps/app-guid"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut bits = tempfile::Builder::new().suffix(".zip").tempfile().unwrap();
    bits.write_all(b"zip-bytes").unwrap();

    let package =
        client(&server).upload_package("package-guid", bits.path()).await.result.unwrap();

    assert_eq!(package.state, PackageState::ProcessingUpload);
    assert_eq!(package.app_guid, "app-guid");
}

#[tokio::test]
async fn upload_of_missing_file_fails_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let warned = client(&server)
        .upload_package("package-guid", std::path::Path::new("/does/not/exist.zip"))
        .await;

    assert!(matches!(warned.result, Err(Error::Request { .. })));
}

#[tokio::test]
async fn stage_package_returns_staging_droplet() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/packages/package-guid/droplets"))
        .respond_with(ResponseTemplate::new(201).insert_header(WARNINGS, "stage-warning").set_body_json(
            serde_json::json!({"guid": "droplet-guid", "state": "STAGING", "created_at": "2017-08-14T21:16:42Z"}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let warned = client(&server).stage_package("package-guid").await;

    let droplet = warned.result.unwrap();
    assert_eq!(droplet.guid, "droplet-guid");
    assert_eq!(droplet.state, DropletState::Staging);
    assert_eq!(warned.warnings, ["stage-warning"]);
}

#[tokio::test]
async fn stage_missing_package_is_resource_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string(
            r#"{"errors":[{"code":10010,"title":"CF-ResourceNotFound","detail":"Package not found"}]}"#,
        ))
        .mount(&server)
        .await;

    let err = client(&server).stage_package("nope").await.result.unwrap_err();
    assert_eq!(err, Error::ResourceNotFound { message: "Package not found".into() });
}

#[tokio::test]
async fn set_droplet_patches_current_droplet() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/v3/apps/app-guid/relationships/current_droplet"))
        .and(body_json(serde_json::json!({"data": {"guid": "droplet-guid"}})))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let warned = client(&server).set_application_droplet("app-guid", "droplet-guid").await;
    assert!(warned.is_ok());
}
