//! v3 application, staging and deployment action tests

mod support;

use std::path::Path;

use skiff_domain::{
    Application, ApplicationState, Droplet, DropletState, Error, Job, JobState, Package,
    PackageState, PackageType, ResourceKind,
};
use support::Harness;

fn app(guid: &str) -> Application {
    Application {
        guid: guid.into(),
        name: "some-app".into(),
        space_guid: "space-guid".into(),
        state: ApplicationState::Stopped,
        instances: None,
    }
}

fn package(state: PackageState) -> Package {
    Package {
        guid: "package-guid".into(),
        app_guid: "app-guid".into(),
        state,
        package_type: PackageType::Bits,
    }
}

fn droplet(state: DropletState) -> Droplet {
    Droplet {
        guid: "droplet-guid".into(),
        app_guid: "app-guid".into(),
        state,
        created_at: None,
        error: None,
    }
}

#[tokio::test]
async fn stage_package_is_gated_before_any_request() {
    let h = Harness::with_v3_version("3.26.0");

    let warned = h.actor().stage_package("some-app", "space-guid", "package-guid").await;

    assert_eq!(
        warned.result,
        Err(Error::ApiVersionTooLow { required: "3.27.0".into(), actual: "3.26.0".into() })
    );
    assert!(warned.warnings.is_empty());
    assert!(h.calls().is_empty());
}

#[tokio::test]
async fn stage_package_without_v3_surface_is_too_low() {
    let h = Harness::with_v3_version("");

    let warned = h.actor().stage_package("some-app", "space-guid", "package-guid").await;

    assert!(matches!(warned.result, Err(Error::ApiVersionTooLow { .. })));
    assert!(h.calls().is_empty());
}

#[tokio::test]
async fn stage_package_follows_staging_and_fetches_droplet() {
    let h = Harness::new();
    h.v3.applications.ok(vec![app("app-guid")], &["app-warning"]);
    h.v3.stage_package.ok(droplet(DropletState::Staging), &["stage-warning"]);
    h.poller.outcomes.ok((), &["staging-warning"]);
    h.v3.droplet.ok(droplet(DropletState::Staged), &["droplet-warning"]);

    let warned = h.actor().stage_package("some-app", "space-guid", "package-guid").await;

    assert_eq!(warned.result.unwrap().state, DropletState::Staged);
    assert_eq!(
        warned.warnings,
        ["app-warning", "stage-warning", "staging-warning", "droplet-warning"]
    );
    assert_eq!(
        h.calls(),
        [
            "v3 get_applications names=some-app&space_guids=space-guid",
            "v3 stage_package package-guid",
            "v3 get_droplet droplet-guid",
        ]
    );
    let polled = h.poller.polled.lock().unwrap();
    assert_eq!(polled[0], Job::new("droplet-guid", JobState::Running));
}

#[tokio::test]
async fn stage_package_reports_missing_app() {
    let h = Harness::new();
    h.v3.applications.ok(vec![], &["app-warning"]);

    let warned = h.actor().stage_package("some-app", "space-guid", "package-guid").await;

    assert_eq!(warned.result.unwrap_err().to_string(), "App some-app not found");
    assert_eq!(warned.warnings, ["app-warning"]);
}

#[tokio::test]
async fn stage_package_maps_404_to_unusable_package() {
    let h = Harness::new();
    h.v3.applications.ok(vec![app("app-guid")], &[]);
    h.v3.stage_package.err(Error::ResourceNotFound { message: "Package not found".into() }, &[]);

    let warned = h.actor().stage_package("some-app", "space-guid", "package-guid").await;

    let err = warned.result.unwrap_err();
    assert_eq!(err, Error::not_found_by_guid(ResourceKind::Package, "package-guid"));
    assert_eq!(
        err.to_string(),
        "Unable to use package. Ensure that the package exists and you have access to it."
    );
}

#[tokio::test(start_paused = true)]
async fn stage_package_with_job_engine_polls_droplet_until_staged() {
    let h = Harness::new();
    h.v3.applications.ok(vec![app("app-guid")], &[]);
    h.v3.stage_package.ok(droplet(DropletState::Staging), &[]);
    h.v3.droplet.ok(droplet(DropletState::Staging), &["poll-1"]);
    h.v3.droplet.ok(droplet(DropletState::Staged), &["poll-2"]);
    h.v3.droplet.ok(droplet(DropletState::Staged), &["fetch"]);

    let warned = h.actor_with_job_engine().stage_package("some-app", "space-guid", "package-guid").await;

    assert_eq!(warned.result.unwrap().state, DropletState::Staged);
    assert_eq!(warned.warnings, ["poll-1", "poll-2", "fetch"]);
}

#[tokio::test(start_paused = true)]
async fn stage_package_with_job_engine_surfaces_staging_failure() {
    let h = Harness::new();
    h.v3.applications.ok(vec![app("app-guid")], &[]);
    h.v3.stage_package.ok(droplet(DropletState::Staging), &[]);
    let mut failed = droplet(DropletState::Failed);
    failed.error = Some("StagingError - buildpack failed".into());
    h.v3.droplet.ok(failed, &["poll"]);

    let warned = h.actor_with_job_engine().stage_package("some-app", "space-guid", "package-guid").await;

    assert_eq!(
        warned.result,
        Err(Error::JobFailed {
            guid: "droplet-guid".into(),
            cause: "StagingError - buildpack failed".into(),
        })
    );
    assert_eq!(warned.warnings, ["poll"]);
}

#[tokio::test]
async fn create_application_from_source_runs_every_step_in_order() {
    let h = Harness::new();
    h.v3.create_application.ok(app("app-guid"), &["create-app"]);
    h.v3.create_package.ok(package(PackageState::AwaitingUpload), &["create-package"]);
    h.v3.upload_package.ok(package(PackageState::ProcessingUpload), &["upload"]);
    h.poller.outcomes.ok((), &["package-poll"]);
    h.v3.stage_package.ok(droplet(DropletState::Staging), &["stage"]);
    h.poller.outcomes.ok((), &["staging-poll"]);
    h.v3.droplet.ok(droplet(DropletState::Staged), &["droplet"]);
    h.v3.set_droplet.ok((), &["set-droplet"]);
    let mut started = app("app-guid");
    started.state = ApplicationState::Started;
    h.v3.start_application.ok(started, &["start"]);

    let warned = h
        .actor()
        .create_application_from_source("some-app", "space-guid", Path::new("/tmp/app.zip"))
        .await;

    let deployed = warned.result.unwrap();
    assert!(deployed.application.is_started());
    assert_eq!(deployed.droplet.guid, "droplet-guid");
    assert_eq!(
        warned.warnings,
        [
            "create-app",
            "create-package",
            "upload",
            "package-poll",
            "stage",
            "staging-poll",
            "droplet",
            "set-droplet",
            "start",
        ]
    );
    assert_eq!(
        h.calls(),
        [
            "v3 create_application some-app space-guid",
            "v3 create_package app-guid",
            "v3 upload_package package-guid /tmp/app.zip",
            "v3 stage_package package-guid",
            "v3 get_droplet droplet-guid",
            "v3 set_application_droplet app-guid droplet-guid",
            "v3 start_application app-guid",
        ]
    );
}

#[tokio::test]
async fn create_application_from_source_stops_at_upload_failure() {
    let h = Harness::new();
    h.v3.create_application.ok(app("app-guid"), &["create-app"]);
    h.v3.create_package.ok(package(PackageState::AwaitingUpload), &["create-package"]);
    h.v3.upload_package.err(Error::Request { cause: "connection reset".into() }, &["upload"]);

    let warned = h
        .actor()
        .create_application_from_source("some-app", "space-guid", Path::new("/tmp/app.zip"))
        .await;

    assert_eq!(warned.result, Err(Error::Request { cause: "connection reset".into() }));
    assert_eq!(warned.warnings, ["create-app", "create-package", "upload"]);
    assert_eq!(h.calls().len(), 3);
    assert!(h.poller.polled.lock().unwrap().is_empty());
}

#[tokio::test]
async fn delete_v3_application_polls_the_deletion_job() {
    let h = Harness::new();
    h.v3.applications.ok(vec![app("app-guid")], &["app-warning"]);
    h.v3.delete_application.ok(Job::new("job-guid", JobState::Running), &["delete-warning"]);
    h.poller.outcomes.ok((), &["poll-warning"]);

    let warned = h.actor().delete_v3_application("some-app", "space-guid").await;

    assert_eq!(warned.result, Ok(()));
    assert_eq!(warned.warnings, ["app-warning", "delete-warning", "poll-warning"]);
    assert_eq!(h.poller.polled.lock().unwrap()[0].guid, "job-guid");
}
