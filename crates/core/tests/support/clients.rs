//! Scripted fakes for the client ports
//!
//! Each fake records the calls it receives and answers from a [`Script`].

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use skiff_core::jobs::JobPolling;
use skiff_core::{
    Authenticator, CloudControllerV2, CloudControllerV3, JobSource, LogSource, TokenStore,
};
use skiff_domain::{
    Application, Droplet, Filter, Job, LogMessage, Organization, OrganizationQuota, Package,
    Query, Space, TokenPair, Warned,
};
use tokio::sync::mpsc;

use super::Script;

#[derive(Default)]
pub struct CallLog(Mutex<Vec<String>>);

impl CallLog {
    fn record(&self, call: String) {
        self.0.lock().unwrap().push(call);
    }

    fn all(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

fn filters(filters: &[Filter]) -> String {
    filters.iter().map(|f| format!("q={f}")).collect::<Vec<_>>().join("&")
}

fn queries(queries: &[Query]) -> String {
    queries
        .iter()
        .map(|q| {
            let (key, value) = q.to_query_pair();
            format!("{key}={value}")
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[derive(Default)]
pub struct FakeV2 {
    log: CallLog,
    pub organization: Script<Organization>,
    pub organizations: Script<Vec<Organization>>,
    pub create_organization: Script<Organization>,
    pub delete_organization: Script<Job>,
    pub manager: Script<()>,
    pub quota: Script<OrganizationQuota>,
    pub quotas: Script<Vec<OrganizationQuota>>,
    pub spaces: Script<Vec<Space>>,
    pub delete_space: Script<Job>,
    pub applications: Script<Vec<Application>>,
    pub restage: Script<Application>,
}

impl FakeV2 {
    pub fn calls(&self) -> Vec<String> {
        self.log.all()
    }
}

#[async_trait]
impl CloudControllerV2 for FakeV2 {
    async fn get_organization(&self, guid: &str) -> Warned<Organization> {
        self.log.record(format!("v2 get_organization {guid}"));
        self.organization.next()
    }

    async fn get_organizations(&self, f: &[Filter]) -> Warned<Vec<Organization>> {
        self.log.record(format!("v2 get_organizations {}", filters(f)));
        self.organizations.next()
    }

    async fn create_organization(&self, name: &str, quota_guid: &str) -> Warned<Organization> {
        self.log.record(format!("v2 create_organization {name} {quota_guid}"));
        self.create_organization.next()
    }

    async fn delete_organization(&self, guid: &str) -> Warned<Job> {
        self.log.record(format!("v2 delete_organization {guid}"));
        self.delete_organization.next()
    }

    async fn update_organization_manager_by_username(
        &self,
        org_guid: &str,
        username: &str,
    ) -> Warned<()> {
        self.log.record(format!("v2 update_organization_manager {org_guid} {username}"));
        self.manager.next()
    }

    async fn get_organization_quota(&self, guid: &str) -> Warned<OrganizationQuota> {
        self.log.record(format!("v2 get_organization_quota {guid}"));
        self.quota.next()
    }

    async fn get_organization_quotas(&self, f: &[Filter]) -> Warned<Vec<OrganizationQuota>> {
        self.log.record(format!("v2 get_organization_quotas {}", filters(f)));
        self.quotas.next()
    }

    async fn get_spaces(&self, f: &[Filter]) -> Warned<Vec<Space>> {
        self.log.record(format!("v2 get_spaces {}", filters(f)));
        self.spaces.next()
    }

    async fn delete_space(&self, guid: &str) -> Warned<Job> {
        self.log.record(format!("v2 delete_space {guid}"));
        self.delete_space.next()
    }

    async fn get_applications(&self, f: &[Filter]) -> Warned<Vec<Application>> {
        self.log.record(format!("v2 get_applications {}", filters(f)));
        self.applications.next()
    }

    async fn restage_application(&self, guid: &str) -> Warned<Application> {
        self.log.record(format!("v2 restage_application {guid}"));
        self.restage.next()
    }
}

pub struct FakeV3 {
    version: String,
    log: CallLog,
    pub applications: Script<Vec<Application>>,
    pub create_application: Script<Application>,
    pub delete_application: Script<Job>,
    pub start_application: Script<Application>,
    pub set_droplet: Script<()>,
    pub create_package: Script<Package>,
    pub package: Script<Package>,
    pub upload_package: Script<Package>,
    pub stage_package: Script<Droplet>,
    pub droplet: Script<Droplet>,
}

impl FakeV3 {
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            log: CallLog::default(),
            applications: Script::default(),
            create_application: Script::default(),
            delete_application: Script::default(),
            start_application: Script::default(),
            set_droplet: Script::default(),
            create_package: Script::default(),
            package: Script::default(),
            upload_package: Script::default(),
            stage_package: Script::default(),
            droplet: Script::default(),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.all()
    }
}

#[async_trait]
impl CloudControllerV3 for FakeV3 {
    fn api_version(&self) -> &str {
        &self.version
    }

    async fn get_applications(&self, q: &[Query]) -> Warned<Vec<Application>> {
        self.log.record(format!("v3 get_applications {}", queries(q)));
        self.applications.next()
    }

    async fn create_application(&self, name: &str, space_guid: &str) -> Warned<Application> {
        self.log.record(format!("v3 create_application {name} {space_guid}"));
        self.create_application.next()
    }

    async fn delete_application(&self, guid: &str) -> Warned<Job> {
        self.log.record(format!("v3 delete_application {guid}"));
        self.delete_application.next()
    }

    async fn start_application(&self, guid: &str) -> Warned<Application> {
        self.log.record(format!("v3 start_application {guid}"));
        self.start_application.next()
    }

    async fn set_application_droplet(&self, app_guid: &str, droplet_guid: &str) -> Warned<()> {
        self.log.record(format!("v3 set_application_droplet {app_guid} {droplet_guid}"));
        self.set_droplet.next()
    }

    async fn create_package(&self, app_guid: &str) -> Warned<Package> {
        self.log.record(format!("v3 create_package {app_guid}"));
        self.create_package.next()
    }

    async fn get_package(&self, guid: &str) -> Warned<Package> {
        self.log.record(format!("v3 get_package {guid}"));
        self.package.next()
    }

    async fn upload_package(&self, guid: &str, bits: &Path) -> Warned<Package> {
        self.log.record(format!("v3 upload_package {guid} {}", bits.display()));
        self.upload_package.next()
    }

    async fn stage_package(&self, package_guid: &str) -> Warned<Droplet> {
        self.log.record(format!("v3 stage_package {package_guid}"));
        self.stage_package.next()
    }

    async fn get_droplet(&self, guid: &str) -> Warned<Droplet> {
        self.log.record(format!("v3 get_droplet {guid}"));
        self.droplet.next()
    }
}

/// Job source answering from a script and recording when it was polled.
#[derive(Default)]
pub struct FakeJobs {
    pub jobs: Script<Job>,
    pub polled_at: Mutex<Vec<tokio::time::Instant>>,
}

#[async_trait]
impl JobSource for FakeJobs {
    async fn get_job(&self, _guid: &str) -> Warned<Job> {
        self.polled_at.lock().unwrap().push(tokio::time::Instant::now());
        self.jobs.next()
    }
}

impl FakeJobs {
    pub fn poll_count(&self) -> usize {
        self.polled_at.lock().unwrap().len()
    }
}

/// Poller answering from a script, recording the jobs it was given.
#[derive(Default)]
pub struct FakePoller {
    pub outcomes: Script<()>,
    pub polled: Mutex<Vec<Job>>,
}

#[async_trait]
impl JobPolling for FakePoller {
    async fn poll_job(&self, job: Job) -> Warned<()> {
        self.polled.lock().unwrap().push(job);
        self.outcomes.next()
    }
}

#[derive(Default)]
pub struct FakeUaa {
    pub tokens: Script<TokenPair>,
    pub credentials: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl Authenticator for FakeUaa {
    async fn authenticate(&self, username: &str, password: &str) -> Warned<TokenPair> {
        self.credentials.lock().unwrap().push((username.to_string(), password.to_string()));
        self.tokens.next()
    }
}

#[derive(Default)]
pub struct FakeTokenStore {
    pub stored: Mutex<Option<TokenPair>>,
}

impl TokenStore for FakeTokenStore {
    fn store_tokens(&self, tokens: TokenPair) {
        *self.stored.lock().unwrap() = Some(tokens);
    }
}

/// Log source that sends a fixed set of lines, then finishes with a
/// scripted outcome.
#[derive(Default)]
pub struct FakeLogs {
    pub lines: Mutex<Vec<LogMessage>>,
    pub outcome: Script<()>,
}

#[async_trait]
impl LogSource for FakeLogs {
    async fn stream_logs(&self, _app_guid: &str, sink: mpsc::Sender<LogMessage>) -> Warned<()> {
        let lines = self.lines.lock().unwrap().clone();
        for line in lines {
            if sink.send(line).await.is_err() {
                break;
            }
        }
        self.outcome.next()
    }
}
