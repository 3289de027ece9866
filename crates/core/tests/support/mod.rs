//! Shared test helpers for `skiff-core` integration tests.
//!
//! Scripted fakes for every client port plus a [`Harness`] that wires them
//! into an [`Actor`], so action tests can focus on behaviour instead of
//! boilerplate.

#![allow(dead_code)]

pub mod clients;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use skiff_core::{Actor, Clients};
use skiff_domain::{Error, Settings, Warned, Warnings};
use tokio_util::sync::CancellationToken;

pub use clients::{FakeJobs, FakeLogs, FakePoller, FakeTokenStore, FakeUaa, FakeV2, FakeV3};

/// Queue of canned responses for one client method.
pub struct Script<T> {
    responses: Mutex<VecDeque<Warned<T>>>,
}

impl<T> Default for Script<T> {
    fn default() -> Self {
        Self { responses: Mutex::new(VecDeque::new()) }
    }
}

impl<T> Script<T> {
    pub fn push(&self, response: Warned<T>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn ok(&self, value: T, warnings: &[&str]) {
        self.push(Warned::ok(value, w(warnings)));
    }

    pub fn err(&self, error: Error, warnings: &[&str]) {
        self.push(Warned::err(error, w(warnings)));
    }

    /// Next canned response, or a 599 error when the script ran dry.
    pub fn next(&self) -> Warned<T> {
        self.responses.lock().unwrap().pop_front().unwrap_or_else(|| {
            Warned::err(
                Error::Http {
                    status: 599,
                    code: "unscripted".to_string(),
                    description: "no scripted response".to_string(),
                },
                Warnings::new(),
            )
        })
    }
}

pub fn w(warnings: &[&str]) -> Warnings {
    warnings.iter().copied().collect()
}

/// Every fake, shared with the actor under test.
pub struct Harness {
    pub v2: Arc<FakeV2>,
    pub v3: Arc<FakeV3>,
    pub jobs: Arc<FakeJobs>,
    pub uaa: Arc<FakeUaa>,
    pub tokens: Arc<FakeTokenStore>,
    pub logs: Arc<FakeLogs>,
    pub poller: Arc<FakePoller>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_v3_version("3.27.0")
    }

    pub fn with_v3_version(version: &str) -> Self {
        Self {
            v2: Arc::new(FakeV2::default()),
            v3: Arc::new(FakeV3::new(version)),
            jobs: Arc::new(FakeJobs::default()),
            uaa: Arc::new(FakeUaa::default()),
            tokens: Arc::new(FakeTokenStore::default()),
            logs: Arc::new(FakeLogs::default()),
            poller: Arc::new(FakePoller::default()),
        }
    }

    fn clients(&self) -> Clients {
        Clients {
            v2: self.v2.clone(),
            v2_jobs: self.jobs.clone(),
            v3: self.v3.clone(),
            v3_jobs: self.jobs.clone(),
            uaa: self.uaa.clone(),
            tokens: self.tokens.clone(),
            logs: self.logs.clone(),
        }
    }

    /// Actor whose every poller is the scripted [`FakePoller`].
    pub fn actor(&self) -> Actor {
        self.actor_with_job_engine()
            .with_v2_job_poller(self.poller.clone())
            .with_v3_job_poller(self.poller.clone())
            .with_staging_poller(self.poller.clone())
            .with_package_poller(self.poller.clone())
    }

    /// Actor running the real job engine over the fake job sources.
    pub fn actor_with_job_engine(&self) -> Actor {
        Actor::new(self.clients(), &Settings::default(), CancellationToken::new())
    }

    /// Names of every client call made, in order.
    pub fn calls(&self) -> Vec<String> {
        let mut calls = Vec::new();
        calls.extend(self.v2.calls());
        calls.extend(self.v3.calls());
        calls
    }
}
