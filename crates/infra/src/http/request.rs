//! Request descriptions handed to the gateway.
//!
//! A [`Request`] is plain data. The gateway turns it into a fresh
//! `reqwest::Request` for every attempt, so a retried upload re-opens its file.

use std::path::PathBuf;

use bytes::Bytes;
use reqwest::Method;
use serde::Serialize;
use skiff_domain::{Filter, Query, Result};
use url::Url;

use crate::errors::into_domain;

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Bytes),
    Form(Vec<(String, String)>),
    /// Multipart upload of a file under the given form field.
    File { field: String, path: PathBuf },
}

#[derive(Debug, Clone)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: RequestBody,
    pub(crate) authenticated: bool,
    pub(crate) basic_auth: Option<(String, String)>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            authenticated: false,
            basic_auth: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attaches a bearer token from the gateway's token provider.
    pub fn authenticated(mut self) -> Self {
        self.authenticated = true;
        self
    }

    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.basic_auth = Some((username.into(), password.into()));
        self
    }

    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// One repeated `q=` parameter per filter, in order.
    pub fn filters(mut self, filters: &[Filter]) -> Self {
        self.query.extend(filters.iter().map(Filter::to_query_pair));
        self
    }

    /// Named v3 query parameters.
    pub fn queries(mut self, queries: &[Query]) -> Self {
        self.query.extend(queries.iter().map(Query::to_query_pair));
        self
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(body).map_err(into_domain)?;
        self.body = RequestBody::Json(Bytes::from(bytes));
        Ok(self)
    }

    pub fn form<K: Into<String>, V: Into<String>>(
        mut self,
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        self.body =
            RequestBody::Form(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    pub fn file(mut self, field: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.body = RequestBody::File { field: field.into(), path: path.into() };
        self
    }

    /// The request for the page named by a pagination link.
    ///
    /// v2 links are relative paths with their own query string; v3 links are
    /// absolute URLs. Either way the link replaces path and query.
    pub fn follow(&self, link: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: link.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            authenticated: self.authenticated,
            basic_auth: self.basic_auth.clone(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Bodies that stream from disk do not get the overall request deadline.
    pub(crate) fn is_streaming_upload(&self) -> bool {
        matches!(self.body, RequestBody::File { .. })
    }

    /// Resolves the request against the gateway's base URL.
    pub fn url(&self, base: &Url) -> Result<Url> {
        let mut url = if self.path.starts_with("http://") || self.path.starts_with("https://") {
            Url::parse(&self.path).map_err(into_domain)?
        } else {
            let base = base.as_str().trim_end_matches('/');
            let separator = if self.path.starts_with('/') || self.path.is_empty() { "" } else { "/" };
            Url::parse(&format!("{base}{separator}{}", self.path)).map_err(into_domain)?
        };

        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        Ok(url)
    }
}
