//! `X-Cf-Warnings` extraction and the insecure-connection notice.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use reqwest::header::HeaderMap;
use skiff_domain::constants::{INSECURE_SSL_WARNING, WARNINGS_HEADER};
use skiff_domain::Warnings;

/// Reads every `X-Cf-Warnings` header value, splitting on commas and
/// query-unescaping each element.
pub fn parse_warnings(headers: &HeaderMap) -> Warnings {
    let mut warnings = Warnings::new();
    for value in headers.get_all(WARNINGS_HEADER) {
        let Ok(raw) = value.to_str() else {
            continue;
        };
        for element in raw.split(',') {
            let element = element.trim();
            if element.is_empty() {
                continue;
            }
            // Query-string unescaping: `+` is a space, `%2B` a literal plus.
            let element = element.replace('+', " ");
            match urlencoding::decode(&element) {
                Ok(decoded) => warnings.push(decoded.into_owned()),
                Err(_) => warnings.push(element.clone()),
            }
        }
    }
    warnings
}

/// One-shot notice shared by every gateway built for the same target.
///
/// When armed, the first warning batch handed out by any gateway holding a
/// clone is prefixed with the insecure SSL warning.
#[derive(Debug, Clone, Default)]
pub struct InsecureNotice(Arc<AtomicBool>);

impl InsecureNotice {
    pub fn armed() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn disarmed() -> Self {
        Self::default()
    }

    /// Returns a fresh batch, carrying the notice if it has not been emitted yet.
    pub fn start_batch(&self) -> Warnings {
        let mut warnings = Warnings::new();
        if self.0.swap(false, Ordering::SeqCst) {
            warnings.push(INSECURE_SSL_WARNING);
        }
        warnings
    }
}
