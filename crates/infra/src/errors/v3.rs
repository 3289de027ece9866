//! v3 error dialect: `{errors: [{code, title, detail}]}`.
//!
//! The first entry decides the error. Additional entries only add detail.

use serde::Deserialize;
use skiff_domain::Error;

use super::mapping::{classify, ServerError};
use super::raw_http_error;

#[derive(Debug, Deserialize)]
struct V3ErrorBody {
    #[serde(default)]
    errors: Vec<V3ErrorEntry>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct V3ErrorEntry {
    code: Option<i64>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    detail: String,
}

/// Decodes a v3 controller error response.
pub fn decode(status: u16, body: &[u8]) -> Error {
    let Ok(parsed) = serde_json::from_slice::<V3ErrorBody>(body) else {
        return raw_http_error(status, body);
    };

    let mut entries = parsed.errors.into_iter();
    let error = match entries.next() {
        Some(first) => {
            let mut description = first.detail;
            for extra in entries {
                description.push_str(", ");
                description.push_str(&extra.detail);
            }
            ServerError { code: first.code, error_code: first.title, description }
        }
        None => match parsed.error {
            Some(error_code) => ServerError {
                code: None,
                error_code,
                description: parsed.error_description.unwrap_or_default(),
            },
            None => return raw_http_error(status, body),
        },
    };
    classify(status, error)
}
