//! v2 error dialect: `{code, error_code, description}`.

use serde::Deserialize;
use skiff_domain::Error;

use super::mapping::{classify, ServerError};
use super::raw_http_error;

#[derive(Debug, Deserialize)]
struct V2ErrorBody {
    code: Option<i64>,
    error_code: Option<String>,
    description: Option<String>,
    // Token errors surface in the UAA shape even on controller endpoints.
    error: Option<String>,
    error_description: Option<String>,
}

/// Decodes a v2 controller error response.
pub fn decode(status: u16, body: &[u8]) -> Error {
    let Ok(parsed) = serde_json::from_slice::<V2ErrorBody>(body) else {
        return raw_http_error(status, body);
    };

    let error = ServerError {
        code: parsed.code,
        error_code: parsed.error_code.or(parsed.error).unwrap_or_default(),
        description: parsed.description.or(parsed.error_description).unwrap_or_default(),
    };
    classify(status, error)
}
