//! UAA error dialect: `{error, error_description}`.

use serde::Deserialize;
use skiff_domain::Error;

use super::raw_http_error;

#[derive(Debug, Deserialize)]
struct UaaErrorBody {
    error: String,
    #[serde(default)]
    error_description: String,
}

/// Decodes a UAA error response.
pub fn decode(status: u16, body: &[u8]) -> Error {
    let Ok(parsed) = serde_json::from_slice::<UaaErrorBody>(body) else {
        return raw_http_error(status, body);
    };

    match (status, parsed.error.as_str()) {
        (_, "invalid_token") => Error::InvalidToken { description: parsed.error_description },
        (401, "unauthorized") => Error::BadCredentials,
        _ => Error::Http { status, code: parsed.error, description: parsed.error_description },
    }
}
