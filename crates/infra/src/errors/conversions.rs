//! Conversions from external infrastructure errors into domain errors.

use std::io::{Error as IoError, ErrorKind};

use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use skiff_domain::Error;
use url::ParseError as UrlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub Error);

impl From<InfraError> for Error {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<Error> for InfraError {
    fn from(value: Error) -> Self {
        InfraError(value)
    }
}

/// Converts any supported infrastructure error straight into the domain error.
pub fn into_domain<E: Into<InfraError>>(err: E) -> Error {
    let infra: InfraError = err.into();
    infra.0
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoSkiffError {
    fn into_skiff(self) -> Error;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → Error */
/* -------------------------------------------------------------------------- */

impl IntoSkiffError for HttpError {
    fn into_skiff(self) -> Error {
        if self.is_timeout() {
            return Error::Request { cause: "request timed out".into() };
        }

        if self.is_connect() {
            return Error::Request { cause: format!("connection failed: {self}") };
        }

        if self.is_decode() {
            return Error::Decode { message: self.to_string() };
        }

        if self.is_builder() {
            return Error::Config { message: format!("invalid request: {self}") };
        }

        Error::Request { cause: self.to_string() }
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_skiff())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → Error */
/* -------------------------------------------------------------------------- */

impl IntoSkiffError for JsonError {
    fn into_skiff(self) -> Error {
        Error::Decode { message: self.to_string() }
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_skiff())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → Error */
/* -------------------------------------------------------------------------- */

impl IntoSkiffError for IoError {
    fn into_skiff(self) -> Error {
        match self.kind() {
            ErrorKind::TimedOut => Error::Request { cause: "read deadline exceeded".into() },
            ErrorKind::NotFound => Error::Request { cause: format!("file not found: {self}") },
            _ => Error::Request { cause: self.to_string() },
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_skiff())
    }
}

/* -------------------------------------------------------------------------- */
/* url::ParseError → Error */
/* -------------------------------------------------------------------------- */

impl From<UrlError> for InfraError {
    fn from(value: UrlError) -> Self {
        InfraError(Error::Config { message: format!("invalid URL: {value}") })
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
