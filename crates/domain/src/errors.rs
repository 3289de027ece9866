//! Error types used throughout the workspace
//!
//! Every error the core surfaces is a variant of [`Error`]. The gateway's
//! decoders produce the server-side variants, the gateway itself produces the
//! transport variants, and actions add semantic context (`NotFound`,
//! `MultipleEntitiesFound`, the precondition and version-gate variants).

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::impl_domain_status_conversions;
use crate::types::ResourceKind;

/// How a missing resource was looked up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lookup {
    Name(String),
    Guid(String),
}

impl Lookup {
    pub fn value(&self) -> &str {
        match self {
            Self::Name(value) | Self::Guid(value) => value,
        }
    }
}

/// Main error type for Skiff
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Error {
    #[error("Invalid auth token: {description}")]
    InvalidToken { description: String },

    #[error("Credentials were rejected, please try again.")]
    BadCredentials,

    #[error("{message}")]
    Unauthorized { message: String },

    #[error("{message}")]
    Forbidden { message: String },

    /// The server answered 404.
    #[error("{message}")]
    ResourceNotFound { message: String },

    /// A lookup resolved to nothing.
    #[error("{}", not_found_message(*kind, lookup))]
    NotFound { kind: ResourceKind, lookup: Lookup },

    #[error("{} name '{name}' matches multiple GUIDs: {}", kind.label(), guids.join(", "))]
    MultipleEntitiesFound {
        kind: ResourceKind,
        name: String,
        guids: Vec<String>,
    },

    #[error("{message}")]
    NameTaken { message: String },

    #[error("{message}")]
    UnprocessableEntity { message: String },

    #[error("{message}")]
    BadRequest { message: String },

    #[error("{message}")]
    NotStaged { message: String },

    #[error("{message}")]
    ServiceUnavailable { message: String },

    #[error("Server error, status code: {status}, error code: {code}, message: {description}")]
    Http {
        status: u16,
        code: String,
        description: String,
    },

    #[error("Request error: {cause}")]
    Request { cause: String },

    #[error("Request aborted")]
    RequestAborted,

    #[error("Unable to decode response: {message}")]
    Decode { message: String },

    #[error("Job ({guid}) failed: {cause}")]
    JobFailed { guid: String, cause: String },

    #[error(
        "Job ({guid}) polling timeout has been reached. The operation may still be running on \
         the CF instance. Your CF operator may have more information."
    )]
    JobTimeout { guid: String },

    #[error("This command requires CF API version {required} or higher.")]
    ApiVersionTooLow { required: String, actual: String },

    #[error("No API endpoint set. Use 'cf login' or 'cf api' to target an endpoint.")]
    NoApiTargeted,

    #[error("Not logged in. Use 'cf login' to log in.")]
    Unauthenticated,

    #[error("No org targeted, use 'cf target -o ORG' to target an org.")]
    NoOrgTargeted,

    #[error("No space targeted, use 'cf target -s SPACE' to target a space.")]
    NoSpaceTargeted,

    #[error("Configuration error: {message}")]
    Config { message: String },
}

fn not_found_message(kind: ResourceKind, lookup: &Lookup) -> String {
    match (kind, lookup) {
        (ResourceKind::Package, _) => {
            "Unable to use package. Ensure that the package exists and you have access to it."
                .to_string()
        }
        (ResourceKind::Application, lookup) => format!("App {} not found", lookup.value()),
        (kind, Lookup::Name(name)) => format!("{} '{}' not found.", kind.label(), name),
        (kind, Lookup::Guid(guid)) => format!("{} with GUID '{}' not found.", kind.label(), guid),
    }
}

/// Coarse grouping used for log labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Authentication,
    NotFound,
    Conflict,
    Precondition,
    Server,
    Transport,
    Job,
    Config,
}

impl_domain_status_conversions!(ErrorCategory {
    Authentication => "authentication",
    NotFound => "not_found",
    Conflict => "conflict",
    Precondition => "precondition",
    Server => "server",
    Transport => "transport",
    Job => "job",
    Config => "config",
});

impl Error {
    pub fn not_found_by_name(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self::NotFound { kind, lookup: Lookup::Name(name.into()) }
    }

    pub fn not_found_by_guid(kind: ResourceKind, guid: impl Into<String>) -> Self {
        Self::NotFound { kind, lookup: Lookup::Guid(guid.into()) }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidToken { .. }
            | Self::BadCredentials
            | Self::Unauthorized { .. }
            | Self::Forbidden { .. } => ErrorCategory::Authentication,
            Self::ResourceNotFound { .. } | Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::MultipleEntitiesFound { .. } | Self::NameTaken { .. } => ErrorCategory::Conflict,
            Self::UnprocessableEntity { .. }
            | Self::BadRequest { .. }
            | Self::NotStaged { .. }
            | Self::ApiVersionTooLow { .. }
            | Self::NoApiTargeted
            | Self::Unauthenticated
            | Self::NoOrgTargeted
            | Self::NoSpaceTargeted => ErrorCategory::Precondition,
            Self::ServiceUnavailable { .. } | Self::Http { .. } => ErrorCategory::Server,
            Self::Request { .. } | Self::RequestAborted | Self::Decode { .. } => {
                ErrorCategory::Transport
            }
            Self::JobFailed { .. } | Self::JobTimeout { .. } => ErrorCategory::Job,
            Self::Config { .. } => ErrorCategory::Config,
        }
    }

    /// Process exit code for a command that failed with this error.
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// True for both the server's 404 and a lookup that resolved to nothing.
    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "name '{name}'"),
            Self::Guid(guid) => write!(f, "GUID '{guid}'"),
        }
    }
}

/// Result type alias for Skiff operations
pub type Result<T> = std::result::Result<T, Error>;
