use serde::{Deserialize, Serialize};

/// Endpoints and versions advertised by the controller root document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiInfo {
    pub api_version: String,
    /// Empty when the controller has no v3 surface.
    pub v3_version: String,
    pub authorization_endpoint: String,
    pub logging_endpoint: String,
}
