//! Organization and quota entities

use serde::{Deserialize, Serialize};

use super::Named;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub guid: String,
    pub name: String,
    pub quota_definition_guid: String,
}

impl Named for Organization {
    fn guid(&self) -> &str {
        &self.guid
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Quota definition that limits an organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationQuota {
    pub guid: String,
    pub name: String,
    /// Total memory in MB, `None` when unlimited.
    pub memory_limit_mb: Option<u64>,
    pub total_services: Option<i64>,
    pub total_routes: Option<i64>,
}

impl Named for OrganizationQuota {
    fn guid(&self) -> &str {
        &self.guid
    }

    fn name(&self) -> &str {
        &self.name
    }
}
