use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropletState {
    Staging,
    Staged,
    Failed,
    Copying,
    Expired,
    AwaitingUpload,
    ProcessingUpload,
}

impl_domain_status_conversions!(DropletState {
    Staging => "STAGING",
    Staged => "STAGED",
    Failed => "FAILED",
    Copying => "COPYING",
    Expired => "EXPIRED",
    AwaitingUpload => "AWAITING_UPLOAD",
    ProcessingUpload => "PROCESSING_UPLOAD",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Droplet {
    pub guid: String,
    pub app_guid: String,
    pub state: DropletState,
    pub created_at: Option<DateTime<Utc>>,
    /// Failure reason reported by the stager.
    pub error: Option<String>,
}
