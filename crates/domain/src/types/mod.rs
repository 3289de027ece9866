//! Platform entities
//!
//! All entities are read-only snapshots local to one action invocation.
//! Identity is the server-issued GUID.

pub mod application;
pub mod droplet;
pub mod info;
pub mod job;
pub mod log;
pub mod organization;
pub mod package;
pub mod space;
pub mod token;

use serde::{Deserialize, Serialize};

pub use application::{Application, ApplicationState};
pub use droplet::{Droplet, DropletState};
pub use info::ApiInfo;
pub use job::{Job, JobState};
pub use log::{LogMessage, LogMessageType};
pub use organization::{Organization, OrganizationQuota};
pub use package::{Package, PackageState, PackageType};
pub use space::Space;
pub use token::TokenPair;

/// Resource kinds that name lookups and errors refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Organization,
    OrganizationQuota,
    Space,
    Application,
    Package,
    Droplet,
    Job,
}

impl ResourceKind {
    /// Human label used in rendered messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Organization => "Organization",
            Self::OrganizationQuota => "Quota",
            Self::Space => "Space",
            Self::Application => "App",
            Self::Package => "Package",
            Self::Droplet => "Droplet",
            Self::Job => "Job",
        }
    }
}

/// Entities that name lookups can resolve.
pub trait Named {
    fn guid(&self) -> &str;
    fn name(&self) -> &str;
}
