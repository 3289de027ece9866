//! Application entity
//!
//! The v2 and v3 controllers describe applications with different shapes.
//! Both clients lift their payloads into this one user-facing view.

use serde::{Deserialize, Serialize};

use super::Named;
use crate::impl_domain_status_conversions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplicationState {
    Started,
    Stopped,
}

impl_domain_status_conversions!(ApplicationState {
    Started => "STARTED",
    Stopped => "STOPPED",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub guid: String,
    pub name: String,
    pub space_guid: String,
    pub state: ApplicationState,
    /// Desired instance count; only the v2 shape carries it.
    pub instances: Option<u32>,
}

impl Application {
    pub fn is_started(&self) -> bool {
        self.state == ApplicationState::Started
    }
}

impl Named for Application {
    fn guid(&self) -> &str {
        &self.guid
    }

    fn name(&self) -> &str {
        &self.name
    }
}
