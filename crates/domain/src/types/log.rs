//! Application log lines delivered by the logging endpoint

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogMessageType {
    Stdout,
    Stderr,
}

impl_domain_status_conversions!(LogMessageType {
    Stdout => "OUT",
    Stderr => "ERR",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMessage {
    pub message: String,
    pub message_type: LogMessageType,
    pub timestamp: DateTime<Utc>,
    pub source_type: String,
    pub source_instance: String,
}

impl LogMessage {
    pub fn is_error(&self) -> bool {
        self.message_type == LogMessageType::Stderr
    }
}
