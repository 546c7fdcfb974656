use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::TimeoutMs;

/// Optional upper bounds for each external call.
///
/// `None` means the stage may block indefinitely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageTimeouts {
    pub process_check_ms: Option<TimeoutMs>,
    pub backup_ms: Option<TimeoutMs>,
    pub archive_ms: Option<TimeoutMs>,
    pub upload_ms: Option<TimeoutMs>,
}

impl StageTimeouts {
    pub fn process_check(&self) -> Option<Duration> {
        self.process_check_ms.map(Duration::from_millis)
    }

    pub fn backup(&self) -> Option<Duration> {
        self.backup_ms.map(Duration::from_millis)
    }

    pub fn archive(&self) -> Option<Duration> {
        self.archive_ms.map(Duration::from_millis)
    }

    pub fn upload(&self) -> Option<Duration> {
        self.upload_ms.map(Duration::from_millis)
    }
}
