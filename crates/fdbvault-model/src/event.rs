use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{ModelError, Tags};

/// Event priority as understood by the monitoring service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            _ => Err(ModelError::UnknownPriority(s.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of alert an event represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Success,
    Error,
    Info,
    Warning,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::Success => "success",
            AlertType::Error => "error",
            AlertType::Info => "info",
            AlertType::Warning => "warning",
        }
    }
}

impl FromStr for AlertType {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            _ => Err(ModelError::UnknownAlertType(s.to_string())),
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One event sent to the monitoring service.
///
/// Built fresh for every branch of a run and handed to the notifier by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub title: String,
    pub body: String,
    pub priority: Priority,
    pub tags: Tags,
    pub alert_type: AlertType,
}

impl NotificationEvent {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        priority: Priority,
        tags: Tags,
        alert_type: AlertType,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            priority,
            tags,
            alert_type,
        }
    }

    /// Error event at normal priority.
    pub fn error(title: impl Into<String>, body: impl Into<String>, tags: Tags) -> Self {
        Self::new(title, body, Priority::Normal, tags, AlertType::Error)
    }

    /// Success event at low priority.
    pub fn success(title: impl Into<String>, body: impl Into<String>, tags: Tags) -> Self {
        Self::new(title, body, Priority::Low, tags, AlertType::Success)
    }

    /// Informational event at low priority.
    pub fn info(title: impl Into<String>, body: impl Into<String>, tags: Tags) -> Self {
        Self::new(title, body, Priority::Low, tags, AlertType::Info)
    }

    pub fn is_error(&self) -> bool {
        self.alert_type == AlertType::Error
    }
}
