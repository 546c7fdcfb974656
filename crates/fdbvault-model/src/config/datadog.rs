use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{ModelResult, TimeoutMs, config::require_non_empty, domain::DEFAULT_DATADOG_SITE};

const REDACTED: &str = "<redacted>";

/// Datadog API credentials and endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatadogConfig {
    pub api_key: String,
    pub app_key: String,
    /// Base URL of the Datadog site (e.g. `https://api.datadoghq.eu`).
    #[serde(default = "default_site")]
    pub site: String,
    /// HTTP timeout for one event submission.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: TimeoutMs,
}

impl DatadogConfig {
    pub fn validate(&self) -> ModelResult<()> {
        require_non_empty("datadog.api_key", &self.api_key)?;
        require_non_empty("datadog.app_key", &self.app_key)?;
        require_non_empty("datadog.site", &self.site)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Events endpoint for the configured site.
    pub fn events_url(&self) -> String {
        format!("{}/api/v1/events", self.site.trim_end_matches('/'))
    }

    pub(crate) fn redacted(&self) -> Self {
        Self {
            api_key: REDACTED.to_string(),
            app_key: REDACTED.to_string(),
            ..self.clone()
        }
    }
}

impl fmt::Debug for DatadogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatadogConfig")
            .field("api_key", &REDACTED)
            .field("app_key", &REDACTED)
            .field("site", &self.site)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

fn default_site() -> String {
    DEFAULT_DATADOG_SITE.to_string()
}

fn default_timeout_ms() -> TimeoutMs {
    10_000
}
