use anyhow::Context;
use fdbvault_model::{JobConfig, load_yaml};
use fdbvault_observe::LoggerConfig;
use serde::{Deserialize, Serialize};

use crate::args::Args;

/// Everything the binary reads from the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(flatten)]
    pub job: JobConfig,
    #[serde(default)]
    pub logger: LoggerConfig,
}

impl Settings {
    /// Load the file named by `args`, then apply flag and environment overrides.
    ///
    /// Precedence: built-in defaults, then the file, then flags/environment.
    pub fn load(args: &Args) -> anyhow::Result<Self> {
        let mut settings: Settings = load_yaml(&args.config)
            .with_context(|| format!("cannot load configuration '{}'", args.config.display()))?;

        settings.job.apply_overrides(&args.overrides());
        settings
            .job
            .validate()
            .context("invalid configuration")?;

        if let Some(level) = &args.log_level {
            settings.logger.level = level.clone();
        }
        if let Some(format) = args.log_format {
            settings.logger.format = format;
        }
        if let Some(file) = &args.log_file {
            settings.logger.file = Some(file.clone());
        }
        Ok(settings)
    }

    /// YAML rendering with credentials masked.
    pub fn to_redacted_yaml(&self) -> anyhow::Result<String> {
        let redacted = Settings {
            job: self.job.redacted(),
            logger: self.logger.clone(),
        };
        serde_yaml::to_string(&redacted).context("cannot render configuration")
    }
}
