use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::fetch::FetchConfig;
use crate::logging::LoggingConfig;

/// Effective configuration after all layers are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct HfetchConfig {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HfetchConfig {
    pub fn validate(&self) -> Result<()> {
        self.fetch
            .validate()
            .context("Invalid [fetch] configuration")?;
        Ok(())
    }
}
