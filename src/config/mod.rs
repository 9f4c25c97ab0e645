//! Configuration for the defense pipeline
//!
//! Handles loading and validation of the settings all four filters run on.

pub mod models;
pub mod validation;


pub use models::{
    ActionLimit, DefenseConfig, FileTypeRules, InputSettings, RateLimitSettings, RetrySettings,
    UploadSettings,
};
pub use validation::Validate;

use std::path::Path;

use tracing::{debug, info};

use crate::error::{DefenseError, Result};

impl DefenseConfig {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DefenseError::config(format!("Failed to read config file: {e}")))?;

        let config = Self::from_yaml(&content)?;
        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate configuration from a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| DefenseError::config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}
