use super::schema::ShopwrightConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from an explicit path if one is given, else the default locations.
    pub async fn load(path: Option<&Path>) -> Result<ShopwrightConfig, ConfigError> {
        match path {
            Some(path) => Self::load_from(path).await,
            None => Self::load_default().await,
        }
    }

    /// Load from default locations:
    /// 1. ./shopwright.yaml
    /// 2. ~/.shopwright/config.yaml
    /// 3. Default configuration
    pub async fn load_default() -> Result<ShopwrightConfig, ConfigError> {
        let local_config = PathBuf::from("./shopwright.yaml");
        if local_config.exists() {
            return Self::load_from(&local_config).await;
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".shopwright").join("config.yaml");
            if home_config.exists() {
                return Self::load_from(&home_config).await;
            }
        }

        Ok(ShopwrightConfig::default())
    }

    pub async fn load_from(path: &Path) -> Result<ShopwrightConfig, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: ShopwrightConfig = serde_yaml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }
}
