//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::PortalConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overrides, applied after the file is parsed.
///
/// These mirror the deployment knobs the portal has always taken from
/// the environment rather than the config file.
pub const ENV_PUBLIC_BASE_URL: &str = "PORTAL_PUBLIC_BASE_URL";
pub const ENV_PROVIDER_APP_ID: &str = "PORTAL_PROVIDER_APP_ID";
pub const ENV_WALLETCONNECT_PROJECT_ID: &str = "PORTAL_WALLETCONNECT_PROJECT_ID";
pub const ENV_DESTINATION_ADDRESS: &str = "PORTAL_DESTINATION_ADDRESS";
pub const ENV_TOKEN_CONTRACT_ADDRESS: &str = "PORTAL_TOKEN_CONTRACT_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load, override from the environment, and validate a TOML config file.
pub fn load_config(path: &Path) -> Result<PortalConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config: PortalConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment variable overrides to a parsed config.
pub fn apply_env_overrides(config: &mut PortalConfig) {
    if let Ok(v) = std::env::var(ENV_PUBLIC_BASE_URL) {
        config.public_base_url = v;
    }
    if let Ok(v) = std::env::var(ENV_PROVIDER_APP_ID) {
        config.provider.app_id = v;
    }
    if let Ok(v) = std::env::var(ENV_WALLETCONNECT_PROJECT_ID) {
        config.provider.walletconnect_project_id = v;
    }
    if let Ok(v) = std::env::var(ENV_DESTINATION_ADDRESS) {
        config.token.destination_address = v;
    }
    if let Ok(v) = std::env::var(ENV_TOKEN_CONTRACT_ADDRESS) {
        config.token.contract_address = v;
    }
}
